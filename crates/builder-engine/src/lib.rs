//! The task engine (§4.H): resolves task references against a project's
//! module set, orders the work by prerequisite, and drives each task's
//! dependency resolution and invocation.

mod engine;
mod error;
mod host;

pub use engine::Engine;
pub use error::EngineError;
