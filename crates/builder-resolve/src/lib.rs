//! Dependency resolution (§4.E): turns declared dependencies into verified
//! local file paths, following transients discovered in metadata and
//! detecting version conflicts within a single run.

mod context;
mod error;
mod host;
mod names;

pub use context::DependencyContext;
pub use error::ResolutionError;
pub use host::ResolutionHost;
pub use names::{build_names, BuiltNames};
