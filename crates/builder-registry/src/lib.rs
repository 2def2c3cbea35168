//! The language backend registry (§4.F): loads a language's tasks, resolver,
//! and publish-directory mapping, and disambiguates task names across every
//! language a project requests.

mod error;
mod language;
mod module_set;
mod task;

pub use error::RegistryError;
pub use language::{Language, LanguageDefiner, LanguageRegistry, PublishDirFn, ResolverFn};
pub use module_set::ModuleSet;
pub use task::{Task, TaskContext, TaskFunction, TaskInput};
