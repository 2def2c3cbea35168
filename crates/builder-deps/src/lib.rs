//! The dependency data model (§3/§4.D): a single `Dependency`, the result of
//! resolving one (`DependencyPathSet`), and the descriptor-wide collection of
//! them (`DependencySet`).

mod dependency;
mod error;
mod path_set;
mod schema;
mod set;

pub use dependency::{Dependency, Location};
pub use error::DependencyError;
pub use path_set::DependencyPathSet;
pub use schema::{dependencies_section_schema, dependency_schema};
pub use set::DependencySet;
