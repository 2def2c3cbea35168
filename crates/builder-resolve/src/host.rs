//! The seam between a resolution run and the language backend driving it.
//!
//! `DependencyContext` needs to invoke a language's resolver callback and, for
//! `project`-location dependencies, translate a sibling project's configuration
//! into a publish directory. Both of those live with the language registry and
//! project cache, which in turn depend on this crate's `DependencyContext` —
//! so rather than pull those crates in here and create a cycle, the dependency
//! is inverted: whoever owns a language's resolver and a project cache
//! implements `ResolutionHost` and hands an `Arc<dyn ResolutionHost>` to the
//! context it drives.

use crate::context::DependencyContext;
use crate::error::ResolutionError;
use builder_deps::{Dependency, DependencyPathSet};
use std::path::PathBuf;

/// One language's resolution behavior, as seen from `DependencyContext`.
pub trait ResolutionHost: Send + Sync {
    /// The language tag this host resolves dependencies for.
    fn language_tag(&self) -> &str;

    /// Resolves a single dependency, using `context`'s `to_local_path`/`set_remote_info`
    /// helpers to fetch files and `context.add_dependency` to register transients.
    /// `None` means the dependency could not be resolved.
    fn resolve_dependency(
        &self,
        context: &mut DependencyContext,
        dependency: &Dependency,
    ) -> Result<Option<DependencyPathSet>, ResolutionError>;

    /// The directory a sibling project publishes this language's artifacts into,
    /// used to satisfy `project`-location dependencies.
    fn publish_dir_for_project(&self, project_key: &str) -> Result<Option<PathBuf>, ResolutionError>;
}
