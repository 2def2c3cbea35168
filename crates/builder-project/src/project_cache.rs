//! `ProjectCache` (§4.G): a directory whose sub-projects are themselves valid
//! projects, keyed by project name. Used to resolve `project`-location
//! dependencies without re-parsing a sibling project's descriptor on every
//! lookup.

use crate::error::ProjectError;
use crate::project::Project;
use builder_core::GlobalOptions;
use builder_registry::LanguageRegistry;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// `Send + Sync` (backed by `Arc<Mutex<_>>` rather than `Rc<RefCell<_>>`)
/// because `builder-resolve`'s `ResolutionHost` seam requires its
/// implementors to be, and a `ProjectCache` is held by whichever host
/// resolves `project`-location dependencies.
#[derive(Clone)]
pub struct ProjectCache {
    root: Option<PathBuf>,
    projects: Arc<Mutex<HashMap<String, Arc<Project>>>>,
}

impl ProjectCache {
    /// A cache rooted at `root`: each immediate subdirectory is a candidate
    /// sibling project, looked up lazily by name.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root: Some(root),
            projects: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// A cache with no backing directory; every lookup misses. Used where a
    /// project stands alone, outside a multi-project workspace.
    pub fn empty() -> Self {
        Self {
            root: None,
            projects: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn get_project(&self, name: &str, registry: &LanguageRegistry, options: &GlobalOptions) -> Result<Option<Arc<Project>>, ProjectError> {
        if let Some(project) = self.projects.lock().unwrap().get(name) {
            return Ok(Some(Arc::clone(project)));
        }

        let Some(root) = &self.root else {
            return Ok(None);
        };

        let directory = root.join(name);
        if !directory.is_dir() {
            return Ok(None);
        }

        let project = Arc::new(Project::get_project(&directory, registry, options, self.clone())?);
        self.projects.lock().unwrap().insert(name.to_string(), Arc::clone(&project));
        Ok(Some(project))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cache_never_resolves_a_project() {
        let cache = ProjectCache::empty();
        let registry = LanguageRegistry::new();
        let options = GlobalOptions::default();
        assert!(cache.get_project("whatever", &registry, &options).unwrap().is_none());
    }

    #[test]
    fn missing_subdirectory_resolves_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ProjectCache::new(dir.path().to_path_buf());
        let registry = LanguageRegistry::new();
        let options = GlobalOptions::default();
        assert!(cache.get_project("nope", &registry, &options).unwrap().is_none());
    }
}
