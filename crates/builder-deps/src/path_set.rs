//! The result of resolving a single dependency: its primary artifact path plus
//! any secondary paths a language resolver attached (sources jar, metadata file, etc.).

use crate::dependency::Dependency;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct DependencyPathSet {
    dependency: Dependency,
    primary_path: PathBuf,
    secondary_paths: HashMap<String, PathBuf>,
}

impl DependencyPathSet {
    pub fn new(dependency: Dependency, primary_path: PathBuf) -> Self {
        Self {
            dependency,
            primary_path,
            secondary_paths: HashMap::new(),
        }
    }

    pub fn dependency(&self) -> &Dependency {
        &self.dependency
    }

    pub fn primary_path(&self) -> &Path {
        &self.primary_path
    }

    pub fn add_secondary_path(&mut self, key: impl Into<String>, path: PathBuf) {
        self.secondary_paths.insert(key.into(), path);
    }

    pub fn has_secondary_path(&self, key: &str) -> bool {
        self.secondary_paths.contains_key(key)
    }

    pub fn secondary_path(&self, key: &str) -> Option<&Path> {
        self.secondary_paths.get(key).map(PathBuf::as_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn secondary_paths_are_keyed() {
        let dependency = Dependency::from_content("key", &json!({"spec": "remote:1.0.0", "scope": "compile"})).unwrap();
        let mut set = DependencyPathSet::new(dependency, PathBuf::from("key-1.0.0.jar"));
        assert!(!set.has_secondary_path("sources"));
        set.add_secondary_path("sources", PathBuf::from("key-1.0.0-sources.jar"));
        assert!(set.has_secondary_path("sources"));
        assert_eq!(set.secondary_path("sources"), Some(Path::new("key-1.0.0-sources.jar")));
    }
}
