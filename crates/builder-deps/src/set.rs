//! `DependencySet` (§4.D): the full, insertion-ordered collection of dependencies
//! declared in a descriptor's `dependencies` section.

use crate::dependency::Dependency;
use crate::error::DependencyError;
use indexmap::IndexMap;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default)]
pub struct DependencySet {
    dependencies: IndexMap<String, Dependency>,
}

impl DependencySet {
    pub fn from_content(content: &Map<String, Value>) -> Result<Self, DependencyError> {
        let mut dependencies = IndexMap::new();
        for (key, value) in content {
            let dependency = Dependency::from_content(key, value)?;
            dependencies.insert(key.clone(), dependency);
        }
        Ok(Self { dependencies })
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    /// The dependencies that apply to `task`, in descriptor order.
    pub fn dependencies_for(&self, task: &str) -> Vec<Dependency> {
        self.dependencies
            .values()
            .filter(|dependency| dependency.applies_to(task))
            .cloned()
            .collect()
    }

    /// All dependencies, in descriptor order.
    pub fn all(&self) -> Vec<Dependency> {
        self.dependencies.values().cloned().collect()
    }

    pub fn get(&self, key: &str) -> Option<&Dependency> {
        self.dependencies.get(key)
    }
}
