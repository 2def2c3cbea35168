//! `Language` (§3, §4.F): a fixed descriptor for one language backend, loaded
//! once per requested tag.
//!
//! The original loads a backend by importing `builder.<language>` and calling
//! its `define_language` hook. Rust has no equivalent of `importlib`, so
//! backends register a definer function against a tag ahead of time and
//! `LanguageRegistry::load` plays the same "call the hook, or warn and return
//! none" role against that explicit table instead of dynamic import.

use crate::task::Task;
use builder_deps::Dependency;
use builder_resolve::{DependencyContext, ResolutionError};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

pub type ResolverFn =
    Arc<dyn Fn(&mut DependencyContext, &Dependency) -> Result<Option<builder_deps::DependencyPathSet>, ResolutionError> + Send + Sync>;

/// Maps a sibling project's language configuration to the directory it
/// publishes this language's artifacts into.
pub type PublishDirFn = Arc<dyn Fn(&Value) -> Option<PathBuf> + Send + Sync>;

pub struct Language {
    tag: String,
    configuration_schema: Option<Value>,
    tasks: Vec<Task>,
    resolver: Option<ResolverFn>,
    publish_dir: Option<PublishDirFn>,
}

impl Language {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            configuration_schema: None,
            tasks: Vec::new(),
            resolver: None,
            publish_dir: None,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn configuration_schema(&self) -> Option<&Value> {
        self.configuration_schema.as_ref()
    }

    pub fn set_configuration_schema(&mut self, schema: Value) -> &mut Self {
        self.configuration_schema = Some(schema);
        self
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub(crate) fn tasks_mut(&mut self) -> &mut [Task] {
        &mut self.tasks
    }

    pub fn add_task(&mut self, task: Task) -> &mut Self {
        self.tasks.push(task);
        self
    }

    pub fn get_task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.name() == name)
    }

    pub fn resolver(&self) -> Option<&ResolverFn> {
        self.resolver.as_ref()
    }

    pub fn set_resolver(&mut self, resolver: ResolverFn) -> &mut Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn publish_dir(&self) -> Option<&PublishDirFn> {
        self.publish_dir.as_ref()
    }

    pub fn set_publish_dir(&mut self, publish_dir: PublishDirFn) -> &mut Self {
        self.publish_dir = Some(publish_dir);
        self
    }
}

pub type LanguageDefiner = fn(&mut Language);

/// The explicit registration table `LanguageRegistry::load` plays
/// `get_language_module`'s role against, in place of `importlib.import_module`.
#[derive(Default)]
pub struct LanguageRegistry {
    definers: HashMap<String, LanguageDefiner>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tag: impl Into<String>, definer: LanguageDefiner) {
        self.definers.insert(tag.into(), definer);
    }

    /// Loads the backend for `tag`. Not fatal on a missing registration: a
    /// task error downstream gives the end user more complete information,
    /// especially since an unrecognized `--language` is the most likely cause.
    pub fn load(&self, tag: &str) -> Option<Language> {
        let definer = match self.definers.get(tag) {
            Some(definer) => definer,
            None => {
                tracing::warn!(target = "builder.registry", language = tag, "no backend registered for language");
                return None;
            }
        };
        let mut language = Language::new(tag);
        definer(&mut language);
        Some(language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn define_stub(language: &mut Language) {
        language.add_task(Task::new("build"));
    }

    #[test]
    fn load_calls_registered_definer() {
        let mut registry = LanguageRegistry::new();
        registry.register("stub", define_stub);
        let language = registry.load("stub").unwrap();
        assert_eq!(language.tag(), "stub");
        assert!(language.get_task("build").is_some());
    }

    #[test]
    fn load_returns_none_for_unregistered_tag() {
        let registry = LanguageRegistry::new();
        assert!(registry.load("missing").is_none());
    }
}
