//! `EngineResolutionHost`: the concrete `ResolutionHost` the engine hands to
//! each `DependencyContext` it drives, bridging one `Language`'s resolver and
//! publish-directory callbacks to the project cache needed for
//! `project`-location dependencies.

use builder_core::GlobalOptions;
use builder_deps::{Dependency, DependencyPathSet};
use builder_project::ProjectCache;
use builder_registry::{Language, LanguageRegistry, PublishDirFn, ResolverFn};
use builder_resolve::{DependencyContext, ResolutionError, ResolutionHost};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

pub struct EngineResolutionHost {
    tag: String,
    configuration_schema: Option<Value>,
    resolver: Option<ResolverFn>,
    publish_dir: Option<PublishDirFn>,
    project_cache: ProjectCache,
    registry: Arc<LanguageRegistry>,
    options: Arc<GlobalOptions>,
}

impl EngineResolutionHost {
    /// Shares `language`'s resolver/publish-dir callbacks and configuration
    /// schema without needing `Language` itself to be `Clone` (its tasks
    /// carry non-shareable state this host never touches).
    pub fn from_language(language: &Language, project_cache: ProjectCache, registry: Arc<LanguageRegistry>, options: Arc<GlobalOptions>) -> Self {
        Self {
            tag: language.tag().to_string(),
            configuration_schema: language.configuration_schema().cloned(),
            resolver: language.resolver().cloned(),
            publish_dir: language.publish_dir().cloned(),
            project_cache,
            registry,
            options,
        }
    }
}

impl ResolutionHost for EngineResolutionHost {
    fn language_tag(&self) -> &str {
        &self.tag
    }

    fn resolve_dependency(&self, context: &mut DependencyContext, dependency: &Dependency) -> Result<Option<DependencyPathSet>, ResolutionError> {
        let resolver = self.resolver.as_ref().ok_or_else(|| ResolutionError::NoResolver { tag: self.tag.clone() })?;
        resolver(context, dependency)
    }

    fn publish_dir_for_project(&self, project_key: &str) -> Result<Option<PathBuf>, ResolutionError> {
        let Some(publish_dir) = &self.publish_dir else {
            return Ok(None);
        };

        let project = self
            .project_cache
            .get_project(project_key, &self.registry, &self.options)
            .map_err(|_| ResolutionError::UnknownProject(project_key.to_string()))?;
        let Some(project) = project else {
            return Ok(None);
        };

        let config = project
            .get_config_value(&self.tag, self.configuration_schema.as_ref())
            .map_err(|_| ResolutionError::UnknownProject(project_key.to_string()))?;

        Ok(publish_dir(&config))
    }
}
