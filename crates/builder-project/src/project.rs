//! `Project` (§4.G): a parsed, validated descriptor plus the derived state a
//! task needs to run against it — its language modules, its dependency set,
//! and a lazily populated, cached view of each task's own configuration.

use crate::error::ProjectError;
use crate::project_cache::ProjectCache;
use crate::schema::project_descriptor_schema;
use crate::vars::substitute_vars;
use builder_core::GlobalOptions;
use builder_deps::DependencySet;
use builder_registry::{LanguageRegistry, ModuleSet};
use builder_schema::SchemaValidator;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct Project {
    directory: PathBuf,
    content: Value,
    module_set: Option<ModuleSet>,
    unknown_languages: Option<Vec<String>>,
    dependencies: DependencySet,
    // `Mutex`, not `RefCell`: a `Project` is held behind `Arc` by `ProjectCache`,
    // which in turn is owned by whatever implements `builder-resolve`'s
    // `Send + Sync` `ResolutionHost` seam.
    config_cache: Mutex<HashMap<String, Value>>,
    project_cache: ProjectCache,
}

impl Project {
    /// Reads and validates a `project.yaml` at `path`. Top-level sections
    /// that carry per-task configuration are validated later, against the
    /// owning task's own schema, the first time that configuration is asked
    /// for.
    pub fn from_file(path: &Path, registry: &LanguageRegistry, options: &GlobalOptions, project_cache: ProjectCache) -> Result<Self, ProjectError> {
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
        let text = fs::read_to_string(path)?;
        let content: Value = serde_yaml::from_str(&text).map_err(|source| ProjectError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;

        let schema = project_descriptor_schema();
        let mut validator = SchemaValidator::new(schema);
        if !validator.validate(&content, "") {
            return Err(ProjectError::InvalidDescriptor(validator.error.unwrap_or_default()));
        }

        Self::new(directory, content, registry, options, project_cache)
    }

    /// Builds a minimal project directly from a directory, without a
    /// `project.yaml`. The project name defaults to the directory's own
    /// name, the version to `0.0.1`.
    pub fn from_dir(
        directory: &Path,
        name: Option<&str>,
        version: Option<&str>,
        language: Option<&str>,
        registry: &LanguageRegistry,
        options: &GlobalOptions,
        project_cache: ProjectCache,
    ) -> Result<Self, ProjectError> {
        let mut info = serde_json::Map::new();
        if let Some(name) = name {
            info.insert("name".to_string(), Value::String(name.to_string()));
        }
        if let Some(version) = version {
            info.insert("version".to_string(), Value::String(version.to_string()));
        }
        if let Some(language) = language {
            info.insert("languages".to_string(), Value::String(language.to_string()));
        }

        let content = serde_json::json!({ "info": Value::Object(info) });
        Self::new(directory.to_path_buf(), content, registry, options, project_cache)
    }

    /// Builds a project for `directory`: reads `project.yaml` if present,
    /// otherwise falls back to a minimal, directory-derived project.
    pub fn get_project(directory: &Path, registry: &LanguageRegistry, options: &GlobalOptions, project_cache: ProjectCache) -> Result<Self, ProjectError> {
        let descriptor = directory.join("project.yaml");
        if descriptor.exists() {
            Self::from_file(&descriptor, registry, options, project_cache)
        } else {
            Self::from_dir(directory, None, None, None, registry, options, project_cache)
        }
    }

    fn new(directory: PathBuf, mut content: Value, registry: &LanguageRegistry, options: &GlobalOptions, project_cache: ProjectCache) -> Result<Self, ProjectError> {
        let object = content.as_object_mut().ok_or_else(|| ProjectError::InvalidDescriptor("project file must be a mapping".to_string()))?;

        let info = object.entry("info").or_insert_with(|| Value::Object(serde_json::Map::new()));
        let info = info.as_object_mut().ok_or_else(|| ProjectError::InvalidDescriptor("\"info\" must be a mapping".to_string()))?;

        if !info.contains_key("name") {
            let name = directory.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            info.insert("name".to_string(), Value::String(name));
        }
        if !info.contains_key("version") {
            info.insert("version".to_string(), Value::String("0.0.1".to_string()));
        }
        fix_up_language_list(info, options.languages());

        if !object.contains_key("vars") {
            object.insert("vars".to_string(), Value::Object(serde_json::Map::new()));
        }

        let languages: Vec<String> = content["info"]["languages"]
            .as_array()
            .map(|items| items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_default();

        let mut modules = Vec::new();
        let mut unknowns = Vec::new();
        for tag in &languages {
            match registry.load(tag) {
                Some(language) => modules.push((tag.clone(), language)),
                None => unknowns.push(tag.clone()),
            }
        }
        let (module_set, unknown_languages) = if unknowns.is_empty() {
            (Some(ModuleSet::new(modules)), None)
        } else {
            (None, Some(unknowns))
        };

        let dependencies = match content.get("dependencies").and_then(Value::as_object) {
            Some(map) => DependencySet::from_content(map)?,
            None => DependencySet::default(),
        };

        let descriptor_vars: HashMap<String, String> = content["vars"]
            .as_object()
            .map(|map| map.iter().filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string()))).collect())
            .unwrap_or_default();
        // `--set` overrides shadow the descriptor's own `vars` (§4.G).
        let lookup = |name: &str| {
            Some(options.substitute(&format!("${{{name}}}")))
                .filter(|value| !value.is_empty())
                .or_else(|| descriptor_vars.get(name).cloned())
        };
        substitute_vars(&mut content, &lookup);

        Ok(Self {
            directory,
            content,
            module_set,
            unknown_languages,
            dependencies,
            config_cache: Mutex::new(HashMap::new()),
            project_cache,
        })
    }

    pub fn name(&self) -> &str {
        self.content["info"]["name"].as_str().unwrap_or_default()
    }

    pub fn version(&self) -> &str {
        self.content["info"]["version"].as_str().unwrap_or_default()
    }

    /// The project's name, plus its title if one was given.
    pub fn description(&self) -> String {
        match self.content["info"]["title"].as_str() {
            Some(title) => format!("{} -- {}", self.name(), title),
            None => self.name().to_string(),
        }
    }

    pub fn has_no_languages(&self) -> bool {
        self.content["info"]["languages"].as_array().map(|items| items.is_empty()).unwrap_or(true)
    }

    pub fn get_module_set(&self) -> Option<&ModuleSet> {
        self.module_set.as_ref()
    }

    pub fn has_unknown_languages(&self) -> bool {
        self.unknown_languages.is_some()
    }

    pub fn get_unknown_languages(&self) -> Option<&[String]> {
        self.unknown_languages.as_deref()
    }

    pub fn get_dependencies(&self) -> &DependencySet {
        &self.dependencies
    }

    /// The project's full, substituted descriptor content, for the
    /// `TaskContext::project` seam.
    pub fn as_value(&self) -> &Value {
        &self.content
    }

    pub fn project_cache(&self) -> &ProjectCache {
        &self.project_cache
    }

    /// Looks up the raw, substituted configuration value for a named
    /// top-level section (e.g. a language tag, or a task's own
    /// configuration block), validating and caching it the first time it is
    /// requested. A missing section is treated as an empty mapping.
    pub fn get_config_value(&self, name: &str, schema: Option<&Value>) -> Result<Value, ProjectError> {
        if let Some(cached) = self.config_cache.lock().unwrap().get(name) {
            return Ok(cached.clone());
        }

        let config = self.content.get(name).cloned().unwrap_or_else(|| Value::Object(serde_json::Map::new()));

        if let Some(schema) = schema {
            let mut validator = SchemaValidator::new(schema.clone());
            if !validator.validate(&config, name) {
                return Err(ProjectError::InvalidConfig {
                    name: name.to_string(),
                    message: validator.error.unwrap_or_default(),
                });
            }
        }

        self.config_cache.lock().unwrap().insert(name.to_string(), config.clone());
        Ok(config)
    }

    /// Same as `get_config_value`, deserialized into `T`. Stands in for the
    /// original's attribute-copying into a caller-supplied class; a typed
    /// `serde` struct is the idiomatic equivalent here.
    pub fn get_config<T: DeserializeOwned>(&self, name: &str, schema: Option<&Value>) -> Result<T, ProjectError> {
        let value = self.get_config_value(name, schema)?;
        serde_json::from_value(value).map_err(|source| ProjectError::ConfigShape(name.to_string(), source))
    }

    /// Resolves a path relative to the project's own directory. If
    /// `ensure`, the directory (and its parents) are created when missing.
    /// If `required`, a missing directory (after the `ensure` step, if any)
    /// is an error.
    pub fn project_dir(&self, relative: &Path, required: bool, ensure: bool) -> Result<PathBuf, ProjectError> {
        let directory = self.directory.join(relative);

        if ensure && !directory.is_dir() {
            fs::create_dir_all(&directory)?;
        }
        if required && !directory.is_dir() {
            return Err(ProjectError::RequiredDirMissing(directory));
        }
        Ok(directory)
    }

    /// The value of a project-file `vars` entry; `None` if unset. Does not
    /// consult `--set` overrides — those are consulted only while
    /// substituting `${name}` references throughout the descriptor.
    pub fn get_var_value(&self, name: &str) -> Option<String> {
        self.content["vars"].get(name).and_then(Value::as_str).map(str::to_string)
    }
}

fn fix_up_language_list(info: &mut serde_json::Map<String, Value>, extra_languages: &[String]) {
    let mut languages: Vec<String> = match info.get("languages") {
        Some(Value::String(single)) => vec![single.clone()],
        Some(Value::Array(items)) => items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect(),
        _ => Vec::new(),
    };

    for extra in extra_languages {
        if !languages.contains(extra) {
            languages.push(extra.clone());
        }
    }

    info.insert("languages".to_string(), Value::Array(languages.into_iter().map(Value::String).collect()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn empty_registry() -> LanguageRegistry {
        LanguageRegistry::new()
    }

    #[test]
    fn from_dir_defaults_name_and_version() {
        let dir = tempfile::tempdir().unwrap();
        let project = Project::from_dir(dir.path(), None, None, None, &empty_registry(), &GlobalOptions::default(), ProjectCache::empty()).unwrap();
        assert_eq!(project.name(), dir.path().file_name().unwrap().to_str().unwrap());
        assert_eq!(project.version(), "0.0.1");
        assert!(project.has_no_languages());
    }

    #[test]
    fn cli_languages_merge_without_duplicating() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = GlobalOptions::default();
        options.languages = vec!["java".to_string(), "python".to_string()];
        let project = Project::from_dir(dir.path(), None, None, Some("java"), &empty_registry(), &options, ProjectCache::empty()).unwrap();
        let languages: Vec<&str> = project.content["info"]["languages"].as_array().unwrap().iter().map(|v| v.as_str().unwrap()).collect();
        assert_eq!(languages, ["java", "python"]);
    }

    #[test]
    fn unknown_language_is_recorded_without_building_a_module_set() {
        let dir = tempfile::tempdir().unwrap();
        let project = Project::from_dir(dir.path(), None, None, Some("cobol"), &empty_registry(), &GlobalOptions::default(), ProjectCache::empty()).unwrap();
        assert!(project.has_unknown_languages());
        assert_eq!(project.get_unknown_languages(), Some(["cobol".to_string()].as_slice()));
        assert!(project.get_module_set().is_none());
    }

    #[test]
    fn from_file_rejects_bad_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.yaml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "info:\n  name: \"bad/name\"").unwrap();

        let result = Project::from_file(&path, &empty_registry(), &GlobalOptions::default(), ProjectCache::empty());
        assert!(matches!(result, Err(ProjectError::InvalidDescriptor(_))));
    }

    #[test]
    fn variables_substitute_through_the_whole_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.yaml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "info:\n  name: demo\nvars:\n  greeting: hi\nextra:\n  message: \"${{greeting}} there\"").unwrap();

        let project = Project::from_file(&path, &empty_registry(), &GlobalOptions::default(), ProjectCache::empty()).unwrap();
        assert_eq!(project.get_var_value("greeting"), Some("hi".to_string()));
        assert_eq!(project.content["extra"]["message"], Value::String("hi there".to_string()));
    }

    #[test]
    fn config_lookup_validates_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.yaml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "info:\n  name: demo\nbuild:\n  target: release").unwrap();

        let project = Project::from_file(&path, &empty_registry(), &GlobalOptions::default(), ProjectCache::empty()).unwrap();
        let config = project.get_config_value("build", None).unwrap();
        assert_eq!(config["target"], Value::String("release".to_string()));

        let missing = project.get_config_value("absent", None).unwrap();
        assert!(missing.as_object().unwrap().is_empty());
    }
}
