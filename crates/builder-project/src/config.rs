//! `Configuration`/`Conflict`/`ConflictSet`/`FileCondition` (from the
//! original's `config.py`): conflict-resolution policy and per-file signature
//! overrides, parsed from a project's `conflicts`/`conditions.files`
//! sections.
//!
//! Preserved per the Open Questions note even though nothing in the
//! resolution pipeline currently consumes them — the original keeps them
//! queryable without a call site, and this does the same rather than
//! inventing one.

use crate::project_cache::ProjectCache;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictAction {
    Error,
    Newer,
    Older,
}

#[derive(Debug, Clone)]
pub struct Conflict {
    action: ConflictAction,
    warn: bool,
}

impl Conflict {
    fn from_value(data: &Value) -> Self {
        let action = match data.get("action").and_then(Value::as_str) {
            Some("newer") => ConflictAction::Newer,
            Some("older") => ConflictAction::Older,
            _ => ConflictAction::Error,
        };
        let warn = data.get("warn").and_then(Value::as_bool).unwrap_or(false);
        Self { action, warn }
    }

    fn action_named(action: ConflictAction) -> Self {
        Self { action, warn: false }
    }

    pub fn action(&self) -> ConflictAction {
        self.action
    }

    pub fn error_out(&self) -> bool {
        self.action == ConflictAction::Error
    }

    pub fn use_newer(&self) -> bool {
        self.action == ConflictAction::Newer
    }

    pub fn use_older(&self) -> bool {
        self.action == ConflictAction::Older
    }

    pub fn warn(&self) -> bool {
        self.warn
    }
}

#[derive(Debug, Clone)]
pub struct ConflictSet {
    conflicts: HashMap<String, Conflict>,
}

impl ConflictSet {
    pub fn from_value(data: &Value) -> Self {
        let conflicts = data
            .as_object()
            .map(|map| map.iter().map(|(key, value)| (key.clone(), Conflict::from_value(value))).collect())
            .unwrap_or_default();
        Self { conflicts }
    }

    pub fn get_conflict(&self, dependency_id: &str, error_default: bool) -> Conflict {
        if let Some(conflict) = self.conflicts.get(dependency_id) {
            return conflict.clone();
        }
        if error_default {
            Conflict::action_named(ConflictAction::Error)
        } else {
            Conflict {
                action: ConflictAction::Newer,
                warn: true,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureHandling {
    Ignore,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct FileCondition {
    signature: SignatureHandling,
}

impl FileCondition {
    fn from_value(data: &Value) -> Self {
        let signature = match data.get("signature").and_then(Value::as_str) {
            Some("ignore") => SignatureHandling::Ignore,
            Some("warn") => SignatureHandling::Warn,
            _ => SignatureHandling::Error,
        };
        Self { signature }
    }

    fn default_condition() -> Self {
        Self {
            signature: SignatureHandling::Error,
        }
    }

    pub fn ignore_signature(&self) -> bool {
        self.signature == SignatureHandling::Ignore
    }

    pub fn warn_on_bad_signature(&self) -> bool {
        self.signature == SignatureHandling::Warn
    }
}

#[derive(Debug, Clone)]
pub struct Configuration {
    conflict_set: ConflictSet,
    file_conditions: HashMap<String, FileCondition>,
    local_paths: Vec<PathBuf>,
    project_cache: ProjectCache,
}

impl Configuration {
    pub fn new(source: &Value, local_paths: Vec<PathBuf>, project_cache: ProjectCache) -> Self {
        let conflict_set = source.get("conflicts").map(ConflictSet::from_value).unwrap_or_else(|| ConflictSet::from_value(&Value::Null));

        let file_conditions = source
            .get("conditions")
            .and_then(|conditions| conditions.get("files"))
            .and_then(Value::as_object)
            .map(|map| map.iter().map(|(key, value)| (key.clone(), FileCondition::from_value(value))).collect())
            .unwrap_or_default();

        Self {
            conflict_set,
            file_conditions,
            local_paths,
            project_cache,
        }
    }

    pub fn get_conflict(&self, dependency_id: &str, error_default: bool) -> Conflict {
        self.conflict_set.get_conflict(dependency_id, error_default)
    }

    pub fn get_file_condition(&self, name: &str) -> FileCondition {
        self.file_conditions.get(name).cloned().unwrap_or_else(FileCondition::default_condition)
    }

    pub fn local_paths(&self) -> &[PathBuf] {
        &self.local_paths
    }

    pub fn project_cache(&self) -> &ProjectCache {
        &self.project_cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unnamed_dependency_falls_back_to_default() {
        let set = ConflictSet::from_value(&json!({"g:n": {"action": "newer", "warn": true}}));
        let named = set.get_conflict("g:n", true);
        assert!(named.use_newer());
        assert!(named.warn());

        let fallback_error = set.get_conflict("other", true);
        assert!(fallback_error.error_out());

        let fallback_warn = set.get_conflict("other", false);
        assert!(fallback_warn.use_newer());
        assert!(fallback_warn.warn());
    }

    #[test]
    fn unnamed_file_condition_defaults_to_error() {
        let configuration = Configuration::new(&json!({}), Vec::new(), ProjectCache::empty());
        let condition = configuration.get_file_condition("whatever.jar");
        assert!(!condition.ignore_signature());
        assert!(!condition.warn_on_bad_signature());
    }
}
