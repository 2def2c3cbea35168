//! `Dependency` (§3/§4.D): a single declared artifact requirement, built from
//! either the long form of a descriptor entry or a short `location:[group:]name:version`
//! spec string.

use crate::error::DependencyError;
use serde_json::{Map, Value};
use std::fmt;

/// Where a dependency's files may be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Remote,
    Local,
    Project,
}

impl Location {
    fn parse(text: &str) -> Option<Self> {
        match text {
            "remote" => Some(Location::Remote),
            "local" => Some(Location::Local),
            "project" => Some(Location::Project),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Remote => "remote",
            Location::Local => "local",
            Location::Project => "project",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dependency {
    key: String,
    location: Location,
    group: Option<String>,
    name: String,
    classifier: Option<String>,
    ignore_transients: bool,
    version: String,
    scope: Vec<String>,
    transient: bool,
}

impl Dependency {
    /// Builds a dependency from a descriptor entry's raw content, resolving a `spec`
    /// short-form first if present (§4.D).
    pub fn from_content(key: &str, content: &Value) -> Result<Self, DependencyError> {
        let mut content = content.as_object().cloned().unwrap_or_default();
        resolve_spec(key, &mut content)?;

        let location = content
            .get("location")
            .and_then(Value::as_str)
            .ok_or_else(|| DependencyError::MissingField {
                key: key.to_string(),
                field: "location",
            })?;
        let location = Location::parse(location).ok_or_else(|| DependencyError::BadLocation(location.to_string()))?;

        let version = content
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| DependencyError::MissingField {
                key: key.to_string(),
                field: "version",
            })?
            .to_string();

        let group = content.get("group").and_then(Value::as_str).map(str::to_string);
        let name = content
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string());
        let classifier = content.get("classifier").and_then(Value::as_str).map(str::to_string);
        let ignore_transients = content.get("ignore_transients").and_then(Value::as_bool).unwrap_or(false);
        let scope = match content.get("scope") {
            Some(Value::String(single)) => vec![single.clone()],
            Some(Value::Array(items)) => items.iter().filter_map(|item| item.as_str().map(str::to_string)).collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            key: key.to_string(),
            location,
            group,
            name,
            classifier,
            ignore_transients,
            version,
            scope,
            transient: false,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn is_remote(&self) -> bool {
        self.location == Location::Remote
    }

    pub fn is_local(&self) -> bool {
        self.location == Location::Local
    }

    pub fn is_project(&self) -> bool {
        self.location == Location::Project
    }

    /// The group of the dependency, defaulting to its name when none was given.
    pub fn group(&self) -> &str {
        self.group.as_deref().unwrap_or(&self.name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    pub fn ignore_transients(&self) -> bool {
        self.ignore_transients
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    pub fn applies_to(&self, task: &str) -> bool {
        self.scope.iter().any(|name| name == task)
    }

    pub fn transient(&self) -> bool {
        self.transient
    }

    pub fn set_transient(&mut self, value: bool) {
        self.transient = value;
    }

    /// Creates a new dependency sharing this one's location and scope, used for
    /// transients discovered while resolving this dependency's own metadata.
    pub fn derive_from(&self, group: &str, name: &str, version: &str) -> Self {
        Self {
            key: name.to_string(),
            location: self.location,
            group: Some(group.to_string()),
            name: name.to_string(),
            classifier: None,
            ignore_transients: false,
            version: version.to_string(),
            scope: self.scope.clone(),
            transient: false,
        }
    }

    /// `true` iff `self` and `other` share group and name but differ in version —
    /// the version-conflict condition resolution must detect (§3, §4.E).
    pub fn same_but_for_version(&self, other: &Dependency) -> bool {
        self.group() == other.group() && self.name == other.name && self.version != other.version
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group(), self.name, self.version)
    }
}

/// Equal iff `group:name:version` match (§3); location, scope, classifier and
/// transient-ness are not part of identity.
impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.group() == other.group() && self.name == other.name && self.version == other.version
    }
}

impl Eq for Dependency {}

/// Parses a `location:[group:]name:version` spec into `content`'s long-form fields,
/// in place, if a `spec` key is present. A no-op otherwise.
fn resolve_spec(key: &str, content: &mut Map<String, Value>) -> Result<(), DependencyError> {
    let Some(spec) = content.get("spec").and_then(Value::as_str).map(str::to_string) else {
        return Ok(());
    };

    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() < 2 || parts.len() > 4 {
        return Err(DependencyError::BadSpec {
            key: key.to_string(),
            spec,
        });
    }

    let location = parts[0];
    let version = parts[parts.len() - 1];

    if Location::parse(location).is_none() {
        return Err(DependencyError::BadLocation(location.to_string()));
    }
    if !looks_like_semver(version) {
        return Err(DependencyError::BadVersion {
            key: key.to_string(),
            version: version.to_string(),
        });
    }

    content.insert("location".to_string(), Value::String(location.to_string()));
    content.insert("version".to_string(), Value::String(version.to_string()));

    // Open question (preserved): the name/group tokens are trimmed, then dropped
    // (left to default) if empty after trimming.
    match &parts[1..parts.len() - 1] {
        [name] => {
            let name = name.trim();
            if !name.is_empty() {
                content.insert("name".to_string(), Value::String(name.to_string()));
            }
        }
        [group, name] => {
            let group = group.trim();
            let name = name.trim();
            if !group.is_empty() {
                content.insert("group".to_string(), Value::String(group.to_string()));
            }
            if !name.is_empty() {
                content.insert("name".to_string(), Value::String(name.to_string()));
            }
        }
        _ => {}
    }

    Ok(())
}

fn looks_like_semver(text: &str) -> bool {
    let parts: Vec<&str> = text.split('.').collect();
    (parts.len() == 2 || parts.len() == 3) && parts.iter().all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dependency(spec: &str) -> Dependency {
        Dependency::from_content("key", &json!({"spec": spec, "scope": ["compile"]})).unwrap()
    }

    #[test]
    fn short_spec_name_only_defaults_group_to_key() {
        let dep = Dependency::from_content("key", &json!({"spec": "remote:1.2.3", "scope": "compile"})).unwrap();
        assert_eq!(dep.location(), Location::Remote);
        assert_eq!(dep.group(), "key");
        assert_eq!(dep.name(), "key");
        assert_eq!(dep.version(), "1.2.3");
    }

    #[test]
    fn short_spec_with_name() {
        let dep = dependency("remote:name:1.2.3");
        assert_eq!(dep.group(), "name");
        assert_eq!(dep.name(), "name");
        assert_eq!(dep.version(), "1.2.3");
    }

    #[test]
    fn short_spec_with_group_and_name() {
        let dep = dependency("remote:group:name:1.2.3");
        assert_eq!(dep.group(), "group");
        assert_eq!(dep.name(), "name");
        assert_eq!(dep.version(), "1.2.3");
    }

    #[test]
    fn short_spec_rejects_unknown_location() {
        let err = Dependency::from_content("key", &json!({"spec": "ftp:name:1.2.3", "scope": "compile"})).unwrap_err();
        assert!(matches!(err, DependencyError::BadLocation(_)));
    }

    #[test]
    fn short_spec_rejects_bad_version() {
        let err = Dependency::from_content("key", &json!({"spec": "remote:name:abc", "scope": "compile"})).unwrap_err();
        assert!(matches!(err, DependencyError::BadVersion { .. }));
    }

    #[test]
    fn short_spec_drops_blank_tokens() {
        let dep = dependency("remote: :name:1.2.3");
        assert_eq!(dep.group(), "name");
    }

    #[test]
    fn equality_is_group_name_version() {
        let a = dependency("remote:group:name:1.2.3");
        let b = Dependency::from_content("other-key", &json!({"spec": "local:group:name:1.2.3", "scope": "compile"})).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn same_but_for_version() {
        let a = dependency("remote:group:name:1.2.3");
        let b = dependency("remote:group:name:4.5.6");
        assert!(a.same_but_for_version(&b));
        assert!(!a.same_but_for_version(&a.clone()));
    }

    #[test]
    fn derive_from_inherits_location_and_scope() {
        let parent = Dependency::from_content("key", &json!({"spec": "remote:1.2.3", "scope": ["compile", "test"]})).unwrap();
        let child = parent.derive_from("g", "n", "1.0.0");
        assert_eq!(child.location(), Location::Remote);
        assert_eq!(child.scope(), ["compile".to_string(), "test".to_string()]);
        assert!(child.applies_to("compile"));
    }
}
