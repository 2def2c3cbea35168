//! `build_names` (§4.E): the canonical remote URL and cache path shape a
//! language resolver derives a dependency's file names from.
//!
//! The original hardcodes Maven Central's URL; kept language-neutral here by
//! taking the repository base URL as a parameter instead.

use builder_deps::Dependency;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltNames {
    /// The remote directory this dependency's files live under.
    pub parent_url: String,
    /// The cache-relative directory files are stored under, keyed by name only
    /// (the group and version are embedded in the remote URL and file names,
    /// not in the cache layout).
    pub cache_dir: PathBuf,
    /// `{name}-{version}`, or just `{name}` when `version_in_url` is false.
    pub base_name: String,
    /// `{base_name}-{classifier}`, when the dependency carries a classifier.
    pub classified_name: Option<String>,
}

/// Builds the canonical names for fetching `dependency`'s files from `base_url`.
///
/// `version_in_url` is `false` for a version-checking/listing pass, which omits
/// the version from both the URL and the file base name so that index/metadata
/// can be fetched without knowing the version in advance.
pub fn build_names(dependency: &Dependency, base_url: &str, version_in_url: bool) -> BuiltNames {
    let group_path = dependency.group().replace('.', "/");
    let base_url = base_url.trim_end_matches('/');

    let parent_url = if version_in_url {
        format!("{base_url}/{group_path}/{}/{}", dependency.name(), dependency.version())
    } else {
        format!("{base_url}/{group_path}/{}", dependency.name())
    };

    let base_name = if version_in_url {
        format!("{}-{}", dependency.name(), dependency.version())
    } else {
        dependency.name().to_string()
    };

    let classified_name = dependency
        .classifier()
        .map(|classifier| format!("{base_name}-{classifier}"));

    BuiltNames {
        parent_url,
        cache_dir: PathBuf::from(dependency.name()),
        base_name,
        classified_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_versioned_names() {
        let dependency = Dependency::from_content(
            "key",
            &json!({"location": "remote", "group": "com.example", "name": "widget", "version": "1.2.3", "scope": "compile"}),
        )
        .unwrap();
        let names = build_names(&dependency, "https://repo.example/maven2/", true);
        assert_eq!(names.parent_url, "https://repo.example/maven2/com/example/widget/1.2.3");
        assert_eq!(names.base_name, "widget-1.2.3");
        assert_eq!(names.cache_dir, PathBuf::from("widget"));
        assert_eq!(names.classified_name, None);
    }

    #[test]
    fn omits_version_in_listing_mode() {
        let dependency = Dependency::from_content(
            "key",
            &json!({"location": "remote", "group": "com.example", "name": "widget", "version": "1.2.3", "scope": "compile"}),
        )
        .unwrap();
        let names = build_names(&dependency, "https://repo.example/maven2", false);
        assert_eq!(names.parent_url, "https://repo.example/maven2/com/example/widget");
        assert_eq!(names.base_name, "widget");
    }

    #[test]
    fn classifier_appends_to_base_name() {
        let dependency = Dependency::from_content(
            "key",
            &json!({"location": "remote", "group": "g", "name": "n", "classifier": "sources", "version": "1.0.0", "scope": "compile"}),
        )
        .unwrap();
        let names = build_names(&dependency, "https://repo.example", true);
        assert_eq!(names.classified_name.as_deref(), Some("n-1.0.0-sources"));
    }
}
