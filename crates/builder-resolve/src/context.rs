//! `DependencyContext` (§4.E): the per-run worklist that drives one language's
//! resolution pass from declared dependencies to verified local file paths.

use crate::error::ResolutionError;
use crate::host::ResolutionHost;
use builder_cache::FileCache;
use builder_deps::{Dependency, DependencyPathSet, Location};
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;

pub struct DependencyContext {
    worklist: VecDeque<Dependency>,
    done: Vec<Dependency>,
    resolved: Vec<DependencyPathSet>,
    host: Arc<dyn ResolutionHost>,
    cache: Arc<FileCache>,
    local_paths: Vec<PathBuf>,
    force_fetch: bool,
    directory_url: Option<String>,
    directory_path: Option<PathBuf>,
}

impl DependencyContext {
    pub fn new(
        dependencies: impl IntoIterator<Item = Dependency>,
        host: Arc<dyn ResolutionHost>,
        cache: Arc<FileCache>,
        local_paths: Vec<PathBuf>,
        force_fetch: bool,
    ) -> Self {
        Self {
            worklist: dependencies.into_iter().collect(),
            done: Vec::new(),
            resolved: Vec::new(),
            host,
            cache,
            local_paths,
            force_fetch,
            directory_url: None,
            directory_path: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.worklist.is_empty()
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.done
    }

    pub fn local_paths(&self) -> &[PathBuf] {
        &self.local_paths
    }

    /// Strips a trailing slash from `parent_url`, as the language resolver is
    /// expected to call before each file fetch.
    pub fn set_remote_info(&mut self, parent_url: &str, directory_path: PathBuf) {
        self.directory_url = Some(parent_url.trim_end_matches('/').to_string());
        self.directory_path = Some(directory_path);
    }

    /// Registers a transient dependency discovered while resolving another one,
    /// pushing it to the worklist.
    pub fn add_dependency(&mut self, mut dependency: Dependency) {
        dependency.set_transient(true);
        self.worklist.push_back(dependency);
    }

    /// Runs the worklist algorithm to completion, returning the resolved path
    /// sets in first-resolved order.
    pub fn resolve(mut self) -> Result<Vec<DependencyPathSet>, ResolutionError> {
        while let Some(dependency) = self.worklist.pop_front() {
            if self.done.iter().any(|done| done == &dependency) {
                continue;
            }

            if let Some(conflict) = self.done.iter().find(|done| dependency.same_but_for_version(done)) {
                return Err(ResolutionError::VersionConflict {
                    group: dependency.group().to_string(),
                    name: dependency.name().to_string(),
                    first: conflict.version().to_string(),
                    second: dependency.version().to_string(),
                });
            }

            let host = Arc::clone(&self.host);
            let path_set = host
                .resolve_dependency(&mut self, &dependency)?
                .ok_or_else(|| ResolutionError::Unresolvable(dependency.to_string()))?;

            tracing::debug!(
                target = "builder.resolve",
                dependency = %dependency,
                transient = dependency.transient(),
                "resolved dependency"
            );

            self.done.push(dependency);
            self.resolved.push(path_set);
        }

        Ok(self.resolved)
    }

    /// Fetches `filename` for `dependency` and, unless `signatures` is an
    /// explicit empty map, verifies it. `signatures=None` looks up reference
    /// signatures as sibling files through the same resolution procedure.
    pub fn to_local_path(
        &self,
        dependency: &Dependency,
        filename: &str,
        signatures: Option<&HashMap<String, String>>,
    ) -> Result<Option<PathBuf>, ResolutionError> {
        let Some(path) = self.fetch_file(dependency, filename, true)? else {
            return Ok(None);
        };

        let cache = Arc::clone(&self.cache);
        let directory_url = self.directory_url.clone();
        let directory_path = self.directory_path.clone();
        let force_fetch = self.force_fetch;
        let fetch = move |sibling: &str| -> Option<PathBuf> {
            let directory_url = directory_url.as_deref()?;
            let directory_path = directory_path.as_deref()?;
            let url = format!("{directory_url}/{sibling}");
            cache
                .resolve(&url, &directory_path.join(sibling), true, force_fetch)
                .ok()
                .flatten()
        };

        let verified = builder_signing::verify(&path, signatures, &fetch)?;
        if !verified {
            return Err(ResolutionError::SignatureMismatch(filename.to_string()));
        }
        Ok(Some(path))
    }

    /// Fetches `filename` for `dependency` without verifying a signature.
    pub fn fetch_file(
        &self,
        dependency: &Dependency,
        filename: &str,
        optional: bool,
    ) -> Result<Option<PathBuf>, ResolutionError> {
        match dependency.location() {
            Location::Remote => self.fetch_remote(filename, optional),
            Location::Local => Ok(self.fetch_local(filename)),
            Location::Project => self.fetch_project(dependency, filename),
        }
    }

    fn fetch_remote(&self, filename: &str, optional: bool) -> Result<Option<PathBuf>, ResolutionError> {
        let directory_url = self
            .directory_url
            .as_deref()
            .ok_or_else(|| ResolutionError::Unresolvable(filename.to_string()))?;
        let directory_path = self
            .directory_path
            .as_deref()
            .ok_or_else(|| ResolutionError::Unresolvable(filename.to_string()))?;

        let url = format!("{directory_url}/{filename}");
        let relative = directory_path.join(filename);
        Ok(self.cache.resolve(&url, &relative, optional, self.force_fetch)?)
    }

    fn fetch_local(&self, filename: &str) -> Option<PathBuf> {
        self.local_paths
            .iter()
            .map(|dir| dir.join(filename))
            .find(|candidate| candidate.is_file())
    }

    fn fetch_project(&self, dependency: &Dependency, filename: &str) -> Result<Option<PathBuf>, ResolutionError> {
        let Some(publish_dir) = self.host.publish_dir_for_project(dependency.key())? else {
            return Ok(None);
        };
        let candidate = publish_dir.join(filename);
        Ok(candidate.is_file().then_some(candidate))
    }

    /// Splits the set of already-queued and done dependencies into one context
    /// per top-level (non-transient) dependency, used by tooling that needs an
    /// isolated transient closure per root.
    pub fn split(&self) -> Vec<DependencyContext> {
        let roots: Vec<Dependency> = self
            .worklist
            .iter()
            .chain(self.done.iter())
            .filter(|dependency| !dependency.transient())
            .cloned()
            .collect();

        roots
            .into_iter()
            .map(|root| {
                DependencyContext::new(
                    [root],
                    Arc::clone(&self.host),
                    Arc::clone(&self.cache),
                    self.local_paths.clone(),
                    self.force_fetch,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use builder_deps::Dependency;
    use serde_json::json;
    use std::sync::Mutex;

    fn dependency(spec: &str, key: &str) -> Dependency {
        Dependency::from_content(key, &json!({"spec": spec, "scope": "compile"})).unwrap()
    }

    /// Resolves every dependency to a trivial path set, optionally discovering
    /// one transient the first time a given key is seen, and counting how many
    /// times it was asked to resolve each key.
    struct StubHost {
        transient_for: Option<(String, Dependency)>,
        calls: Mutex<HashMap<String, u32>>,
    }

    impl StubHost {
        fn new() -> Self {
            Self {
                transient_for: None,
                calls: Mutex::new(HashMap::new()),
            }
        }

        fn with_transient(key: &str, transient: Dependency) -> Self {
            Self {
                transient_for: Some((key.to_string(), transient)),
                calls: Mutex::new(HashMap::new()),
            }
        }

        fn call_count(&self, key: &str) -> u32 {
            *self.calls.lock().unwrap().get(key).unwrap_or(&0)
        }
    }

    impl ResolutionHost for StubHost {
        fn language_tag(&self) -> &str {
            "stub"
        }

        fn resolve_dependency(
            &self,
            context: &mut DependencyContext,
            dependency: &Dependency,
        ) -> Result<Option<DependencyPathSet>, ResolutionError> {
            *self.calls.lock().unwrap().entry(dependency.key().to_string()).or_insert(0) += 1;

            if let Some((key, transient)) = &self.transient_for {
                if dependency.key() == key {
                    context.add_dependency(transient.clone());
                }
            }

            Ok(Some(DependencyPathSet::new(
                dependency.clone(),
                PathBuf::from(format!("{}.jar", dependency.name())),
            )))
        }

        fn publish_dir_for_project(&self, _project_key: &str) -> Result<Option<PathBuf>, ResolutionError> {
            Ok(None)
        }
    }

    fn cache() -> Arc<FileCache> {
        let dir = tempfile::tempdir().unwrap();
        Arc::new(FileCache::with_base(dir.path().to_path_buf()).unwrap())
    }

    #[test]
    fn resolve_detects_version_conflict() {
        let a = dependency("remote:group:name:1.2.3", "a");
        let b = dependency("remote:group:name:4.5.6", "b");
        let host = Arc::new(StubHost::new());
        let context = DependencyContext::new([a, b], host, cache(), Vec::new(), false);

        let err = context.resolve().unwrap_err();
        match err {
            ResolutionError::VersionConflict { group, name, first, second } => {
                assert_eq!(group, "group");
                assert_eq!(name, "name");
                assert_eq!([first.as_str(), second.as_str()].iter().collect::<Vec<_>>().len(), 2);
            }
            other => panic!("expected a version conflict, got {other:?}"),
        }
    }

    #[test]
    fn resolve_is_idempotent_for_duplicate_entries() {
        let a = dependency("remote:group:name:1.2.3", "a");
        let host = Arc::new(StubHost::new());
        let context = DependencyContext::new([a.clone(), a], Arc::clone(&host) as Arc<dyn ResolutionHost>, cache(), Vec::new(), false);

        let resolved = context.resolve().unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(host.call_count("a"), 1);
    }

    #[test]
    fn resolve_follows_transients_in_order() {
        let root = dependency("remote:group:root:1.0.0", "root");
        let transient = root.derive_from("group", "leaf", "2.0.0");
        let host = Arc::new(StubHost::with_transient("root", transient));
        let context = DependencyContext::new([root], host, cache(), Vec::new(), false);

        let resolved = context.resolve().unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].dependency().name(), "root");
        assert_eq!(resolved[1].dependency().name(), "leaf");
        assert!(resolved[1].dependency().transient());
    }

    #[test]
    fn to_local_path_rejects_mismatched_signature() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lib.jar"), b"jar contents").unwrap();

        let host = Arc::new(StubHost::new());
        let context = DependencyContext::new(Vec::new(), host, cache(), vec![dir.path().to_path_buf()], false);
        let dependency = dependency("local:group:lib:1.0.0", "lib");

        let mut wrong = HashMap::new();
        wrong.insert("sha256".to_string(), "not-a-real-digest".to_string());

        let err = context.to_local_path(&dependency, "lib.jar", Some(&wrong)).unwrap_err();
        assert!(matches!(err, ResolutionError::SignatureMismatch(_)));
    }
}
