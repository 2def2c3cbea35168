//! The content-addressed file cache (§4.B/§5): downloads a URL into a path
//! relative to a local cache root, skipping the network when the file is
//! already there and a re-fetch hasn't been forced.
//!
//! This is intentionally not safe for concurrent invocations against the same
//! cache root — see §5: the design assumes single-user, single-invocation use
//! and does not lock.

mod error;

pub use error::CacheError;

use builder_core::default_cache_root;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const CHUNK_SIZE: usize = 1024;

pub struct FileCache {
    base: PathBuf,
}

enum Probe {
    Skipped,
    Exists { content_length: Option<u64> },
}

impl FileCache {
    /// Uses `~/.builder` (or `%USERPROFILE%\.builder`) as the cache root.
    pub fn new() -> Result<Self, CacheError> {
        let base = default_cache_root().ok_or(CacheError::MissingHomeDir)?;
        Self::with_base(base)
    }

    pub fn with_base(base: PathBuf) -> Result<Self, CacheError> {
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    pub fn root(&self) -> &Path {
        &self.base
    }

    /// Resolves `relative_path` under the cache root, downloading `url` into it
    /// first if the file is missing or `force_fetch` is set. Returns `None` only
    /// when `optional` is set and the server reports the resource missing
    /// (4xx on the preflight `HEAD`).
    pub fn resolve(
        &self,
        url: &str,
        relative_path: &Path,
        optional: bool,
        force_fetch: bool,
    ) -> Result<Option<PathBuf>, CacheError> {
        let full_path = self.base.join(relative_path);
        if force_fetch || !full_path.is_file() {
            if !self.download(url, &full_path, optional)? {
                return Ok(None);
            }
        }
        Ok(Some(full_path))
    }

    fn download(&self, url: &str, full_path: &Path, optional: bool) -> Result<bool, CacheError> {
        let content_length = match probe(url, optional)? {
            Probe::Skipped => return Ok(false),
            Probe::Exists { content_length } => content_length,
        };

        let response = ureq::get(url).call().map_err(|err| CacheError::Http {
            url: url.to_string(),
            source: Box::new(err),
        })?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let label = display_label(full_path);
        tracing::info!(
            target = "builder.cache",
            url,
            path = %full_path.display(),
            content_length,
            "downloading {label}"
        );

        let mut reader = response.into_reader();
        let mut file = fs::File::create(full_path)?;
        let mut buffer = [0u8; CHUNK_SIZE];
        let mut downloaded: u64 = 0;
        let mut last_reported_tenth = 0u64;

        loop {
            let read = reader.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            file.write_all(&buffer[..read])?;
            downloaded += read as u64;

            if let Some(total) = content_length {
                if total > 0 {
                    let tenth = (downloaded * 10 / total).min(10);
                    if tenth > last_reported_tenth {
                        last_reported_tenth = tenth;
                        tracing::debug!(
                            target = "builder.cache",
                            url,
                            progress = format!("{}%", tenth * 10),
                            "downloading {label}"
                        );
                    }
                }
            }
        }

        file.sync_all()?;
        Ok(true)
    }
}

fn probe(url: &str, optional: bool) -> Result<Probe, CacheError> {
    match ureq::head(url).call() {
        Ok(response) => {
            let content_length = response
                .header("Content-Length")
                .and_then(|value| value.parse::<u64>().ok());
            Ok(Probe::Exists { content_length })
        }
        Err(ureq::Error::Status(status, _)) if optional && (400..500).contains(&status) => {
            tracing::debug!(
                target = "builder.cache",
                url,
                status,
                "could not download optional file"
            );
            Ok(Probe::Skipped)
        }
        Err(ureq::Error::Status(status, _)) => Err(CacheError::Remote {
            url: url.to_string(),
            status,
        }),
        Err(err) => Err(CacheError::Http {
            url: url.to_string(),
            source: Box::new(err),
        }),
    }
}

fn display_label(full_path: &Path) -> String {
    let name = full_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if name.len() > 25 {
        let tail: String = name.chars().rev().take(22).collect::<Vec<_>>().into_iter().rev().collect();
        format!("...{tail}")
    } else {
        format!("{name:>25}")
    }
}
