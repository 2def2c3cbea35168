//! Resolving the user-local base directory the file cache lives under.

use std::path::PathBuf;

/// `$HOME/.builder` (or `%USERPROFILE%\.builder`), per §6's cache layout.
pub fn default_cache_root() -> Option<PathBuf> {
    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"))?;
    Some(PathBuf::from(home).join(".builder"))
}
