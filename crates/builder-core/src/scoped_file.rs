//! Scoped temporary text files, used by language backends to pass long argument
//! lists to external tools. Cleanup is guaranteed on every exit path, including
//! errors, per §5's "Scoped acquisition" paragraph.

use std::io::Write;
use std::path::Path;

/// An RAII guard around a temporary text file: write content once at
/// construction, hand `path()` to a subprocess, and the backing file is removed
/// when the guard drops regardless of how the caller's scope exits.
pub struct ScopedTextFile {
    file: tempfile::NamedTempFile,
}

impl ScopedTextFile {
    pub fn new(content: &str) -> std::io::Result<Self> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_content_and_cleans_up_on_drop() {
        let path;
        {
            let scoped = ScopedTextFile::new("hello").unwrap();
            path = scoped.path().to_path_buf();
            assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
        }
        assert!(!path.exists());
    }
}
