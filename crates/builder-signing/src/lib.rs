//! Digital signature support (§4.C): hashing a file with every supported
//! algorithm at once and checking the result against a reference signature,
//! either supplied directly or fetched lazily as a parallel `.<algorithm>` file.

mod error;

pub use error::SigningError;

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// The algorithms signed for and checked against, in the order verification
/// tries them.
pub const SUPPORTED_SIGNATURES: [&str; 4] = ["sha512", "sha256", "sha1", "md5"];

/// Resolves a reference signature file for a base file name, returning the
/// path to it if one exists. Used by [`verify`] when no signature map is
/// supplied directly.
pub type FetchFileFunction<'a> = dyn Fn(&str) -> Option<PathBuf> + 'a;

fn io_error(path: &Path, source: std::io::Error) -> SigningError {
    SigningError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Signs `path` with every algorithm in [`SUPPORTED_SIGNATURES`] in a single
/// streaming pass, returning a map of algorithm name to lowercase hex digest.
pub fn sign_path(path: &Path) -> Result<HashMap<String, String>, SigningError> {
    let mut file = File::open(path).map_err(|e| io_error(path, e))?;

    let mut sha512 = Sha512::new();
    let mut sha256 = Sha256::new();
    let mut sha1 = Sha1::new();
    let mut md5 = Md5::new();

    let mut buffer = [0u8; 4096];
    loop {
        let read = file.read(&mut buffer).map_err(|e| io_error(path, e))?;
        if read == 0 {
            break;
        }
        let chunk = &buffer[..read];
        sha512.update(chunk);
        sha256.update(chunk);
        sha1.update(chunk);
        md5.update(chunk);
    }

    let mut result = HashMap::with_capacity(SUPPORTED_SIGNATURES.len());
    result.insert("sha512".to_string(), hex::encode(sha512.finalize()));
    result.insert("sha256".to_string(), hex::encode(sha256.finalize()));
    result.insert("sha1".to_string(), hex::encode(sha1.finalize()));
    result.insert("md5".to_string(), hex::encode(md5.finalize()));
    Ok(result)
}

/// Signs `path` and writes each digest to a sibling `<path>.<algorithm>` file.
pub fn sign_path_to_files(path: &Path) -> Result<(), SigningError> {
    let signatures = sign_path(path)?;
    let base_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    for name in SUPPORTED_SIGNATURES {
        let signature_path = parent.join(format!("{base_name}.{name}"));
        let mut file = File::create(&signature_path).map_err(|e| io_error(&signature_path, e))?;
        file.write_all(signatures[name].as_bytes())
            .map_err(|e| io_error(&signature_path, e))?;
    }
    Ok(())
}

fn reference_signature(
    name: &str,
    signatures: Option<&HashMap<String, String>>,
    base_name: &str,
    fetch: &FetchFileFunction,
) -> Option<String> {
    match signatures {
        None => {
            let signature_path = fetch(&format!("{base_name}.{name}"))?;
            fs::read_to_string(signature_path)
                .ok()
                .map(|text| text.trim().to_string())
        }
        Some(map) => map.get(name).cloned(),
    }
}

/// Verifies `path`'s contents against a reference signature.
///
/// An explicitly empty `signatures` map bypasses verification entirely and
/// reports success; anything else requires a first-match across
/// [`SUPPORTED_SIGNATURES`], pulled either from `signatures` or, when that's
/// `None`, from files `fetch` resolves.
pub fn verify(
    path: &Path,
    signatures: Option<&HashMap<String, String>>,
    fetch: &FetchFileFunction,
) -> Result<bool, SigningError> {
    if let Some(map) = signatures {
        if map.is_empty() {
            return Ok(true);
        }
    }

    let computed = sign_path(path)?;
    let base_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    for name in SUPPORTED_SIGNATURES {
        let expected = reference_signature(name, signatures, &base_name, fetch);
        if expected.as_deref() == Some(computed[name].as_str()) {
            return Ok(true);
        }
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn signs_with_every_supported_algorithm() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello world").unwrap();
        let signatures = sign_path(file.path()).unwrap();
        assert_eq!(signatures.len(), 4);
        assert_eq!(
            signatures["sha256"],
            "b94d27b9934d3e08a52e52d7da7dacefbe65981e10bf39ab48f9e1ac3e5dd0f2"
        );
    }

    #[test]
    fn verify_matches_on_reference_map() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello world").unwrap();
        let signatures = sign_path(file.path()).unwrap();
        let fetch = |_: &str| None;
        assert!(verify(file.path(), Some(&signatures), &fetch).unwrap());
    }

    #[test]
    fn verify_rejects_mismatched_reference_map() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello world").unwrap();
        let mut wrong = HashMap::new();
        wrong.insert("sha256".to_string(), "not-a-real-digest".to_string());
        let fetch = |_: &str| None;
        assert!(!verify(file.path(), Some(&wrong), &fetch).unwrap());
    }

    #[test]
    fn empty_reference_map_bypasses_verification() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello world").unwrap();
        let empty = HashMap::new();
        let fetch = |_: &str| None;
        assert!(verify(file.path(), Some(&empty), &fetch).unwrap());
    }

    #[test]
    fn verify_falls_back_to_fetch_function_when_no_map_given() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifact.txt");
        fs::write(&path, b"hello world").unwrap();
        let signatures = sign_path(&path).unwrap();
        let sha256_path = dir.path().join("artifact.txt.sha256");
        fs::write(&sha256_path, &signatures["sha256"]).unwrap();

        let fetch = |name: &str| {
            let candidate = dir.path().join(name);
            candidate.is_file().then_some(candidate)
        };
        assert!(verify(&path, None, &fetch).unwrap());
    }
}
