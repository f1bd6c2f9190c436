use std::fs::File;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Read the first whitespace-delimited token from a hash manifest.
///
/// Manifests look like `<hash>  <filename>` with optional trailing fields;
/// only the first field matters. Returns `None` when the file is missing,
/// unreadable or contains nothing but whitespace.
pub fn read_token(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    let contents = std::fs::read_to_string(path).ok()?;
    contents.split_whitespace().next().map(str::to_owned)
}

/// SHA-256 of a file's raw bytes as lowercase hex.
pub fn compute_hash(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_first_token_of_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.sha256");
        std::fs::write(&path, "abc123  filename.tar.gz\n").unwrap();

        assert_eq!(read_token(&path).as_deref(), Some("abc123"));
    }

    #[test]
    fn skips_leading_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.sha256");
        std::fs::write(&path, "\n   deadbeef\tfile extra fields\n").unwrap();

        assert_eq!(read_token(&path).as_deref(), Some("deadbeef"));
    }

    #[test]
    fn empty_manifest_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.sha256");
        std::fs::write(&path, "").unwrap();

        assert_eq!(read_token(&path), None);

        std::fs::write(&path, "  \n\t ").unwrap();
        assert_eq!(read_token(&path), None);
    }

    #[test]
    fn missing_manifest_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_token(&dir.path().join("nope.sha256")), None);
    }

    #[test]
    fn computes_sha256_hex() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data");
        std::fs::write(&path, b"abc").unwrap();

        assert_eq!(
            compute_hash(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn computing_hash_of_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(compute_hash(&dir.path().join("missing")).is_err());
    }
}
