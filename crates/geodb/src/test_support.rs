use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;
use sha2::{Digest, Sha256};

use crate::{Fetcher, LicensedUrl, SyncError};

/// Build a .tar.gz in memory with the given files.
/// Each entry is (path_in_tar, content).
pub fn build_tarball(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut archive = tar::Builder::new(encoder);

    for (file_path, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_path(file_path).unwrap();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        archive.append(&header, *data).unwrap();
    }

    archive.into_inner().unwrap().finish().unwrap()
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// What a scripted fetch writes.
#[derive(Debug, Clone)]
pub enum Body {
    Bytes(Vec<u8>),
    Fail,
}

/// In-memory fetcher: a fixed manifest response for URLs ending in
/// `.sha256` and a scripted sequence of responses for everything else.
/// The last archive response repeats once the script runs out.
pub struct ScriptedFetcher {
    manifest: Body,
    archives: Mutex<Vec<Body>>,
    manifest_calls: AtomicUsize,
    archive_calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new(manifest: Body, archives: Vec<Body>) -> Self {
        Self {
            manifest,
            archives: Mutex::new(archives),
            manifest_calls: AtomicUsize::new(0),
            archive_calls: AtomicUsize::new(0),
        }
    }

    pub fn archive_calls(&self) -> usize {
        self.archive_calls.load(Ordering::SeqCst)
    }

    pub fn manifest_calls(&self) -> usize {
        self.manifest_calls.load(Ordering::SeqCst)
    }

    fn next_archive(&self) -> Body {
        let mut archives = self.archives.lock().unwrap();
        match archives.len() {
            0 => Body::Fail,
            1 => archives[0].clone(),
            _ => archives.remove(0),
        }
    }
}

#[async_trait::async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, destination: &Path, url: &LicensedUrl) -> Result<(), SyncError> {
        let body = if url.as_str().ends_with(".sha256") {
            self.manifest_calls.fetch_add(1, Ordering::SeqCst);
            self.manifest.clone()
        } else {
            self.archive_calls.fetch_add(1, Ordering::SeqCst);
            self.next_archive()
        };

        match body {
            Body::Bytes(bytes) => std::fs::write(destination, bytes)
                .map_err(|e| SyncError::Network(format!("write failed: {e}"))),
            Body::Fail => Err(SyncError::Network("connection reset".into())),
        }
    }
}
