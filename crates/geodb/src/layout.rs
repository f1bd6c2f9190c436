use std::path::{Path, PathBuf};

/// File name of the GeoLite2 Country database inside its archive.
pub const DEFAULT_DATABASE_NAME: &str = "GeoLite2-Country.mmdb";

const HASH_EXT: &str = ".sha256";

/// Where the active database and its transient artifacts live.
///
/// Layout relative to the install directory:
/// - `<name>` — active database
/// - `<name>.sha256` — active hash manifest
/// - `<name>.sha256.new` — remote manifest fetched during a sync
/// - `<name>.tar.gz` — downloaded archive
/// - `<name>.tar` — decompressed container
/// - `<name>.extracted/` — extraction workspace
/// - `<name>.tmp` — extracted database awaiting promotion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseLayout {
    dir: PathBuf,
    name: String,
}

impl DatabaseLayout {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Base file name of the database, also the entry sought in the archive.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn database(&self) -> PathBuf {
        self.dir.join(&self.name)
    }

    pub fn hash_file(&self) -> PathBuf {
        self.sibling(HASH_EXT)
    }

    pub fn remote_hash_file(&self) -> PathBuf {
        self.sibling(&format!("{HASH_EXT}.new"))
    }

    pub fn archive(&self) -> PathBuf {
        self.sibling(".tar.gz")
    }

    pub fn container(&self) -> PathBuf {
        self.sibling(".tar")
    }

    pub fn workspace(&self) -> PathBuf {
        self.sibling(".extracted")
    }

    pub fn staged(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    /// Every path that only exists while a sync is in progress.
    pub fn transient_files(&self) -> [PathBuf; 4] {
        [
            self.archive(),
            self.container(),
            self.staged(),
            self.remote_hash_file(),
        ]
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}{suffix}", self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_share_the_database_prefix() {
        let layout = DatabaseLayout::new("/srv/geo", DEFAULT_DATABASE_NAME);

        assert_eq!(
            layout.database(),
            PathBuf::from("/srv/geo/GeoLite2-Country.mmdb")
        );
        assert_eq!(
            layout.hash_file(),
            PathBuf::from("/srv/geo/GeoLite2-Country.mmdb.sha256")
        );
        assert_eq!(
            layout.remote_hash_file(),
            PathBuf::from("/srv/geo/GeoLite2-Country.mmdb.sha256.new")
        );
        assert_eq!(
            layout.archive(),
            PathBuf::from("/srv/geo/GeoLite2-Country.mmdb.tar.gz")
        );
        assert_eq!(
            layout.container(),
            PathBuf::from("/srv/geo/GeoLite2-Country.mmdb.tar")
        );
        assert_eq!(
            layout.workspace(),
            PathBuf::from("/srv/geo/GeoLite2-Country.mmdb.extracted")
        );
        assert_eq!(
            layout.staged(),
            PathBuf::from("/srv/geo/GeoLite2-Country.mmdb.tmp")
        );
    }
}
