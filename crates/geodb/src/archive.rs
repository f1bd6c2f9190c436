use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use crate::fs;

/// Errors that can occur while unpacking a downloaded archive.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("unsupported archive format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("failed to decompress {path}: {source}")]
    Decompress { path: PathBuf, source: io::Error },

    #[error("failed to unpack {path}: {source}")]
    Unpack { path: PathBuf, source: io::Error },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Unpack a `.tar.gz` archive into `destination`.
///
/// Runs as two separate steps so failures are attributed precisely: the gzip
/// layer is decompressed into a sibling `.tar`, then that container is
/// unpacked. With `delete_source`, the `.tar.gz` is removed once decompressed
/// and the intermediate `.tar` once unpacked.
///
/// On failure the destination may hold a partial unpack; callers should
/// discard it.
pub fn extract(
    archive: &Path,
    destination: &Path,
    delete_source: bool,
) -> Result<(), ExtractError> {
    let container = decompress(archive)?;
    if delete_source {
        fs::remove_file(archive)?;
    }

    let unpacked = unpack(&container, destination);
    if delete_source || unpacked.is_err() {
        fs::remove_file(&container)?;
    }
    unpacked
}

/// Decompress the gzip layer, returning the path of the inner container.
pub fn decompress(archive: &Path) -> Result<PathBuf, ExtractError> {
    let container = container_path(archive)?;

    let decompressed = File::open(archive).and_then(|input| {
        let mut decoder = GzDecoder::new(BufReader::new(input));
        let mut output = BufWriter::new(File::create(&container)?);
        io::copy(&mut decoder, &mut output)?;
        output.into_inner().map_err(io::IntoInnerError::into_error)?;
        Ok(())
    });

    if let Err(source) = decompressed {
        fs::remove_file(&container)?;
        return Err(ExtractError::Decompress {
            path: archive.to_path_buf(),
            source,
        });
    }

    Ok(container)
}

/// Unpack a tar container into `destination`, creating it if needed and
/// overwriting existing entries.
pub fn unpack(container: &Path, destination: &Path) -> Result<(), ExtractError> {
    fs::ensure_dir(destination)?;

    File::open(container)
        .and_then(|input| {
            let mut archive = tar::Archive::new(BufReader::new(input));
            archive.set_overwrite(true);
            archive.unpack(destination)
        })
        .map_err(|source| ExtractError::Unpack {
            path: container.to_path_buf(),
            source,
        })
}

/// `foo.tar.gz` -> `foo.tar`, `foo.tgz` -> `foo.tar`.
fn container_path(archive: &Path) -> Result<PathBuf, ExtractError> {
    let name = archive
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ExtractError::UnsupportedFormat(archive.to_path_buf()))?;

    let lower = name.to_ascii_lowercase();
    let container_name = if lower.ends_with(".tar.gz") {
        name[..name.len() - ".gz".len()].to_owned()
    } else if lower.ends_with(".tgz") {
        format!("{}.tar", &name[..name.len() - ".tgz".len()])
    } else {
        return Err(ExtractError::UnsupportedFormat(archive.to_path_buf()));
    };

    Ok(archive.with_file_name(container_name))
}
