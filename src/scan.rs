//! Recursive discovery of images on disk and inside zip archives.
//!
//! [`scan`] walks a root and lazily yields every [`Image`] beneath it. The
//! walk is a plain [`Iterator`]: nothing is read until the caller pulls, and
//! calling [`scan`] again on the same root starts a fresh, independent walk.
//!
//! ## Rules
//!
//! - Any entry whose base name starts with `._` (macOS metadata shadow files)
//!   is skipped. Directories with that prefix are not entered.
//! - A regular file with an extension in [`IMAGE_EXTENSIONS`] is a loose image.
//!   The match is case-sensitive: `.JPG` counts, `.Png` does not.
//! - Any other regular file may be a zip archive, decided by
//!   [`ArchiveDetection`]. Each archive entry with an image extension becomes
//!   an archived image. Directory entries and `._` entries are ignored.
//! - Directories are descended in file-name order.
//! - Symlinks are followed. Dangling links, link loops, and special files
//!   are skipped.
//!
//! ## Failures
//!
//! An archive chosen by extension that cannot be opened is an error, and so is
//! a directory that cannot be read. Under [`ArchiveDetection::Probe`] a file
//! that does not open as a zip simply isn't an archive.
//!
//! Errors arrive in walk order, after the images found before them.
//! [`build_index`](crate::build_index) does not rely on the laziness: it
//! drains each root completely and only then inserts, so a failing root adds
//! nothing to the index.

use crate::image::Image;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};
use zip::ZipArchive;
use zip::result::ZipError;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Cannot open archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: ZipError,
    },
    #[error("Cannot walk directory tree: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Recognized image extensions, compared case-sensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "JPG", "png", "gif"];

/// Base-name prefix of OS-generated metadata shadow files.
pub const METADATA_PREFIX: &str = "._";

/// How a non-image file is recognized as a zip archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveDetection {
    /// Files named `*.zip` are archives. Fast, never reads other files.
    #[default]
    Extension,
    /// Any file that opens as a zip is an archive, whatever its name.
    Probe,
}

type EntryFilter = fn(&DirEntry) -> bool;

/// Lazy walk over one root. Created by [`scan`].
pub struct Scan {
    walker: walkdir::FilterEntry<walkdir::IntoIter, EntryFilter>,
    detection: ArchiveDetection,
    /// Images from the archive most recently opened, not yet yielded.
    pending: std::vec::IntoIter<Image>,
}

/// Start walking `root` for images.
pub fn scan(root: &Path, detection: ArchiveDetection) -> Scan {
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(is_visible as EntryFilter);
    Scan {
        walker,
        detection,
        pending: Vec::new().into_iter(),
    }
}

impl Iterator for Scan {
    type Item = Result<Image, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(image) = self.pending.next() {
                return Some(Ok(image));
            }

            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) if is_skippable(&err) => continue,
                Err(err) => return Some(Err(err.into())),
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.into_path();
            if has_image_extension(&path) {
                return Some(Ok(Image::loose(path)));
            }
            match self.archive_images(&path) {
                Ok(Some(images)) => self.pending = images.into_iter(),
                Ok(None) => {}
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

impl Scan {
    /// Images inside `path`, or `None` if it is not treated as an archive.
    fn archive_images(&self, path: &Path) -> Result<Option<Vec<Image>>, ScanError> {
        let archive = match self.detection {
            ArchiveDetection::Extension => {
                if path.extension().is_none_or(|ext| ext != "zip") {
                    return Ok(None);
                }
                open_zip(path).map_err(|source| ScanError::Archive {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            ArchiveDetection::Probe => match open_zip(path) {
                Ok(archive) => archive,
                Err(err) => {
                    debug!("Skipping {}: not a zip archive ({err})", path.display());
                    return Ok(None);
                }
            },
        };

        let images: Vec<Image> = archive
            .file_names()
            .filter(|name| is_archived_image(name))
            .map(|name| Image::archived(path, name))
            .collect();
        debug!("Archive {}: {} images", path.display(), images.len());
        Ok(Some(images))
    }
}

fn open_zip(path: &Path) -> Result<ZipArchive<File>, ZipError> {
    let file = File::open(path)?;
    ZipArchive::new(file)
}

fn is_visible(entry: &DirEntry) -> bool {
    let visible = !entry
        .file_name()
        .to_string_lossy()
        .starts_with(METADATA_PREFIX);
    if !visible {
        debug!("Skipping metadata entry {}", entry.path().display());
    }
    visible
}

/// Walk errors that mean "this entry is not a file or directory".
fn is_skippable(err: &walkdir::Error) -> bool {
    if err.loop_ancestor().is_some() {
        warn!("Skipping symlink loop: {err}");
        return true;
    }
    let dangling = err.depth() > 0
        && err
            .io_error()
            .is_some_and(|e| e.kind() == io::ErrorKind::NotFound);
    if dangling {
        debug!("Skipping dangling entry: {err}");
    }
    dangling
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext))
}

fn is_archived_image(entry: &str) -> bool {
    if entry.ends_with('/') {
        return false;
    }
    let base = entry.rsplit('/').next().unwrap_or(entry);
    !base.starts_with(METADATA_PREFIX) && has_image_extension(Path::new(base))
}
