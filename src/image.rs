//! The two shapes an indexed image can take.
//!
//! An [`Image`] is either a loose file on disk or an entry inside a zip
//! archive. Both expose the same read-only view: identifiers, display names,
//! the gallery location to reveal, and [`Image::get`] for the raw bytes.
//!
//! ## Canonical strings
//!
//! Identifiers are derived from these strings (see [`crate::ident`]):
//!
//! | Property | Loose file | Archived entry |
//! |----------|------------|----------------|
//! | `image_id` | full file path | `folder/name` inside the archive |
//! | `gallery_id` | parent directory | archive path joined with `folder` |
//! | `gallery_name` | parent directory | `"<archive> → <folder>"` |
//! | `gallery_location` | parent directory | the archive file |
//!
//! Entries at the top level of an archive have an empty folder, shown as `.`
//! in the gallery name.
//!
//! ## Lazy reads
//!
//! Nothing is cached. Every call to [`Image::get`] opens the file or archive,
//! reads, and closes it again, so the index never holds image bytes and never
//! keeps an archive handle open between calls.

use crate::ident::{self, Identifier};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Cannot read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot read {entry} from archive {archive}: {source}")]
    Archive {
        archive: PathBuf,
        entry: String,
        #[source]
        source: zip::result::ZipError,
    },
}

/// An image stored as a regular file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LooseImage {
    file: PathBuf,
    gallery: PathBuf,
}

impl LooseImage {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        let gallery = match file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self { file, gallery }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    fn get(&self) -> Result<Vec<u8>, ImageError> {
        fs::read(&self.file).map_err(|source| ImageError::Io {
            path: self.file.clone(),
            source,
        })
    }
}

/// An image stored as an entry inside a zip archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedImage {
    archive: PathBuf,
    /// Entry name exactly as stored in the archive, used to read it back.
    entry: String,
    /// Entry's parent folder inside the archive, `/`-separated, empty at top level.
    folder: String,
    name: String,
}

impl ArchivedImage {
    /// Build from a full entry name such as `chapter-1/p01.jpg`.
    pub fn new(archive: impl Into<PathBuf>, entry: impl Into<String>) -> Self {
        let entry = entry.into();
        let (folder, name) = split_entry_name(&entry);
        Self {
            archive: archive.into(),
            folder: folder.to_string(),
            name: name.to_string(),
            entry,
        }
    }

    pub fn archive(&self) -> &Path {
        &self.archive
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Full entry name inside the archive, as stored (`folder/name`).
    pub fn entry_name(&self) -> &str {
        &self.entry
    }

    fn gallery_key(&self) -> String {
        if self.folder.is_empty() {
            self.archive.to_string_lossy().into_owned()
        } else {
            self.archive.join(&self.folder).to_string_lossy().into_owned()
        }
    }

    fn get(&self) -> Result<Vec<u8>, ImageError> {
        let archive_err = |source: zip::result::ZipError| ImageError::Archive {
            archive: self.archive.clone(),
            entry: self.entry.clone(),
            source,
        };

        let file = File::open(&self.archive).map_err(|e| archive_err(e.into()))?;
        let mut zip = zip::ZipArchive::new(file).map_err(archive_err)?;
        let mut zipped = zip.by_name(&self.entry).map_err(archive_err)?;
        // Sizes in the archive are untrusted: grow while reading
        let mut bytes = Vec::new();
        zipped
            .read_to_end(&mut bytes)
            .map_err(|e| archive_err(e.into()))?;
        Ok(bytes)
    }
}

/// Split a zip entry name into (parent folder, base name).
fn split_entry_name(entry: &str) -> (&str, &str) {
    match entry.rsplit_once('/') {
        Some((folder, name)) => (folder, name),
        None => ("", entry),
    }
}

/// An indexed image, either loose on disk or inside an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Image {
    Loose(LooseImage),
    Archived(ArchivedImage),
}

impl Image {
    pub fn loose(file: impl Into<PathBuf>) -> Self {
        Image::Loose(LooseImage::new(file))
    }

    pub fn archived(archive: impl Into<PathBuf>, entry: &str) -> Self {
        Image::Archived(ArchivedImage::new(archive, entry))
    }

    /// Read the image's raw bytes from its source.
    pub fn get(&self) -> Result<Vec<u8>, ImageError> {
        match self {
            Image::Loose(img) => img.get(),
            Image::Archived(img) => img.get(),
        }
    }

    pub fn image_id(&self) -> Identifier {
        match self {
            Image::Loose(img) => ident::derive(&img.file.to_string_lossy()),
            Image::Archived(img) => ident::derive(&img.entry),
        }
    }

    /// Base name of the file or entry.
    pub fn image_name(&self) -> String {
        match self {
            Image::Loose(img) => img
                .file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            Image::Archived(img) => img.name.clone(),
        }
    }

    pub fn gallery_id(&self) -> Identifier {
        match self {
            Image::Loose(img) => ident::derive(&img.gallery.to_string_lossy()),
            Image::Archived(img) => ident::derive(&img.gallery_key()),
        }
    }

    pub fn gallery_name(&self) -> String {
        match self {
            Image::Loose(img) => img.gallery.to_string_lossy().into_owned(),
            Image::Archived(img) => {
                let folder = if img.folder.is_empty() { "." } else { &img.folder };
                format!("{} → {}", img.archive.display(), folder)
            }
        }
    }

    /// Path to reveal in a file manager: the directory, or the archive itself.
    pub fn gallery_location(&self) -> &Path {
        match self {
            Image::Loose(img) => &img.gallery,
            Image::Archived(img) => &img.archive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{write_zip, write_zip_declaring_size};
    use tempfile::TempDir;

    #[test]
    fn loose_image_properties() {
        let img = Image::loose("/photos/trip/dawn.jpg");
        assert_eq!(img.image_name(), "dawn.jpg");
        assert_eq!(img.gallery_name(), "/photos/trip");
        assert_eq!(img.gallery_location(), Path::new("/photos/trip"));
        assert_eq!(img.image_id(), ident::derive("/photos/trip/dawn.jpg"));
        assert_eq!(img.gallery_id(), ident::derive("/photos/trip"));
    }

    #[test]
    fn loose_image_without_parent_uses_current_dir() {
        let img = Image::loose("dawn.jpg");
        assert_eq!(img.gallery_name(), ".");
        assert_eq!(img.gallery_location(), Path::new("."));
    }

    #[test]
    fn archived_image_properties() {
        let img = Image::archived("/comics/vol1.zip", "chapter-1/p01.jpg");
        assert_eq!(img.image_name(), "p01.jpg");
        assert_eq!(img.gallery_name(), "/comics/vol1.zip → chapter-1");
        assert_eq!(img.gallery_location(), Path::new("/comics/vol1.zip"));
        assert_eq!(img.image_id(), ident::derive("chapter-1/p01.jpg"));
        assert_eq!(img.gallery_id(), ident::derive("/comics/vol1.zip/chapter-1"));
    }

    #[test]
    fn archived_image_at_top_level() {
        let img = Image::archived("/comics/vol1.zip", "cover.jpeg");
        assert_eq!(img.image_name(), "cover.jpeg");
        assert_eq!(img.gallery_name(), "/comics/vol1.zip → .");
        assert_eq!(img.image_id(), ident::derive("cover.jpeg"));
        assert_eq!(img.gallery_id(), ident::derive("/comics/vol1.zip"));
    }

    #[test]
    fn nested_entry_folder_is_kept_whole() {
        let Image::Archived(img) = Image::archived("a.zip", "x/y/z.png") else {
            panic!("expected archived image");
        };
        assert_eq!(img.folder(), "x/y");
        assert_eq!(img.entry_name(), "x/y/z.png");
    }

    #[test]
    fn loose_get_reads_current_contents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.jpg");
        std::fs::write(&path, b"first").unwrap();
        let img = Image::loose(&path);
        assert_eq!(img.get().unwrap(), b"first");

        // Not cached: a rewrite is visible on the next call
        std::fs::write(&path, b"second").unwrap();
        assert_eq!(img.get().unwrap(), b"second");
    }

    #[test]
    fn loose_get_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let img = Image::loose(tmp.path().join("gone.jpg"));
        assert!(matches!(img.get(), Err(ImageError::Io { .. })));
    }

    #[test]
    fn archived_get_reads_entry() {
        let tmp = TempDir::new().unwrap();
        let zip_path = tmp.path().join("set.zip");
        write_zip(&zip_path, &[("ch1/p1.jpg", "page one"), ("cover.png", "cover")]);

        assert_eq!(
            Image::archived(&zip_path, "ch1/p1.jpg").get().unwrap(),
            b"page one"
        );
        assert_eq!(Image::archived(&zip_path, "cover.png").get().unwrap(), b"cover");
    }

    #[test]
    fn archived_get_missing_entry_is_archive_error() {
        let tmp = TempDir::new().unwrap();
        let zip_path = tmp.path().join("set.zip");
        write_zip(&zip_path, &[("ch1/p1.jpg", "page one")]);

        let result = Image::archived(&zip_path, "ch1/p2.jpg").get();
        assert!(matches!(result, Err(ImageError::Archive { .. })));
    }

    #[test]
    fn archived_get_missing_archive_is_archive_error() {
        let tmp = TempDir::new().unwrap();
        let result = Image::archived(tmp.path().join("gone.zip"), "a.jpg").get();
        assert!(matches!(result, Err(ImageError::Archive { .. })));
    }

    #[test]
    fn archived_get_corrupt_archive_is_archive_error() {
        let tmp = TempDir::new().unwrap();
        let zip_path = tmp.path().join("bad.zip");
        std::fs::write(&zip_path, b"not a zip at all").unwrap();
        let result = Image::archived(&zip_path, "a.jpg").get();
        assert!(matches!(result, Err(ImageError::Archive { .. })));
    }

    #[test]
    fn archived_get_survives_absurd_declared_size() {
        let tmp = TempDir::new().unwrap();
        let zip_path = tmp.path().join("huge.zip");
        write_zip_declaring_size(&zip_path, "a.jpg", b"hello", 0xFFFF_FFFF_FFFF_FFF0);

        match Image::archived(&zip_path, "a.jpg").get() {
            Ok(bytes) => assert_eq!(bytes, b"hello"),
            Err(err) => assert!(matches!(err, ImageError::Archive { .. })),
        }
    }

    #[test]
    fn archived_entry_name_is_kept_verbatim() {
        let img = Image::archived("/c.zip", "/x.jpg");
        let Image::Archived(archived) = &img else {
            panic!("expected archived image");
        };
        assert_eq!(archived.entry_name(), "/x.jpg");
        assert_eq!(archived.folder(), "");
        assert_eq!(img.image_name(), "x.jpg");
        assert_eq!(img.image_id(), ident::derive("/x.jpg"));
        assert_eq!(img.gallery_name(), "/c.zip → .");
    }

    #[test]
    fn archived_get_reads_rooted_entry() {
        let tmp = TempDir::new().unwrap();
        let zip_path = tmp.path().join("slash.zip");
        write_zip(&zip_path, &[("/x.jpg", "rooted")]);

        assert_eq!(Image::archived(&zip_path, "/x.jpg").get().unwrap(), b"rooted");
    }
}
