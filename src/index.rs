//! In-memory gallery index.
//!
//! [`build_index`] scans each root and inserts every discovered image. The
//! result is a [`GalleryIndex`] with four tables, all keyed by [`Identifier`]:
//!
//! | Table | Key → value |
//! |-------|-------------|
//! | images | image id → [`Image`] |
//! | galleries | gallery id → images in discovery order |
//! | gallery names | gallery id → display name |
//! | gallery locations | gallery id → path to reveal |
//!
//! A gallery has no record of its own: it exists because at least one image
//! names it. Its name and location are recorded from the first such image.
//!
//! The index is built once, then only read. Query methods take `&self` and
//! each byte read opens its own file or archive, so a built index can be
//! shared across threads without locking.

use crate::ident::Identifier;
use crate::image::{Image, ImageError};
use crate::scan::{self, ArchiveDetection, ScanError};
use log::{info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("No image with id {0}")]
    ImageNotFound(String),
    #[error("No gallery with id {0}")]
    GalleryNotFound(String),
    #[error("Gallery {0} has no images to sample")]
    EmptyGallery(String),
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Summary of one gallery, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gallery {
    pub id: Identifier,
    pub name: String,
    pub location: PathBuf,
    pub image_count: usize,
}

#[derive(Debug, Default)]
pub struct GalleryIndex {
    roots: Vec<PathBuf>,
    images: HashMap<Identifier, Image>,
    galleries: HashMap<Identifier, Vec<Image>>,
    gallery_names: HashMap<Identifier, String>,
    gallery_locations: HashMap<Identifier, PathBuf>,
}

/// Scan every root and index what it finds.
///
/// Roots are scanned in order. Each root is walked to completion before any
/// of its images are inserted, so the first failing root aborts the build
/// without leaving a partial gallery behind.
pub fn build_index<P: AsRef<Path>>(
    roots: &[P],
    detection: ArchiveDetection,
) -> Result<GalleryIndex, ScanError> {
    let mut index = GalleryIndex::new();
    for root in roots {
        index.add_root(root.as_ref(), detection)?;
    }
    info!(
        "Indexed {} images in {} galleries",
        index.len(),
        index.gallery_count()
    );
    Ok(index)
}

impl GalleryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan one root and insert its images. Returns how many were found.
    pub fn add_root(
        &mut self,
        root: &Path,
        detection: ArchiveDetection,
    ) -> Result<usize, ScanError> {
        let images: Vec<Image> = scan::scan(root, detection).collect::<Result<_, _>>()?;
        let found = images.len();
        for image in images {
            self.insert(image);
        }
        self.roots.push(root.to_path_buf());
        info!("{}: {} images", root.display(), found);
        Ok(found)
    }

    /// Add one image to every table.
    ///
    /// An image id seen before is replaced. That only happens when two
    /// distinct sources derive the same id, and is logged.
    pub fn insert(&mut self, image: Image) {
        let image_id = image.image_id();
        let gallery_id = image.gallery_id();

        self.gallery_names
            .entry(gallery_id.clone())
            .or_insert_with(|| image.gallery_name());
        self.gallery_locations
            .entry(gallery_id.clone())
            .or_insert_with(|| image.gallery_location().to_path_buf());
        self.galleries
            .entry(gallery_id)
            .or_default()
            .push(image.clone());

        if let Some(previous) = self.images.insert(image_id.clone(), image)
            && previous != self.images[&image_id]
        {
            warn!(
                "Image id {image_id} collision: {} replaced by {}",
                previous.image_name(),
                self.images[&image_id].image_name()
            );
        }
    }

    /// Number of indexed image ids.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn gallery_count(&self) -> usize {
        self.galleries.len()
    }

    /// Roots scanned so far, in order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Display label for the whole index: the roots, comma separated.
    pub fn roots_label(&self) -> String {
        self.roots
            .iter()
            .map(|r| r.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn image(&self, image_id: &str) -> Result<&Image, IndexError> {
        self.images
            .get(image_id)
            .ok_or_else(|| IndexError::ImageNotFound(image_id.to_string()))
    }

    /// Read an image's bytes from its source.
    pub fn get_image_bytes(&self, image_id: &str) -> Result<Vec<u8>, IndexError> {
        Ok(self.image(image_id)?.get()?)
    }

    /// All galleries as `(id, name)`, sorted by name, then id.
    pub fn list_gallery_names(&self) -> Vec<(&Identifier, &str)> {
        let mut names: Vec<(&Identifier, &str)> = self
            .gallery_names
            .iter()
            .map(|(id, name)| (id, name.as_str()))
            .collect();
        names.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)));
        names
    }

    pub fn get_gallery_name(&self, gallery_id: &str) -> Result<&str, IndexError> {
        self.gallery_names
            .get(gallery_id)
            .map(String::as_str)
            .ok_or_else(|| IndexError::GalleryNotFound(gallery_id.to_string()))
    }

    /// Path to open or reveal for a gallery: its directory or its archive.
    pub fn gallery_location(&self, gallery_id: &str) -> Result<&Path, IndexError> {
        self.gallery_locations
            .get(gallery_id)
            .map(PathBuf::as_path)
            .ok_or_else(|| IndexError::GalleryNotFound(gallery_id.to_string()))
    }

    /// A gallery's images in discovery order. Unknown ids have no images.
    pub fn list_gallery_images(&self, gallery_id: &str) -> &[Image] {
        self.galleries
            .get(gallery_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Summaries of all galleries, in [`list_gallery_names`](Self::list_gallery_names) order.
    pub fn galleries(&self) -> Vec<Gallery> {
        self.list_gallery_names()
            .into_iter()
            .map(|(id, name)| Gallery {
                id: id.clone(),
                name: name.to_string(),
                location: self.gallery_locations[id].clone(),
                image_count: self.list_gallery_images(id.as_str()).len(),
            })
            .collect()
    }
}
