//! Random preview images for a gallery.
//!
//! Draws are uniform and with replacement, so a gallery smaller than `k`
//! still fills every slot and may repeat an image.

use crate::image::Image;
use crate::index::{GalleryIndex, IndexError};
use rand::Rng;

/// Preview count used when the caller doesn't choose one.
pub const DEFAULT_SAMPLE_SIZE: usize = 3;

/// Draw `k` images from a gallery using the thread-local RNG.
pub fn sample<'a>(
    index: &'a GalleryIndex,
    gallery_id: &str,
    k: usize,
) -> Result<Vec<&'a Image>, IndexError> {
    sample_with(index, gallery_id, k, &mut rand::rng())
}

/// Draw `k` images from a gallery using `rng`.
///
/// Fails with [`IndexError::EmptyGallery`] when the gallery has no images,
/// including when the id is unknown.
pub fn sample_with<'a, R: Rng>(
    index: &'a GalleryIndex,
    gallery_id: &str,
    k: usize,
    rng: &mut R,
) -> Result<Vec<&'a Image>, IndexError> {
    let images = index.list_gallery_images(gallery_id);
    if images.is_empty() {
        return Err(IndexError::EmptyGallery(gallery_id.to_string()));
    }
    Ok((0..k)
        .map(|_| &images[rng.random_range(0..images.len())])
        .collect())
}
