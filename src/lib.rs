//! # Gallery Preview
//!
//! Indexes images scattered across directory trees and zip archives, and gives
//! every image and every gallery a stable opaque identifier. A gallery is a
//! directory of loose images, or one folder inside a zip archive.
//!
//! # Pipeline
//!
//! ```text
//! roots  →  scan (lazy walk)  →  Image values  →  GalleryIndex  →  queries
//! ```
//!
//! The index is built once with [`build_index`] and is read-only afterwards.
//! It holds paths, never image bytes: each [`Image::get`] goes back to the
//! file or archive.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`ident`] | Identifier derivation: SHA-256 of a canonical path string |
//! | [`image`] | The [`Image`] sum type: loose file or archived entry |
//! | [`scan`] | Lazy recursive walk yielding images from disk and zip archives |
//! | [`index`] | [`GalleryIndex`] tables and lookups, [`build_index`] |
//! | [`sample`] | Random preview draws from a gallery |
//! | [`config`] | `config.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Identifiers Without a Database
//!
//! Identifiers are hashes of path strings, so the same tree always produces
//! the same ids and links survive a restart with nothing persisted. The flip
//! side: ids are only as stable as the paths, and moving a directory changes
//! them.
//!
//! ## Archived Image Ids
//!
//! An archived image's id hashes only its path inside the archive, not the
//! archive's own path. Two archives holding the same entry path share an
//! image id; the later one wins in the image table and a warning is logged.
//! Gallery ids do include the archive path, so both galleries stay listed.
//!
//! ## Archive Detection
//!
//! By default only `*.zip` files are opened, and one that fails to open stops
//! the build: a corrupt archive should not silently drop its images. Probing
//! ([`ArchiveDetection::Probe`]) instead tries every non-image file and skips
//! the ones that are not zips.

pub mod config;
pub mod ident;
pub mod image;
pub mod index;
pub mod output;
pub mod sample;
pub mod scan;

pub use ident::Identifier;
pub use image::{Image, ImageError};
pub use index::{Gallery, GalleryIndex, IndexError, build_index};
pub use scan::{ArchiveDetection, ScanError};

#[cfg(test)]
pub(crate) mod test_helpers;
