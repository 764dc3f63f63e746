//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every entity leads with a positional index and its display name. The
//! identifier and filesystem source follow as indented context lines, so the
//! output reads as an inventory while still giving the ids other commands
//! take as arguments.
//!
//! # Output Format
//!
//! ## Gallery list
//!
//! ```text
//! Galleries
//! 001 /photos/comics.zip → ch1 (2 photos)
//!     Id: 5f1c…
//!     Location: /photos/comics.zip
//! 002 /photos/trip (3 photos)
//!     Id: 0b9e…
//!     Location: /photos/trip
//!
//! Indexed 5 images in 2 galleries from /photos
//! ```
//!
//! ## Gallery images (and samples)
//!
//! ```text
//! /photos/comics.zip → ch1 (2 photos)
//!     001 p1.jpg
//!         Id: 77aa…
//!         Source: /photos/comics.zip: ch1/p1.jpg
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::image::Image;
use crate::index::{GalleryIndex, IndexError};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format a gallery header with its photo count.
fn gallery_header(name: &str, count: usize) -> String {
    format!("{} ({} photos)", name, count)
}

/// Where an image's bytes come from, for the `Source:` line.
fn image_source(image: &Image) -> String {
    match image {
        Image::Loose(img) => img.file().display().to_string(),
        Image::Archived(img) => format!("{}: {}", img.archive().display(), img.entry_name()),
    }
}

/// Format an image entry: header line plus id and source context lines.
fn image_lines(position: usize, image: &Image, depth: usize) -> Vec<String> {
    let pad = indent(depth);
    vec![
        format!("{}{} {}", pad, format_index(position), image.image_name()),
        format!("{}    Id: {}", pad, image.image_id()),
        format!("{}    Source: {}", pad, image_source(image)),
    ]
}

/// One-line totals for an index.
pub fn format_summary(index: &GalleryIndex) -> String {
    format!(
        "Indexed {} images in {} galleries from {}",
        index.len(),
        index.gallery_count(),
        index.roots_label()
    )
}

/// Format every gallery, sorted by name.
pub fn format_gallery_list(index: &GalleryIndex) -> Vec<String> {
    let mut lines = vec!["Galleries".to_string()];
    for (i, gallery) in index.galleries().iter().enumerate() {
        lines.push(format!(
            "{} {}",
            format_index(i + 1),
            gallery_header(&gallery.name, gallery.image_count)
        ));
        lines.push(format!("    Id: {}", gallery.id));
        lines.push(format!("    Location: {}", gallery.location.display()));
    }
    lines.push(String::new());
    lines.push(format_summary(index));
    lines
}

/// Format one gallery's images in discovery order.
pub fn format_gallery(index: &GalleryIndex, gallery_id: &str) -> Result<Vec<String>, IndexError> {
    let name = index.get_gallery_name(gallery_id)?;
    let images = index.list_gallery_images(gallery_id);

    let mut lines = vec![gallery_header(name, images.len())];
    for (i, image) in images.iter().enumerate() {
        lines.extend(image_lines(i + 1, image, 1));
    }
    Ok(lines)
}

/// Format a random sample drawn from the named gallery.
pub fn format_sample(gallery_name: &str, images: &[&Image]) -> Vec<String> {
    let mut lines = vec![format!("Sample of {}", gallery_name)];
    for (i, image) in images.iter().enumerate() {
        lines.extend(image_lines(i + 1, image, 1));
    }
    lines
}

/// Print lines to stdout.
pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
