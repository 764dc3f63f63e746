//! Shared test utilities: fixture trees with loose images and zip archives.
//!
//! Image contents are placeholder text. Nothing in the index decodes pixels,
//! so only extensions and bytes matter.
//!
//! # The sample tree
//!
//! ```text
//! <tmp>/
//! ├── ._hidden/x.jpg          # metadata shadow dir, never entered
//! ├── bundle.dat              # zip without .zip extension: loose/x.png
//! ├── comics.zip              # ch1/p1.jpg ch1/p2.jpg ch2/p3.gif cover.jpeg
//! │                           # + readme.txt and __MACOSX/ch1/._p1.jpg
//! ├── empty/readme.txt
//! ├── text-only.zip           # readme.txt only
//! └── trip/
//!     ├── ._a.jpg
//!     ├── a.jpg
//!     ├── b.png
//!     ├── notes.txt
//!     ├── photo.bmp
//!     └── nested/c.JPG
//! ```
//!
//! Extension detection finds 7 images in 5 galleries; probing adds the one
//! image in `bundle.dat` and its gallery.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

pub const SAMPLE_IMAGES_BY_EXTENSION: usize = 7;
pub const SAMPLE_GALLERIES_BY_EXTENSION: usize = 5;
pub const SAMPLE_IMAGES_BY_PROBE: usize = 8;
pub const SAMPLE_GALLERIES_BY_PROBE: usize = 6;

/// Write a file, creating parent directories as needed.
pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Write a zip archive holding `(entry name, contents)` pairs, in order.
pub fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    for (name, contents) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

/// Write a zip with one stored entry whose central directory claims
/// `declared_size` uncompressed bytes, carried in a zip64 extra field.
pub fn write_zip_declaring_size(path: &Path, name: &str, contents: &[u8], declared_size: u64) {
    let crc = crc32(contents);
    let name_len = name.len() as u16;
    let mut extra = Vec::new();
    extra.extend_from_slice(&0x0001u16.to_le_bytes());
    extra.extend_from_slice(&8u16.to_le_bytes());
    extra.extend_from_slice(&declared_size.to_le_bytes());

    let mut out = Vec::new();
    out.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
    out.extend_from_slice(&45u16.to_le_bytes()); // version needed
    out.extend_from_slice(&[0; 8]); // flags, method (stored), time, date
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&(contents.len() as u32).to_le_bytes());
    out.extend_from_slice(&u32::MAX.to_le_bytes());
    out.extend_from_slice(&name_len.to_le_bytes());
    out.extend_from_slice(&(extra.len() as u16).to_le_bytes());
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(&extra);
    out.extend_from_slice(contents);

    let central_start = out.len() as u32;
    out.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
    out.extend_from_slice(&45u16.to_le_bytes()); // version made by
    out.extend_from_slice(&45u16.to_le_bytes()); // version needed
    out.extend_from_slice(&[0; 8]); // flags, method (stored), time, date
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&(contents.len() as u32).to_le_bytes());
    out.extend_from_slice(&u32::MAX.to_le_bytes());
    out.extend_from_slice(&name_len.to_le_bytes());
    out.extend_from_slice(&(extra.len() as u16).to_le_bytes());
    out.extend_from_slice(&[0; 12]); // comment len, disk, attributes
    out.extend_from_slice(&0u32.to_le_bytes()); // local header offset
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(&extra);
    let central_len = out.len() as u32 - central_start;

    out.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
    out.extend_from_slice(&[0; 4]); // disk numbers
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&central_len.to_le_bytes());
    out.extend_from_slice(&central_start.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, out).unwrap();
}

fn crc32(data: &[u8]) -> u32 {
    let mut crc = u32::MAX;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

/// Build the sample tree described in the module docs.
pub fn sample_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    write_file(&root.join("trip/a.jpg"), "image a");
    write_file(&root.join("trip/b.png"), "image b");
    write_file(&root.join("trip/notes.txt"), "notes");
    write_file(&root.join("trip/photo.bmp"), "bitmap");
    write_file(&root.join("trip/._a.jpg"), "resource fork");
    write_file(&root.join("trip/nested/c.JPG"), "image c");
    write_file(&root.join("._hidden/x.jpg"), "hidden");
    write_file(&root.join("empty/readme.txt"), "nothing here");

    write_zip(
        &root.join("comics.zip"),
        &[
            ("ch1/p1.jpg", "page 1"),
            ("ch1/p2.jpg", "page 2"),
            ("ch2/p3.gif", "page 3"),
            ("cover.jpeg", "cover"),
            ("readme.txt", "about"),
            ("__MACOSX/ch1/._p1.jpg", "resource fork"),
        ],
    );
    write_zip(&root.join("bundle.dat"), &[("loose/x.png", "bundled")]);
    write_zip(&root.join("text-only.zip"), &[("readme.txt", "no pictures")]);

    tmp
}
