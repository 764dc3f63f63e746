//! Opaque identifiers for images and galleries.
//!
//! An [`Identifier`] is the lowercase hex SHA-256 digest of a canonical
//! path-like string, encoded as UTF-8 before hashing. The same string always
//! yields the same identifier, so URLs built from identifiers stay valid across
//! restarts without persisting anything.
//!
//! Identifiers are keys only. Nothing ever parses one back into a path.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::borrow::Borrow;
use std::fmt;

/// Length in characters of every identifier.
pub const IDENTIFIER_LEN: usize = 64;

/// Fixed-length opaque key derived from a canonical path string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets the index tables be queried with a plain `&str` taken from a URL.
impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Derive the identifier of a canonical path string.
pub fn derive(s: &str) -> Identifier {
    let digest = Sha256::digest(s.as_bytes());
    Identifier(format!("{:x}", digest))
}
