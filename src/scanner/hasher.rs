//! BLAKE3 content fingerprints.
//!
//! # Overview
//! Fingerprints are computed over canonical text (see [`super::segment`]),
//! never over raw content, so formatting-only differences share a digest.
//! BLAKE3 output is fixed by its specification, which keeps fingerprints
//! stable across runs, platforms and releases.

use std::fmt;

use serde::{Serialize, Serializer};

/// Size of a fingerprint in bytes.
pub const FINGERPRINT_LEN: usize = 32;

/// A 256-bit BLAKE3 digest of canonical text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Lowercase hexadecimal form (64 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        hash_to_hex(&self.0)
    }

    /// Short prefix for log lines and text reports.
    #[must_use]
    pub fn short(&self) -> String {
        hash_to_hex(&self.0[..6])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.short())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Fingerprint canonical text.
///
/// # Example
///
/// ```
/// use paradupe::scanner::fingerprint;
///
/// assert_eq!(
///     fingerprint("abc").to_hex(),
///     "6437b3ac38465133ffb63b75273a8db548c558465d79db03fd359c6cd5bd9d85"
/// );
/// ```
#[must_use]
pub fn fingerprint(canonical: &str) -> Fingerprint {
    Fingerprint(*blake3::hash(canonical.as_bytes()).as_bytes())
}

/// Convert bytes to a lowercase hexadecimal string.
fn hash_to_hex(bytes: &[u8]) -> String {
    use fmt::Write;
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
            let _ = write!(out, "{b:02x}");
            out
        })
}
