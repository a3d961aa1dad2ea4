//! Centralized module for cryptographic hashing.
//!
//! The evidentiary hash set is fixed: MD5, SHA-1, SHA-256, SHA-512, each
//! computed bit-exact over the complete buffer with no sampling or early
//! termination. Identical bytes always yield identical digests — this is
//! the reproducibility anchor for chain of custody.

use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

/// The four digests of one file, as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHashes {
    pub md5: String,
    pub sha1: String,
    pub sha256: String,
    pub sha512: String,
}

/// Computes the MD5 digest of the given data and returns it as a hex string.
pub fn md5_digest(data: &[u8]) -> String {
    format!("{:x}", md5::compute(data))
}

/// Computes the SHA-1 digest of the given data and returns it as a hex string.
pub fn sha1_digest(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Computes the SHA-256 digest of the given data and returns it as a hex string.
pub fn sha256_digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Computes the SHA-512 digest of the given data and returns it as a hex string.
pub fn sha512_digest(data: &[u8]) -> String {
    let mut hasher = Sha512::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Compute the full evidentiary hash set over one buffer.
pub fn compute_hashes(data: &[u8]) -> FileHashes {
    FileHashes {
        md5: md5_digest(data),
        sha1: sha1_digest(data),
        sha256: sha256_digest(data),
        sha512: sha512_digest(data),
    }
}
