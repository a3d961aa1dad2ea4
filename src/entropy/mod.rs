//! Shannon entropy over the whole byte buffer.
//!
//! The score is always computed over the entire file, independent of any
//! preview window a presentation layer may apply.

/// Entropy above this many bits/byte suggests encryption or compression.
///
/// Fixed design constant consumed by the orchestrator's anomaly heuristics.
pub const HIGH_ENTROPY_THRESHOLD: f64 = 7.5;

/// Shannon entropy of a byte slice in bits per byte, in `[0, 8]`.
///
/// Empty input yields 0.0.
#[inline]
pub fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut hist = [0usize; 256];
    for &b in data {
        hist[b as usize] += 1;
    }
    let len = data.len() as f64;
    let mut h = 0.0;
    for c in hist.iter().copied() {
        if c == 0 {
            continue;
        }
        let p = (c as f64) / len;
        h -= p * p.log2();
    }
    h
}
