//! Printable-string extraction.
//!
//! A single linear scan over the buffer accumulating contiguous runs of
//! printable bytes. The full buffer is available in memory, so this is a
//! plain function returning a materialized Vec in buffer order; results
//! feed both the investigator string view and the PDF script heuristics.

/// A byte that may appear inside an extracted string: printable ASCII
/// `[0x20, 0x7E]` plus TAB, LF and CR.
#[inline]
fn is_printable(b: u8) -> bool {
    (0x20..=0x7E).contains(&b) || b == b'\t' || b == b'\n' || b == b'\r'
}

/// Extract printable-ASCII runs of at least `min_length` bytes.
///
/// On a non-matching byte the accumulated run is flushed if long enough and
/// the scan resets; a trailing run at end-of-buffer is flushed under the
/// same rule.
pub fn extract_printable_strings(data: &[u8], min_length: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur: Vec<u8> = Vec::new();
    for &b in data {
        if is_printable(b) {
            cur.push(b);
        } else {
            if cur.len() >= min_length {
                // Runs are pure ASCII by construction.
                out.push(String::from_utf8_lossy(&cur).into_owned());
            }
            cur.clear();
        }
    }
    if cur.len() >= min_length {
        out.push(String::from_utf8_lossy(&cur).into_owned());
    }
    out
}
