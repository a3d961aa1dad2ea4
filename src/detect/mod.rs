//! Format detection and parser dispatch.
//!
//! Dispatch priority is fixed: the declared MIME type wins, the filename
//! extension (mapped through `mime_guess`) is the fallback, and the
//! candidates are tried in order JPEG → PNG → PDF → DOCX. Exactly one
//! parser executes; anything unmatched routes to the generic fallback.
//!
//! Content sniffing via `infer` is deliberately kept out of dispatch: it
//! only feeds the declared-type-vs-content mismatch warning, because a file
//! whose magic disagrees with its claimed type is itself evidence.

use std::path::Path;
use tracing::debug;

/// The parser family selected for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedFormat {
    Jpeg,
    Png,
    Pdf,
    Docx,
    Unknown,
}

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

fn format_from_mime(mime: &str) -> DetectedFormat {
    let m = mime.trim().to_ascii_lowercase();
    if m == "image/jpeg" || m == "image/jpg" {
        DetectedFormat::Jpeg
    } else if m == "image/png" {
        DetectedFormat::Png
    } else if m == "application/pdf" {
        DetectedFormat::Pdf
    } else if m == DOCX_MIME {
        DetectedFormat::Docx
    } else {
        DetectedFormat::Unknown
    }
}

/// Select the parser for a file from its declared MIME type and filename.
pub fn detect(mime: Option<&str>, file_name: Option<&str>) -> DetectedFormat {
    if let Some(m) = mime {
        let f = format_from_mime(m);
        if f != DetectedFormat::Unknown {
            debug!(mime = m, format = ?f, "dispatch by declared MIME");
            return f;
        }
    }
    if let Some(name) = file_name {
        if let Some(ext) = Path::new(name).extension().and_then(|e| e.to_str()) {
            if let Some(guessed) = mime_guess::from_ext(ext).first() {
                let f = format_from_mime(guessed.essence_str());
                if f != DetectedFormat::Unknown {
                    debug!(extension = ext, format = ?f, "dispatch by extension");
                    return f;
                }
            }
            // Registry coverage for OOXML varies; map the extension directly.
            if ext.eq_ignore_ascii_case("docx") {
                return DetectedFormat::Docx;
            }
        }
    }
    DetectedFormat::Unknown
}

/// Content-detected type from magic bytes.
#[derive(Debug, Clone)]
pub struct ContentHint {
    pub mime: String,
    pub extension: String,
}

/// Sniff the buffer's magic bytes. Never consulted for dispatch.
pub fn sniff_content(data: &[u8]) -> Option<ContentHint> {
    infer::get(data).map(|kind| ContentHint {
        mime: kind.mime_type().to_string(),
        extension: kind.extension().to_string(),
    })
}

/// Whether a content hint contradicts the dispatched format.
///
/// DOCX packages are ZIP archives, so a generic zip hint is compatible with
/// a DOCX dispatch. An Unknown dispatch never conflicts — there was no
/// declared type to contradict.
pub fn content_conflicts(format: DetectedFormat, hint: &ContentHint) -> bool {
    let compatible: &[&str] = match format {
        DetectedFormat::Jpeg => &["image/jpeg"],
        DetectedFormat::Png => &["image/png"],
        DetectedFormat::Pdf => &["application/pdf"],
        DetectedFormat::Docx => &[DOCX_MIME, "application/zip"],
        DetectedFormat::Unknown => return false,
    };
    !compatible.iter().any(|m| hint.mime.eq_ignore_ascii_case(m))
}
