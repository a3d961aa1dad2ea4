//! Image (JPEG) metadata parser.
//!
//! Tag decoding is delegated to the [`ImageTagDecoder`] capability; a decode
//! failure is recorded as a warning and analysis continues with an empty
//! tree. Anomaly rules run over the decoded tree: a tool signature names the
//! software, and a capture timestamp that postdates the modification
//! timestamp is flagged as a tampering indicator.

use crate::analysis::report::{FileKind, Metadata, TagTree};
use crate::formats::exif::ImageTagDecoder;
use crate::formats::ParsedFile;
use chrono::NaiveDateTime;
use tracing::debug;

/// EXIF timestamp layout, e.g. `2023:05:11 09:30:00`.
const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

pub(crate) fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), EXIF_DATETIME_FORMAT).ok()
}

/// Anomaly rules shared by the JPEG and PNG parsers.
///
/// Timestamps are compared as parsed values, not raw strings, so a
/// malformed or locale-formatted timestamp is never compared at all.
pub(crate) fn apply_image_anomalies(tree: &TagTree, warnings: &mut Vec<String>) {
    if let Some(tool) = tree.exif_value("Software") {
        warnings.push(format!(
            "Image carries a tool signature (EXIF Software): {}",
            tool
        ));
    }
    if let Some(tool) = tree.xmp_value("CreatorTool") {
        warnings.push(format!(
            "Image carries a tool signature (XMP CreatorTool): {}",
            tool
        ));
    }
    if let (Some(original), Some(modified)) = (
        tree.exif_value("DateTimeOriginal"),
        tree.exif_value("DateTime"),
    ) {
        if let (Some(o), Some(m)) = (
            parse_exif_datetime(original),
            parse_exif_datetime(modified),
        ) {
            if o > m {
                warnings.push(format!(
                    "Temporal inconsistency: capture timestamp ({}) is after modification timestamp ({})",
                    original, modified
                ));
            }
        }
    }
}

/// Parse an image file's EXIF/XMP metadata.
pub fn parse_image(data: &[u8], decoder: &dyn ImageTagDecoder) -> ParsedFile {
    let mut warnings = Vec::new();
    let tree = match decoder.decode_image_tags(data) {
        Ok(tree) => tree,
        Err(e) => {
            debug!(error = %e, "image tag decode failed");
            warnings.push(format!("Image metadata could not be decoded: {}", e));
            TagTree::default()
        }
    };
    apply_image_anomalies(&tree, &mut warnings);
    ParsedFile {
        kind: FileKind::Image,
        metadata: Metadata::Image(tree),
        warnings,
        chunks: None,
        xml_dump: None,
    }
}
