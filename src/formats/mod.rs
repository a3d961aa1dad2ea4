//! Format-specific structural parsers.
//!
//! One parser per file family, each returning a [`ParsedFile`]: typed
//! metadata, ordered warnings, and (for container formats) the structural
//! layout. Parsers are total over untrusted input — internal decode
//! failures become warnings, never errors — and pluggable at three narrow
//! capability seams: image tag decoding, PDF object access, and archive
//! reading.

pub mod docx;
pub mod exif;
pub mod image;
pub mod pdf;
pub mod png;
pub mod xml;
pub mod zip;

use crate::analysis::report::{FileKind, Metadata, StructuralChunk};
use crate::detect::DetectedFormat;
use exif::{ImageTagDecoder, TiffExifDecoder};
use pdf::{PdfObjectReader, TrailerInfoReader};
use zip::{PackageReader, ZipPackageReader};

/// The outcome of one format parser: everything the orchestrator folds
/// into the final report besides the buffer-wide statistics.
#[derive(Debug)]
pub struct ParsedFile {
    pub kind: FileKind,
    pub metadata: Metadata,
    pub warnings: Vec<String>,
    pub chunks: Option<Vec<StructuralChunk>>,
    pub xml_dump: Option<String>,
}

/// Generic fallback for unmatched formats: an explicit unsupported-format
/// signal, not an error — empty metadata, no warnings.
pub fn parse_generic() -> ParsedFile {
    ParsedFile {
        kind: FileKind::Unknown,
        metadata: Metadata::unsupported(),
        warnings: Vec::new(),
        chunks: None,
        xml_dump: None,
    }
}

/// The pluggable capability implementations used by the parsers.
pub struct Capabilities {
    pub image_tags: Box<dyn ImageTagDecoder + Send + Sync>,
    pub pdf_objects: Box<dyn PdfObjectReader + Send + Sync>,
    pub packages: Box<dyn PackageReader + Send + Sync>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            image_tags: Box::new(TiffExifDecoder),
            pdf_objects: Box::new(TrailerInfoReader),
            packages: Box::new(ZipPackageReader),
        }
    }
}

/// Run exactly one parser for the dispatched format.
pub fn parse_dispatched(
    format: DetectedFormat,
    data: &[u8],
    capabilities: &Capabilities,
) -> ParsedFile {
    match format {
        DetectedFormat::Jpeg => image::parse_image(data, capabilities.image_tags.as_ref()),
        DetectedFormat::Png => png::parse_png(data, capabilities.image_tags.as_ref()),
        DetectedFormat::Pdf => pdf::parse_pdf(data, capabilities.pdf_objects.as_ref()),
        DetectedFormat::Docx => docx::parse_docx(data, capabilities.packages.as_ref()),
        DetectedFormat::Unknown => parse_generic(),
    }
}
