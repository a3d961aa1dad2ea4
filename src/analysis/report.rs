//! Report data types: the input descriptor, the per-format metadata trees,
//! and the immutable analysis result.
//!
//! All types serialize with serde. Tag trees use `BTreeMap` so repeated runs
//! over identical bytes produce byte-identical JSON — reproducible output is
//! part of the evidentiary contract.

use crate::hashing::FileHashes;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One file submitted for analysis: immutable bytes plus two optional
/// dispatch hints. The byte buffer is the sole source of truth and is
/// shared, never copied, across the parallel sub-analyses.
#[derive(Debug, Clone)]
pub struct FileInput {
    pub bytes: Bytes,
    /// Declared MIME type, used only for parser dispatch.
    pub mime: Option<String>,
    /// Original filename, used only as an extension fallback for dispatch.
    pub file_name: Option<String>,
}

impl FileInput {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            mime: None,
            file_name: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }
}

/// The file family the dispatcher routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileKind {
    Image,
    Png,
    Pdf,
    Docx,
    Unknown,
}

/// One decoded metadata tag: raw value plus a human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    pub value: String,
    pub description: String,
}

impl TagEntry {
    pub fn new(value: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            description: description.into(),
        }
    }
}

/// Namespaced image tag tree (EXIF / XMP / GPS).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagTree {
    pub exif: BTreeMap<String, TagEntry>,
    pub xmp: BTreeMap<String, TagEntry>,
    pub gps: BTreeMap<String, TagEntry>,
}

impl TagTree {
    pub fn is_empty(&self) -> bool {
        self.exif.is_empty() && self.xmp.is_empty() && self.gps.is_empty()
    }

    /// Raw value of an EXIF tag, if present.
    pub fn exif_value(&self, name: &str) -> Option<&str> {
        self.exif.get(name).map(|t| t.value.as_str())
    }

    /// Raw value of an XMP tag, if present.
    pub fn xmp_value(&self, name: &str) -> Option<&str> {
        self.xmp.get(name).map(|t| t.value.as_str())
    }
}

/// One structural unit of a container format, in on-disk order.
///
/// The sequence is never deduplicated or reordered: duplicate and
/// out-of-order chunks are themselves evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralChunk {
    pub name: String,
    pub size: u64,
    pub offset: u64,
}

/// PNG-specific metadata: IHDR dimensions plus the merged EXIF/XMP tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PngMetadata {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub image: TagTree,
}

/// PDF Info-dictionary fields. Everything is optional: a conforming PDF may
/// omit any of them, and a corrupt one yields an empty struct plus warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfMetadata {
    pub pages: Option<u32>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
}

/// `docProps/core.xml` fields of an OOXML package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreProperties {
    pub creator: Option<String>,
    pub last_modified_by: Option<String>,
    pub revision: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
    pub title: Option<String>,
    pub subject: Option<String>,
    pub description: Option<String>,
}

/// `docProps/app.xml` fields of an OOXML package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppProperties {
    pub template: Option<String>,
    pub total_time: Option<String>,
    pub pages: Option<String>,
    pub words: Option<String>,
    pub application: Option<String>,
    pub company: Option<String>,
    pub doc_security: Option<String>,
}

/// DOCX package properties. `custom` is the raw `docProps/custom.xml` text,
/// dumped without field extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocxMetadata {
    pub core: CoreProperties,
    pub app: AppProperties,
    pub custom: Option<String>,
}

/// Marker for formats the engine does not parse structurally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyMetadata {}

/// Format-dependent metadata: a tagged union keyed by the file type — the
/// four formats do not share a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metadata {
    Image(TagTree),
    Png(PngMetadata),
    Pdf(PdfMetadata),
    Docx(DocxMetadata),
    Unsupported(EmptyMetadata),
}

impl Metadata {
    pub fn unsupported() -> Self {
        Metadata::Unsupported(EmptyMetadata {})
    }
}

/// The complete, immutable result of analyzing one file.
///
/// Assembled all-or-nothing by the orchestrator; no partial report is ever
/// exposed even though individual parsers tolerate internal partial failure.
/// Not persisted by the engine — serialization and export are caller
/// concerns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub file_name: Option<String>,
    pub file_size: u64,
    pub file_type: FileKind,
    pub hashes: FileHashes,
    /// Shannon entropy of the whole file in bits/byte.
    pub entropy: f64,
    pub metadata: Metadata,
    /// Ordered, append-only during analysis, immutable once built.
    pub warnings: Vec<String>,
    /// On-disk structural layout, for container formats that expose one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<Vec<StructuralChunk>>,
    /// Raw text dump (XMP packet, OOXML part texts) when a parser produced one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml_dump: Option<String>,
    /// Printable strings in buffer order.
    pub strings: Vec<String>,
}

impl AnalysisReport {
    /// Wrap this report in the caller-stamped export envelope.
    pub fn into_envelope(
        self,
        session_id: impl Into<String>,
        analysis_time: DateTime<Utc>,
    ) -> ReportEnvelope {
        ReportEnvelope {
            session_id: session_id.into(),
            analysis_time,
            report: self,
        }
    }
}

/// The flat export structure of a finished analysis.
///
/// `session_id` and `analysis_time` are supplied by the caller, never
/// computed by the engine — the engine stays deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEnvelope {
    pub session_id: String,
    pub analysis_time: DateTime<Utc>,
    #[serde(flatten)]
    pub report: AnalysisReport,
}
