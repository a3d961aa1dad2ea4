//! DOCX (OOXML package) property parser.
//!
//! Opens the file as a ZIP package through the [`PackageReader`] capability
//! and extracts the document property parts. Field extraction is a
//! first-match tag-name lookup; a missing tag is simply `None`. Every part
//! that is present is appended, path-labeled, to a cumulative raw dump.
//! Any archive or XML failure becomes a warning and whatever was already
//! extracted is preserved.

use crate::analysis::report::{AppProperties, CoreProperties, DocxMetadata, FileKind, Metadata};
use crate::formats::xml::first_tag_text;
use crate::formats::zip::{Package, PackageReader};
use crate::formats::ParsedFile;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

const CORE_PART: &str = "docProps/core.xml";
const APP_PART: &str = "docProps/app.xml";
const CUSTOM_PART: &str = "docProps/custom.xml";

/// Parse a W3CDTF / ISO-8601 timestamp as used by `dcterms:created`.
///
/// Accepts the full RFC 3339 form, a naive datetime, or a bare date;
/// anything else is treated as unparseable and excluded from comparison.
pub(crate) fn parse_w3cdtf(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

fn parse_core(xml: &str) -> CoreProperties {
    CoreProperties {
        creator: first_tag_text(xml, "creator"),
        last_modified_by: first_tag_text(xml, "lastModifiedBy"),
        revision: first_tag_text(xml, "revision"),
        created: first_tag_text(xml, "created"),
        modified: first_tag_text(xml, "modified"),
        title: first_tag_text(xml, "title"),
        subject: first_tag_text(xml, "subject"),
        description: first_tag_text(xml, "description"),
    }
}

fn parse_app(xml: &str) -> AppProperties {
    AppProperties {
        template: first_tag_text(xml, "Template"),
        total_time: first_tag_text(xml, "TotalTime"),
        pages: first_tag_text(xml, "Pages"),
        words: first_tag_text(xml, "Words"),
        application: first_tag_text(xml, "Application"),
        company: first_tag_text(xml, "Company"),
        doc_security: first_tag_text(xml, "DocSecurity"),
    }
}

/// Read one package part; present parts are appended to the dump.
fn read_part(
    pkg: &Package<'_>,
    name: &str,
    dump: &mut String,
    warnings: &mut Vec<String>,
) -> Option<String> {
    match pkg.read(name) {
        Ok(Some(bytes)) => {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            dump.push_str("-- ");
            dump.push_str(name);
            dump.push_str(" --\n");
            dump.push_str(&text);
            dump.push('\n');
            Some(text)
        }
        Ok(None) => None,
        Err(e) => {
            warnings.push(format!("Could not read {}: {}", name, e));
            None
        }
    }
}

/// Parse a DOCX file's package properties.
pub fn parse_docx(data: &[u8], reader: &dyn PackageReader) -> ParsedFile {
    let mut warnings = Vec::new();
    let mut metadata = DocxMetadata::default();
    let mut dump = String::new();

    match reader.open(data) {
        Ok(pkg) => {
            debug!(entries = pkg.entry_names().count(), "docx package opened");
            if let Some(xml) = read_part(&pkg, CORE_PART, &mut dump, &mut warnings) {
                metadata.core = parse_core(&xml);
            }
            if let Some(xml) = read_part(&pkg, APP_PART, &mut dump, &mut warnings) {
                metadata.app = parse_app(&xml);
            }
            // custom.xml is raw-dumped only, never field-extracted.
            metadata.custom = read_part(&pkg, CUSTOM_PART, &mut dump, &mut warnings);
        }
        Err(e) => {
            warnings.push(format!("DOCX package could not be opened: {}", e));
        }
    }

    if let (Some(created), Some(modified)) = (
        metadata.core.created.as_deref().and_then(parse_w3cdtf),
        metadata.core.modified.as_deref().and_then(parse_w3cdtf),
    ) {
        if created > modified {
            warnings.push(format!(
                "Temporal inconsistency: document created ({}) after last modification ({})",
                metadata.core.created.as_deref().unwrap_or_default(),
                metadata.core.modified.as_deref().unwrap_or_default(),
            ));
        }
    }

    ParsedFile {
        kind: FileKind::Docx,
        metadata: Metadata::Docx(metadata),
        warnings,
        chunks: None,
        xml_dump: (!dump.is_empty()).then_some(dump),
    }
}
