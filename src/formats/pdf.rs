//! PDF document-info parser and script heuristics.
//!
//! The Info dictionary is located through the last `/Info N G R` reference
//! in the file (incremental updates append, so the last one governs) and
//! decoded field by field; any structural failure is caught and reported as
//! a warning with empty metadata.
//!
//! The script and auto-action heuristics are substring matches over the
//! extracted printable strings, not a structural scan of the object graph:
//! they miss markers inside compressed or obfuscated streams and can
//! false-positive on literal text that merely mentions a marker. That
//! trade-off is intentional and documented behavior.

use crate::analysis::report::{FileKind, Metadata, PdfMetadata};
use crate::formats::ParsedFile;
use crate::strings::extract_printable_strings;
use aho_corasick::AhoCorasick;
use memchr::memmem;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use thiserror::Error;
use tracing::debug;

/// Recoverable PDF read failure; converted to a report warning.
#[derive(Debug, Error)]
pub enum PdfReadError {
    #[error("missing %PDF header")]
    NotPdf,
    #[error("no trailer with an /Info reference")]
    NoInfoReference,
    #[error("Info object {0} not found")]
    InfoObjectMissing(u32),
}

/// Narrow capability seam for document-object access.
pub trait PdfObjectReader {
    fn read_document_info(&self, data: &[u8]) -> Result<PdfMetadata, PdfReadError>;
}

/// Default reader: trailer scan → Info object → field extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrailerInfoReader;

static INFO_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/Info\s+(\d+)\s+(\d+)\s+R").unwrap());
static PAGE_OBJ_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/Type\s*/Page\b").unwrap());

/// Patterns 0–1 are JavaScript markers, 2–3 automatic-action markers.
static SCRIPT_MARKERS: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new(["/JavaScript", "/JS", "/OpenAction", "/AA"]).expect("static patterns")
});

impl PdfObjectReader for TrailerInfoReader {
    fn read_document_info(&self, data: &[u8]) -> Result<PdfMetadata, PdfReadError> {
        if !data.starts_with(b"%PDF") {
            return Err(PdfReadError::NotPdf);
        }

        let mut info = PdfMetadata {
            pages: count_pages(data),
            ..PdfMetadata::default()
        };

        let (obj_num, gen_num) = last_info_reference(data).ok_or(PdfReadError::NoInfoReference)?;
        let dict = find_object(data, obj_num, gen_num)
            .ok_or(PdfReadError::InfoObjectMissing(obj_num))?;

        info.title = dict_string(dict, b"/Title");
        info.author = dict_string(dict, b"/Author");
        info.subject = dict_string(dict, b"/Subject");
        info.keywords = dict_string(dict, b"/Keywords");
        info.creator = dict_string(dict, b"/Creator");
        info.producer = dict_string(dict, b"/Producer");
        info.creation_date = dict_string(dict, b"/CreationDate");
        info.modification_date = dict_string(dict, b"/ModDate");
        Ok(info)
    }
}

fn count_pages(data: &[u8]) -> Option<u32> {
    let n = PAGE_OBJ_RE.find_iter(data).count() as u32;
    (n > 0).then_some(n)
}

/// The last `/Info N G R` reference in the file.
fn last_info_reference(data: &[u8]) -> Option<(u32, u32)> {
    let caps = INFO_REF_RE.captures_iter(data).last()?;
    let num = std::str::from_utf8(caps.get(1)?.as_bytes()).ok()?.parse().ok()?;
    let gen = std::str::from_utf8(caps.get(2)?.as_bytes()).ok()?.parse().ok()?;
    Some((num, gen))
}

/// Body of object `N G` from `obj` to `endobj`.
fn find_object(data: &[u8], obj_num: u32, gen_num: u32) -> Option<&[u8]> {
    let header = format!("{} {} obj", obj_num, gen_num);
    let mut end_at = data.len();
    loop {
        let pos = memmem::rfind(&data[..end_at], header.as_bytes())?;
        // `4 0 obj` must not match the tail of `14 0 obj`.
        if pos > 0 && data[pos - 1].is_ascii_digit() {
            end_at = pos;
            continue;
        }
        let start = pos + header.len();
        let end = memmem::find(&data[start..], b"endobj")? + start;
        return Some(&data[start..end]);
    }
}

/// Value of a dictionary key holding a literal `(…)` or hex `<…>` string.
fn dict_string(dict: &[u8], key: &[u8]) -> Option<String> {
    let mut search_from = 0;
    while let Some(pos) = memmem::find(&dict[search_from..], key) {
        let after = search_from + pos + key.len();
        // Key must end here (`/Creator` must not match `/CreationDate`).
        match dict.get(after) {
            Some(b) if b.is_ascii_alphanumeric() => {
                search_from = after;
                continue;
            }
            _ => {}
        }
        let rest = &dict[after..];
        let value_start = rest.iter().position(|b| !b.is_ascii_whitespace())?;
        let rest = &rest[value_start..];
        return match rest.first()? {
            b'(' => Some(decode_literal_string(&rest[1..])),
            b'<' => Some(decode_hex_string(&rest[1..])),
            _ => None,
        };
    }
    None
}

/// Decode a PDF literal string up to its balanced closing parenthesis.
fn decode_literal_string(data: &[u8]) -> String {
    let mut bytes = Vec::new();
    let mut depth = 1usize;
    let mut i = 0usize;
    while i < data.len() {
        let b = data[i];
        match b {
            b'\\' if i + 1 < data.len() => {
                let esc = data[i + 1];
                let decoded = match esc {
                    b'n' => Some(b'\n'),
                    b'r' => Some(b'\r'),
                    b't' => Some(b'\t'),
                    b'(' | b')' | b'\\' => Some(esc),
                    b'0'..=b'7' => {
                        // Up to three octal digits.
                        let mut value = 0u32;
                        let mut taken = 0;
                        while taken < 3 {
                            match data.get(i + 1 + taken) {
                                Some(d @ b'0'..=b'7') => {
                                    value = value * 8 + (d - b'0') as u32;
                                    taken += 1;
                                }
                                _ => break,
                            }
                        }
                        i += taken - 1;
                        Some((value & 0xFF) as u8)
                    }
                    _ => None, // unknown escape: drop the backslash
                };
                if let Some(d) = decoded {
                    bytes.push(d);
                }
                i += 2;
            }
            b'(' => {
                depth += 1;
                bytes.push(b);
                i += 1;
            }
            b')' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
                bytes.push(b);
                i += 1;
            }
            _ => {
                bytes.push(b);
                i += 1;
            }
        }
    }
    decode_text_bytes(&bytes)
}

/// Decode a PDF hex string up to `>`.
fn decode_hex_string(data: &[u8]) -> String {
    let end = data.iter().position(|&b| b == b'>').unwrap_or(data.len());
    let mut digits: Vec<u8> = data[..end]
        .iter()
        .copied()
        .filter(|b| b.is_ascii_hexdigit())
        .collect();
    // An odd final digit is padded with zero per the PDF standard.
    if digits.len() % 2 == 1 {
        digits.push(b'0');
    }
    let bytes = hex::decode(&digits).unwrap_or_default();
    decode_text_bytes(&bytes)
}

/// PDF text strings are UTF-16BE when BOM-prefixed, byte text otherwise.
fn decode_text_bytes(bytes: &[u8]) -> String {
    if bytes.starts_with(&[0xFE, 0xFF]) {
        let (text, _, _) = encoding_rs::UTF_16BE.decode(&bytes[2..]);
        text.into_owned()
    } else {
        match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            // PDFDocEncoding is latin1-compatible for printable text.
            Err(_) => bytes.iter().map(|&b| b as char).collect(),
        }
    }
}

/// Locate the XMP metadata packet, when one exists.
fn xmp_packet(data: &[u8]) -> Option<String> {
    let start = memmem::find(data, b"<?xpacket begin")?;
    let end_marker = memmem::find(&data[start..], b"<?xpacket end")? + start;
    let close = memmem::find(&data[end_marker..], b"?>")? + end_marker + 2;
    Some(String::from_utf8_lossy(&data[start..close]).into_owned())
}

/// Parse a PDF file: Info-dictionary metadata plus script heuristics.
pub fn parse_pdf(data: &[u8], reader: &dyn PdfObjectReader) -> ParsedFile {
    let mut warnings = Vec::new();

    let metadata = match reader.read_document_info(data) {
        Ok(info) => info,
        Err(e) => {
            debug!(error = %e, "pdf info extraction failed");
            warnings.push(format!("PDF metadata could not be extracted: {}", e));
            PdfMetadata::default()
        }
    };

    if memmem::find(data, b"/Encrypt").is_some() {
        warnings.push(
            "Document declares encryption (/Encrypt); metadata may be incomplete".to_string(),
        );
    }

    // Independent rerun of the string extractor; the orchestrator's pass is
    // not reused here by design.
    let strings = extract_printable_strings(data, 4);
    let mut has_script = false;
    let mut has_auto_action = false;
    for s in &strings {
        for m in SCRIPT_MARKERS.find_iter(s) {
            match m.pattern().as_usize() {
                0 | 1 => has_script = true,
                _ => has_auto_action = true,
            }
        }
        if has_script && has_auto_action {
            break;
        }
    }
    if has_script {
        warnings.push(
            "Embedded JavaScript markers (/JavaScript or /JS) present — possible active content"
                .to_string(),
        );
    }
    if has_auto_action {
        warnings.push(
            "Automatic-action markers (/OpenAction or /AA) present — actions may run on open"
                .to_string(),
        );
    }

    ParsedFile {
        kind: FileKind::Pdf,
        metadata: Metadata::Pdf(metadata),
        warnings,
        chunks: None,
        xml_dump: xmp_packet(data),
    }
}
