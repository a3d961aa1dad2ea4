//! EXIF/XMP tag decoding capability.
//!
//! `TiffExifDecoder` is the default [`ImageTagDecoder`]: a bounds-checked
//! TIFF IFD walker plus carrier handling for JPEG APP1 segments, PNG
//! `eXIf`/`iTXt` chunks and bare TIFF streams. It never reads outside the
//! buffer and never recurses past the Exif/GPS sub-IFDs, so adversarial tag
//! offsets can only truncate the tag tree, not loop the walk.

use crate::analysis::report::{TagEntry, TagTree};
use std::borrow::Cow;
use thiserror::Error;

/// Recoverable decode failure; converted to a report warning by the owning
/// parser.
#[derive(Debug, Error)]
pub enum TagDecodeError {
    #[error("unrecognized image container")]
    UnrecognizedContainer,
    #[error("malformed TIFF header")]
    MalformedTiff,
}

/// Narrow capability seam for image metadata decoding. Any conformant
/// implementation substitutes without touching orchestration.
pub trait ImageTagDecoder {
    fn decode_image_tags(&self, data: &[u8]) -> Result<TagTree, TagDecodeError>;
}

/// Default decoder: hand-rolled TIFF/EXIF + XMP extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiffExifDecoder;

impl ImageTagDecoder for TiffExifDecoder {
    fn decode_image_tags(&self, data: &[u8]) -> Result<TagTree, TagDecodeError> {
        let mut tree = TagTree::default();
        if data.starts_with(&[0xFF, 0xD8]) {
            decode_jpeg_segments(data, &mut tree);
            Ok(tree)
        } else if data.starts_with(&PNG_MAGIC) {
            decode_png_carriers(data, &mut tree);
            Ok(tree)
        } else if read_tiff_header(data).is_some() {
            parse_tiff(data, &mut tree)?;
            Ok(tree)
        } else {
            Err(TagDecodeError::UnrecognizedContainer)
        }
    }
}

const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

const EXIF_APP1_HEADER: &[u8] = b"Exif\0\0";
const XMP_APP1_HEADER: &[u8] = b"http://ns.adobe.com/xap/1.0/\0";
const XMP_ITXT_KEYWORD: &[u8] = b"XML:com.adobe.xmp";

// TIFF field types.
const TYPE_BYTE: u16 = 1;
const TYPE_ASCII: u16 = 2;
const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;
const TYPE_RATIONAL: u16 = 5;
const TYPE_UNDEFINED: u16 = 7;

const IFD_ENTRY_LEN: usize = 12;
/// Entry-count ceiling per IFD; real cameras write a few dozen.
const MAX_IFD_ENTRIES: usize = 512;

// IFD0 pointers to the sub-IFDs we follow.
const TAG_EXIF_IFD: u16 = 0x8769;
const TAG_GPS_IFD: u16 = 0x8825;

/// (tag, name, description) for the EXIF namespace, IFD0 and Exif sub-IFD.
const EXIF_TAGS: &[(u16, &str, &str)] = &[
    (0x010F, "Make", "Camera or device manufacturer"),
    (0x0110, "Model", "Camera or device model"),
    (0x0112, "Orientation", "Image orientation code"),
    (0x0131, "Software", "Tool that last saved the image"),
    (0x0132, "DateTime", "File modification timestamp"),
    (0x013B, "Artist", "Image author"),
    (0x8298, "Copyright", "Copyright notice"),
    (0x829A, "ExposureTime", "Exposure time in seconds"),
    (0x829D, "FNumber", "F-number (aperture)"),
    (0x8827, "ISOSpeedRatings", "ISO speed rating"),
    (0x9003, "DateTimeOriginal", "Original capture timestamp"),
    (0x9004, "DateTimeDigitized", "Digitization timestamp"),
    (0x920A, "FocalLength", "Focal length in millimetres"),
    (0xA434, "LensModel", "Lens model"),
];

/// XMP properties looked up in the packet, attribute or element form.
const XMP_PROPS: &[(&str, &str)] = &[
    ("CreatorTool", "Tool that created the document"),
    ("CreateDate", "Document creation timestamp"),
    ("ModifyDate", "Document modification timestamp"),
    ("MetadataDate", "Metadata modification timestamp"),
];

#[derive(Debug, Clone, Copy)]
enum ByteOrder {
    Le,
    Be,
}

impl ByteOrder {
    #[inline]
    fn u16_at(self, data: &[u8], offset: usize) -> Option<u16> {
        let b = data.get(offset..offset + 2)?;
        Some(match self {
            ByteOrder::Le => u16::from_le_bytes([b[0], b[1]]),
            ByteOrder::Be => u16::from_be_bytes([b[0], b[1]]),
        })
    }

    #[inline]
    fn u32_at(self, data: &[u8], offset: usize) -> Option<u32> {
        let b = data.get(offset..offset + 4)?;
        Some(match self {
            ByteOrder::Le => u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            ByteOrder::Be => u32::from_be_bytes([b[0], b[1], b[2], b[3]]),
        })
    }
}

fn type_unit_size(field_type: u16) -> Option<usize> {
    match field_type {
        TYPE_BYTE | TYPE_ASCII | TYPE_UNDEFINED => Some(1),
        TYPE_SHORT => Some(2),
        TYPE_LONG => Some(4),
        TYPE_RATIONAL => Some(8),
        _ => None,
    }
}

/// Check the TIFF header and return (byte order, IFD0 offset).
fn read_tiff_header(data: &[u8]) -> Option<(ByteOrder, u32)> {
    if data.len() < 8 {
        return None;
    }
    let bo = match &data[..2] {
        b"II" => ByteOrder::Le,
        b"MM" => ByteOrder::Be,
        _ => return None,
    };
    if bo.u16_at(data, 2)? != 0x002A {
        return None;
    }
    let offset = bo.u32_at(data, 4)?;
    Some((bo, offset))
}

#[derive(Debug, Clone, Copy)]
struct IfdEntry {
    tag: u16,
    field_type: u16,
    count: u32,
    /// Offset of the 4-byte value/offset cell within the buffer.
    cell_offset: usize,
}

/// The value bytes of an entry: inline in the 4-byte cell when they fit,
/// at the referenced offset otherwise. `None` when out of bounds.
fn value_bytes<'a>(data: &'a [u8], bo: ByteOrder, entry: &IfdEntry) -> Option<&'a [u8]> {
    let unit = type_unit_size(entry.field_type)?;
    let total = unit.checked_mul(entry.count as usize)?;
    if total <= 4 {
        data.get(entry.cell_offset..entry.cell_offset + total)
    } else {
        let off = bo.u32_at(data, entry.cell_offset)? as usize;
        data.get(off..off.checked_add(total)?)
    }
}

fn ascii_value(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim().to_string()
}

fn rational_at(bo: ByteOrder, bytes: &[u8], index: usize) -> Option<(u32, u32)> {
    let num = bo.u32_at(bytes, index * 8)?;
    let den = bo.u32_at(bytes, index * 8 + 4)?;
    Some((num, den))
}

/// Render one entry's value as a display string.
fn render_value(data: &[u8], bo: ByteOrder, entry: &IfdEntry) -> Option<String> {
    let bytes = value_bytes(data, bo, entry)?;
    match entry.field_type {
        TYPE_ASCII => {
            let v = ascii_value(bytes);
            (!v.is_empty()).then_some(v)
        }
        TYPE_BYTE => bytes.first().map(|b| b.to_string()),
        TYPE_SHORT => {
            let n = (entry.count as usize).min(8);
            let vals: Vec<String> = (0..n)
                .filter_map(|i| bo.u16_at(bytes, i * 2))
                .map(|v| v.to_string())
                .collect();
            (!vals.is_empty()).then(|| vals.join(", "))
        }
        TYPE_LONG => {
            let n = (entry.count as usize).min(8);
            let vals: Vec<String> = (0..n)
                .filter_map(|i| bo.u32_at(bytes, i * 4))
                .map(|v| v.to_string())
                .collect();
            (!vals.is_empty()).then(|| vals.join(", "))
        }
        TYPE_RATIONAL => {
            let n = (entry.count as usize).min(4);
            let vals: Vec<String> = (0..n)
                .filter_map(|i| rational_at(bo, bytes, i))
                .map(|(num, den)| format!("{}/{}", num, den))
                .collect();
            (!vals.is_empty()).then(|| vals.join(", "))
        }
        _ => None,
    }
}

/// Walk one IFD and hand every in-bounds entry to `visit`.
fn walk_ifd(data: &[u8], bo: ByteOrder, ifd_offset: u32, visit: &mut dyn FnMut(IfdEntry)) {
    let offset = ifd_offset as usize;
    let Some(num_entries) = bo.u16_at(data, offset) else {
        return;
    };
    let num_entries = (num_entries as usize).min(MAX_IFD_ENTRIES);
    let entries_start = offset + 2;
    for i in 0..num_entries {
        let e = entries_start + i * IFD_ENTRY_LEN;
        let (Some(tag), Some(field_type), Some(count)) = (
            bo.u16_at(data, e),
            bo.u16_at(data, e + 2),
            bo.u32_at(data, e + 4),
        ) else {
            return; // truncated entry table
        };
        visit(IfdEntry {
            tag,
            field_type,
            count,
            cell_offset: e + 8,
        });
    }
}

/// Parse a TIFF stream into the exif/gps namespaces of `tree`.
///
/// Best-effort: a truncated entry table ends the walk with whatever was
/// collected; only a bad header is an error.
fn parse_tiff(data: &[u8], tree: &mut TagTree) -> Result<(), TagDecodeError> {
    let (bo, ifd0) = read_tiff_header(data).ok_or(TagDecodeError::MalformedTiff)?;

    let mut exif_ifd: Option<u32> = None;
    let mut gps_ifd: Option<u32> = None;

    let collect = |entry: IfdEntry, tree: &mut TagTree| {
        if let Some(&(_, name, desc)) = EXIF_TAGS.iter().find(|(t, _, _)| *t == entry.tag) {
            if let Some(value) = render_value(data, bo, &entry) {
                tree.exif
                    .entry(name.to_string())
                    .or_insert_with(|| TagEntry::new(value, desc));
            }
        }
    };

    walk_ifd(data, bo, ifd0, &mut |entry| {
        match entry.tag {
            TAG_EXIF_IFD => exif_ifd = bo.u32_at(data, entry.cell_offset),
            TAG_GPS_IFD => gps_ifd = bo.u32_at(data, entry.cell_offset),
            _ => collect(entry, tree),
        };
    });
    if let Some(off) = exif_ifd {
        walk_ifd(data, bo, off, &mut |entry| collect(entry, tree));
    }
    if let Some(off) = gps_ifd {
        collect_gps(data, bo, off, tree);
    }
    Ok(())
}

// GPS sub-IFD tags.
const TAG_GPS_LAT_REF: u16 = 0x0001;
const TAG_GPS_LAT: u16 = 0x0002;
const TAG_GPS_LON_REF: u16 = 0x0003;
const TAG_GPS_LON: u16 = 0x0004;
const TAG_GPS_ALT_REF: u16 = 0x0005;
const TAG_GPS_ALT: u16 = 0x0006;

/// Fold a degrees/minutes/seconds rational triplet to decimal degrees.
fn dms_to_degrees(bo: ByteOrder, bytes: &[u8]) -> Option<f64> {
    let mut parts = [0f64; 3];
    for (i, part) in parts.iter_mut().enumerate() {
        let (num, den) = rational_at(bo, bytes, i)?;
        if den == 0 {
            return None;
        }
        *part = num as f64 / den as f64;
    }
    Some(parts[0] + parts[1] / 60.0 + parts[2] / 3600.0)
}

fn collect_gps(data: &[u8], bo: ByteOrder, ifd_offset: u32, tree: &mut TagTree) {
    let mut lat: Option<f64> = None;
    let mut lat_ref: Option<String> = None;
    let mut lon: Option<f64> = None;
    let mut lon_ref: Option<String> = None;
    let mut alt: Option<(u32, u32)> = None;
    let mut alt_below_sea: bool = false;

    walk_ifd(data, bo, ifd_offset, &mut |entry| {
        let Some(bytes) = value_bytes(data, bo, &entry) else {
            return;
        };
        match entry.tag {
            TAG_GPS_LAT_REF => lat_ref = Some(ascii_value(bytes)),
            TAG_GPS_LON_REF => lon_ref = Some(ascii_value(bytes)),
            TAG_GPS_LAT if entry.count == 3 => lat = dms_to_degrees(bo, bytes),
            TAG_GPS_LON if entry.count == 3 => lon = dms_to_degrees(bo, bytes),
            TAG_GPS_ALT_REF => alt_below_sea = bytes.first() == Some(&1),
            TAG_GPS_ALT => alt = rational_at(bo, bytes, 0),
            _ => {}
        }
    });

    if let Some(mut degrees) = lat {
        if lat_ref.as_deref() == Some("S") {
            degrees = -degrees;
        }
        tree.gps.insert(
            "GPSLatitude".to_string(),
            TagEntry::new(format!("{:.6}", degrees), "Latitude in decimal degrees"),
        );
    }
    if let Some(mut degrees) = lon {
        if lon_ref.as_deref() == Some("W") {
            degrees = -degrees;
        }
        tree.gps.insert(
            "GPSLongitude".to_string(),
            TagEntry::new(format!("{:.6}", degrees), "Longitude in decimal degrees"),
        );
    }
    if let Some((num, den)) = alt {
        if den != 0 {
            let mut metres = num as f64 / den as f64;
            if alt_below_sea {
                metres = -metres;
            }
            tree.gps.insert(
                "GPSAltitude".to_string(),
                TagEntry::new(format!("{:.1}", metres), "Altitude in metres"),
            );
        }
    }
}

/// Walk JPEG marker segments and decode APP1 Exif/XMP payloads.
fn decode_jpeg_segments(data: &[u8], tree: &mut TagTree) {
    let mut i = 2; // past SOI
    while i + 4 <= data.len() {
        if data[i] != 0xFF {
            break;
        }
        let marker = data[i + 1];
        match marker {
            // Standalone markers without a length field.
            0x01 | 0xD0..=0xD8 => {
                i += 2;
                continue;
            }
            // EOI, or SOS: entropy-coded data follows, no more segments.
            0xD9 | 0xDA => break,
            _ => {}
        }
        let Some(len) = data
            .get(i + 2..i + 4)
            .map(|b| u16::from_be_bytes([b[0], b[1]]) as usize)
        else {
            break;
        };
        if len < 2 {
            break;
        }
        let Some(segment) = data.get(i + 4..i + 2 + len) else {
            break;
        };
        if marker == 0xE1 {
            if let Some(tiff) = segment.strip_prefix(EXIF_APP1_HEADER) {
                let _ = parse_tiff(tiff, tree);
            } else if let Some(packet) = segment.strip_prefix(XMP_APP1_HEADER) {
                parse_xmp(packet, tree);
            }
        }
        i += 2 + len;
    }
}

/// Walk PNG chunks and decode the eXIf and XMP iTXt carriers.
fn decode_png_carriers(data: &[u8], tree: &mut TagTree) {
    let mut offset = 8usize;
    while data.len().saturating_sub(offset) >= 8 {
        let len = u32::from_be_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]) as usize;
        let chunk_type = &data[offset + 4..offset + 8];
        let Some(chunk_data) = data.get(offset + 8..offset + 8 + len) else {
            break;
        };
        match chunk_type {
            b"eXIf" => {
                let _ = parse_tiff(chunk_data, tree);
            }
            b"iTXt" => {
                if let Some(packet) = itxt_xmp_payload(chunk_data) {
                    parse_xmp(packet, tree);
                }
            }
            b"IEND" => break,
            _ => {}
        }
        offset += 12 + len;
    }
}

/// Uncompressed XMP payload of an iTXt chunk, when the keyword matches.
fn itxt_xmp_payload(chunk: &[u8]) -> Option<&[u8]> {
    let keyword_end = chunk.iter().position(|&b| b == 0)?;
    if &chunk[..keyword_end] != XMP_ITXT_KEYWORD {
        return None;
    }
    let compression_flag = *chunk.get(keyword_end + 1)?;
    if compression_flag != 0 {
        return None;
    }
    // Skip compression method, then the two NUL-terminated text fields.
    let mut i = keyword_end + 3;
    for _ in 0..2 {
        let nul = chunk[i.min(chunk.len())..].iter().position(|&b| b == 0)?;
        i += nul + 1;
    }
    chunk.get(i..)
}

/// Pull the known XMP properties out of a packet.
fn parse_xmp(raw: &[u8], tree: &mut TagTree) {
    let xml: Cow<'_, str> = String::from_utf8_lossy(raw);
    for &(prop, desc) in XMP_PROPS {
        let value = crate::formats::xml::first_attr_value(&xml, prop)
            .or_else(|| crate::formats::xml::first_tag_text(&xml, prop))
            .filter(|v| !v.is_empty());
        if let Some(value) = value {
            tree.xmp
                .entry(prop.to_string())
                .or_insert_with(|| TagEntry::new(value, desc));
        }
    }
}
