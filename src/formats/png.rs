//! PNG structural parser.
//!
//! Walks the chunk stream exactly as laid out on disk and records every
//! chunk header it can read, including duplicates and anything trailing
//! IEND — layout anomalies are evidence, so the sequence is never
//! deduplicated or reordered. Chunk CRCs are verified when the bytes are
//! present; a short tail ends the walk without error.

use crate::analysis::report::{FileKind, Metadata, PngMetadata, StructuralChunk, TagTree};
use crate::formats::exif::ImageTagDecoder;
use crate::formats::image::apply_image_anomalies;
use crate::formats::ParsedFile;
use tracing::debug;

/// Minimum signature floor: the first four bytes of the PNG magic.
const PNG_MAGIC_FLOOR: [u8; 4] = [0x89, 0x50, 0x4E, 0x47];

struct ChunkWalk {
    chunks: Vec<StructuralChunk>,
    warnings: Vec<String>,
    width: Option<u32>,
    height: Option<u32>,
}

fn read_be_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Walk the chunk stream from offset 8.
///
/// Each entry is `length:u32be + type:4 ASCII + data + crc:4`; the record
/// is taken from the header alone, so a chunk whose data is truncated is
/// still recorded. The walk stops when fewer than 8 bytes remain.
fn walk_chunks(data: &[u8]) -> ChunkWalk {
    let mut walk = ChunkWalk {
        chunks: Vec::new(),
        warnings: Vec::new(),
        width: None,
        height: None,
    };
    let mut saw_iend = false;
    let mut offset = 8usize;

    while data.len().saturating_sub(offset) >= 8 {
        let length = read_be_u32(data, offset) as usize;
        let chunk_type = &data[offset + 4..offset + 8];
        let name = String::from_utf8_lossy(chunk_type).into_owned();

        walk.chunks.push(StructuralChunk {
            name: name.clone(),
            size: length as u64,
            offset: offset as u64,
        });

        if let Some(chunk_data) = data.get(offset + 8..offset + 8 + length) {
            if chunk_type == b"IHDR" && chunk_data.len() >= 8 {
                walk.width = Some(read_be_u32(chunk_data, 0));
                walk.height = Some(read_be_u32(chunk_data, 4));
            }
            if let Some(crc_cell) = data.get(offset + 8 + length..offset + 12 + length) {
                let stored = u32::from_be_bytes([crc_cell[0], crc_cell[1], crc_cell[2], crc_cell[3]]);
                let mut hasher = crc32fast::Hasher::new();
                hasher.update(chunk_type);
                hasher.update(chunk_data);
                if hasher.finalize() != stored {
                    walk.warnings.push(format!(
                        "CRC mismatch in {} chunk at offset {}",
                        name, offset
                    ));
                }
            }
        }
        if chunk_type == b"IEND" {
            saw_iend = true;
        }

        let Some(next) = offset.checked_add(12 + length) else {
            break;
        };
        offset = next;
    }

    if !saw_iend {
        walk.warnings
            .push("Chunk stream ends without an IEND chunk (truncated or malformed)".to_string());
    }
    walk
}

/// Parse a PNG file: structural chunk layout plus merged EXIF/XMP metadata.
pub fn parse_png(data: &[u8], decoder: &dyn ImageTagDecoder) -> ParsedFile {
    let mut warnings = Vec::new();

    if data.len() < 4 || data[..4] != PNG_MAGIC_FLOOR {
        warnings.push(
            "File does not start with the PNG signature; structural walk is best-effort"
                .to_string(),
        );
    }

    let walk = walk_chunks(data);
    debug!(chunks = walk.chunks.len(), "png chunk walk complete");

    let image = match decoder.decode_image_tags(data) {
        Ok(tree) => tree,
        Err(e) => {
            warnings.push(format!("Image metadata could not be decoded: {}", e));
            TagTree::default()
        }
    };
    apply_image_anomalies(&image, &mut warnings);
    warnings.extend(walk.warnings);

    ParsedFile {
        kind: FileKind::Png,
        metadata: Metadata::Png(PngMetadata {
            width: walk.width,
            height: walk.height,
            image,
        }),
        warnings,
        chunks: Some(walk.chunks),
        xml_dump: None,
    }
}
