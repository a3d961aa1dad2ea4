//! Minimal ZIP package reader.
//!
//! Enough of the format to open an OOXML package entirely in memory: the
//! End of Central Directory record is located by scanning backwards, the
//! central directory enumerates the entries, and individual entries are
//! read through their local headers. Stored and deflate entries are
//! supported; everything is bounds-checked against the buffer and entry
//! CRCs are verified after decompression.

use flate2::read::DeflateDecoder;
use std::io::Read;
use thiserror::Error;

const EOCD_SIG: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];
const CENTRAL_SIG: [u8; 4] = [0x50, 0x4B, 0x01, 0x02];
const LOCAL_SIG: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// The EOCD record sits in the last 64KiB + 22 bytes of the file.
const EOCD_SEARCH_WINDOW: usize = 66_000;
/// Ceiling on a single decompressed entry; OOXML property parts are tiny.
const MAX_ENTRY_SIZE: u64 = 64 * 1024 * 1024;

/// Recoverable package failure; converted to a report warning by the
/// owning parser.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("not a ZIP archive (no end-of-central-directory record)")]
    NoEndOfCentralDirectory,
    #[error("central directory out of bounds")]
    CentralDirectoryOutOfBounds,
    #[error("corrupt entry {name}: {reason}")]
    CorruptEntry { name: String, reason: String },
    #[error("entry {name} uses unsupported compression method {method}")]
    UnsupportedCompression { name: String, method: u16 },
    #[error("entry {name} exceeds the {limit}-byte decompression ceiling")]
    EntryTooLarge { name: String, limit: u64 },
}

/// Narrow capability seam for archive reading.
pub trait PackageReader {
    fn open<'a>(&self, data: &'a [u8]) -> Result<Package<'a>, PackageError>;
}

/// Default reader over the in-memory buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipPackageReader;

impl PackageReader for ZipPackageReader {
    fn open<'a>(&self, data: &'a [u8]) -> Result<Package<'a>, PackageError> {
        Package::parse(data)
    }
}

#[derive(Debug, Clone)]
struct EntryRecord {
    name: String,
    method: u16,
    crc32: u32,
    compressed_size: u64,
    uncompressed_size: u64,
    local_header_offset: u64,
}

/// An opened ZIP package borrowing the file buffer.
#[derive(Debug)]
pub struct Package<'a> {
    data: &'a [u8],
    entries: Vec<EntryRecord>,
}

fn le_u16(data: &[u8], offset: usize) -> Option<u16> {
    data.get(offset..offset + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
}

fn le_u32(data: &[u8], offset: usize) -> Option<u32> {
    data.get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

impl<'a> Package<'a> {
    /// Parse the central directory of an in-memory archive.
    pub fn parse(data: &'a [u8]) -> Result<Self, PackageError> {
        let eocd = find_eocd(data).ok_or(PackageError::NoEndOfCentralDirectory)?;
        let entry_count = le_u16(data, eocd + 10).unwrap_or(0) as usize;
        let cd_offset = le_u32(data, eocd + 16).unwrap_or(0) as usize;
        if cd_offset > data.len() {
            return Err(PackageError::CentralDirectoryOutOfBounds);
        }

        let mut entries = Vec::with_capacity(entry_count.min(1024));
        let mut offset = cd_offset;
        for _ in 0..entry_count {
            let Some(sig) = data.get(offset..offset + 4) else {
                break; // truncated directory: keep what we have
            };
            if sig != CENTRAL_SIG {
                break;
            }
            let method = le_u16(data, offset + 10).unwrap_or(0);
            let crc32 = le_u32(data, offset + 16).unwrap_or(0);
            let compressed_size = le_u32(data, offset + 20).unwrap_or(0) as u64;
            let uncompressed_size = le_u32(data, offset + 24).unwrap_or(0) as u64;
            let name_len = le_u16(data, offset + 28).unwrap_or(0) as usize;
            let extra_len = le_u16(data, offset + 30).unwrap_or(0) as usize;
            let comment_len = le_u16(data, offset + 32).unwrap_or(0) as usize;
            let local_header_offset = le_u32(data, offset + 42).unwrap_or(0) as u64;
            let Some(name_bytes) = data.get(offset + 46..offset + 46 + name_len) else {
                break;
            };
            entries.push(EntryRecord {
                name: String::from_utf8_lossy(name_bytes).into_owned(),
                method,
                crc32,
                compressed_size,
                uncompressed_size,
                local_header_offset,
            });
            offset += 46 + name_len + extra_len + comment_len;
        }
        Ok(Self { data, entries })
    }

    /// Entry names in central-directory order.
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Read and decompress one entry by exact name.
    ///
    /// `Ok(None)` when the entry does not exist — an absent part is not an
    /// error for OOXML packages.
    pub fn read(&self, name: &str) -> Result<Option<Vec<u8>>, PackageError> {
        let Some(entry) = self.entries.iter().find(|e| e.name == name) else {
            return Ok(None);
        };
        if entry.uncompressed_size > MAX_ENTRY_SIZE {
            return Err(PackageError::EntryTooLarge {
                name: entry.name.clone(),
                limit: MAX_ENTRY_SIZE,
            });
        }

        let corrupt = |reason: &str| PackageError::CorruptEntry {
            name: entry.name.clone(),
            reason: reason.to_string(),
        };

        let lho = entry.local_header_offset as usize;
        if self.data.get(lho..lho + 4).map(|s| s != LOCAL_SIG).unwrap_or(true) {
            return Err(corrupt("bad local header signature"));
        }
        // Local name/extra lengths may differ from the central directory's.
        let name_len = le_u16(self.data, lho + 26).ok_or_else(|| corrupt("truncated header"))? as usize;
        let extra_len = le_u16(self.data, lho + 28).ok_or_else(|| corrupt("truncated header"))? as usize;
        let data_start = lho + 30 + name_len + extra_len;
        let data_end = data_start
            .checked_add(entry.compressed_size as usize)
            .ok_or_else(|| corrupt("entry size overflow"))?;
        let raw = self
            .data
            .get(data_start..data_end)
            .ok_or_else(|| corrupt("entry data out of bounds"))?;

        let bytes = match entry.method {
            0 => raw.to_vec(),
            8 => {
                let mut decoder = DeflateDecoder::new(raw).take(MAX_ENTRY_SIZE);
                let mut out = Vec::with_capacity(entry.uncompressed_size as usize);
                decoder
                    .read_to_end(&mut out)
                    .map_err(|e| corrupt(&format!("inflate failed: {}", e)))?;
                out
            }
            method => {
                return Err(PackageError::UnsupportedCompression {
                    name: entry.name.clone(),
                    method,
                })
            }
        };

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&bytes);
        if hasher.finalize() != entry.crc32 {
            return Err(corrupt("CRC mismatch"));
        }
        Ok(Some(bytes))
    }
}

/// Scan backwards over the tail for the EOCD signature.
fn find_eocd(data: &[u8]) -> Option<usize> {
    let tail_len = data.len().min(EOCD_SEARCH_WINDOW);
    let tail_start = data.len() - tail_len;
    let tail = &data[tail_start..];
    (0..=tail_len.checked_sub(22)?)
        .rev()
        .find(|&i| tail[i..i + 4] == EOCD_SIG)
        .map(|i| tail_start + i)
}
