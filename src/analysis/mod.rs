//! Analysis orchestration.
//!
//! One shared immutable buffer, four independent read-only computations —
//! hashing, entropy, string extraction, and the dispatched format parser —
//! joined all-or-nothing into a single [`AnalysisReport`]. The sub-analyses
//! carry no shared mutable state, so they run on parallel tasks with no
//! locking; the only synchronization point is the final join.
//!
//! Cross-cutting anomaly heuristics live here rather than in the parsers:
//! the high-entropy rule consumes the buffer-wide entropy score, and the
//! declared-type-vs-content check consumes the dispatch outcome, so both
//! stay independent of parser logic.

pub mod report;

use crate::config::AnalysisConfig;
use crate::detect;
use crate::entropy::{shannon_entropy, HIGH_ENTROPY_THRESHOLD};
use crate::error::Result;
use crate::formats::{self, Capabilities};
use crate::hashing::compute_hashes;
use crate::io::read_file_bounded;
use crate::strings::extract_printable_strings;
use report::{AnalysisReport, FileInput};
use std::path::Path;
use tracing::{debug, info, info_span};

/// Analyze one file with default configuration and capabilities.
pub fn analyze(input: &FileInput) -> AnalysisReport {
    analyze_with(input, &AnalysisConfig::default(), &Capabilities::default())
}

/// Analyze one file.
///
/// Warning order is deterministic: parser warnings in parser order, then
/// the high-entropy flag, then the declared-type mismatch flag.
pub fn analyze_with(
    input: &FileInput,
    config: &AnalysisConfig,
    capabilities: &Capabilities,
) -> AnalysisReport {
    let data = input.bytes.as_ref();
    let span = info_span!(
        "analyze",
        file = input.file_name.as_deref().unwrap_or("<memory>"),
        size_bytes = data.len()
    );
    let _guard = span.enter();
    info!("start");

    let format = detect::detect(input.mime.as_deref(), input.file_name.as_deref());
    debug!(format = ?format, "dispatched");

    let min_length = config.strings.min_length;
    let (hashes, (entropy, (strings, parsed))) = rayon::join(
        || compute_hashes(data),
        || {
            rayon::join(
                || shannon_entropy(data),
                || {
                    rayon::join(
                        || extract_printable_strings(data, min_length),
                        || formats::parse_dispatched(format, data, capabilities),
                    )
                },
            )
        },
    );

    let mut warnings = parsed.warnings;
    if entropy > HIGH_ENTROPY_THRESHOLD {
        warnings.push(format!(
            "High entropy ({:.2} bits/byte) suggests encrypted or compressed content",
            entropy
        ));
    }
    if let Some(hint) = detect::sniff_content(data) {
        if detect::content_conflicts(format, &hint) {
            warnings.push(format!(
                "Declared type does not match content: magic bytes indicate {} (.{})",
                hint.mime, hint.extension
            ));
        }
    }

    info!(
        file_type = ?parsed.kind,
        warnings = warnings.len(),
        "complete"
    );

    AnalysisReport {
        file_name: input.file_name.clone(),
        file_size: data.len() as u64,
        file_type: parsed.kind,
        hashes,
        entropy,
        metadata: parsed.metadata,
        warnings,
        chunks: parsed.chunks,
        xml_dump: parsed.xml_dump,
        strings,
    }
}

/// Convenience entry point: one bounded read, then in-memory analysis.
///
/// This is the only place the engine touches the filesystem; an unreadable
/// or oversized file fails here, for this file only.
pub fn analyze_path<P: AsRef<Path>>(path: P, config: &AnalysisConfig) -> Result<AnalysisReport> {
    let path = path.as_ref();
    let bytes = read_file_bounded(path, &config.io)?;
    let mut input = FileInput::new(bytes);
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        input = input.with_file_name(name);
    }
    Ok(analyze_with(&input, config, &Capabilities::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::report::{FileKind, Metadata};

    #[test]
    fn unknown_format_report_is_complete_and_silent() {
        let input = FileInput::new(&b"plain unclassified bytes here"[..])
            .with_file_name("evidence.bin");
        let report = analyze(&input);
        assert_eq!(report.file_type, FileKind::Unknown);
        assert_eq!(report.metadata, Metadata::unsupported());
        assert!(report.warnings.is_empty());
        assert_eq!(report.file_size, 29);
        assert_eq!(report.hashes.md5.len(), 32);
        assert!(report.entropy > 0.0);
        assert!(report
            .strings
            .iter()
            .any(|s| s.contains("plain unclassified")));
    }

    #[test]
    fn high_entropy_warning_fires_above_threshold() {
        // Pseudo-random bytes push entropy past 7.5 bits/byte.
        let mut rng = 99u64;
        let data: Vec<u8> = (0..1 << 16)
            .map(|_| {
                rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                (rng >> 33) as u8
            })
            .collect();
        let report = analyze(&FileInput::new(data));
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("High entropy")));
    }

    #[test]
    fn low_entropy_buffer_stays_silent() {
        let report = analyze(&FileInput::new(vec![b'a'; 4096]));
        assert!(!report.warnings.iter().any(|w| w.contains("High entropy")));
    }

    #[test]
    fn mime_dispatch_beats_extension() {
        let png_magic = [0x89u8, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        let mut data = png_magic.to_vec();
        data.extend(0u32.to_be_bytes());
        data.extend(b"IEND");
        data.extend(crc32_of(b"IEND").to_be_bytes());
        let input = FileInput::new(data)
            .with_mime("image/png")
            .with_file_name("evidence.dat");
        let report = analyze(&input);
        assert_eq!(report.file_type, FileKind::Png);
        assert!(report.chunks.is_some());
    }

    fn crc32_of(bytes: &[u8]) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(bytes);
        hasher.finalize()
    }

    #[test]
    fn content_mismatch_is_flagged() {
        // PNG bytes analyzed under a declared JPEG type.
        let png_magic = [0x89u8, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        let mut data = png_magic.to_vec();
        data.extend(0u32.to_be_bytes());
        data.extend(b"IEND");
        data.extend(crc32_of(b"IEND").to_be_bytes());
        let input = FileInput::new(data).with_mime("image/jpeg");
        let report = analyze(&input);
        assert_eq!(report.file_type, FileKind::Image);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("does not match content")));
    }

    #[test]
    fn identical_bytes_yield_identical_reports() {
        let input = FileInput::new(&b"determinism check"[..]).with_file_name("same.bin");
        let a = serde_json::to_string(&analyze(&input)).unwrap();
        let b = serde_json::to_string(&analyze(&input)).unwrap();
        assert_eq!(a, b);
    }
}
