//! Evidentia: a deterministic forensic file-analysis engine.
//!
//! Given an arbitrary in-memory byte buffer (plus optional MIME and
//! filename dispatch hints), the engine produces reproducible evidentiary
//! output: the fixed cryptographic hash set, whole-buffer Shannon entropy,
//! extracted printable strings, format-specific structural metadata (image
//! EXIF/XMP, PNG chunk layout, PDF document info, DOCX package properties)
//! and heuristic anomaly warnings (temporal inconsistency, embedded-script
//! markers, tool signatures, high entropy).
//!
//! The engine is stateless across invocations, performs no I/O after the
//! single initial read, and assembles each [`analysis::report::AnalysisReport`]
//! all-or-nothing: a failure inside one metadata subsystem degrades to a
//! warning instead of blocking the rest.
//!
//! ```no_run
//! use evidentia::analysis::{analyze, report::FileInput};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let input = FileInput::new(bytes)
//!     .with_mime("image/jpeg")
//!     .with_file_name("photo.jpg");
//! let report = analyze(&input);
//! for warning in &report.warnings {
//!     println!("{}", warning);
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod detect;
pub mod entropy;
pub mod error;
pub mod formats;
pub mod hashing;
pub mod io;
pub mod logging;
pub mod strings;
pub mod timeout;

pub use analysis::report::{
    AnalysisReport, FileInput, FileKind, Metadata, ReportEnvelope, StructuralChunk,
};
pub use analysis::{analyze, analyze_path, analyze_with};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
