use crate::common::{build_pdf, build_png};
use evidentia::{analyze, FileInput, FileKind, Metadata};

#[test]
fn declared_mime_wins_over_extension() {
    // image/png declared on a .dat file: MIME dispatch must win.
    let data = build_png(&[(b"IEND", &[])]);
    let input = FileInput::new(data)
        .with_mime("image/png")
        .with_file_name("capture.dat");
    let report = analyze(&input);
    assert_eq!(report.file_type, FileKind::Png);
    assert!(report.chunks.is_some());
}

#[test]
fn extension_routes_without_mime() {
    let data = build_pdf("/Title (t)");
    let input = FileInput::new(data).with_file_name("export.pdf");
    let report = analyze(&input);
    assert_eq!(report.file_type, FileKind::Pdf);
}

#[test]
fn unmatched_input_gets_generic_fallback() {
    // Unsupported format is a signal, not an error: empty metadata and no
    // warnings.
    let input = FileInput::new(&b"neither mime nor extension match"[..])
        .with_file_name("blob.xyz");
    let report = analyze(&input);
    assert_eq!(report.file_type, FileKind::Unknown);
    assert_eq!(report.metadata, Metadata::unsupported());
    assert!(report.warnings.is_empty());
}

#[test]
fn exactly_one_parser_runs() {
    // A PDF body declared as PNG: the PNG parser runs (and complains), the
    // PDF parser does not — no JavaScript warnings can appear.
    let mut data = build_pdf("/Title (t)");
    data.extend(b"/JavaScript marker in tail");
    let input = FileInput::new(data).with_mime("image/png");
    let report = analyze(&input);
    assert_eq!(report.file_type, FileKind::Png);
    assert!(!report.warnings.iter().any(|w| w.contains("JavaScript")));
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("PNG signature")));
}
