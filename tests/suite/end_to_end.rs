use crate::common::{build_docx, build_jpeg_with_exif, build_pdf, build_png};
use chrono::{TimeZone, Utc};
use evidentia::{analyze, FileInput, FileKind, Metadata};

const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[test]
fn docx_temporal_inconsistency_end_to_end() {
    // Created one day after modified: the package parser must flag it and
    // still extract the creator.
    let data = build_docx("A", "2020-01-02", "2020-01-01");
    let input = FileInput::new(data)
        .with_mime(DOCX_MIME)
        .with_file_name("memo.docx");
    let report = analyze(&input);

    assert_eq!(report.file_type, FileKind::Docx);
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("Temporal inconsistency")));
    match &report.metadata {
        Metadata::Docx(meta) => {
            assert_eq!(meta.core.creator.as_deref(), Some("A"));
            assert_eq!(meta.core.created.as_deref(), Some("2020-01-02"));
        }
        other => panic!("unexpected metadata variant: {:?}", other),
    }
    let dump = report.xml_dump.as_deref().expect("core.xml dumped");
    assert!(dump.contains("-- docProps/core.xml --"));
}

#[test]
fn docx_consistent_dates_stay_silent() {
    let data = build_docx("B", "2020-01-01", "2020-01-02");
    let input = FileInput::new(data).with_mime(DOCX_MIME);
    let report = analyze(&input);
    assert!(!report
        .warnings
        .iter()
        .any(|w| w.contains("Temporal inconsistency")));
}

#[test]
fn truncated_docx_never_panics_and_warns() {
    let mut data = build_docx("A", "2020-01-01", "2020-01-02");
    data.truncate(40); // destroys the central directory
    let input = FileInput::new(data).with_mime(DOCX_MIME);
    let report = analyze(&input);
    assert_eq!(report.file_type, FileKind::Docx);
    assert!(!report.warnings.is_empty());
    match &report.metadata {
        Metadata::Docx(meta) => assert_eq!(meta.core.creator, None),
        other => panic!("unexpected metadata variant: {:?}", other),
    }
}

#[test]
fn corrupt_pdf_never_panics_and_warns() {
    let input = FileInput::new(&b"%PDF-1.5 then chaos \xff\xfe\x00"[..])
        .with_mime("application/pdf");
    let report = analyze(&input);
    assert_eq!(report.file_type, FileKind::Pdf);
    assert!(!report.warnings.is_empty());
}

#[test]
fn pdf_script_markers_surface_in_report() {
    let mut data = build_pdf("/Title (invoice)");
    data.extend(b"5 0 obj\n<< /OpenAction << /S /JavaScript /JS (this.print()) >> >>\nendobj\n");
    let input = FileInput::new(data).with_file_name("invoice.pdf");
    let report = analyze(&input);
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("Embedded JavaScript")));
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("Automatic-action")));
}

#[test]
fn jpeg_exif_tool_signature_and_timestamps() {
    let data = build_jpeg_with_exif(&[
        (0x0131, "EditorPro 2.1"),              // Software
        (0x0132, "2023:01:01 10:00:00"),        // DateTime (modified)
        (0x9003, "2023:06:01 10:00:00"),        // DateTimeOriginal (captured later!)
    ]);
    let input = FileInput::new(data).with_mime("image/jpeg");
    let report = analyze(&input);
    assert_eq!(report.file_type, FileKind::Image);
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("EditorPro 2.1")));
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("Temporal inconsistency")));
    match &report.metadata {
        Metadata::Image(tree) => {
            assert_eq!(tree.exif_value("Software"), Some("EditorPro 2.1"));
        }
        other => panic!("unexpected metadata variant: {:?}", other),
    }
}

#[test]
fn png_chunk_layout_is_preserved_in_order() {
    let mut ihdr = Vec::new();
    ihdr.extend(32u32.to_be_bytes());
    ihdr.extend(16u32.to_be_bytes());
    ihdr.extend([8, 6, 0, 0, 0]);
    let data = build_png(&[
        (b"IHDR", &ihdr),
        (b"tEXt", b"Comment\0not evidence"),
        (b"IDAT", &[0u8; 32]),
        (b"IDAT", &[0u8; 8]), // duplicates stay duplicated
        (b"IEND", &[]),
    ]);
    let input = FileInput::new(data).with_file_name("shot.png");
    let report = analyze(&input);

    let chunks = report.chunks.as_ref().expect("png yields chunks");
    let names: Vec<&str> = chunks.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["IHDR", "tEXt", "IDAT", "IDAT", "IEND"]);
    assert_eq!(chunks[0].offset, 8);
    match &report.metadata {
        Metadata::Png(meta) => {
            assert_eq!(meta.width, Some(32));
            assert_eq!(meta.height, Some(16));
        }
        other => panic!("unexpected metadata variant: {:?}", other),
    }
}

#[test]
fn envelope_serializes_to_the_flat_export_shape() -> anyhow::Result<()> {
    let data = build_docx("A", "2020-01-01", "2020-01-02");
    let input = FileInput::new(data)
        .with_mime(DOCX_MIME)
        .with_file_name("memo.docx");
    let report = analyze(&input);
    let stamp = Utc
        .with_ymd_and_hms(2026, 8, 6, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    let envelope = report.into_envelope("session-41", stamp);
    let json = serde_json::to_value(&envelope)?;

    assert_eq!(json["sessionId"], "session-41");
    assert_eq!(json["fileName"], "memo.docx");
    assert_eq!(json["fileType"], "DOCX");
    assert!(json["fileSize"].as_u64().expect("fileSize present") > 0);
    assert!(json["analysisTime"].is_string());
    assert_eq!(
        json["hashes"]["sha256"].as_str().map(str::len),
        Some(64)
    );
    assert!(json["entropy"].is_number());
    assert_eq!(json["metadata"]["core"]["creator"], "A");
    assert!(json["warnings"].is_array());
    Ok(())
}

#[test]
fn hashes_and_entropy_cover_the_full_file_regardless_of_format() {
    let data = build_pdf("/Title (t)");
    let expected = evidentia::hashing::compute_hashes(&data);
    let input = FileInput::new(data).with_mime("application/pdf");
    let report = analyze(&input);
    assert_eq!(report.hashes, expected);
    assert!(report.entropy > 0.0 && report.entropy <= 8.0);
}
