use crate::common::{build_docx, build_jpeg_with_exif, build_png};
use evidentia::{analyze, FileInput};

#[test]
fn identical_bytes_yield_identical_json() {
    let data = build_docx("A", "2020-01-01", "2020-01-02");
    let input = FileInput::new(data)
        .with_mime("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        .with_file_name("memo.docx");
    let a = serde_json::to_string(&analyze(&input)).expect("json a");
    let b = serde_json::to_string(&analyze(&input)).expect("json b");
    assert_eq!(a, b, "JSON outputs differ across identical runs");
}

#[test]
fn hash_set_is_a_pure_function_of_the_bytes() {
    let data = build_png(&[(b"IEND", &[])]);
    let named = FileInput::new(data.clone())
        .with_mime("image/png")
        .with_file_name("one.png");
    let anonymous = FileInput::new(data);
    let a = analyze(&named);
    let b = analyze(&anonymous);
    // Same bytes, different hints: digests and entropy must not move.
    assert_eq!(a.hashes, b.hashes);
    assert_eq!(a.entropy, b.entropy);
}

#[test]
fn tag_trees_serialize_in_stable_order() {
    let data = build_jpeg_with_exif(&[
        (0x0110, "Model Nine"),
        (0x010F, "ACME Optical"),
        (0x0131, "EditorPro 2.1"),
    ]);
    let input = FileInput::new(data).with_mime("image/jpeg");
    let a = serde_json::to_string(&analyze(&input)).unwrap();
    let b = serde_json::to_string(&analyze(&input)).unwrap();
    assert_eq!(a, b);
    // BTreeMap ordering: Make before Model before Software.
    let make = a.find("\"Make\"").unwrap();
    let model = a.find("\"Model\"").unwrap();
    let software = a.find("\"Software\"").unwrap();
    assert!(make < model && model < software);
}
