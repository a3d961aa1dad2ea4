//! Synthetic evidence-file builders shared across the integration tests.

/// Build a ZIP archive with stored (uncompressed) entries.
pub fn build_stored_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut central = Vec::new();
    for (name, data) in entries {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(data);
        let crc = hasher.finalize();
        let local_offset = out.len() as u32;

        out.extend([0x50, 0x4B, 0x03, 0x04]);
        out.extend(20u16.to_le_bytes());
        out.extend(0u16.to_le_bytes());
        out.extend(0u16.to_le_bytes()); // stored
        out.extend([0u8; 4]);
        out.extend(crc.to_le_bytes());
        out.extend((data.len() as u32).to_le_bytes());
        out.extend((data.len() as u32).to_le_bytes());
        out.extend((name.len() as u16).to_le_bytes());
        out.extend(0u16.to_le_bytes());
        out.extend(name.as_bytes());
        out.extend(*data);

        central.extend([0x50, 0x4B, 0x01, 0x02]);
        central.extend(20u16.to_le_bytes());
        central.extend(20u16.to_le_bytes());
        central.extend(0u16.to_le_bytes());
        central.extend(0u16.to_le_bytes());
        central.extend([0u8; 4]);
        central.extend(crc.to_le_bytes());
        central.extend((data.len() as u32).to_le_bytes());
        central.extend((data.len() as u32).to_le_bytes());
        central.extend((name.len() as u16).to_le_bytes());
        central.extend(0u16.to_le_bytes());
        central.extend(0u16.to_le_bytes());
        central.extend(0u16.to_le_bytes());
        central.extend(0u16.to_le_bytes());
        central.extend(0u32.to_le_bytes());
        central.extend(local_offset.to_le_bytes());
        central.extend(name.as_bytes());
    }
    let cd_offset = out.len() as u32;
    let cd_size = central.len() as u32;
    out.extend(central);
    out.extend([0x50, 0x4B, 0x05, 0x06]);
    out.extend(0u16.to_le_bytes());
    out.extend(0u16.to_le_bytes());
    out.extend((entries.len() as u16).to_le_bytes());
    out.extend((entries.len() as u16).to_le_bytes());
    out.extend(cd_size.to_le_bytes());
    out.extend(cd_offset.to_le_bytes());
    out.extend(0u16.to_le_bytes());
    out
}

/// Build a DOCX package with the given `docProps/core.xml` fields.
pub fn build_docx(creator: &str, created: &str, modified: &str) -> Vec<u8> {
    let core = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"
 xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/">
<dc:creator>{creator}</dc:creator>
<cp:lastModifiedBy>{creator}</cp:lastModifiedBy>
<dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created>
<dcterms:modified xsi:type="dcterms:W3CDTF">{modified}</dcterms:modified>
</cp:coreProperties>"#
    );
    build_stored_zip(&[
        ("[Content_Types].xml", b"<?xml version=\"1.0\"?><Types/>"),
        ("docProps/core.xml", core.as_bytes()),
        ("word/document.xml", b"<?xml version=\"1.0\"?><w:document/>"),
    ])
}

/// Build a PNG from (type, data) chunks, prefixed with the 8-byte magic.
pub fn build_png(chunks: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
    let mut out = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    for (name, data) in chunks {
        out.extend((data.len() as u32).to_be_bytes());
        out.extend(*name);
        out.extend(*data);
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(*name);
        hasher.update(data);
        out.extend(hasher.finalize().to_be_bytes());
    }
    out
}

/// A minimal one-page PDF with the given Info-dictionary body.
pub fn build_pdf(info_body: &str) -> Vec<u8> {
    let mut pdf = Vec::new();
    pdf.extend(b"%PDF-1.4\n");
    pdf.extend(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");
    pdf.extend(b"2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n");
    pdf.extend(b"3 0 obj\n<< /Type /Page /Parent 2 0 R >>\nendobj\n");
    pdf.extend(format!("4 0 obj\n<< {} >>\nendobj\n", info_body).as_bytes());
    pdf.extend(b"trailer\n<< /Root 1 0 R /Info 4 0 R >>\n%%EOF\n");
    pdf
}

/// A JPEG whose single APP1 segment carries a little-endian TIFF stream
/// with the given ASCII EXIF tags.
pub fn build_jpeg_with_exif(tags: &[(u16, &str)]) -> Vec<u8> {
    let mut tiff = vec![b'I', b'I', 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00];
    tiff.extend((tags.len() as u16).to_le_bytes());
    let mut value_offset = 8 + 2 + tags.len() * 12 + 4;
    let mut values: Vec<u8> = Vec::new();
    for (tag, text) in tags {
        let bytes = text.as_bytes();
        let count = (bytes.len() + 1) as u32;
        tiff.extend(tag.to_le_bytes());
        tiff.extend(2u16.to_le_bytes()); // ASCII
        tiff.extend(count.to_le_bytes());
        if count <= 4 {
            let mut cell = [0u8; 4];
            cell[..bytes.len()].copy_from_slice(bytes);
            tiff.extend(cell);
        } else {
            tiff.extend((value_offset as u32).to_le_bytes());
            values.extend(bytes);
            values.push(0);
            value_offset += bytes.len() + 1;
        }
    }
    tiff.extend([0u8; 4]);
    tiff.extend(values);

    let mut jpeg = vec![0xFF, 0xD8];
    let payload_len = (2 + 6 + tiff.len()) as u16;
    jpeg.extend([0xFF, 0xE1]);
    jpeg.extend(payload_len.to_be_bytes());
    jpeg.extend(b"Exif\0\0");
    jpeg.extend(&tiff);
    jpeg.extend([0xFF, 0xD9]);
    jpeg
}
