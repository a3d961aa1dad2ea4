#![no_main]
use libfuzzer_sys::fuzz_target;

use evidentia::formats::docx::parse_docx;
use evidentia::formats::zip::ZipPackageReader;

fuzz_target!(|data: &[u8]| {
    let _ = parse_docx(data, &ZipPackageReader);
});
