#![no_main]
use libfuzzer_sys::fuzz_target;

use evidentia::formats::exif::TiffExifDecoder;
use evidentia::formats::png::parse_png;

fuzz_target!(|data: &[u8]| {
    let _ = parse_png(data, &TiffExifDecoder);
});
