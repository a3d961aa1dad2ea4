#![no_main]
use libfuzzer_sys::fuzz_target;

use evidentia::formats::exif::{ImageTagDecoder, TiffExifDecoder};

fuzz_target!(|data: &[u8]| {
    let _ = TiffExifDecoder.decode_image_tags(data);
});
