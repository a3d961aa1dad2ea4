#![no_main]
use libfuzzer_sys::fuzz_target;

use evidentia::formats::pdf::{parse_pdf, TrailerInfoReader};

fuzz_target!(|data: &[u8]| {
    let _ = parse_pdf(data, &TrailerInfoReader);
});
