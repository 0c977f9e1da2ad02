#![no_main]

use libfuzzer_sys::fuzz_target;
use lineprof::target::ProfileTarget;

fuzz_target!(|data: &[u8]| {
    // Parsing a target argument must never panic, whatever the bytes
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = ProfileTarget::parse(input);
    }
});
