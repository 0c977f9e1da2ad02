#![no_main]

use libfuzzer_sys::fuzz_target;
use lineprof::config::ProfilerConfig;
use lineprof::replay::{parse_trace, replay};
use lineprof::target::ProfileTarget;

fuzz_target!(|data: &[u8]| {
    // Any trace that parses must also replay without panicking
    if let Ok(events) = parse_trace(data) {
        if let Ok(target) = ProfileTarget::parse("/./") {
            let _ = replay(target, &events, ProfilerConfig::default());
        }
    }
});
