#![no_main]

use causeway::normalizer::{LogNormalizer, LogSource};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        let Ok(normalizer) = LogNormalizer::new() else {
            return;
        };
        // No source parser may panic on arbitrary input
        for source in [LogSource::Syslog, LogSource::App, LogSource::Db, LogSource::Proxy] {
            let _ = normalizer.parse_line(source, line);
        }
    }
});
