#![no_main]

use filequery::locator::{Position, locate};
use filequery::splitter::split_statements;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let (line, col) = (data[0] as usize % 16, data[1] as usize);
    if let Ok(sql) = std::str::from_utf8(&data[2..]) {
        let segments = split_statements(sql, false);
        let located = locate(&segments, Position::new(line, col));
        if located.is_found() {
            assert!(located.span.start <= located.span.end);
        } else {
            assert!(located.text.is_empty());
        }
    }
});
