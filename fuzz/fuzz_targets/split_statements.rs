#![no_main]

use filequery::splitter::split_statements;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(sql) = std::str::from_utf8(data) {
        for strip in [false, true] {
            let statements = split_statements(sql, strip);
            // A blank final segment is dropped on the second pass.
            if statements.last().is_some_and(|s| s.trim().is_empty()) {
                continue;
            }
            let rejoined = statements.join(";");
            assert_eq!(split_statements(&rejoined, strip), statements);
        }
    }
});
