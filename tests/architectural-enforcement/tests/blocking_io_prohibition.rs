//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: async functions in production code MUST NOT use blocking I/O.
//! **Required**: `tokio::fs` inside async code; blocking writers only in
//! synchronous functions called from `spawn_blocking`.
//!
//! Acceptable blocking I/O:
//! - Non-async functions (config loading, the per-image export writers)
//! - Test code

use architectural_enforcement::{code_part, is_in_async_function, production_sources};

#[test]
fn test_no_blocking_io_in_async_functions() {
    let mut violations = Vec::new();

    for file in production_sources() {
        let imports_std_fs = file
            .lines
            .iter()
            .any(|line| code_part(line).trim() == "use std::fs;");

        for (idx, line) in file.lines.iter().enumerate() {
            let code = code_part(line);
            let std_fs = code.contains("std::fs::")
                || (imports_std_fs && code.contains("fs::") && !code.contains("tokio::fs::"));
            let blocking = std_fs || code.contains("std::thread::sleep");

            if blocking && is_in_async_function(&file.lines, idx) {
                violations.push(format!(
                    "{}:{} - Blocking I/O in async fn: {}",
                    file.path.display(),
                    idx + 1,
                    line.trim()
                ));
            }
        }
    }

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Blocking I/O calls found in async functions!\n");
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        eprintln!("\n✅ REQUIRED async I/O:");
        eprintln!("  - tokio::fs::read().await, tokio::fs::write().await");
        eprintln!("  - tokio::task::spawn_blocking for synchronous writers");

        panic!(
            "\nFound {} blocking I/O violation(s) in production code.",
            violations.len()
        );
    }
}

#[test]
fn test_production_sources_are_scanned() {
    let sources = production_sources();
    assert!(
        sources.iter().any(|file| file.path.ends_with("batch.rs")),
        "scanner found no production sources"
    );
}
