//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - All scene randomness flows through an injected, seeded generator
//! - No blocking file I/O inside async functions
//!
//! The helpers here walk the production sources of the workspace; the rules
//! themselves live under `tests/`.

use std::fs;
use std::path::{Path, PathBuf};

/// Production source roots, relative to the workspace root
pub const PRODUCTION_DIRS: [&str; 2] = ["screengen/core/src", "screengen/cli/src"];

/// A production source file with its test module stripped
#[derive(Debug)]
pub struct SourceFile {
    /// Path of the file
    pub path: PathBuf,
    /// Lines before the first `#[cfg(test)]`
    pub lines: Vec<String>,
}

/// Workspace root, two levels above this package
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

/// Every `.rs` file under [`PRODUCTION_DIRS`]
#[must_use]
pub fn production_sources() -> Vec<SourceFile> {
    let root = workspace_root();
    let mut files = Vec::new();

    for dir in PRODUCTION_DIRS {
        let path = root.join(dir);
        if !path.exists() {
            continue;
        }

        for entry in walkdir::WalkDir::new(&path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            if entry.path().extension().and_then(|s| s.to_str()) != Some("rs") {
                continue;
            }
            let Ok(content) = fs::read_to_string(entry.path()) else {
                continue;
            };
            files.push(SourceFile {
                path: entry.path().to_path_buf(),
                lines: production_lines(&content),
            });
        }
    }

    files
}

/// Lines of `content` up to its test module
#[must_use]
pub fn production_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .take_while(|line| !line.trim_start().starts_with("#[cfg(test)]"))
        .map(str::to_string)
        .collect()
}

/// Code part of a line, without a trailing `//` comment
#[must_use]
pub fn code_part(line: &str) -> &str {
    line.split("//").next().unwrap_or(line)
}

/// True when `line` declares a function (`fn`, `pub fn`, `async fn`, ...)
#[must_use]
pub fn declares_fn(line: &str) -> bool {
    let code = code_part(line).trim_start();
    code.starts_with("fn ") || code.contains(" fn ")
}

/// Declaration line of the function enclosing `idx`, if any
///
/// Scans backwards for the nearest function declaration; stops at `impl`
/// and `mod` blocks.
#[must_use]
pub fn enclosing_fn(lines: &[String], idx: usize) -> Option<&str> {
    for line in lines[..=idx].iter().rev() {
        let trimmed = line.trim();
        if declares_fn(trimmed) {
            return Some(trimmed);
        }
        if trimmed.starts_with("impl") || trimmed.starts_with("mod ") || trimmed.starts_with("pub mod ") {
            return None;
        }
    }
    None
}

/// True when the function enclosing `idx` is `async`
#[must_use]
pub fn is_in_async_function(lines: &[String], idx: usize) -> bool {
    enclosing_fn(lines, idx).is_some_and(|decl| decl.contains("async fn "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(code: &[&str]) -> Vec<String> {
        code.iter().map(|line| (*line).to_string()).collect()
    }

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let content = "fn a() {}\n#[cfg(test)]\nmod tests {}\n";
        assert_eq!(production_lines(content), vec!["fn a() {}".to_string()]);
    }

    #[test]
    fn test_async_function_detection() {
        let code = lines(&[
            "pub async fn load(&self) {",
            "    let bytes = std::fs::read(path);",
            "}",
            "fn write() {",
            "    std::fs::write(path, bytes);",
            "}",
        ]);
        assert!(is_in_async_function(&code, 1));
        assert!(!is_in_async_function(&code, 4));
    }

    #[test]
    fn test_impl_boundary_stops_scan() {
        let code = lines(&["async fn outer() {}", "impl Foo {", "    const X: u8 = 1;"]);
        assert!(enclosing_fn(&code, 2).is_none());
    }
}
