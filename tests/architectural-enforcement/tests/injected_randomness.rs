//! Integration Test: Injected Randomness
//!
//! **Policy**: every random decision in production code goes through
//! `SceneRng`, seeded by the caller. Hidden global or entropy-seeded
//! generators make datasets irreproducible.
//!
//! **Forbidden**: `thread_rng`, `rand::random`, `OsRng`, `from_entropy`.

use architectural_enforcement::{code_part, production_sources};

const FORBIDDEN: [&str; 4] = ["thread_rng", "rand::random", "OsRng", "from_entropy"];

#[test]
fn test_no_hidden_randomness_in_production_code() {
    let mut violations = Vec::new();

    for file in production_sources() {
        for (idx, line) in file.lines.iter().enumerate() {
            let code = code_part(line);
            for pattern in FORBIDDEN {
                if code.contains(pattern) {
                    violations.push(format!(
                        "{}:{} - {}: {}",
                        file.path.display(),
                        idx + 1,
                        pattern,
                        line.trim()
                    ));
                }
            }
        }
    }

    if !violations.is_empty() {
        eprintln!("\n❌ Hidden randomness found in production code!\n");
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        eprintln!("\n✅ REQUIRED: take a `&mut SceneRng` from the caller");

        panic!(
            "\nFound {} hidden randomness violation(s) in production code.",
            violations.len()
        );
    }
}

#[test]
fn test_seeded_generator_is_the_only_rng() {
    let owners: Vec<String> = production_sources()
        .into_iter()
        .filter(|file| {
            file.lines
                .iter()
                .any(|line| code_part(line).contains("StdRng::seed_from_u64"))
        })
        .filter_map(|file| file.path.file_name().map(|name| name.to_string_lossy().into_owned()))
        .collect();

    assert_eq!(owners, vec!["random.rs".to_string()], "StdRng seeded outside random.rs");
}
