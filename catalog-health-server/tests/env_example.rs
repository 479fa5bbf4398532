//! Verifies every server environment variable is documented in `.env.example`.

use std::fs;
use std::path::PathBuf;

const VARIABLES: [&str; 5] = [
    "CATALOG_HEALTH_HOST",
    "CATALOG_HEALTH_PORT",
    "CATALOG_HEALTH_UI_ORIGINS",
    "CATALOG_HEALTH_MODEL_SPEC",
    "CATALOG_HEALTH_PRODUCT_SPEC",
];

fn read_manifest_file(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(name);
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("read {}: {err}", path.display()))
}

#[test]
fn env_example_documents_variables() {
    let example = read_manifest_file(".env.example");
    for variable in VARIABLES {
        assert!(
            example.lines().any(|line| line.starts_with(&format!("{variable}="))),
            ".env.example missing variable: {variable}"
        );
    }
}

#[test]
fn config_reads_documented_variables() {
    let config = read_manifest_file("src/config.rs");
    for variable in VARIABLES {
        assert!(
            config.contains(&format!("\"{variable}\"")),
            "src/config.rs does not read {variable}"
        );
    }
}
