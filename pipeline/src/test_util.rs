use std::path::PathBuf;

/// Resolves a file name in the repository's `test_data` directory.
pub fn resolve_test_file(file_name: &str) -> PathBuf {
    PathBuf::from(format!(
        "{}/../test_data/{file_name}",
        env!("CARGO_MANIFEST_DIR")
    ))
}
