use mosaic_cli::config::Config;
use mosaic_client::Settings;
use std::io::Write;
use std::path::PathBuf;

#[test]
fn test_shipped_default_matches_builtin_defaults() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/default.toml");
    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.backend.base_url, "http://localhost:8000");
    assert_eq!(config.logging.level, "info");
    assert_eq!(Settings::from(config.settings), Settings::default());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[settings]\nenable_agent = false\n\n[store]\nsnapshot_path = \"/tmp/t.json\"").unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.store.snapshot_path, PathBuf::from("/tmp/t.json"));
    assert_eq!(config.logging.format, "pretty");

    let settings = Settings::from(config.settings);
    assert!(!settings.enable_agent);
    assert!(settings.enable_streaming);
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(Config::from_file("/nonexistent/mosaic.toml").is_err());
}
