use orb_telemetry::logging;

#[test]
fn test_init_logging_human() {
    // Should not panic; second call is a safe no-op.
    logging::init_logging("test-service", "debug");
    logging::init_logging("test-service", "info");

    tracing::info!(key = "value", "human-readable log line");
}

#[test]
fn test_init_logging_json() {
    // The global subscriber may already be set by another test, in which
    // case this silently no-ops.
    logging::init_logging_json("test-service-json", "info");

    tracing::info!(key = "value", "json log line");
}

#[test]
fn test_init_logging_to_file_creates_parent_dirs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("logs").join("orb.log");

    logging::init_logging_to_file("file-test", "info", &path, false).expect("init file logging");

    assert!(path.exists(), "log file should be created even if init no-ops");
}

#[test]
fn test_init_logging_to_file_rejects_directory_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    // Opening a directory as a file fails.
    let result = logging::init_logging_to_file("file-test", "info", dir.path(), true);
    assert!(result.is_err());
}
