use relay_logger::{LogConfig, LogRotation, Logger};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn json_flag_writes_json_lines() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");
    let config = LogConfig {
        level: "debug".into(),
        console: false,
        path: Some(log_dir.clone()),
        json: true,
        rotation: LogRotation::Never,
        ..LogConfig::default()
    };

    let logger = Logger::from_config("relay-json", &config)?;
    assert!(logger.writes_files());

    tracing::debug!("json line");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(log_file)?;
    let first = contents.lines().next().expect("log file should not be empty");
    let parsed: serde_json::Value = serde_json::from_str(first)?;
    assert_eq!(parsed["fields"]["message"], "json line");

    Ok(())
}
