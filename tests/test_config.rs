use std::path::PathBuf;

use tagkeeper::config::{Config, LoggingConfig};

#[test]
fn test_empty_config_uses_defaults() -> anyhow::Result<()> {
    let config = Config::from_toml("")?;
    assert_eq!(config, Config::default());
    assert_eq!(config.logging.filter, "info");
    assert!(!config.logging.json);
    assert!(config.workspace.is_none());
    Ok(())
}

#[test]
fn test_full_config() -> anyhow::Result<()> {
    let config = Config::from_toml(
        r#"
        workspace = "/tmp/work.tagkeeper"
        default_project = 3

        [logging]
        filter = "tagkeeper=debug,sqlx=warn"
        json = true
        "#,
    )?;
    assert_eq!(config.workspace, Some(PathBuf::from("/tmp/work.tagkeeper")));
    assert_eq!(config.default_project, Some(3));
    assert_eq!(
        config.logging,
        LoggingConfig {
            filter: "tagkeeper=debug,sqlx=warn".to_string(),
            json: true,
        }
    );
    Ok(())
}

#[test]
fn test_partial_logging_section() -> anyhow::Result<()> {
    let config = Config::from_toml("[logging]\njson = true\n")?;
    assert_eq!(config.logging.filter, "info");
    assert!(config.logging.json);
    Ok(())
}

#[test]
fn test_invalid_config_rejected() {
    assert!(Config::from_toml("default_project = \"three\"").is_err());
}

#[test]
fn test_load_explicit_path() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("tagkeeper.toml");
    std::fs::write(&path, "default_project = 7\n")?;

    let config = Config::load(Some(&path))?;
    assert_eq!(config.default_project, Some(7));

    let missing = dir.path().join("missing.toml");
    assert!(Config::load(Some(&missing)).is_err());
    Ok(())
}
