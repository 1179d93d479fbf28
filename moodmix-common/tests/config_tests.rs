//! Unit tests for configuration and graceful degradation
//!
//! Covers:
//! - Missing or malformed TOML never aborts startup
//! - Root folder priority: CLI > env > TOML > compiled default
//! - Root folder creation and database path
//!
//! Tests that manipulate MOODMIX_ROOT_FOLDER are marked #[serial] so they
//! do not race each other.

use moodmix_common::config::{
    CompiledDefaults, LoggingConfig, RootFolderInitializer, RootFolderResolver, TomlConfig,
    DEFAULT_PORT, ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_compiled_defaults_for_current_platform() {
    let defaults = CompiledDefaults::for_current_platform();

    assert!(!defaults.root_folder.as_os_str().is_empty());
    assert!(defaults.root_folder.to_string_lossy().contains("moodmix"));
    assert_eq!(defaults.port, DEFAULT_PORT);
}

#[test]
fn test_toml_config_full() {
    let config = TomlConfig::from_toml_str(
        r#"
        root_folder = "/srv/moodmix"
        port = 6000

        [logging]
        level = "debug"
        "#,
    )
    .unwrap();

    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/moodmix")));
    assert_eq!(config.port, Some(6000));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_toml_config_empty_uses_defaults() {
    let config = TomlConfig::from_toml_str("").unwrap();

    assert!(config.root_folder.is_none());
    assert!(config.port.is_none());
    assert_eq!(config.logging.level, LoggingConfig::default().level);
}

#[test]
fn test_toml_config_logging_table_without_level() {
    let config = TomlConfig::from_toml_str("[logging]\n").unwrap();
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_toml_config_malformed_is_config_error() {
    let result = TomlConfig::from_toml_str("port = \"not a number\"");
    assert!(matches!(result, Err(moodmix_common::Error::Config(_))));
}

#[test]
fn test_toml_config_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "root_folder = \"/data/moods\"\n").unwrap();

    let config = TomlConfig::load_from(&path).unwrap();
    assert_eq!(config.root_folder, Some(PathBuf::from("/data/moods")));
}

#[test]
fn test_toml_config_load_from_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = TomlConfig::load_from(&temp_dir.path().join("absent.toml"));
    assert!(matches!(result, Err(moodmix_common::Error::Io(_))));
}

#[test]
fn test_load_optional_missing_file_gives_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = TomlConfig::load_optional(&temp_dir.path().join("absent.toml")).unwrap();

    assert!(config.root_folder.is_none());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_load_optional_malformed_file_names_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "port = [oops").unwrap();

    match TomlConfig::load_optional(&path) {
        Err(moodmix_common::Error::Config(msg)) => {
            assert!(msg.contains("config.toml"), "unexpected message: {}", msg);
        }
        other => panic!("expected Config error, got {:?}", other),
    }
}

#[test]
fn test_malformed_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "root_folder = 42\n[logging\n").unwrap();

    let (config, problem) = TomlConfig::or_defaults(TomlConfig::load_optional(&path));

    assert!(config.root_folder.is_none());
    assert!(config.port.is_none());
    assert_eq!(config.logging.level, "info");
    assert!(matches!(problem, Some(moodmix_common::Error::Config(_))));
}

#[test]
fn test_valid_file_has_no_fallback_problem() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "port = 6001\n").unwrap();

    let (config, problem) = TomlConfig::or_defaults(TomlConfig::load_optional(&path));

    assert_eq!(config.port, Some(6001));
    assert!(problem.is_none());
}

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let resolver = RootFolderResolver::new("test-module").with_toml_config(TomlConfig::default());
    let root_folder = resolver.resolve();

    let defaults = CompiledDefaults::for_current_platform();
    assert_eq!(root_folder, defaults.root_folder);
}

#[test]
#[serial]
fn test_resolver_toml_beats_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/moodmix-from-toml")),
        ..TomlConfig::default()
    };
    let root_folder = RootFolderResolver::new("test-module")
        .with_toml_config(toml)
        .resolve();

    assert_eq!(root_folder, PathBuf::from("/tmp/moodmix-from-toml"));
}

#[test]
#[serial]
fn test_resolver_env_var_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/moodmix-from-env");

    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/moodmix-from-toml")),
        ..TomlConfig::default()
    };
    let root_folder = RootFolderResolver::new("test-module")
        .with_toml_config(toml)
        .resolve();

    assert_eq!(root_folder, PathBuf::from("/tmp/moodmix-from-env"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_blank_env_var_is_ignored() {
    env::set_var(ROOT_FOLDER_ENV, "   ");

    let root_folder = RootFolderResolver::new("test-module")
        .with_toml_config(TomlConfig::default())
        .resolve();

    assert_eq!(root_folder, CompiledDefaults::for_current_platform().root_folder);

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_cli_beats_everything() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/moodmix-from-env");

    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/moodmix-from-toml")),
        ..TomlConfig::default()
    };
    let root_folder = RootFolderResolver::new("test-module")
        .with_cli_arg(Some(PathBuf::from("/tmp/moodmix-from-cli")))
        .with_toml_config(toml)
        .resolve();

    assert_eq!(root_folder, PathBuf::from("/tmp/moodmix-from-cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
fn test_initializer_database_path() {
    let root = PathBuf::from("/tmp/moodmix-test-root");
    let initializer = RootFolderInitializer::new(root.clone());

    assert_eq!(initializer.database_path(), root.join("moodmix.db"));
    assert_eq!(initializer.root_folder(), root.as_path());
}

#[test]
fn test_initializer_creates_directory_idempotently() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("nested").join("moodmix");

    let initializer = RootFolderInitializer::new(root.clone());
    assert!(initializer.ensure_directory_exists().is_ok());
    assert!(initializer.ensure_directory_exists().is_ok());

    assert!(root.is_dir());
}
