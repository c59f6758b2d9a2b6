use dupfind::config::{Config, ConfigError, ConfigOverrides};
use dupfind::duplicates::MatchStrategy;
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

// Config::figment reads the process environment
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn test_config_load_defaults() {
    let _guard = ENV_LOCK.lock().unwrap();
    let config: Config = Config::figment(None, &ConfigOverrides::default())
        .extract()
        .unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.mode, MatchStrategy::Checksum);
    assert_eq!(config.io_threads, 4);
    assert_eq!(config.chunk_size, 64 * 1024);
    assert!(config.progress);
}

#[test]
fn test_config_load_from_toml() {
    let _guard = ENV_LOCK.lock().unwrap();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
mode = "pairwise"
chunk_size = "128KiB"
io_threads = 8
skip_hidden = true
"#;
    fs::write(&config_path, toml_content).unwrap();

    let config = Config::load(Some(&config_path), &ConfigOverrides::default()).unwrap();

    assert_eq!(config.mode, MatchStrategy::Pairwise);
    assert_eq!(config.chunk_size, 128 * 1024);
    assert_eq!(config.io_threads, 8);
    assert!(config.skip_hidden);
    assert!(!config.pretty);
}

#[test]
fn test_config_chunk_size_as_integer() {
    let _guard = ENV_LOCK.lock().unwrap();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "chunk_size = 16384\n").unwrap();

    let config = Config::load(Some(&config_path), &ConfigOverrides::default()).unwrap();
    assert_eq!(config.chunk_size, 16384);
}

#[test]
fn test_config_load_from_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    std::env::set_var("DUPFIND_IO_THREADS", "16");
    std::env::set_var("DUPFIND_MODE", "pairwise");

    let result: Result<Config, _> = Config::figment(None, &ConfigOverrides::default()).extract();

    std::env::remove_var("DUPFIND_IO_THREADS");
    std::env::remove_var("DUPFIND_MODE");

    let config = result.unwrap();
    assert_eq!(config.io_threads, 16);
    assert_eq!(config.mode, MatchStrategy::Pairwise);
}

#[test]
fn test_config_layer_precedence() {
    let _guard = ENV_LOCK.lock().unwrap();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "io_threads = 2\nmode = \"pairwise\"\npretty = true\n").unwrap();

    std::env::set_var("DUPFIND_IO_THREADS", "6");
    let overrides = ConfigOverrides {
        mode: Some(MatchStrategy::Checksum),
        ..ConfigOverrides::default()
    };
    let result: Result<Config, _> = Config::figment(Some(&config_path), &overrides).extract();
    std::env::remove_var("DUPFIND_IO_THREADS");

    let config = result.unwrap();
    // env beats file
    assert_eq!(config.io_threads, 6);
    // CLI beats file
    assert_eq!(config.mode, MatchStrategy::Checksum);
    // unset override keeps the file value
    assert!(config.pretty);
}

#[test]
fn test_config_missing_explicit_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    let temp_dir = tempdir().unwrap();
    let missing = temp_dir.path().join("nope.toml");

    let err = Config::load(Some(&missing), &ConfigOverrides::default()).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(p) if p == missing));
}

#[test]
fn test_config_rejects_invalid_values() {
    let _guard = ENV_LOCK.lock().unwrap();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    fs::write(&config_path, "io_threads = 0\n").unwrap();
    let err = Config::load(Some(&config_path), &ConfigOverrides::default()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    fs::write(&config_path, "mode = \"fuzzy\"\n").unwrap();
    let err = Config::load(Some(&config_path), &ConfigOverrides::default()).unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));

    fs::write(&config_path, "chunk_size = \"lots\"\n").unwrap();
    let err = Config::load(Some(&config_path), &ConfigOverrides::default()).unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}

#[test]
fn test_config_save_and_reload() {
    let _guard = ENV_LOCK.lock().unwrap();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let config = Config {
        mode: MatchStrategy::Pairwise,
        io_threads: 3,
        ..Config::default()
    };
    config.save(&config_path, false).unwrap();

    let loaded = Config::load(Some(&config_path), &ConfigOverrides::default()).unwrap();
    assert_eq!(loaded, config);

    let err = config.save(&config_path, false).unwrap_err();
    assert!(matches!(err, ConfigError::AlreadyExists(_)));
    config.save(&config_path, true).unwrap();
}
