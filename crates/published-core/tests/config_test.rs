//! Tests for the layered configuration system.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use published_core::config::*;
use published_core::errors::ConfigError;

/// Serializes tests that touch `PUBLISHED_*` environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "PUBLISHED_TAGS",
        "PUBLISHED_OUTPUT",
        "PUBLISHED_MARKER",
        "PUBLISHED_ACCESS",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn test_defaults() {
    let config = PublishedConfig::default();
    assert_eq!(config.policy.effective_marker(), "Published");
    assert!(config.policy.tags.is_empty());
    assert_eq!(config.sources.effective_access(), AccessLevel::Protected);
    assert_eq!(
        config.sources.effective_roots(),
        vec![PathBuf::from("src/main/java")]
    );
    assert_eq!(config.output.effective_line_ending(), LineEnding::Lf);
}

#[test]
fn test_from_toml_all_sections() {
    let config = PublishedConfig::from_toml(
        r#"
        [policy]
        marker = "Api"
        tags = ["architect", "senior-developer"]

        [sources]
        roots = ["core/src/main/java", "fw/src/main/java"]
        exclude = ["**/internal/**"]
        access = "public"

        [output]
        path = "openApi.config"
        line_ending = "crlf"
        "#,
    )
    .unwrap();

    assert_eq!(config.policy.effective_marker(), "Api");
    assert_eq!(config.policy.tags, vec!["architect", "senior-developer"]);
    assert_eq!(config.sources.roots.len(), 2);
    assert_eq!(config.sources.effective_access(), AccessLevel::Public);
    assert_eq!(config.output.require_path().unwrap(), Path::new("openApi.config"));
    assert_eq!(config.output.effective_line_ending(), LineEnding::Crlf);
}

#[test]
fn test_from_toml_rejects_bad_syntax() {
    let err = PublishedConfig::from_toml("[policy\nmarker = ").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn test_missing_output_is_config_error() {
    let config = PublishedConfig::default();
    assert!(matches!(
        config.output.require_path(),
        Err(ConfigError::MissingOutput)
    ));

    let mut blank = PublishedConfig::default();
    blank.output.path = Some(PathBuf::new());
    assert!(matches!(
        blank.output.require_path(),
        Err(ConfigError::MissingOutput)
    ));
}

#[test]
fn test_validation_rejects_blank_tag_and_marker() {
    let mut config = PublishedConfig::default();
    config.policy.tags = vec!["architect".into(), "  ".into()];
    assert!(matches!(
        PublishedConfig::validate(&config),
        Err(ConfigError::ValidationFailed { .. })
    ));

    let mut config = PublishedConfig::default();
    config.policy.marker = Some(String::new());
    assert!(PublishedConfig::validate(&config).is_err());

    let mut config = PublishedConfig::default();
    config.policy.marker = Some("Pub lished".into());
    assert!(PublishedConfig::validate(&config).is_err());
}

#[test]
fn test_split_tags() {
    assert_eq!(split_tags("architect,senior-developer"), vec!["architect", "senior-developer"]);
    assert_eq!(split_tags(" a , ,b,"), vec!["a", "b"]);
    assert!(split_tags("").is_empty());
}

#[test]
fn test_access_level_order_and_parse() {
    assert!(AccessLevel::Public > AccessLevel::Protected);
    assert!(AccessLevel::Protected > AccessLevel::Package);
    assert!(AccessLevel::Package > AccessLevel::Private);
    assert_eq!(AccessLevel::parse("PUBLIC"), Some(AccessLevel::Public));
    assert_eq!(AccessLevel::parse("friend"), None);
}

#[test]
fn test_load_project_file_then_env_then_cli() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("published.toml"),
        r#"
        [policy]
        tags = ["from-file"]
        [output]
        path = "file.config"
        "#,
    )
    .unwrap();

    let config = PublishedConfig::load(dir.path(), None, None).unwrap();
    assert_eq!(config.policy.tags, vec!["from-file"]);
    assert_eq!(config.output.path, Some(PathBuf::from("file.config")));

    std::env::set_var("PUBLISHED_TAGS", "from-env,second");
    let config = PublishedConfig::load(dir.path(), None, None).unwrap();
    assert_eq!(config.policy.tags, vec!["from-env", "second"]);
    assert_eq!(config.output.path, Some(PathBuf::from("file.config")));

    let cli = CliOverrides {
        tags: Some(vec!["from-cli".into()]),
        output: Some(PathBuf::from("cli.config")),
        ..Default::default()
    };
    let config = PublishedConfig::load(dir.path(), None, Some(&cli)).unwrap();
    assert_eq!(config.policy.tags, vec!["from-cli"]);
    assert_eq!(config.output.path, Some(PathBuf::from("cli.config")));

    clear_env();
}

#[test]
fn test_load_invalid_env_access() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempfile::tempdir().unwrap();

    std::env::set_var("PUBLISHED_ACCESS", "friend");
    let result = PublishedConfig::load(dir.path(), None, None);
    clear_env();

    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}

#[test]
fn test_load_explicit_file_must_exist() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    let result = PublishedConfig::load(dir.path(), Some(&missing), None);
    assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
}

#[test]
fn test_load_without_project_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempfile::tempdir().unwrap();

    let config = PublishedConfig::load(dir.path(), None, None).unwrap();
    assert_eq!(config, PublishedConfig::default());
}

#[test]
fn test_to_toml_roundtrip_preserves_tags() {
    let mut config = PublishedConfig::default();
    config.policy.tags = vec!["architect".into()];
    config.output.path = Some(PathBuf::from("out.config"));

    let text = config.to_toml().unwrap();
    let back = PublishedConfig::from_toml(&text).unwrap();
    assert_eq!(back, config);
}
