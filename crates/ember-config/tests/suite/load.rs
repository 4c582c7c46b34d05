use ember_config::{ConfigError, EmberConfig, DEFAULT_TYPED_ARRAY_ELEMENT_LIMIT};

#[test]
fn empty_file_yields_defaults() {
    let config = EmberConfig::load_from_str("").expect("empty config should parse");
    assert_eq!(config, EmberConfig::default());
    assert_eq!(
        config.inspector.typed_array_element_limit,
        DEFAULT_TYPED_ARRAY_ELEMENT_LIMIT
    );
}

#[test]
fn load_from_path_reads_every_section() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ember.toml");
    std::fs::write(
        &path,
        r#"
[logging]
level = "ember_runtime=debug,warn"
json = true
stderr = false

[inspector]
typed_array_element_limit = 64
"#,
    )
    .expect("write config");

    let config = EmberConfig::load_from_path(&path).expect("config should load");
    assert_eq!(config.logging.level, "ember_runtime=debug,warn");
    assert!(config.logging.json);
    assert!(!config.logging.stderr);
    assert_eq!(config.logging.file, None);
    assert_eq!(config.inspector.typed_array_element_limit, 64);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = EmberConfig::load_from_str("[inspector]\nmax_elements = 3\n")
        .expect_err("unknown key should fail");
    match err {
        ConfigError::Toml(message) => assert!(
            message.contains("max_elements"),
            "unexpected message: {message}"
        ),
        other => panic!("expected toml error, got {other:?}"),
    }
}

#[test]
fn toml_errors_do_not_echo_input() {
    let err = EmberConfig::load_from_str("[logging]\nlevel = \"debug\"\njson = \"nope-secret\"\n")
        .expect_err("type mismatch should fail");
    let ConfigError::Toml(message) = err else {
        panic!("expected toml error");
    };
    assert!(!message.contains("json = "), "snippet leaked: {message}");
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.toml");
    let err = EmberConfig::load_from_path(&path).expect_err("missing file should fail");
    match err {
        ConfigError::Io { path: reported, .. } => {
            assert_eq!(reported, path.display().to_string());
        }
        other => panic!("expected io error, got {other:?}"),
    }
}
