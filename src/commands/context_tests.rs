use tempfile::TempDir;

use super::*;

fn config_with_root(root: &str) -> Config {
    let mut config = Config::default();
    config.source.root = Some(root.to_string());
    config
}

#[test]
fn overrides_replace_only_given_values() {
    let mut config = config_with_root("/srv/a");
    config.source.login = Some("cfg-user".to_string());
    let args = SourceArgs {
        root: Some("/srv/b".to_string()),
        encoding: Some("koi8-r".to_string()),
        concurrency: Some(2),
        ..SourceArgs::default()
    };

    apply_source_overrides(&mut config, &args);

    assert_eq!(config.source.root.as_deref(), Some("/srv/b"));
    assert_eq!(config.source.login.as_deref(), Some("cfg-user"));
    assert_eq!(config.source.encoding, "koi8-r");
    assert_eq!(config.runner.concurrency, 2);
}

#[test]
fn settings_for_ftp_root() {
    let mut config = config_with_root("ftp://10.1.2.3:2121/%CE%F2%F7%E5%F2%FB");
    config.source.login = Some("user".to_string());
    config.source.password = Some("pw".to_string());

    let settings = SourceSettings::from_config(&config).unwrap();

    let RootLocator::Ftp(endpoint) = &settings.locator else {
        panic!("expected ftp locator");
    };
    assert_eq!(endpoint.port, 2121);
    assert_eq!(endpoint.path.components(), ["Отчеты"]);
    assert_eq!(settings.credentials.login, "user");
    assert_eq!(settings.credentials.password, "pw");
    assert_eq!(settings.timeout, Duration::from_secs(30));
}

#[test]
fn missing_login_is_anonymous() {
    let settings = SourceSettings::from_config(&config_with_root("ftp://host/")).unwrap();

    assert_eq!(settings.credentials.login, "anonymous");
    assert_eq!(settings.credentials.password, "");
}

#[test]
fn zero_concurrency_means_sequential() {
    let mut config = config_with_root("/srv");
    config.runner.concurrency = 0;

    assert_eq!(SourceSettings::from_config(&config).unwrap().concurrency, 1);
}

#[test]
fn unset_root_is_config_error() {
    let err = SourceSettings::from_config(&Config::default()).unwrap_err();

    assert!(matches!(err, ReportGuardError::Config(_)));
}

#[test]
fn zero_timeout_is_config_error() {
    let mut config = config_with_root("ftp://host/");
    config.source.timeout_secs = 0;

    let err = SourceSettings::from_config(&config).unwrap_err();

    assert!(matches!(err, ReportGuardError::Config(ref m) if m.contains("timeout_secs")));
}

#[test]
fn unknown_encoding_is_config_error() {
    let mut config = config_with_root("/srv");
    config.source.encoding = "nope".to_string();

    assert!(matches!(
        SourceSettings::from_config(&config),
        Err(ReportGuardError::Config(_))
    ));
}

#[test]
fn no_config_skips_files() {
    let config = load_config(Some(Path::new("/definitely/missing.toml")), true).unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn explicit_config_path_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[runner]\nconcurrency = 9\n").unwrap();

    let config = load_config(Some(&path), false).unwrap();

    assert_eq!(config.runner.concurrency, 9);
}

#[test]
fn color_choice_maps_to_mode() {
    assert_eq!(color_choice_to_mode(ColorChoice::Never), ColorMode::Never);
    assert_eq!(color_choice_to_mode(ColorChoice::Always), ColorMode::Always);
    assert_eq!(color_choice_to_mode(ColorChoice::Auto), ColorMode::Auto);
}

#[test]
fn report_error_returns_config_exit_code() {
    let code = report_error(&ReportGuardError::Config("x".to_string()), ColorChoice::Never);

    assert_eq!(code, EXIT_CONFIG_ERROR);
}
