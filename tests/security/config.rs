//! Configuration security tests.

use pantry::config::{Loader, Overrides};

/// The loader strips `jwt_secret` from TOML files before applying
/// environment / CLI overrides.
#[test]
fn jwt_secret_stripped_from_config_file() {
    use std::io::Write;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[auth]
jwt_secret = "should_be_stripped"
token_expiry_days = 7
"#
    )
    .unwrap();

    let config = Loader::new("CFGTEST")
        .load(
            Some(file.path()),
            &Overrides {
                jwt_secret: Some("cli_override_secret_at_least_32_bytes"),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(
        config.auth.jwt_secret, "cli_override_secret_at_least_32_bytes",
        "CLI secret must override file secret"
    );
    assert_eq!(config.auth.token_expiry_days, 7);
}

/// Without an env or CLI secret the loader refuses to produce a config.
#[test]
fn missing_secret_is_an_error() {
    let result = Loader::new("CFGMISSING").load(None, &Overrides::default());
    assert!(matches!(result, Err(pantry::Error::Config(_))));
}

/// A secret too short to sign tokens is refused at load time, so the
/// server never starts with a key that would fail every request.
#[test]
fn short_secret_is_an_error() {
    let result = Loader::new("CFGSHORT").load(
        None,
        &Overrides {
            jwt_secret: Some("short"),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(pantry::Error::Config(_))));
}
