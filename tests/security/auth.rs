//! JWT and authentication security tests.
//!
//! Verifies token signing, algorithm handling, secret strength,
//! and RFC 7235 compliance for Bearer token extraction.

use pantry::auth;
use pantry::config::Auth as AuthConfig;

fn config(secret: &str) -> AuthConfig {
    AuthConfig {
        jwt_secret: secret.to_string(),
        token_expiry_days: 30,
    }
}

/// The JWT layer rejects secrets shorter than 32 bytes.
#[test]
fn rejects_short_secret() {
    assert!(
        auth::create_token(&config("x"), "user-1").is_err(),
        "Short secret should be rejected"
    );
    assert!(auth::create_token(&config(""), "user-1").is_err());
}

/// `Validation::default()` restricts to HS256, so a token forged with
/// `"alg":"none"` must be rejected.
#[test]
fn rejects_none_algorithm_token() {
    use base64::Engine;
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header = engine.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload = engine.encode(
        serde_json::json!({"sub":"admin","exp":9999999999i64,"iat":1700000000}).to_string(),
    );
    let forged = format!("{header}.{payload}.");

    let cfg = config("real_secret_that_is_at_least_32b!");
    assert!(auth::verify_token(&cfg, &forged).is_err());
}

/// Rotating the signing key invalidates all outstanding tokens.
#[test]
fn key_rotation_invalidates_old_tokens() {
    let old = config("old_secret_key_production_32byte!");
    let new = config("new_secret_key_production_32byte!");
    let token = auth::create_token(&old, "user-1").unwrap();
    assert!(auth::verify_token(&new, &token).is_err());
}

/// A token whose expiry has passed is reported as expired, not just invalid.
#[test]
fn expired_token_is_reported() {
    let cfg = config("expiry_secret_that_is_32_bytes!!");
    let claims = auth::Claims {
        sub: "user-1".into(),
        exp: 1_000_000_000,
        iat: 999_999_000,
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
    )
    .unwrap();
    assert!(matches!(
        auth::verify_token(&cfg, &token),
        Err(pantry::Error::TokenExpired)
    ));
}

/// RFC 7235 says the auth-scheme is case-insensitive.
#[test]
fn bearer_prefix_is_case_insensitive() {
    let cfg = config("test_secret_that_is_at_least_32b!");
    let token = auth::create_token(&cfg, "user-1").unwrap();

    let mut headers = hyper::http::HeaderMap::new();
    headers.insert("Authorization", format!("bearer {token}").parse().unwrap());
    assert_eq!(auth::extract_user_id(&headers, &cfg).unwrap(), "user-1");
}
