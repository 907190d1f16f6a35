//! Error information-disclosure tests.
//!
//! Server-side failures must reach the client as a generic message; the
//! `Display` text of internal variants can carry SQL or file paths.

use pantry::Error;

fn body_of(err: Error) -> (u16, String) {
    let resp = err.into_response();
    let status = resp.status().as_u16();
    let bytes = tokio_test::block_on(http_body_util::BodyExt::collect(resp.into_body()))
        .unwrap()
        .to_bytes();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[test]
fn internal_error_hides_sql() {
    let (status, body) = body_of(Error::Internal(
        "Failed to query SELECT * FROM ingredients WHERE user_id = 'x'".into(),
    ));
    assert_eq!(status, 500);
    assert!(!body.contains("SELECT"), "SQL fragment leaked to client: {body}");
    assert!(body.contains("Internal server error"));
}

#[test]
fn io_error_hides_paths() {
    let io_err = std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "No such file: /var/lib/pantry/pantry.db",
    );
    let (status, body) = body_of(Error::Io(io_err));
    assert_eq!(status, 500);
    assert!(!body.contains("/var/lib"), "Filesystem path leaked to client: {body}");
}

#[test]
fn validation_error_is_shown_with_field() {
    let (status, body) = body_of(Error::validation("name", "may not be blank"));
    assert_eq!(status, 400);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["field"], "name");
    assert_eq!(json["error"], "Invalid name: may not be blank");
}
