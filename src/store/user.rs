//! Users: the identities that own ingredients and recipes.

use libsql::{Connection, Row, params};
use uuid::Uuid;

use crate::{Error, Result};

/// A provisioned account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub created_at: jiff::Timestamp,
}

/// Lower-case the domain part and reject anything without `local@domain`.
pub fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            Ok(format!("{local}@{}", domain.to_lowercase()))
        }
        _ => Err(Error::validation("email", "must be an email address")),
    }
}

fn from_row(row: &Row) -> Result<User> {
    let id: String = row.get(0)?;
    let created_at: String = row.get(2)?;
    Ok(User {
        id: super::parse_uuid(&id)?,
        email: row.get(1)?,
        created_at: created_at
            .parse()
            .map_err(|e| Error::Internal(format!("Corrupt timestamp {created_at:?}: {e}")))?,
    })
}

async fn find_one(conn: &Connection, sql: &str, key: String) -> Result<Option<User>> {
    let mut rows = conn.query(sql, params![key]).await?;
    match rows.next().await? {
        Some(row) => Ok(Some(from_row(&row)?)),
        None => Ok(None),
    }
}

/// Provision a user. A second account with the same email is a conflict.
pub async fn create(conn: &Connection, email: &str) -> Result<User> {
    let email = normalize_email(email)?;
    let user = User {
        id: Uuid::new_v4(),
        email,
        created_at: jiff::Timestamp::now(),
    };
    conn.execute(
        "INSERT INTO users (id, email, created_at) VALUES (?1, ?2, ?3)",
        params![
            user.id.to_string(),
            user.email.clone(),
            user.created_at.to_string()
        ],
    )
    .await
    .map_err(|e| {
        if super::is_unique_violation(&e) {
            Error::Conflict(format!("User {} already exists", user.email))
        } else {
            Error::Database(e)
        }
    })?;

    tracing::info!(user = %user.id, "Created user {}", user.email);
    Ok(user)
}

/// Look up a user by id.
pub async fn find(conn: &Connection, id: Uuid) -> Result<Option<User>> {
    find_one(
        conn,
        "SELECT id, email, created_at FROM users WHERE id = ?1",
        id.to_string(),
    )
    .await
}

/// Look up a user by email, after normalisation.
pub async fn find_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    find_one(
        conn,
        "SELECT id, email, created_at FROM users WHERE email = ?1",
        normalize_email(email)?,
    )
    .await
}

/// Delete a user and, by cascade, everything they own.
/// Returns whether a row was removed.
pub async fn delete(conn: &Connection, id: Uuid) -> Result<bool> {
    let removed = conn
        .execute("DELETE FROM users WHERE id = ?1", params![id.to_string()])
        .await?;
    Ok(removed > 0)
}
