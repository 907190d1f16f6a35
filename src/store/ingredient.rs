//! Ingredients: named items owned by exactly one user.
//!
//! Listings are ordered by name descending under SQLite's binary collation
//! (so case-sensitive), with id descending as the tie-break.

use libsql::{Connection, Row, Rows, params};
use schemars::JsonSchema;
use serde::Serialize;
use uuid::Uuid;

use crate::Result;

/// An ingredient row. Serializes as `{id, name}`; the owner stays server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Ingredient {
    pub id: i64,
    #[serde(skip)]
    pub owner: Uuid,
    pub name: String,
}

const COLUMNS: &str = "i.id, i.user_id, i.name";

fn from_row(row: &Row) -> Result<Ingredient> {
    let owner: String = row.get(1)?;
    Ok(Ingredient {
        id: row.get(0)?,
        owner: super::parse_uuid(&owner)?,
        name: row.get(2)?,
    })
}

async fn collect(mut rows: Rows) -> Result<Vec<Ingredient>> {
    let mut out = Vec::new();
    while let Some(row) = rows.next().await? {
        out.push(from_row(&row)?);
    }
    Ok(out)
}

/// All of `owner`'s ingredients.
pub async fn list_for_owner(conn: &Connection, owner: Uuid) -> Result<Vec<Ingredient>> {
    let rows = conn
        .query(
            &format!(
                "SELECT {COLUMNS} FROM ingredients i
                 WHERE i.user_id = ?1
                 ORDER BY i.name DESC, i.id DESC"
            ),
            params![owner.to_string()],
        )
        .await?;
    collect(rows).await
}

/// `owner`'s ingredients that at least one of `owner`'s recipes uses.
///
/// Each ingredient appears once however many recipes reference it. Recipes
/// of other users never count, even if they point at `owner`'s rows.
pub async fn list_assigned_to_owner(conn: &Connection, owner: Uuid) -> Result<Vec<Ingredient>> {
    let rows = conn
        .query(
            &format!(
                "SELECT {COLUMNS} FROM ingredients i
                 WHERE i.user_id = ?1
                   AND EXISTS (
                       SELECT 1 FROM recipe_ingredients ri
                       JOIN recipes r ON r.id = ri.recipe_id
                       WHERE ri.ingredient_id = i.id AND r.user_id = ?1
                   )
                 ORDER BY i.name DESC, i.id DESC"
            ),
            params![owner.to_string()],
        )
        .await?;
    collect(rows).await
}

/// Fetch one of `owner`'s ingredients by id.
pub async fn get(conn: &Connection, owner: Uuid, id: i64) -> Result<Option<Ingredient>> {
    let mut rows = conn
        .query(
            &format!("SELECT {COLUMNS} FROM ingredients i WHERE i.user_id = ?1 AND i.id = ?2"),
            params![owner.to_string(), id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(from_row(&row)?)),
        None => Ok(None),
    }
}

/// Store a new ingredient for `owner`. The name is trimmed and must be
/// non-blank; duplicates are allowed.
pub async fn create(conn: &Connection, owner: Uuid, name: &str) -> Result<Ingredient> {
    let name = super::clean_label("name", name)?;
    conn.execute(
        "INSERT INTO ingredients (user_id, name) VALUES (?1, ?2)",
        params![owner.to_string(), name.clone()],
    )
    .await?;
    let id = conn.last_insert_rowid();

    tracing::info!(user = %owner, ingredient = id, "Created ingredient {name:?}");
    Ok(Ingredient { id, owner, name })
}
