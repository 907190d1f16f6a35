//! Data access for users, ingredients, and recipes.
//!
//! Every function takes an explicit connection and, where rows are owned,
//! an explicit owner id. Nothing is scoped implicitly.

pub mod ingredient;
pub mod recipe;
pub mod user;

pub use ingredient::Ingredient;
pub use recipe::{NewRecipe, Price, Recipe};
pub use user::User;

use uuid::Uuid;

use crate::Error;

/// Longest accepted name or title, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Trim a user-supplied label and check it is non-empty and short enough.
pub(crate) fn clean_label(field: &'static str, raw: &str) -> crate::Result<String> {
    let label = raw.trim();
    if label.is_empty() {
        return Err(Error::validation(field, "may not be blank"));
    }
    if label.chars().count() > MAX_NAME_LEN {
        return Err(Error::validation(
            field,
            format!("must be at most {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(label.to_string())
}

/// Whether a write failed on a UNIQUE constraint. Local and remote
/// backends report it through different variants, so match the message.
pub(crate) fn is_unique_violation(err: &libsql::Error) -> bool {
    err.to_string().contains("UNIQUE constraint failed")
}

pub(crate) fn parse_uuid(raw: &str) -> crate::Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| Error::Internal(format!("Corrupt user id {raw:?}: {e}")))
}
