//! Recipes and their many-to-many link to ingredients.

use std::fmt;
use std::str::FromStr;

use libsql::{Connection, params};
use uuid::Uuid;

use super::Ingredient;
use crate::{Error, Result};

/// Largest price representable with five digits and two decimal places.
const MAX_PRICE_CENTS: i64 = 99_999;

/// A non-negative decimal amount with two decimal places, stored as cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(i64);

impl Price {
    pub fn from_cents(cents: i64) -> Result<Self> {
        if !(0..=MAX_PRICE_CENTS).contains(&cents) {
            return Err(Error::validation(
                "price",
                "must be between 0.00 and 999.99",
            ));
        }
        Ok(Self(cents))
    }

    pub fn cents(self) -> i64 {
        self.0
    }
}

impl FromStr for Price {
    type Err = Error;

    /// Accepts `12`, `12.5` and `12.50`; rejects signs, exponents and more
    /// than two decimal places.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::validation("price", format!("{s:?} is not a valid amount"));
        let (whole, frac) = s.trim().split_once('.').unwrap_or((s.trim(), ""));

        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !digits(whole) || !digits(frac) || frac.len() > 2 {
            return Err(invalid());
        }

        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };
        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .ok_or_else(invalid)?;
        Self::from_cents(cents)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Fields supplied when creating a recipe.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub title: String,
    pub time_minutes: u32,
    pub price: Price,
}

/// A stored recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: i64,
    pub owner: Uuid,
    pub title: String,
    pub time_minutes: u32,
    pub price: Price,
}

/// Store a recipe for `owner`. It starts with no ingredients.
pub async fn create(conn: &Connection, owner: Uuid, new: NewRecipe) -> Result<Recipe> {
    let title = super::clean_label("title", &new.title)?;
    conn.execute(
        "INSERT INTO recipes (user_id, title, time_minutes, price_cents) VALUES (?1, ?2, ?3, ?4)",
        params![
            owner.to_string(),
            title.clone(),
            i64::from(new.time_minutes),
            new.price.cents()
        ],
    )
    .await?;
    let id = conn.last_insert_rowid();

    tracing::debug!(user = %owner, recipe = id, "Created recipe {title:?}");
    Ok(Recipe {
        id,
        owner,
        title,
        time_minutes: new.time_minutes,
        price: new.price,
    })
}

/// Link an ingredient to a recipe. Linking twice is a no-op.
///
/// Both must belong to the same user.
pub async fn add_ingredient(
    conn: &Connection,
    recipe: &Recipe,
    ingredient: &Ingredient,
) -> Result<()> {
    if recipe.owner != ingredient.owner {
        return Err(Error::validation(
            "ingredients",
            format!(
                "ingredient {} does not belong to the recipe's owner",
                ingredient.id
            ),
        ));
    }
    conn.execute(
        "INSERT OR IGNORE INTO recipe_ingredients (recipe_id, ingredient_id) VALUES (?1, ?2)",
        params![recipe.id, ingredient.id],
    )
    .await?;
    Ok(())
}

/// Ids of the ingredients linked to a recipe, ascending.
pub async fn ingredient_ids(conn: &Connection, recipe_id: i64) -> Result<Vec<i64>> {
    let mut rows = conn
        .query(
            "SELECT ingredient_id FROM recipe_ingredients WHERE recipe_id = ?1 ORDER BY ingredient_id",
            params![recipe_id],
        )
        .await?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next().await? {
        ids.push(row.get::<i64>(0)?);
    }
    Ok(ids)
}
