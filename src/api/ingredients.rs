//! `/ingredients/`: list and create the caller's ingredients.
//!
//! Both operations sit behind the auth gate and only ever touch rows owned
//! by the caller.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::module::Module;
use crate::procedure::{Empty, Meta, Procedure};
use crate::router::{Context, Router};
use crate::store::{Ingredient, ingredient};
use crate::{Error, Result, db};

pub const PATH: &str = "/ingredients/";

const TAG: &str = "ingredients";

/// Interpret the `assigned_only` flag: absent is false, otherwise an integer
/// where anything non-zero is true.
fn assigned_only(raw: Option<&str>) -> Result<bool> {
    match raw {
        None => Ok(false),
        Some(v) => v.trim().parse::<i64>().map(|n| n != 0).map_err(|_| {
            Error::BadRequest(format!("assigned_only must be an integer, got {v:?}"))
        }),
    }
}

pub struct ListIngredients;

impl Procedure for ListIngredients {
    fn meta() -> Meta {
        Meta::get(PATH)
            .summary("List the caller's ingredients, by name descending")
            .tag(TAG)
            .authenticated()
            .query(&[(
                "assigned_only",
                "1 to return only ingredients used by at least one of the caller's recipes",
            )])
    }

    type Input = Empty;
    type Output = Vec<Ingredient>;

    async fn handle(ctx: Context, _input: Empty) -> Result<Vec<Ingredient>> {
        let conn = db::connection(ctx.require_db()?).await?;
        let owner = super::caller(&ctx, &conn).await?;

        if assigned_only(ctx.query("assigned_only").as_deref())? {
            ingredient::list_assigned_to_owner(&conn, owner.id).await
        } else {
            ingredient::list_for_owner(&conn, owner.id).await
        }
    }
}

/// Request body for creating an ingredient.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NewIngredient {
    /// Display name; surrounding whitespace is dropped.
    pub name: String,
}

pub struct CreateIngredient;

impl Procedure for CreateIngredient {
    fn meta() -> Meta {
        Meta::post(PATH)
            .summary("Create an ingredient owned by the caller")
            .tag(TAG)
            .status(201)
            .authenticated()
    }

    type Input = NewIngredient;
    type Output = Ingredient;

    async fn handle(ctx: Context, input: NewIngredient) -> Result<Ingredient> {
        let conn = db::connection(ctx.require_db()?).await?;
        let owner = super::caller(&ctx, &conn).await?;
        ingredient::create(&conn, owner.id, &input.name).await
    }
}

pub struct IngredientsModule;

impl Module for IngredientsModule {
    fn name(&self) -> &'static str {
        "ingredients"
    }

    fn routes(&self, router: &mut Router) {
        router.procedure::<ListIngredients>();
        router.procedure::<CreateIngredient>();
    }
}
