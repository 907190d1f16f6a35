//! HTTP modules served by pantry.

pub mod health;
pub mod ingredients;

use libsql::Connection;
use uuid::Uuid;

use crate::router::Context;
use crate::store::{User, user};
use crate::{Error, Result};

/// Resolve the caller to a live user.
///
/// A token whose subject is not a UUID, or names a user that no longer
/// exists, is treated like a missing token.
pub(crate) async fn caller(ctx: &Context, conn: &Connection) -> Result<User> {
    let subject = ctx.require_user_id()?;
    let id = Uuid::parse_str(&subject).map_err(|_| Error::Unauthorized)?;
    user::find(conn, id).await?.ok_or(Error::Unauthorized)
}
