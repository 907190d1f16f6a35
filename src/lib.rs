//! Pantry - a recipe-management API service.
//!
//! Each user keeps their own ingredients and recipes. The HTTP surface is
//! deliberately small:
//!
//! - `GET /ingredients/` lists the caller's ingredients by name descending;
//!   `?assigned_only=1` keeps only those used by one of the caller's recipes
//! - `POST /ingredients/` creates an ingredient from `{"name": ...}`
//! - `GET /health` and `GET /openapi.json`
//!
//! The building blocks:
//!
//! - **Config**: Layered configuration (file → env → CLI)
//! - **Database**: libsql/Turso store with an idempotent schema
//! - **Auth**: JWT bearer tokens; every ingredient route is gated
//! - **Store**: per-owner data access for users, ingredients, and recipes
//! - **Router/Procedure/Module**: routing plus self-describing endpoints
//! - **Server**: Hyper-based HTTP server
//!
//! # Example
//!
//! ```ignore
//! #[tokio::main]
//! async fn main() -> pantry::Result<()> {
//!     let config = pantry::Loader::default().load(None, &Default::default())?;
//!     let db = pantry::db::open(&config.database.url).await?;
//!     let router = pantry::app::router();
//!     pantry::server::run(config, Some(db), router.into_handle()).await
//! }
//! ```

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod module;
pub mod openapi;
pub mod operation;
pub mod procedure;
pub mod response;
pub mod router;
pub mod server;
pub mod store;

// Re-export main types at crate root
pub use config::{Config, Loader};
pub use db::Handle as DbHandle;
pub use error::{Error, Result};
pub use module::Module;
pub use openapi::Info;
pub use procedure::{Empty, Meta, Procedure};
pub use router::{Context, Router};
