mod auth;
mod config;
mod error_disclosure;
mod server;
