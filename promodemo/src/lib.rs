//! A demonstration wiring of the promotional bundle service.
//!
//! This crate assembles the SQLite repository, the Axum REST surface and a
//! JWT-based authorization scheme into a runnable admin-panel backend, plus
//! an optional demo-catalog seeding step for trying the API out locally.

mod cli;
mod config;
pub mod impls;
pub mod seed;

pub use cli::Cli;
pub use config::AppConfig;
