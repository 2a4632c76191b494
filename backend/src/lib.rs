//! Bookshelf backend
//!
//! GraphQL API for user registration, login, and a personal list of saved
//! books per user, over a SQLite store.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod graphql;
pub mod services;

pub use app::{AppState, build_app};
