//! SQLite repository modules
//!
//! Repository functions operate on a `SqlitePool` and return row types
//! from `crate::data::types`.

pub mod friend;
pub mod permission;
pub mod playlist;
pub mod user;
