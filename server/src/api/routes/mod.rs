//! API route handlers

pub mod friends;
pub mod health;
pub mod playlists;
pub mod users;
