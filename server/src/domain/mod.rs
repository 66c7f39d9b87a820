//! Domain services
//!
//! Business rules over the storage layer. Each service wraps the
//! transactional store and enforces authorization and validation
//! before touching data.

pub mod access;
pub mod error;
pub mod friends;
pub mod playlists;
pub mod sharing;
pub mod users;

pub use error::DomainError;
pub use friends::FriendService;
pub use playlists::PlaylistService;
pub use sharing::SharingService;
pub use users::UserService;
