//! In-memory directories, used when no external directory service is wired in.

mod room;
mod user;

pub use room::InMemoryRoomDirectory;
pub use user::InMemoryUserDirectory;
