//! External track link resolution.

pub mod song_link;

pub use song_link::SongLinkClient;
