//! Presentation layer with message view state and terminal output.

/// Frame clock for animated inline images.
pub mod animation_clock;
/// Embed card model.
pub mod embed_card;
/// Per-message view state.
pub mod message_view;
/// ANSI terminal output.
pub mod terminal;

pub use animation_clock::AnimationClock;
pub use embed_card::{EmbedCard, fit_media_frame};
pub use message_view::MessageView;
