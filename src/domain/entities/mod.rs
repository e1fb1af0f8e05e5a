//! Domain entity definitions.

mod embed;
mod member_directory;
mod request;
mod resolved_unit;
mod styled_text;
mod token;

pub use embed::{Embed, EmbedAuthor, EmbedField, EmbedMedia};
pub use member_directory::MemberDirectory;
pub use request::{CachePolicy, CachedResponse, FetchRequest, RequestKey};
pub use resolved_unit::{Fragment, InlineImage, ResolvedUnit, UnitKey};
pub use styled_text::StyledText;
pub use token::{Token, TokenKind};
