//! Custom emote CDN URLs.

/// Builds the icon URL for a custom emote at the given size.
#[must_use]
pub fn emote_url(base: &str, emote_id: &str, size: u32) -> String {
    format!("{}/{emote_id}.png?size={size}", base.trim_end_matches('/'))
}
