use serde::{Deserialize, Serialize};

/// Rich embed attached to a message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct Embed {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub color: Option<u32>,
    #[serde(default)]
    pub author: Option<EmbedAuthor>,
    #[serde(default)]
    pub image: Option<EmbedMedia>,
    #[serde(default)]
    pub video: Option<EmbedMedia>,
    #[serde(default)]
    pub thumbnail: Option<EmbedMedia>,
    #[serde(default)]
    pub fields: Vec<EmbedField>,
}

impl Embed {
    /// Returns true for embeds that are only a piece of media (`gifv`,
    /// `image`, `video`) and are drawn without card chrome.
    #[must_use]
    pub fn is_media_only(&self) -> bool {
        matches!(self.kind.as_deref(), Some("gifv" | "image" | "video"))
    }
}

/// Embed author line.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub proxy_icon_url: Option<String>,
}

impl EmbedAuthor {
    /// Icon to display, preferring the proxied copy.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.proxy_icon_url.as_deref().or(self.icon_url.as_deref())
    }
}

/// Image, thumbnail or video reference inside an embed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct EmbedMedia {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub proxy_url: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl EmbedMedia {
    /// URL to stream from, preferring the proxied copy.
    #[must_use]
    pub fn playable_url(&self) -> Option<&str> {
        self.proxy_url.as_deref().or(self.url.as_deref())
    }
}

/// Name/value pair shown in the embed field grid.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_rich_embed() {
        let json = r#"{
            "type": "rich",
            "title": "Release",
            "color": 16711680,
            "author": {"name": "bot", "icon_url": "https://a/icon.png", "proxy_icon_url": "https://p/icon.png"},
            "video": {"url": "https://v/clip.mp4", "width": 640, "height": 360},
            "fields": [{"name": "Version", "value": "1.0"}]
        }"#;
        let embed: Embed = serde_json::from_str(json).unwrap();

        assert!(!embed.is_media_only());
        assert_eq!(embed.color, Some(0x00FF_0000));
        assert_eq!(embed.author.as_ref().and_then(EmbedAuthor::icon), Some("https://p/icon.png"));
        assert_eq!(embed.video.as_ref().and_then(EmbedMedia::playable_url), Some("https://v/clip.mp4"));
        assert_eq!(embed.fields.len(), 1);
    }

    #[test]
    fn test_media_only_kinds() {
        for kind in ["gifv", "image", "video"] {
            let embed = Embed {
                kind: Some(kind.to_string()),
                ..Embed::default()
            };
            assert!(embed.is_media_only());
        }
        assert!(!Embed::default().is_media_only());
    }
}
