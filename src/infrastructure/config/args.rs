use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

use crate::domain::entities::MemberDirectory;

#[derive(Debug, Parser)]
#[command(
    name = "oxiline",
    version,
    about = "Resolve a chat message into styled inline content",
    long_about = None
)]
pub struct CliArgs {
    /// Message text to render.
    #[arg(value_name = "TEXT")]
    pub message: Option<String>,

    /// Channel member as ID=NAME (repeatable).
    #[arg(short, long = "member", value_name = "ID=NAME", value_parser = parse_member)]
    pub members: Vec<(String, String)>,

    /// Channel identifier passed through to member lookup.
    #[arg(long, value_name = "ID")]
    pub channel: Option<String>,

    /// Embed JSON file to render as a card.
    #[arg(long, value_name = "PATH")]
    pub embed: Option<PathBuf>,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Edge length of inline images and emotes.
    #[arg(long)]
    pub inline_image_size: Option<u32>,

    /// Fetch timeout in seconds.
    #[arg(long)]
    pub fetch_timeout_secs: Option<u64>,

    /// Platform to pick from track lookups (e.g. appleMusic, youtube).
    #[arg(long)]
    pub track_platform: Option<String>,

    /// Columns in the embed field grid.
    #[arg(long)]
    pub grid_columns: Option<usize>,
}

impl CliArgs {
    /// Builds the member directory from `--member` flags.
    #[must_use]
    pub fn member_directory(&self) -> MemberDirectory {
        self.members.iter().cloned().collect()
    }
}

fn parse_member(value: &str) -> Result<(String, String), String> {
    let (id, name) = value
        .split_once('=')
        .ok_or_else(|| format!("expected ID=NAME, got `{value}`"))?;
    if id.is_empty() {
        return Err("member id must not be empty".to_string());
    }
    Ok((id.to_string(), name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_parse() {
        let args = CliArgs::parse_from(["oxiline", "-m", "42=Nova", "--member", "7=Ash Gray", "hi"]);
        let members = args.member_directory();

        assert_eq!(args.message.as_deref(), Some("hi"));
        assert_eq!(members.display_name("42"), Some("Nova"));
        assert_eq!(members.display_name("7"), Some("Ash Gray"));
    }

    #[test]
    fn test_member_without_separator_rejected() {
        let result = CliArgs::try_parse_from(["oxiline", "--member", "42"]);
        assert!(result.is_err());
    }
}
