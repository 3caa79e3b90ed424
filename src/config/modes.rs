//! Download mode definitions.

use std::fmt;
use std::str::FromStr;

/// What the single CLI invocation downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadMode {
    /// Download a profile's timeline posts and profile picture.
    Profile,
    /// Download a single post by shortcode.
    Post,
}

impl fmt::Display for DownloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadMode::Profile => write!(f, "profile"),
            DownloadMode::Post => write!(f, "post"),
        }
    }
}

impl FromStr for DownloadMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "profile" => Ok(DownloadMode::Profile),
            "post" => Ok(DownloadMode::Post),
            _ => Err(format!("Unknown download mode: {}", s)),
        }
    }
}
