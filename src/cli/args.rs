//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, DownloadMode};

/// One-shot Instagram downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "instagrab",
    version,
    about = "Download Instagram profiles and single posts",
    long_about = "A one-shot CLI to download Instagram content.\n\n\
                  profile mode downloads a user's posts and profile picture;\n\
                  post mode downloads one post by its shortcode (the code from instagram.com/p/SHORTCODE/)."
)]
pub struct Args {
    /// What to download.
    #[arg(value_enum)]
    pub mode: ModeArg,

    /// Username (e.g. instagram) or post shortcode (e.g. B_K4CykAOtf).
    pub target: String,

    /// Base directory for downloads.
    #[arg(short = 'd', long = "directory", env = "DOWNLOAD_DIR")]
    pub download_directory: Option<PathBuf>,

    /// Session file path override.
    #[arg(long = "session-file", env = "SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Proxy URL applied to the HTTP client and the browser
    /// (e.g. socks5h://127.0.0.1:10808).
    #[arg(long, env = "PROXY_URL")]
    pub proxy: Option<String>,

    /// Run the fallback browser with a visible window.
    #[arg(long)]
    pub no_headless: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI download mode argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Download a user's posts and profile picture.
    Profile,
    /// Download one post by shortcode.
    Post,
}

impl From<ModeArg> for DownloadMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Profile => DownloadMode::Profile,
            ModeArg::Post => DownloadMode::Post,
        }
    }
}

impl Args {
    pub fn download_mode(&self) -> DownloadMode {
        self.mode.into()
    }

    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(dir) = &self.download_directory {
            config.download_dir = dir.clone();
        }

        if let Some(path) = &self.session_file {
            config.session_file = Some(path.clone());
        }

        if let Some(proxy) = &self.proxy {
            let trimmed = proxy.trim();
            config.proxy_url = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            };
        }

        if self.no_headless {
            config.browser.headless = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_for(argv: &[&str]) -> Args {
        Args::try_parse_from(argv.iter().copied()).expect("argv should parse")
    }

    #[test]
    fn test_parse_profile_mode() {
        let args = args_for(&["instagrab", "profile", "someuser"]);
        assert!(matches!(args.mode, ModeArg::Profile));
        assert_eq!(args.target, "someuser");
    }

    #[test]
    fn test_parse_post_mode() {
        let args = args_for(&["instagrab", "post", "B_K4CykAOtf"]);
        assert!(matches!(args.mode, ModeArg::Post));
        assert_eq!(args.target, "B_K4CykAOtf");
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(Args::try_parse_from(["instagrab", "stories", "someuser"]).is_err());
    }

    #[test]
    fn test_merge_overrides() {
        let args = args_for(&[
            "instagrab",
            "profile",
            "someuser",
            "--directory",
            "/data/ig",
            "--proxy",
            "socks5h://127.0.0.1:10808",
            "--no-headless",
        ]);

        let mut config = Config::default();
        args.merge_into_config(&mut config);

        assert_eq!(config.download_dir, PathBuf::from("/data/ig"));
        assert_eq!(
            config.proxy_url.as_deref(),
            Some("socks5h://127.0.0.1:10808")
        );
        assert!(!config.browser.headless);
    }

    #[test]
    fn test_merge_blank_proxy_clears() {
        let args = args_for(&["instagrab", "profile", "someuser", "--proxy", "  "]);

        let mut config = Config::default();
        config.proxy_url = Some("socks5h://old:1".to_string());
        args.merge_into_config(&mut config);

        assert!(config.proxy_url.is_none());
    }
}
