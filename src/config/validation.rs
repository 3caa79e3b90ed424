//! Configuration and target validation logic.

use regex::Regex;

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Maximum profile name length the platform allows.
const MAX_PROFILE_NAME_LENGTH: usize = 30;

/// Validate the configuration before any network activity.
///
/// Missing credentials are fatal here, with exit code 1 handled by the
/// caller.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.account.username.is_empty() {
        return Err(Error::MissingConfig(
            "INSTAGRAM_USERNAME (or test_username) must be set in the environment or .env"
                .to_string(),
        ));
    }

    if config.account.password.is_empty() {
        return Err(Error::MissingConfig(
            "INSTAGRAM_PASSWORD (or test_password) must be set in the environment or .env"
                .to_string(),
        ));
    }

    if let Some(proxy) = &config.proxy_url {
        if !proxy.contains("://") {
            return Err(Error::ConfigValidation {
                field: "proxy_url".to_string(),
                message: format!(
                    "Proxy URL '{}' has no scheme. Use e.g. socks5h://host:port or http://host:port.",
                    proxy
                ),
            });
        }
    }

    Ok(())
}

/// Validate a profile name target.
///
/// Profile names are 1-30 characters: letters, digits, periods, underscores.
pub fn validate_profile_name(name: &str) -> Result<String> {
    let clean = name.trim().trim_start_matches('@');

    if clean.is_empty() || clean.len() > MAX_PROFILE_NAME_LENGTH {
        return Err(Error::ConfigValidation {
            field: "target".to_string(),
            message: format!(
                "Profile name '{}' must be 1-{} characters",
                name, MAX_PROFILE_NAME_LENGTH
            ),
        });
    }

    let pattern = Regex::new(r"^[A-Za-z0-9._]+$").unwrap();
    if !pattern.is_match(clean) {
        return Err(Error::ConfigValidation {
            field: "target".to_string(),
            message: format!(
                "Profile name '{}' contains invalid characters. Only letters, digits, periods, and underscores allowed.",
                name
            ),
        });
    }

    Ok(clean.to_string())
}

/// Extract a post shortcode from a direct code or a post URL.
///
/// Accepts the bare shortcode (e.g. `B_K4CykAOtf`) or a full post URL
/// (`https://www.instagram.com/p/B_K4CykAOtf/`, `/reel/...` included).
pub fn parse_shortcode(input: &str) -> Result<String> {
    let input = input.trim();

    if input.starts_with("http://") || input.starts_with("https://") {
        let url_pattern = Regex::new(r"/(?:p|reel|tv)/([A-Za-z0-9_-]{5,})").unwrap();

        if let Some(captures) = url_pattern.captures(input) {
            if let Some(code) = captures.get(1) {
                return Ok(code.as_str().to_string());
            }
        }

        return Err(Error::ConfigValidation {
            field: "target".to_string(),
            message: format!("Could not extract a shortcode from URL: {}", input),
        });
    }

    let code_pattern = Regex::new(r"^[A-Za-z0-9_-]{5,}$").unwrap();
    if code_pattern.is_match(input) {
        return Ok(input.to_string());
    }

    Err(Error::ConfigValidation {
        field: "target".to_string(),
        message: format!(
            "Invalid shortcode: '{}'. Must be the code from a post URL (instagram.com/p/SHORTCODE/).",
            input
        ),
    })
}
