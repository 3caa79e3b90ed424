//! Configuration module.
//!
//! This module handles:
//! - Reading configuration from the environment (a `.env` file is honored)
//! - CLI argument merging
//! - Configuration and target validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{AccountConfig, BrowserConfig, Config};
pub use modes::DownloadMode;
pub use validation::{parse_shortcode, validate_config, validate_profile_name};
