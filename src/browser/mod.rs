//! Browser-driven login fallback.
//!
//! This module provides:
//! - Discovery of a system browser binary and its matching chromedriver
//! - chromedriver process management
//! - The WebDriver login flow, including opportunistic checkpoint handling
//! - The polling abstraction both of the above wait with

pub mod chrome;
pub mod login;
pub mod poll;

pub use chrome::{browser_proxy_arg, ChromedriverHandle};
pub use login::BrowserLogin;
pub use poll::{poll_until, PollOutcome};
