//! Instagrab - a one-shot Instagram downloader
//!
//! This library provides functionality for downloading Instagram content to
//! local disk: a profile's full timeline (plus profile picture), or a single
//! post by shortcode.
//!
//! # Features
//!
//! - Session reuse via a per-username session file
//! - Native password login against the web login endpoint
//! - Headless-browser login fallback for interactive checkpoints
//! - Proxy support (HTTP and SOCKS) for both the HTTP client and the browser
//!
//! # Example
//!
//! ```no_run
//! use instagrab::{
//!     api::IgClient,
//!     browser::BrowserLogin,
//!     config::Config,
//!     session::{acquire_session, SessionStore},
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env();
//!     let store = SessionStore::new(config.session_file());
//!     let mut client = IgClient::new(&config)?;
//!     let browser = BrowserLogin::new(&config);
//!     acquire_session(&config, &store, &mut client, &browser).await?;
//!
//!     // ... download logic
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod browser;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;
pub mod session;

// Re-exports for convenience
pub use api::IgClient;
pub use browser::BrowserLogin;
pub use config::{Config, DownloadMode};
pub use download::{download_post, download_profile, DownloadState};
pub use error::{Error, Result};
pub use media::{MediaItem, MediaKind};
pub use session::{acquire_session, SessionSource, SessionStore};
