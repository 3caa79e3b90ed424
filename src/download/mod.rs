//! Download module.
//!
//! This module provides:
//! - Download state tracking
//! - Profile downloading (timeline plus profile picture)
//! - Single post downloading
//! - Media file downloading

pub mod media;
pub mod post;
pub mod profile;
pub mod state;

pub use media::download_post_media;
pub use post::download_post;
pub use profile::download_profile;
pub use state::DownloadState;
