//! Instagram web API module.
//!
//! This module provides:
//! - HTTP client with cookie session, proxy, and authenticated requests
//! - Native password login against the web login endpoint
//! - Profile, timeline, and single-post lookups
//! - Streaming media download

pub mod client;
pub mod login;
pub mod types;

pub use client::IgClient;
pub use types::{PostMedia, PostMeta, ProfileInfo, TimelinePage};
