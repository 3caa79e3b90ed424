//! Session acquisition and persistence.
//!
//! This module provides:
//! - The persisted session store (one file per username)
//! - The session acquisition decision procedure: cached session, then native
//!   login, then browser fallback
//! - The trait seams the procedure runs over, so it can be exercised with
//!   fakes

pub mod acquire;
pub mod store;

pub use acquire::{
    acquire_session, InteractiveLogin, PlatformLogin, SessionSource, SESSION_COOKIE,
};
pub use store::{CachedSession, SessionData, SessionStore};
