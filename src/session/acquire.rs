//! Session acquisition decision procedure.
//!
//! Produces an authenticated client session using the cheapest available
//! method, escalating from cached session file to native password login to
//! the interactive browser fallback.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::print_warning;
use crate::session::store::{CachedSession, SessionData, SessionStore};

/// The cookie that defines a logged-in session. Browser-fallback success is
/// strictly "this cookie is present".
pub const SESSION_COOKIE: &str = "sessionid";

/// Platform client operations the acquisition procedure needs.
#[async_trait]
pub trait PlatformLogin {
    /// Install a cached session and verify it against the platform.
    /// `Ok(false)` means the platform rejected the cookies.
    async fn restore_session(&mut self, session: &SessionData) -> Result<bool>;

    /// Native username/password login. `Error::LoginDenied` is the
    /// recoverable outcome; everything else propagates.
    async fn native_login(&mut self, username: &str, password: &str) -> Result<()>;

    /// Import cookies extracted from a browser into the client session.
    async fn import_session_cookies(
        &mut self,
        username: &str,
        cookies: &HashMap<String, String>,
    ) -> Result<()>;

    /// Snapshot the current session for persistence.
    fn session_snapshot(&self) -> Result<SessionData>;

    /// Re-apply the configured proxy to the client. Called after any step
    /// that may have replaced the underlying HTTP session.
    fn reapply_proxy(&mut self) -> Result<()>;
}

/// Interactive login fallback (a driven browser).
#[async_trait]
pub trait InteractiveLogin {
    /// Perform the interactive login and return all extracted cookies.
    async fn login(&self) -> Result<HashMap<String, String>>;
}

/// Which method produced the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSource {
    CachedFile,
    NativeLogin,
    BrowserFallback,
}

impl fmt::Display for SessionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionSource::CachedFile => write!(f, "cached session"),
            SessionSource::NativeLogin => write!(f, "native login"),
            SessionSource::BrowserFallback => write!(f, "browser login"),
        }
    }
}

/// Acquire an authenticated session for the configured username.
///
/// 1. Cached session file, if present and still accepted by the platform.
/// 2. Native password login, attempted exactly once.
/// 3. Browser fallback, when native login was denied (checkpoint etc.).
///
/// Any successful step persists the session and re-applies the proxy.
/// Browser failure is terminal.
pub async fn acquire_session<C, B>(
    config: &Config,
    store: &SessionStore,
    client: &mut C,
    browser: &B,
) -> Result<SessionSource>
where
    C: PlatformLogin + Send,
    B: InteractiveLogin + Sync,
{
    let username = &config.account.username;

    match store.load(username) {
        CachedSession::Loaded(data) => match client.restore_session(&data).await {
            Ok(true) => {
                tracing::info!("reusing cached session for {}", username);
                client.reapply_proxy()?;
                return Ok(SessionSource::CachedFile);
            }
            Ok(false) => {
                tracing::info!("cached session for {} was rejected, logging in", username);
            }
            Err(e) => {
                // Could not even ask the platform; fall through and let the
                // login paths surface the real problem.
                tracing::warn!("cached session check failed: {}", e);
            }
        },
        CachedSession::Missing => {
            tracing::debug!("no session file for {}", username);
        }
        CachedSession::Invalid(reason) => {
            tracing::warn!("ignoring cached session: {}", reason);
        }
    }

    match client
        .native_login(username, &config.account.password)
        .await
    {
        Ok(()) => {
            store.save(&client.session_snapshot()?)?;
            client.reapply_proxy()?;
            return Ok(SessionSource::NativeLogin);
        }
        Err(e) if e.is_recoverable_login() => {
            print_warning(&format!(
                "Native login failed ({}). Trying browser login...",
                e
            ));
        }
        Err(e) => return Err(e),
    }

    let cookies = browser.login().await?;
    if !cookies.contains_key(SESSION_COOKIE) {
        return Err(Error::LoginFailed(format!(
            "login or checkpoint not completed: no {} cookie (set BROWSER_HEADLESS=0 to watch the browser)",
            SESSION_COOKIE
        )));
    }

    client.import_session_cookies(username, &cookies).await?;
    client.reapply_proxy()?;
    store.save(&client.session_snapshot()?)?;

    Ok(SessionSource::BrowserFallback)
}
