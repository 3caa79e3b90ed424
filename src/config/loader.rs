//! Configuration structures and environment loading.

use std::env;
use std::path::PathBuf;

/// Main configuration structure.
///
/// Built once at startup from the environment (plus CLI overrides) and passed
/// by reference everywhere; there is no process-wide configuration state.
#[derive(Debug, Clone)]
pub struct Config {
    pub account: AccountConfig,

    /// Base directory for downloads. Also hosts the default session file.
    pub download_dir: PathBuf,

    /// Explicit session file override. When unset, the session file lives at
    /// `<download_dir>/session-<username>`.
    pub session_file: Option<PathBuf>,

    /// Proxy URL for the HTTP client and, translated, for the browser.
    /// SOCKS and HTTP schemes are both accepted.
    pub proxy_url: Option<String>,

    pub browser: BrowserConfig,
}

/// Account credentials.
#[derive(Debug, Clone, Default)]
pub struct AccountConfig {
    pub username: String,
    pub password: String,
}

/// Browser fallback settings.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run the browser without a visible display.
    pub headless: bool,

    /// Browser binary override (`CHROME_BIN`).
    pub chrome_binary: Option<PathBuf>,

    /// Browser binary override (`CHROMIUM_BIN`), checked after `CHROME_BIN`.
    pub chromium_binary: Option<PathBuf>,

    /// chromedriver binary override (`CHROMEDRIVER_PATH`).
    pub chromedriver_path: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_binary: None,
            chromium_binary: None,
            chromedriver_path: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account: AccountConfig::default(),
            download_dir: PathBuf::from("downloads"),
            session_file: None,
            proxy_url: None,
            browser: BrowserConfig::default(),
        }
    }
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// Credentials accept the test-credential alternates used by the
    /// downstream test environment (`test_username` / `test_password`).
    /// Never fails; missing values surface later in validation.
    pub fn from_env() -> Self {
        let account = AccountConfig {
            username: env_nonempty("INSTAGRAM_USERNAME")
                .or_else(|| env_nonempty("test_username"))
                .unwrap_or_default(),
            password: env_nonempty("INSTAGRAM_PASSWORD")
                .or_else(|| env_nonempty("test_password"))
                .unwrap_or_default(),
        };

        let browser = BrowserConfig {
            headless: env_nonempty("BROWSER_HEADLESS")
                .map(|v| is_truthy(&v))
                .unwrap_or(true),
            chrome_binary: env_nonempty("CHROME_BIN").map(PathBuf::from),
            chromium_binary: env_nonempty("CHROMIUM_BIN").map(PathBuf::from),
            chromedriver_path: env_nonempty("CHROMEDRIVER_PATH").map(PathBuf::from),
        };

        Self {
            account,
            download_dir: PathBuf::from("downloads"),
            session_file: None,
            proxy_url: None,
            browser,
        }
    }

    /// Effective session file path: the explicit override, or a file named
    /// after the username under the download directory.
    pub fn session_file(&self) -> PathBuf {
        self.session_file.clone().unwrap_or_else(|| {
            self.download_dir
                .join(format!("session-{}", self.account.username))
        })
    }
}

/// Read an environment variable, treating empty or whitespace-only values as
/// absent.
fn env_nonempty(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Err(_) => None,
    }
}

/// Accepts the same truthy spellings as the reference tooling.
fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("YES"));
        assert!(is_truthy(" True "));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("no"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn test_session_file_default() {
        let mut config = Config::default();
        config.account.username = "alice".to_string();
        config.download_dir = PathBuf::from("/data");

        assert_eq!(config.session_file(), PathBuf::from("/data/session-alice"));
    }

    #[test]
    fn test_session_file_override() {
        let mut config = Config::default();
        config.account.username = "alice".to_string();
        config.session_file = Some(PathBuf::from("/tmp/my-session"));

        assert_eq!(config.session_file(), PathBuf::from("/tmp/my-session"));
    }
}
