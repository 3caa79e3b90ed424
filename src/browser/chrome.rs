//! Browser binary and chromedriver discovery, and driver process management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::process::{Child, Command};

use crate::browser::poll::{poll_until, PollOutcome};
use crate::config::BrowserConfig;
use crate::error::{Error, Result};

/// Well-known system locations for a chromium-family browser on Linux.
const SYSTEM_BROWSER_PATHS: &[&str] = &[
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/usr/bin/google-chrome",
    "/snap/bin/chromium",
];

/// chromedriver shipped with the snap browser. Snap chromium only works with
/// its own driver (the versions must match).
const SNAP_CHROMEDRIVER: &str = "/snap/bin/chromium.chromedriver";

/// Locate a system browser binary: explicit overrides first, then the
/// well-known paths.
pub fn find_system_browser(config: &BrowserConfig) -> Option<PathBuf> {
    let overrides = [&config.chrome_binary, &config.chromium_binary];
    let candidates = overrides
        .into_iter()
        .flatten()
        .cloned()
        .chain(SYSTEM_BROWSER_PATHS.iter().map(PathBuf::from));

    pick_existing(candidates)
}

fn pick_existing(mut candidates: impl Iterator<Item = PathBuf>) -> Option<PathBuf> {
    candidates.find(|path| path.is_file())
}

/// Resolve the chromedriver binary to launch: explicit override, then the
/// snap pairing when the browser itself is a snap, then `chromedriver` from
/// PATH.
pub fn resolve_chromedriver(
    config: &BrowserConfig,
    browser_binary: Option<&Path>,
) -> PathBuf {
    if let Some(path) = &config.chromedriver_path {
        if path.is_file() {
            return path.clone();
        }
        tracing::warn!(
            "CHROMEDRIVER_PATH {} does not exist, falling back",
            path.display()
        );
    }

    if let Some(browser) = browser_binary {
        if browser.to_string_lossy().contains("/snap/") {
            let snap_driver = PathBuf::from(SNAP_CHROMEDRIVER);
            if snap_driver.is_file() {
                return snap_driver;
            }
        }
    }

    PathBuf::from("chromedriver")
}

/// Translate the configured proxy URL into the scheme the browser's
/// `--proxy-server` switch understands. Browsers do remote DNS for SOCKS
/// proxies on their own and reject the `socks5h` spelling.
pub fn browser_proxy_arg(proxy_url: &str) -> String {
    proxy_url.replacen("socks5h://", "socks5://", 1)
}

/// Remediation steps for a browser that will not start on a headless server.
pub fn startup_hints() -> &'static str {
    "\
Chrome/Chromium failed to start. On a headless server try:
  If using SNAP chromium, use snap's chromedriver (versions must match):
    CHROMEDRIVER_PATH=/snap/bin/chromium.chromedriver
  Run under a virtual display: xvfb-run -a instagrab ...
    (install: sudo apt install -y xvfb)
  Prefer APT packages (often more reliable on servers):
    sudo apt install -y chromium-browser chromium-chromedriver
  Then in .env: CHROME_BIN=/usr/bin/chromium CHROMEDRIVER_PATH=/usr/bin/chromedriver"
}

/// A running chromedriver process bound to a local port.
///
/// The child is spawned with kill-on-drop, so dropping the handle releases
/// the process.
pub struct ChromedriverHandle {
    _child: Child,
    port: u16,
}

impl ChromedriverHandle {
    /// WebDriver endpoint URL for this driver.
    pub fn server_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Spawn chromedriver on a free local port and wait until it accepts
    /// connections.
    pub async fn spawn(driver_path: &Path) -> Result<Self> {
        let port = free_local_port().await?;

        let child = Command::new(driver_path)
            .arg(format!("--port={}", port))
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::BrowserStartup(format!(
                    "could not launch chromedriver at {}: {}",
                    driver_path.display(),
                    e
                ))
            })?;

        let handle = Self {
            _child: child,
            port,
        };

        let ready = poll_until(40, Duration::from_millis(250), move || async move {
            TcpStream::connect(("127.0.0.1", port)).await.ok().map(|_| ())
        })
        .await;

        match ready {
            PollOutcome::Completed(()) => Ok(handle),
            PollOutcome::TimedOut => Err(Error::BrowserStartup(format!(
                "chromedriver did not start listening on port {}",
                port
            ))),
        }
    }
}

async fn free_local_port() -> Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_proxy_arg_translates_socks5h() {
        assert_eq!(
            browser_proxy_arg("socks5h://127.0.0.1:10808"),
            "socks5://127.0.0.1:10808"
        );
    }

    #[test]
    fn test_browser_proxy_arg_leaves_other_schemes() {
        assert_eq!(
            browser_proxy_arg("socks5://127.0.0.1:10808"),
            "socks5://127.0.0.1:10808"
        );
        assert_eq!(
            browser_proxy_arg("http://proxy:3128"),
            "http://proxy:3128"
        );
    }

    #[test]
    fn test_find_system_browser_prefers_override() {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("my-chrome");
        std::fs::write(&binary, "").unwrap();

        let config = BrowserConfig {
            headless: true,
            chrome_binary: Some(binary.clone()),
            chromium_binary: None,
            chromedriver_path: None,
        };

        assert_eq!(find_system_browser(&config), Some(binary));
    }

    #[test]
    fn test_find_system_browser_skips_missing_override() {
        let dir = tempfile::tempdir().unwrap();
        let chromium = dir.path().join("chromium");
        std::fs::write(&chromium, "").unwrap();

        let config = BrowserConfig {
            headless: true,
            chrome_binary: Some(dir.path().join("does-not-exist")),
            chromium_binary: Some(chromium.clone()),
            chromedriver_path: None,
        };

        assert_eq!(find_system_browser(&config), Some(chromium));
    }

    #[test]
    fn test_resolve_chromedriver_explicit_override() {
        let dir = tempfile::tempdir().unwrap();
        let driver = dir.path().join("chromedriver");
        std::fs::write(&driver, "").unwrap();

        let config = BrowserConfig {
            headless: true,
            chrome_binary: None,
            chromium_binary: None,
            chromedriver_path: Some(driver.clone()),
        };

        assert_eq!(resolve_chromedriver(&config, None), driver);
    }

    #[test]
    fn test_resolve_chromedriver_defaults_to_path_lookup() {
        let config = BrowserConfig {
            headless: true,
            chrome_binary: None,
            chromium_binary: None,
            chromedriver_path: None,
        };

        assert_eq!(
            resolve_chromedriver(&config, Some(Path::new("/usr/bin/chromium"))),
            PathBuf::from("chromedriver")
        );
    }
}
