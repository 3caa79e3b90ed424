//! WebDriver login flow with opportunistic checkpoint handling.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::prelude::*;
use thirtyfour::{ChromeCapabilities, ChromiumLikeCapabilities};
use tokio::time::sleep;

use crate::browser::chrome::{self, ChromedriverHandle};
use crate::browser::poll::{poll_until, PollOutcome};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::InteractiveLogin;

const LOGIN_URL: &str = "https://www.instagram.com/accounts/login/";

/// The login form sometimes renders without the plain `name` attributes, so
/// each field gets a widening list of selectors to try.
const USERNAME_SELECTORS: &[&str] = &[
    r#"input[name="username"]"#,
    r#"input[name="username"], input[aria-label*="Phone"], input[aria-label*="Username"]"#,
];
const PASSWORD_SELECTORS: &[&str] = &[r#"input[name="password"]"#];

/// Form element wait: 50 x 500ms, 25 seconds total.
const ELEMENT_WAIT_ATTEMPTS: u32 = 50;
const ELEMENT_WAIT_DELAY: Duration = Duration::from_millis(500);

/// Checkpoint wait after submitting the form: 30 x 2s.
const CHECKPOINT_POLL_ATTEMPTS: u32 = 30;
const CHECKPOINT_POLL_DELAY: Duration = Duration::from_secs(2);

/// Headless-browser login: drives a chromium through the login form and, when
/// the platform raises an interactive checkpoint, clicks through the
/// confirmation UI it can find.
pub struct BrowserLogin<'a> {
    config: &'a Config,
}

impl<'a> BrowserLogin<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    async fn start(&self) -> Result<(ChromedriverHandle, WebDriver)> {
        let browser_binary = chrome::find_system_browser(&self.config.browser);
        match &browser_binary {
            Some(path) => tracing::debug!("using browser binary {}", path.display()),
            None => tracing::debug!("no system browser found, driver default applies"),
        }

        let driver_path =
            chrome::resolve_chromedriver(&self.config.browser, browser_binary.as_deref());
        let handle = ChromedriverHandle::spawn(&driver_path).await?;

        let mut caps = self.capabilities()?;
        if let Some(binary) = &browser_binary {
            caps.set_binary(&binary.to_string_lossy())?;
        }

        let driver = WebDriver::new(&handle.server_url(), caps)
            .await
            .map_err(|e| Error::BrowserStartup(format!("webdriver session: {}", e)))?;

        Ok((handle, driver))
    }

    fn capabilities(&self) -> Result<ChromeCapabilities> {
        let mut caps = DesiredCapabilities::chrome();

        if self.config.browser.headless {
            caps.add_arg("--headless=new")?;
        }
        for arg in [
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--disable-gpu",
            "--disable-software-rasterizer",
            "--disable-extensions",
            "--window-size=1920,1080",
        ] {
            caps.add_arg(arg)?;
        }

        if let Some(proxy) = &self.config.proxy_url {
            caps.add_arg(&format!(
                "--proxy-server={}",
                chrome::browser_proxy_arg(proxy)
            ))?;
        }

        Ok(caps)
    }

    async fn run_flow(&self, driver: &WebDriver) -> Result<HashMap<String, String>> {
        let account = &self.config.account;

        driver.goto(LOGIN_URL).await?;
        sleep(Duration::from_secs(2)).await;

        let username_input = wait_for_element(driver, USERNAME_SELECTORS).await?;
        let password_input = wait_for_element(driver, PASSWORD_SELECTORS).await?;

        username_input.clear().await?;
        username_input.send_keys(&account.username).await?;
        password_input.clear().await?;
        password_input.send_keys(&account.password).await?;

        submit_login_form(driver).await?;
        sleep(Duration::from_secs(4)).await;

        let outcome = poll_until(CHECKPOINT_POLL_ATTEMPTS, CHECKPOINT_POLL_DELAY, move || {
            async move {
                if login_settled(driver).await {
                    Some(())
                } else {
                    resolve_checkpoint_ui(driver).await;
                    None
                }
            }
        })
        .await;

        match outcome {
            PollOutcome::Completed(()) => tracing::debug!("login navigation detected"),
            PollOutcome::TimedOut => {
                tracing::debug!("checkpoint wait timed out, checking cookies anyway")
            }
        }

        let cookies = driver.get_all_cookies().await?;
        Ok(cookies.into_iter().map(|c| (c.name, c.value)).collect())
    }
}

#[async_trait]
impl InteractiveLogin for BrowserLogin<'_> {
    async fn login(&self) -> Result<HashMap<String, String>> {
        let (handle, driver) = match self.start().await {
            Ok(pair) => pair,
            Err(e) => {
                if matches!(e, Error::BrowserStartup(_)) {
                    eprintln!("{}", chrome::startup_hints());
                }
                return Err(e);
            }
        };

        // The driver must be quit on every path or the browser leaks.
        let result = self.run_flow(&driver).await;
        if let Err(e) = driver.quit().await {
            tracing::debug!("browser quit failed: {}", e);
        }
        drop(handle);

        result
    }
}

/// Find the first element matching any of the selectors, waiting for the page
/// to render it.
async fn wait_for_element(driver: &WebDriver, selectors: &[&str]) -> Result<WebElement> {
    let outcome = poll_until(ELEMENT_WAIT_ATTEMPTS, ELEMENT_WAIT_DELAY, move || {
        async move {
            for selector in selectors {
                if let Ok(element) = driver.find(By::Css(*selector)).await {
                    return Some(element);
                }
            }
            None
        }
    })
    .await;

    match outcome {
        PollOutcome::Completed(element) => Ok(element),
        PollOutcome::TimedOut => Err(Error::Browser(format!(
            "login form element not found: {}",
            selectors[0]
        ))),
    }
}

async fn submit_login_form(driver: &WebDriver) -> Result<()> {
    let button = match driver.find(By::Css(r#"button[type="submit"]"#)).await {
        Ok(button) => button,
        Err(_) => {
            driver
                .find(By::XPath(
                    r#"//button[.//span[text()="Log in"]] | //div[@role="button"][.//span[text()="Log in"]]"#,
                ))
                .await?
        }
    };
    button.click().await?;
    Ok(())
}

/// True once the browser has navigated off the login and challenge pages.
async fn login_settled(driver: &WebDriver) -> bool {
    match driver.current_url().await {
        Ok(url) => {
            let url = url.as_str();
            !url.contains("/accounts/login/")
                && !url.to_lowercase().contains("challenge")
                && !url.contains("one_page")
        }
        Err(e) => {
            tracing::debug!("current_url failed: {}", e);
            false
        }
    }
}

/// Interact with whatever checkpoint UI is on screen right now. Best effort,
/// failures just leave the page for the next poll iteration.
async fn resolve_checkpoint_ui(driver: &WebDriver) {
    if let Ok(link) = driver
        .find(By::Css(r#"a[href*="auth_platform"], a[href*="challenge"]"#))
        .await
    {
        if let Ok(Some(href)) = link.attr("href").await {
            if href.contains("instagram.com") && driver.goto(href).await.is_ok() {
                sleep(Duration::from_secs(3)).await;
            }
        }
    }

    if let Ok(button) = driver
        .find(By::XPath(
            "//button[contains(.,'Confirm') or contains(.,'This was me') or contains(.,'Not Now')]",
        ))
        .await
    {
        if button.click().await.is_ok() {
            sleep(Duration::from_secs(3)).await;
        }
    }
}
