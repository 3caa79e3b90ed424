//! Instagram web API HTTP client.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{header, Client, Proxy, Response, StatusCode, Url};
use serde_json::Value;

use crate::api::login::{self, LoginReply};
use crate::api::types::{self, PostMedia, ProfileInfo, TimelinePage};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::{PlatformLogin, SessionData};

/// Web origin, used for login and GraphQL queries.
const WWW_BASE: &str = "https://www.instagram.com";

/// API origin, used for profile and account lookups.
const API_BASE: &str = "https://i.instagram.com";

/// Public web application id, sent with API-origin requests.
const APP_ID: &str = "936619743392459";

const ASBD_ID: &str = "198387";

/// Timeline query hash for pages after the first.
const TIMELINE_QUERY_HASH: &str = "003056d32c2554def87228bc3fd9668a";

/// Posts requested per timeline page.
const TIMELINE_PAGE_SIZE: u32 = 12;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Instagram web API client with cookie session management.
///
/// The cookie jar is the session: loading a cached session or importing
/// browser cookies replaces the jar, which requires rebuilding the underlying
/// HTTP client (and re-applying the proxy, which is bound at build time).
pub struct IgClient {
    http: Client,
    jar: Arc<Jar>,
    proxy_url: Option<String>,
    username: Option<String>,
}

impl IgClient {
    pub fn new(config: &Config) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let http = build_http(&jar, config.proxy_url.as_deref())?;

        Ok(Self {
            http,
            jar,
            proxy_url: config.proxy_url.clone(),
            username: None,
        })
    }

    /// Username of the logged-in account, once a session is established.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Replace the cookie jar with the given cookies and rebuild the HTTP
    /// client around it.
    pub fn install_cookies(&mut self, cookies: &HashMap<String, String>) -> Result<()> {
        let url: Url = WWW_BASE.parse()?;
        let jar = Arc::new(Jar::default());
        for (name, value) in cookies {
            jar.add_cookie_str(
                &format!("{}={}; Domain=.instagram.com; Path=/", name, value),
                &url,
            );
        }

        self.jar = jar;
        self.http = build_http(&self.jar, self.proxy_url.as_deref())?;
        Ok(())
    }

    /// Current session cookies as a name/value map.
    pub fn export_cookies(&self) -> HashMap<String, String> {
        let url: Url = WWW_BASE.parse().expect("static URL");
        self.jar
            .cookies(&url)
            .and_then(|header| header.to_str().map(parse_cookie_header).ok())
            .unwrap_or_default()
    }

    fn cookie_value(&self, name: &str) -> Option<String> {
        let mut cookies = self.export_cookies();
        cookies.remove(name)
    }

    /// Log in with username and password against the web login endpoint.
    ///
    /// Checkpoint and credential rejections surface as `Error::LoginDenied`
    /// so the caller can escalate to the browser fallback; transport and
    /// rate-limit errors propagate as themselves.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let csrf_token = self.fetch_csrf_token().await?;
        let enc_password = login::encode_password(password, Utc::now().timestamp());

        tracing::debug!("POST {}/accounts/login/ajax/", WWW_BASE);
        let response = self
            .http
            .post(format!("{}/accounts/login/ajax/", WWW_BASE))
            .header("X-CSRFToken", &csrf_token)
            .header("X-Requested-With", "XMLHttpRequest")
            .header(header::REFERER, format!("{}/accounts/login/", WWW_BASE))
            .form(&[
                ("username", username),
                ("enc_password", enc_password.as_str()),
                ("queryParams", "{}"),
                ("optIntoOneTap", "false"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited(60));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|_| Error::Api("login response was not JSON".to_string()))?;

        match login::classify_login_reply(status, &body)? {
            LoginReply::Authenticated => {
                tracing::debug!("native login accepted for {}", username);
                self.username = Some(username.to_string());
                Ok(())
            }
            LoginReply::Checkpoint(detail) => {
                Err(Error::LoginDenied(format!("checkpoint required: {}", detail)))
            }
            LoginReply::Denied(reason) => Err(Error::LoginDenied(reason)),
        }
    }

    /// One cheap authenticated request answering "is this session valid".
    pub async fn verify_session(&self) -> Result<bool> {
        let response = self
            .http
            .get(format!("{}/api/v1/accounts/current_user/", API_BASE))
            .header("X-IG-App-ID", APP_ID)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(false);
        }
        if !status.is_success() {
            return Err(Error::Api(format!("session check returned HTTP {}", status)));
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        Ok(body.get("status").and_then(|v| v.as_str()) == Some("ok"))
    }

    /// Look up a profile, including the first timeline page.
    pub async fn profile(&self, username: &str) -> Result<ProfileInfo> {
        tracing::debug!("GET web_profile_info for {}", username);
        let response = self
            .http
            .get(format!("{}/api/v1/users/web_profile_info/", API_BASE))
            .query(&[("username", username)])
            .header("X-IG-App-ID", APP_ID)
            .header("X-ASBD-ID", ASBD_ID)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let body = self.checked_json(response, username).await?;
        let user = body
            .get("data")
            .and_then(|d| d.get("user"))
            .filter(|u| !u.is_null())
            .ok_or_else(|| Error::ProfileNotFound(username.to_string()))?;

        types::parse_profile(user)
    }

    /// Fetch a timeline page after the given cursor.
    pub async fn profile_posts(&self, user_id: &str, after: &str) -> Result<TimelinePage> {
        let variables = serde_json::json!({
            "id": user_id,
            "first": TIMELINE_PAGE_SIZE,
            "after": after,
        });

        tracing::debug!("GET timeline page for user {} after {}", user_id, after);
        let response = self
            .http
            .get(format!("{}/graphql/query/", WWW_BASE))
            .query(&[
                ("query_hash", TIMELINE_QUERY_HASH),
                ("variables", variables.to_string().as_str()),
            ])
            .header("X-IG-App-ID", APP_ID)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let body = self.checked_json(response, user_id).await?;
        let timeline = body
            .get("data")
            .and_then(|d| d.get("user"))
            .and_then(|u| u.get("edge_owner_to_timeline_media"))
            .ok_or_else(|| Error::Api("timeline page has no media edge".to_string()))?;

        Ok(types::parse_timeline(timeline))
    }

    /// Look up a single post by shortcode.
    pub async fn post(&self, shortcode: &str) -> Result<PostMedia> {
        tracing::debug!("GET post {}", shortcode);
        let response = self
            .http
            .get(format!("{}/p/{}/", WWW_BASE, shortcode))
            .query(&[("__a", "1"), ("__d", "dis")])
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::PostNotFound(shortcode.to_string()));
        }
        let body = self.checked_json(response, shortcode).await?;

        types::parse_post_payload(&body, shortcode)
    }

    /// Streaming GET for media bytes.
    pub async fn download(&self, url: &str) -> Result<Response> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Download(format!("HTTP {} fetching {}", status, url)));
        }
        Ok(response)
    }

    async fn fetch_csrf_token(&self) -> Result<String> {
        self.http
            .get(format!("{}/accounts/login/", WWW_BASE))
            .send()
            .await?;

        self.cookie_value("csrftoken")
            .ok_or_else(|| Error::Api("login page set no csrftoken cookie".to_string()))
    }

    /// Shared status handling for JSON endpoints.
    async fn checked_json(&self, response: Response, subject: &str) -> Result<Value> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::ProfileNotFound(subject.to_string()));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited(60));
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Authentication(format!(
                "HTTP {} (session expired or rejected)",
                status
            )));
        }
        if !status.is_success() {
            return Err(Error::Api(format!("HTTP {} for {}", status, subject)));
        }

        response
            .json()
            .await
            .map_err(|_| Error::Api("response was not JSON".to_string()))
    }
}

#[async_trait]
impl PlatformLogin for IgClient {
    async fn restore_session(&mut self, session: &SessionData) -> Result<bool> {
        self.install_cookies(&session.cookies)?;
        self.username = Some(session.username.clone());
        self.verify_session().await
    }

    async fn native_login(&mut self, username: &str, password: &str) -> Result<()> {
        self.login(username, password).await
    }

    async fn import_session_cookies(
        &mut self,
        username: &str,
        cookies: &HashMap<String, String>,
    ) -> Result<()> {
        self.install_cookies(cookies)?;
        self.username = Some(username.to_string());
        Ok(())
    }

    fn session_snapshot(&self) -> Result<SessionData> {
        let username = self
            .username
            .clone()
            .ok_or_else(|| Error::Api("no logged-in session to snapshot".to_string()))?;

        Ok(SessionData {
            username,
            cookies: self.export_cookies(),
            created_at: Utc::now(),
        })
    }

    fn reapply_proxy(&mut self) -> Result<()> {
        self.http = build_http(&self.jar, self.proxy_url.as_deref())?;
        Ok(())
    }
}

fn build_http(jar: &Arc<Jar>, proxy_url: Option<&str>) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .cookie_provider(Arc::clone(jar))
        .timeout(Duration::from_secs(90));

    if let Some(proxy_url) = proxy_url {
        builder = builder.proxy(Proxy::all(proxy_url)?);
    }

    builder
        .build()
        .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))
}

/// Parse a `Cookie` header value ("a=1; b=2") into a map.
fn parse_cookie_header(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| {
            let pair = pair.trim();
            let (name, value) = pair.split_once('=')?;
            if name.is_empty() {
                None
            } else {
                Some((name.to_string(), value.to_string()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookie_header() {
        let cookies = parse_cookie_header("csrftoken=abc; sessionid=1%3Axyz; mid=m");
        assert_eq!(cookies.get("csrftoken").map(String::as_str), Some("abc"));
        assert_eq!(
            cookies.get("sessionid").map(String::as_str),
            Some("1%3Axyz")
        );
        assert_eq!(cookies.len(), 3);
    }

    #[test]
    fn test_parse_cookie_header_ignores_malformed_pairs() {
        let cookies = parse_cookie_header("good=1; bad; =nameless; ");
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies.get("good").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_install_and_export_cookies_round_trip() {
        let config = Config::default();
        let mut client = IgClient::new(&config).unwrap();

        let mut cookies = HashMap::new();
        cookies.insert("sessionid".to_string(), "1:abc".to_string());
        cookies.insert("csrftoken".to_string(), "tok".to_string());
        client.install_cookies(&cookies).unwrap();

        let exported = client.export_cookies();
        assert_eq!(exported.get("csrftoken").map(String::as_str), Some("tok"));
        assert!(exported.contains_key("sessionid"));
    }
}
