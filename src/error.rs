//! Error types for the instagrab application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Login errors. `LoginDenied` is the recoverable kind: the platform
    // rejected the credential exchange (checkpoint, suspicious login, wrong
    // password) and the browser fallback may still succeed.
    #[error("Login denied: {0}")]
    LoginDenied(String),

    #[error("Login failed: {0}")]
    LoginFailed(String),

    // API errors
    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Post not found: {0}")]
    PostNotFound(String),

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    // Browser automation errors
    #[error("Browser failed to start: {0}")]
    BrowserStartup(String),

    #[error("Browser automation error: {0}")]
    Browser(String),

    // Download errors
    #[error("Download failed: {0}")]
    Download(String),

    // File system errors
    #[error("Invalid target name (path traversal attempt): {0}")]
    InvalidTarget(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // WebDriver errors
    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for login failures the session acquirer may recover from by
    /// escalating to the browser fallback.
    pub fn is_recoverable_login(&self) -> bool {
        matches!(self, Error::LoginDenied(_))
    }
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const ABORT: i32 = 1;
}
