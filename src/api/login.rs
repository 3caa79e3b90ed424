//! Native login request encoding and response classification.

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::{Error, Result};

/// Wrap a plain password in the browser-style password envelope the web
/// login endpoint expects. Version 0 transmits the password in the clear
/// over TLS; the timestamp is the client's idea of "now" in unix seconds.
pub fn encode_password(password: &str, timestamp: i64) -> String {
    format!("#PWD_INSTAGRAM_BROWSER:0:{}:{}", timestamp, password)
}

/// Outcome of a login exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginReply {
    /// Credentials accepted, session cookies are set.
    Authenticated,
    /// The platform wants an interactive checkpoint before issuing a session.
    Checkpoint(String),
    /// Credentials rejected.
    Denied(String),
}

/// Classify a login response body.
///
/// Checkpoint and credential rejections are reported as values so the caller
/// can escalate to the browser fallback; anything unrecognized is an API
/// error and propagates.
pub fn classify_login_reply(status: StatusCode, body: &Value) -> Result<LoginReply> {
    let message = body.get("message").and_then(|v| v.as_str()).unwrap_or("");

    if message == "checkpoint_required" || body.get("checkpoint_url").is_some() {
        let detail = body
            .get("checkpoint_url")
            .and_then(|v| v.as_str())
            .unwrap_or("challenge issued")
            .to_string();
        return Ok(LoginReply::Checkpoint(detail));
    }

    if body
        .get("two_factor_required")
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
    {
        return Ok(LoginReply::Checkpoint("two-factor prompt".to_string()));
    }

    match body.get("authenticated").and_then(|v| v.as_bool()) {
        Some(true) => Ok(LoginReply::Authenticated),
        Some(false) => {
            // `user` tells whether the username at least exists
            let reason = if body.get("user").and_then(|v| v.as_bool()).unwrap_or(false) {
                "password rejected".to_string()
            } else {
                "unknown username".to_string()
            };
            Ok(LoginReply::Denied(reason))
        }
        None => Err(Error::Api(format!(
            "unexpected login response (HTTP {}): {}",
            status,
            if message.is_empty() { "no message" } else { message }
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_password_envelope() {
        assert_eq!(
            encode_password("hunter2", 1587205800),
            "#PWD_INSTAGRAM_BROWSER:0:1587205800:hunter2"
        );
    }

    #[test]
    fn test_classify_authenticated() {
        let body = json!({"authenticated": true, "user": true, "status": "ok"});
        assert_eq!(
            classify_login_reply(StatusCode::OK, &body).unwrap(),
            LoginReply::Authenticated
        );
    }

    #[test]
    fn test_classify_bad_password() {
        let body = json!({"authenticated": false, "user": true, "status": "ok"});
        assert!(matches!(
            classify_login_reply(StatusCode::OK, &body).unwrap(),
            LoginReply::Denied(_)
        ));
    }

    #[test]
    fn test_classify_checkpoint() {
        let body = json!({
            "message": "checkpoint_required",
            "checkpoint_url": "/challenge/12345/abcdef/",
            "status": "fail"
        });
        match classify_login_reply(StatusCode::BAD_REQUEST, &body).unwrap() {
            LoginReply::Checkpoint(detail) => assert!(detail.contains("challenge")),
            other => panic!("expected checkpoint, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_two_factor_as_checkpoint() {
        let body = json!({"two_factor_required": true, "status": "fail"});
        assert!(matches!(
            classify_login_reply(StatusCode::BAD_REQUEST, &body).unwrap(),
            LoginReply::Checkpoint(_)
        ));
    }

    #[test]
    fn test_classify_unexpected_is_error() {
        let body = json!({"status": "fail", "message": "feedback_required"});
        assert!(classify_login_reply(StatusCode::BAD_REQUEST, &body).is_err());
    }
}
