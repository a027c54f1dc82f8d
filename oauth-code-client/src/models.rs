use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// Default path of the authorization endpoint
pub const DEFAULT_AUTHORIZATION_PATH: &str = "/authorize";
/// Default path of the token endpoint
pub const DEFAULT_TOKEN_PATH: &str = "/token";

pub(crate) const AUTHORIZATION_CODE_GRANT: &str = "authorization_code";

/// Longest body excerpt written to the log
const BODY_EXCERPT_CHARS: usize = 256;

/// OAuth client registration.
///
/// Built once at startup and never mutated afterwards; every accessor borrows.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    client_id: String,
    client_secret: SecretString,
    redirect_uri: String,
    #[serde(default = "default_authorization_path")]
    authorization_path: String,
    #[serde(default = "default_token_path")]
    token_path: String,
}

fn default_authorization_path() -> String {
    DEFAULT_AUTHORIZATION_PATH.to_string()
}

fn default_token_path() -> String {
    DEFAULT_TOKEN_PATH.to_string()
}

impl ClientConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into()),
            redirect_uri: redirect_uri.into(),
            authorization_path: default_authorization_path(),
            token_path: default_token_path(),
        }
    }

    /// Path set on the base URL by `authorization_uri`
    pub fn with_authorization_path(mut self, path: impl Into<String>) -> Self {
        self.authorization_path = path.into();
        self
    }

    /// Path set on the token URL by `exchange_code`
    pub fn with_token_path(mut self, path: impl Into<String>) -> Self {
        self.token_path = path.into();
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn authorization_path(&self) -> &str {
        &self.authorization_path
    }

    pub fn token_path(&self) -> &str {
        &self.token_path
    }
}

/// Token pair issued by the token endpoint
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime in seconds, as reported by the server
    pub expires_in: i64,
    pub token_type: String,
}

impl AccessToken {
    /// Absolute expiry given the time the token was received.
    ///
    /// `None` when the server reported no positive lifetime.
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.expires_in <= 0 {
            return None;
        }
        let lifetime = chrono::Duration::try_seconds(self.expires_in)?;
        issued_at.checked_add_signed(lifetime)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Token Request
#[derive(Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub grant_type: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub code: &'a str,
    pub scope: &'a str,
    pub redirect_uri: &'a str,
}

/// Token Response
///
/// Carries either the token fields or `error`/`error_description`.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct TokenResponse {
    pub error: String,
    pub error_description: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl TokenResponse {
    /// Decode a token endpoint body without ever failing.
    ///
    /// Malformed bodies are accepted on purpose: whatever members can be read
    /// are kept and the rest stay empty. Each fallback is logged at `warn` so a
    /// misbehaving server is still visible.
    pub fn from_body(body: &[u8]) -> Self {
        let err = match serde_json::from_slice::<Self>(body) {
            Ok(parsed) => return parsed,
            Err(err) => err,
        };

        warn!(
            error = %err,
            body = %logger_redacted::redact_excerpt(&String::from_utf8_lossy(body), BODY_EXCERPT_CHARS),
            "Token endpoint body did not decode cleanly, keeping readable fields"
        );

        // Only the first JSON value counts; trailing bytes are ignored.
        serde_json::Deserializer::from_slice(body)
            .into_iter::<Value>()
            .next()
            .and_then(std::result::Result::ok)
            .map(|value| Self::salvage(&value))
            .unwrap_or_default()
    }

    fn salvage(value: &Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_default()
        };

        let expires_in = match value.get("expires_in") {
            Some(Value::Number(n)) => n.as_i64().unwrap_or_default(),
            Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
            _ => 0,
        };

        Self {
            error: text("error"),
            error_description: text("error_description"),
            access_token: text("access_token"),
            refresh_token: text("refresh_token"),
            expires_in,
            token_type: text("token_type"),
        }
    }

    /// Keep the token fields, drop any error fields
    pub fn into_access_token(self) -> AccessToken {
        AccessToken {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_in: self.expires_in,
            token_type: self.token_type,
        }
    }
}
