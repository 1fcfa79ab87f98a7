//! Credentials and request signing.
//!
//! The API authenticates every request with a SHA-1 digest over
//! `key + secret + unix_seconds`, sent next to the key and the timestamp it
//! was computed for. The digest is recomputed per request; nothing is cached.

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use sha1::{Digest, Sha1};

use crate::error::ClientError;

/// API key and secret, fixed for the lifetime of a client.
///
/// The secret is held in a `SecretString` so it never shows up in `Debug`
/// output and is zeroed on drop.
pub struct Credentials {
    api_key: String,
    api_secret: SecretString,
}

impl Credentials {
    /// Both values must be non-empty.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self, ClientError> {
        let api_key = api_key.into();
        let api_secret = api_secret.into();
        if api_key.is_empty() {
            return Err(ClientError::Configuration("missing API key".to_string()));
        }
        if api_secret.is_empty() {
            return Err(ClientError::Configuration("missing API secret".to_string()));
        }
        Ok(Self {
            api_key,
            api_secret: SecretString::from(api_secret),
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Only for computing the digest. Never log the return value.
    pub fn expose_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// Current Unix time in whole seconds, `floor(now_ms / 1000)`.
pub fn current_unix_time() -> i64 {
    Utc::now().timestamp_millis().div_euclid(1000)
}

/// Lowercase hex SHA-1 of `key + secret + unix_time`.
pub fn auth_digest(api_key: &str, api_secret: &str, unix_time: i64) -> String {
    let mut hasher = Sha1::new();
    hasher.update(api_key.as_bytes());
    hasher.update(api_secret.as_bytes());
    hasher.update(unix_time.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Produces the authentication header set for one request.
pub struct RequestSigner<'a> {
    credentials: &'a Credentials,
    user_agent: &'a str,
}

impl<'a> RequestSigner<'a> {
    pub fn new(credentials: &'a Credentials, user_agent: &'a str) -> Self {
        Self {
            credentials,
            user_agent,
        }
    }

    /// Sign with the current time.
    pub fn sign(&self) -> Result<Vec<(String, String)>, ClientError> {
        self.sign_at(current_unix_time())
    }

    /// Sign for a given Unix second. Header order is fixed:
    /// `Content-Type`, `X-Auth-Date`, `X-Auth-Key`, `Authorization`,
    /// `User-Agent`.
    pub fn sign_at(&self, unix_time: i64) -> Result<Vec<(String, String)>, ClientError> {
        let key = self.credentials.api_key();
        let secret = self.credentials.expose_secret();
        if key.is_empty() || secret.is_empty() {
            return Err(ClientError::Configuration("missing key or secret".to_string()));
        }

        let digest = auth_digest(key, secret, unix_time);
        Ok(vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("X-Auth-Date".to_string(), unix_time.to_string()),
            ("X-Auth-Key".to_string(), key.to_string()),
            ("Authorization".to_string(), digest),
            ("User-Agent".to_string(), self.user_agent.to_string()),
        ])
    }
}
