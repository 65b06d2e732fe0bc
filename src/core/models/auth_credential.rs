use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

#[derive(Clone, PartialEq)]
pub struct AuthCredential {
    bearer_token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for AuthCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthCredential")
            .field("bearer_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

impl AuthCredential {
    pub fn new(bearer_token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            bearer_token: bearer_token.into(),
            expires_at,
        }
    }

    /// Reads the expiry from the JWT `exp` claim when the token is a JWT.
    /// Opaque tokens carry no local expiry.
    pub fn from_bearer_token(bearer_token: impl Into<String>) -> Self {
        let bearer_token = bearer_token.into();
        let expires_at = Self::decode_jwt_expiry(&bearer_token);

        if expires_at.is_none() {
            log::debug!("[AUTH] token has no readable exp claim, treating as non-expiring");
        }

        Self {
            bearer_token,
            expires_at,
        }
    }

    fn decode_jwt_expiry(token: &str) -> Option<DateTime<Utc>> {
        let payload_segment = token.split('.').nth(1)?;
        let payload = URL_SAFE_NO_PAD
            .decode(payload_segment.trim_end_matches('='))
            .ok()?;
        let claim: ExpiryClaim = serde_json::from_slice(&payload).ok()?;

        Utc.timestamp_opt(claim.exp?, 0).single()
    }

    pub fn bearer_token(&self) -> &str {
        &self.bearer_token
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= now,
            None => false,
        }
    }

    pub fn is_usable(&self) -> bool {
        !self.bearer_token.trim().is_empty() && !self.is_expired_at(Utc::now())
    }
}
