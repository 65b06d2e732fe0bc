use std::sync::Mutex;

use crate::core::interfaces::ports::AuthenticationContext;
use crate::core::models::AuthCredential;
use crate::global_constants::LOG_TAG_AUTH;

/// Credential holder shared by the front end (which signs in) and the
/// pipeline (which only reads).
#[derive(Default)]
pub struct SharedAuthenticationContext {
    credential: Mutex<Option<AuthCredential>>,
}

impl SharedAuthenticationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bearer_token(token: Option<String>) -> Self {
        let context = Self::new();
        if let Some(token) = token.filter(|token| !token.trim().is_empty()) {
            log::info!("{} using credential supplied at startup", LOG_TAG_AUTH);
            context.set_credential(AuthCredential::from_bearer_token(token.trim()));
        }
        context
    }

    pub fn set_credential(&self, credential: AuthCredential) {
        if let Some(expires_at) = credential.expires_at() {
            log::info!("{} credential set, expires at {}", LOG_TAG_AUTH, expires_at);
        }
        *self
            .credential
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(credential);
    }

    pub fn clear(&self) {
        log::info!("{} credential cleared", LOG_TAG_AUTH);
        *self
            .credential
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}

impl AuthenticationContext for SharedAuthenticationContext {
    fn current_credential(&self) -> Option<AuthCredential> {
        self.credential
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
