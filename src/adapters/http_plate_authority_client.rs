use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::core::interfaces::adapters::PlateAuthority;
use crate::core::models::{
    AuthCredential, HistoryRecord, LoginRequest, LoginResponse, PlateCheckRequest, PlateVerdict,
};
use crate::global_constants::{
    ENDPOINT_HISTORY, ENDPOINT_LOGIN, ENDPOINT_PLATE_CHECK, LOG_TAG_AUTHORITY,
};

pub struct HttpPlateAuthorityClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPlateAuthorityClient {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
        log::info!(
            "{} using plate authority at {} (timeout {:?})",
            LOG_TAG_AUTHORITY,
            base_url,
            request_timeout
        );

        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn read_json_response<T: DeserializeOwned>(
        response: reqwest::Response,
        what: &str,
    ) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read {} response", what))?;

        log::debug!("{} {} response ({}): {}", LOG_TAG_AUTHORITY, what, status, body);

        if !status.is_success() {
            anyhow::bail!("{} returned {}: {}", what, status, body.trim());
        }

        serde_json::from_str(&body).with_context(|| format!("Malformed {} response", what))
    }
}

#[async_trait]
impl PlateAuthority for HttpPlateAuthorityClient {
    async fn check_plate(
        &self,
        request: &PlateCheckRequest,
        credential: &AuthCredential,
    ) -> Result<PlateVerdict> {
        log::debug!("{} POST {}", LOG_TAG_AUTHORITY, ENDPOINT_PLATE_CHECK);

        let response = self
            .client
            .post(self.endpoint_url(ENDPOINT_PLATE_CHECK))
            .bearer_auth(credential.bearer_token())
            .json(request)
            .send()
            .await
            .context("Failed to reach plate authority")?;

        Self::read_json_response(response, "plate check").await
    }

    async fn fetch_history(&self, credential: &AuthCredential) -> Result<Vec<HistoryRecord>> {
        log::debug!("{} GET {}", LOG_TAG_AUTHORITY, ENDPOINT_HISTORY);

        let response = self
            .client
            .get(self.endpoint_url(ENDPOINT_HISTORY))
            .bearer_auth(credential.bearer_token())
            .send()
            .await
            .context("Failed to reach plate authority")?;

        let records: Vec<HistoryRecord> = Self::read_json_response(response, "history").await?;
        log::info!("{} received {} history records", LOG_TAG_AUTHORITY, records.len());
        Ok(records)
    }

    async fn login(&self, username: &str, password: &str) -> Result<AuthCredential> {
        log::info!("{} signing in as {}", LOG_TAG_AUTHORITY, username);

        let response = self
            .client
            .post(self.endpoint_url(ENDPOINT_LOGIN))
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .context("Failed to reach plate authority")?;

        let login: LoginResponse = Self::read_json_response(response, "login").await?;
        Ok(AuthCredential::from_bearer_token(login.access_token))
    }
}
