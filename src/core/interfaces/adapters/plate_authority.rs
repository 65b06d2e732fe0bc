use anyhow::Result;
use async_trait::async_trait;

use crate::core::models::{AuthCredential, HistoryRecord, PlateCheckRequest, PlateVerdict};

#[async_trait]
pub trait PlateAuthority: Send + Sync {
    async fn check_plate(
        &self,
        request: &PlateCheckRequest,
        credential: &AuthCredential,
    ) -> Result<PlateVerdict>;

    async fn fetch_history(&self, credential: &AuthCredential) -> Result<Vec<HistoryRecord>>;

    async fn login(&self, username: &str, password: &str) -> Result<AuthCredential>;
}
