use std::sync::Arc;

use crate::core::errors::{ScanError, ScanResult};
use crate::core::interfaces::adapters::PlateAuthority;
use crate::core::models::{AuthCredential, PlateCheckRequest, PlateToken, PlateVerdict, RecognitionResult};
use crate::global_constants::LOG_TAG_AUTHORITY;

pub struct VerificationClient {
    authority: Arc<dyn PlateAuthority>,
    default_confidence: f32,
}

impl VerificationClient {
    pub fn new(authority: Arc<dyn PlateAuthority>, default_confidence: f32) -> Self {
        Self {
            authority,
            default_confidence,
        }
    }

    pub fn build_request(&self, token: &PlateToken, recognition: &RecognitionResult) -> PlateCheckRequest {
        PlateCheckRequest {
            plate: token.value().to_string(),
            raw_text: recognition.raw_text.clone(),
            confidence: recognition.confidence.unwrap_or(self.default_confidence),
        }
    }

    /// One call at most. A missing or expired credential fails before the
    /// authority is contacted.
    pub async fn verify(
        &self,
        token: &PlateToken,
        recognition: &RecognitionResult,
        credential: Option<&AuthCredential>,
    ) -> ScanResult<PlateVerdict> {
        let credential = credential.filter(|credential| credential.is_usable()).ok_or_else(|| {
            log::warn!(
                "{} refusing to verify {} without a valid credential",
                LOG_TAG_AUTHORITY,
                token
            );
            ScanError::Unauthenticated
        })?;

        let request = self.build_request(token, recognition);

        log::info!(
            "{} verifying plate {} (confidence={:.2})",
            LOG_TAG_AUTHORITY,
            request.plate,
            request.confidence
        );

        let verdict = self
            .authority
            .check_plate(&request, credential)
            .await
            .map_err(|error| {
                log::error!("{} verification of {} failed: {:#}", LOG_TAG_AUTHORITY, token, error);
                ScanError::verification(error)
            })?;

        log::info!(
            "{} plate {} classified as {}",
            LOG_TAG_AUTHORITY,
            verdict.plate,
            verdict.status
        );

        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ScanStatus;
    use crate::core::services::plate_token_extractor;
    use crate::core::test_support::{valid_credential, MockPlateAuthority};
    use chrono::{Duration, Utc};

    fn token_for(text: &str) -> PlateToken {
        plate_token_extractor::extract(&RecognitionResult::text_only(text)).unwrap()
    }

    #[tokio::test]
    async fn test_verify_without_credential_makes_no_call() {
        let authority = Arc::new(MockPlateAuthority::answering("ABC123", ScanStatus::Normal));
        let client = VerificationClient::new(authority.clone(), 0.95);

        let result = client
            .verify(&token_for("ABC123"), &RecognitionResult::text_only("ABC123"), None)
            .await;

        assert!(matches!(result, Err(ScanError::Unauthenticated)));
        assert_eq!(authority.check_count(), 0);
    }

    #[tokio::test]
    async fn test_verify_with_expired_credential_makes_no_call() {
        let authority = Arc::new(MockPlateAuthority::answering("ABC123", ScanStatus::Normal));
        let client = VerificationClient::new(authority.clone(), 0.95);
        let expired = AuthCredential::new("token", Some(Utc::now() - Duration::minutes(5)));

        let result = client
            .verify(
                &token_for("ABC123"),
                &RecognitionResult::text_only("ABC123"),
                Some(&expired),
            )
            .await;

        assert!(matches!(result, Err(ScanError::Unauthenticated)));
        assert_eq!(authority.check_count(), 0);
    }

    #[tokio::test]
    async fn test_verify_returns_server_verdict() {
        let authority = Arc::new(MockPlateAuthority::answering("XYZ9999", ScanStatus::Requerida));
        let client = VerificationClient::new(authority.clone(), 0.95);
        let credential = valid_credential();

        let verdict = client
            .verify(
                &token_for("xyz9999"),
                &RecognitionResult::new("xyz 9999", Some(0.42)),
                Some(&credential),
            )
            .await
            .unwrap();

        assert_eq!(verdict.plate, "XYZ9999");
        assert_eq!(verdict.status, ScanStatus::Requerida);
        assert_eq!(authority.check_count(), 1);

        let sent = authority.last_request().unwrap();
        assert_eq!(sent.plate, "XYZ9999");
        assert_eq!(sent.raw_text, "xyz 9999");
        assert_eq!(sent.confidence, 0.42);
    }

    #[tokio::test]
    async fn test_verify_uses_default_confidence_when_engine_has_none() {
        let authority = Arc::new(MockPlateAuthority::answering("AB12", ScanStatus::Normal));
        let client = VerificationClient::new(authority.clone(), 0.95);
        let credential = valid_credential();

        client
            .verify(
                &token_for("AB12"),
                &RecognitionResult::text_only("AB12"),
                Some(&credential),
            )
            .await
            .unwrap();

        assert_eq!(authority.last_request().unwrap().confidence, 0.95);
    }

    #[tokio::test]
    async fn test_verify_maps_authority_failure_to_verification_error() {
        let authority = Arc::new(MockPlateAuthority::failing("connection reset"));
        let client = VerificationClient::new(authority.clone(), 0.95);
        let credential = valid_credential();

        let result = client
            .verify(
                &token_for("AB12"),
                &RecognitionResult::text_only("AB12"),
                Some(&credential),
            )
            .await;

        match result {
            Err(ScanError::Verification { message }) => assert!(message.contains("connection reset")),
            other => panic!("expected verification error, got {:?}", other),
        }
        assert_eq!(authority.check_count(), 1);
    }
}
