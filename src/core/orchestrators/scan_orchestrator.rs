use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Local;
use uuid::Uuid;

use crate::core::errors::{ScanError, ScanResult};
use crate::core::interfaces::adapters::{PlateAuthority, TextRecognizer};
use crate::core::interfaces::ports::{AuthenticationContext, CaptureDevice};
use crate::core::models::{FrameBuffer, RecognitionResult, ScanOutcome, ScanStatus, ScannerSettings};
use crate::core::services::{
    plate_token_extractor, CaptureSessionManager, FrameSampler, LedgerUpdate, ScanHistoryLedger,
    VerificationClient,
};
use crate::global_constants::LOG_TAG_PIPELINE;

#[derive(Debug, Clone, PartialEq)]
pub enum ScanReport {
    Recorded(ScanOutcome),
    /// The capture session ended (or the pipeline shut down) before the scan
    /// finished, so the outcome never reached the ledger.
    Discarded(ScanOutcome),
    Busy,
}

struct ScanInFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ScanInFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for ScanInFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

pub struct ScanOrchestrator {
    session_manager: Mutex<CaptureSessionManager>,
    frame_sampler: FrameSampler,
    text_recognizer: Arc<dyn TextRecognizer>,
    verification_client: VerificationClient,
    ledger: ScanHistoryLedger,
    auth_context: Arc<dyn AuthenticationContext>,
    recognition_timeout: Option<Duration>,
    scan_in_flight: AtomicBool,
    shut_down: AtomicBool,
}

impl ScanOrchestrator {
    pub fn build(
        capture_device: Arc<dyn CaptureDevice>,
        text_recognizer: Arc<dyn TextRecognizer>,
        plate_authority: Arc<dyn PlateAuthority>,
        auth_context: Arc<dyn AuthenticationContext>,
        settings: &ScannerSettings,
    ) -> Self {
        Self {
            session_manager: Mutex::new(CaptureSessionManager::new(
                capture_device,
                settings.facing_mode,
            )),
            frame_sampler: FrameSampler::new(),
            text_recognizer,
            verification_client: VerificationClient::new(
                Arc::clone(&plate_authority),
                settings.default_confidence,
            ),
            ledger: ScanHistoryLedger::new(plate_authority),
            auth_context,
            recognition_timeout: settings.recognition_timeout(),
            scan_in_flight: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
        }
    }

    fn lock_session_manager(&self) -> MutexGuard<'_, CaptureSessionManager> {
        self.session_manager
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn activate_camera(&self) -> ScanResult<Uuid> {
        if self.shut_down.load(Ordering::SeqCst) {
            return Err(ScanError::DeviceAccess {
                message: "scanner has been shut down".to_string(),
            });
        }
        self.lock_session_manager().activate()
    }

    pub fn deactivate_camera(&self) -> bool {
        self.lock_session_manager().deactivate()
    }

    /// Returns whether the camera is active afterwards.
    pub fn toggle_camera(&self) -> ScanResult<bool> {
        if self.is_camera_active() {
            self.deactivate_camera();
            Ok(false)
        } else {
            self.activate_camera().map(|_| true)
        }
    }

    pub fn is_camera_active(&self) -> bool {
        self.lock_session_manager().is_active()
    }

    pub fn is_scan_in_flight(&self) -> bool {
        self.scan_in_flight.load(Ordering::SeqCst)
    }

    pub async fn load_history(&self) -> ScanResult<LedgerUpdate> {
        let credential = self.auth_context.current_credential();
        self.ledger.load(credential.as_ref()).await
    }

    pub fn is_history_loaded(&self) -> bool {
        self.ledger.is_seeded()
    }

    pub fn history(&self) -> Vec<ScanOutcome> {
        self.ledger.entries()
    }

    /// Runs one scan from frame to ledger.
    ///
    /// Only sampling errors are returned; every later stage failure is
    /// folded into the recorded outcome.
    pub async fn scan(&self) -> ScanResult<ScanReport> {
        let Some(_in_flight) = ScanInFlightGuard::acquire(&self.scan_in_flight) else {
            log::debug!("{} scan already in flight, ignoring trigger", LOG_TAG_PIPELINE);
            return Ok(ScanReport::Busy);
        };

        let (session_id, frame) = {
            let manager = self.lock_session_manager();
            let session = manager.active_session();
            let frame = self.frame_sampler.sample(session)?;
            let session_id = session
                .map(|session| session.id())
                .ok_or(ScanError::NoActiveSession)?;
            (session_id, frame)
        };

        log::info!(
            "{} scanning {}x{} frame from session {}",
            LOG_TAG_PIPELINE,
            frame.width,
            frame.height,
            session_id
        );

        let outcome = self.run_stages(&frame).await;
        drop(frame);

        Ok(self.commit(session_id, outcome))
    }

    async fn run_stages(&self, frame: &FrameBuffer) -> ScanOutcome {
        let recognition = match self.recognize(frame).await {
            Ok(recognition) => recognition,
            Err(error) => {
                log::warn!("{} {}", LOG_TAG_PIPELINE, error);
                return ScanOutcome::undetected(ScanStatus::NoDetectada);
            }
        };

        let Some(token) = plate_token_extractor::extract(&recognition) else {
            return ScanOutcome::undetected(ScanStatus::Desconocida);
        };

        let credential = self.auth_context.current_credential();
        match self
            .verification_client
            .verify(&token, &recognition, credential.as_ref())
            .await
        {
            Ok(verdict) => ScanOutcome::reported(verdict.plate, verdict.status, Local::now()),
            Err(error) => {
                log::warn!("{} {}, recording {} as Error API", LOG_TAG_PIPELINE, error, token);
                ScanOutcome::now(token.value(), ScanStatus::ErrorApi)
            }
        }
    }

    async fn recognize(&self, frame: &FrameBuffer) -> ScanResult<RecognitionResult> {
        let recognition = self.text_recognizer.recognize(frame);

        let result = match self.recognition_timeout {
            Some(limit) => tokio::time::timeout(limit, recognition)
                .await
                .map_err(|_| ScanError::Recognition {
                    message: format!("no result within {:?}", limit),
                })?,
            None => recognition.await,
        };

        let recognition = result.map_err(ScanError::recognition)?;
        log::debug!(
            "{} recognized text {:?} (confidence={:?})",
            LOG_TAG_PIPELINE,
            recognition.raw_text,
            recognition.confidence
        );
        Ok(recognition)
    }

    fn commit(&self, session_id: Uuid, outcome: ScanOutcome) -> ScanReport {
        let manager = self.lock_session_manager();

        if self.shut_down.load(Ordering::SeqCst) || !manager.is_current_session(session_id) {
            log::info!(
                "{} session {} ended before scan finished, discarding {}",
                LOG_TAG_PIPELINE,
                session_id,
                outcome.plate()
            );
            return ScanReport::Discarded(outcome);
        }

        match self.ledger.record(outcome.clone()) {
            LedgerUpdate::Applied => ScanReport::Recorded(outcome),
            LedgerUpdate::Discarded => ScanReport::Discarded(outcome),
        }
    }

    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }

        log::info!("{} shutting down scanner", LOG_TAG_PIPELINE);
        self.lock_session_manager().deactivate();
        self.ledger.close();
    }
}
