use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Notify;

use crate::core::interfaces::adapters::{PlateAuthority, TextRecognizer};
use crate::core::interfaces::ports::{CaptureDevice, VideoStream};
use crate::core::models::{
    AuthCredential, FacingMode, FrameBuffer, HistoryRecord, PlateCheckRequest, PlateVerdict,
    RecognitionResult, ReportedStatus,
};

pub fn valid_credential() -> AuthCredential {
    AuthCredential::new("test-token", Some(Utc::now() + Duration::hours(1)))
}

pub fn history_record(plate: &str, status: &str, checked_at: &str) -> HistoryRecord {
    HistoryRecord {
        plate: plate.to_string(),
        status: ReportedStatus::from(status.to_string()),
        checked_at: checked_at.to_string(),
    }
}

#[derive(Default)]
struct Gate {
    started: Notify,
    release: Notify,
}

impl Gate {
    async fn pass(&self) {
        self.started.notify_one();
        self.release.notified().await;
    }
}

pub struct MockCaptureDevice {
    width: u32,
    height: u32,
    advertised_resolution: Option<(u32, u32)>,
    denied: bool,
    broken_frames: bool,
    requested_facing_modes: Mutex<Vec<FacingMode>>,
    stop_count: Arc<AtomicUsize>,
}

impl MockCaptureDevice {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            advertised_resolution: None,
            denied: false,
            broken_frames: false,
            requested_facing_modes: Mutex::new(Vec::new()),
            stop_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn denied() -> Self {
        Self {
            denied: true,
            ..Self::new(1, 1)
        }
    }

    pub fn with_broken_frames(mut self) -> Self {
        self.broken_frames = true;
        self
    }

    pub fn with_advertised_resolution(mut self, width: u32, height: u32) -> Self {
        self.advertised_resolution = Some((width, height));
        self
    }

    pub fn open_count(&self) -> usize {
        self.requested_facing_modes.lock().unwrap().len()
    }

    pub fn requested_facing_modes(&self) -> Vec<FacingMode> {
        self.requested_facing_modes.lock().unwrap().clone()
    }

    pub fn stop_count(&self) -> usize {
        self.stop_count.load(Ordering::SeqCst)
    }
}

impl CaptureDevice for MockCaptureDevice {
    fn open_stream(&self, facing_mode: FacingMode) -> Result<Box<dyn VideoStream>> {
        if self.denied {
            anyhow::bail!("permission denied by operator");
        }

        self.requested_facing_modes.lock().unwrap().push(facing_mode);

        Ok(Box::new(MockVideoStream {
            width: self.width,
            height: self.height,
            advertised_resolution: self
                .advertised_resolution
                .unwrap_or((self.width, self.height)),
            broken_frames: self.broken_frames,
            stop_count: Arc::clone(&self.stop_count),
        }))
    }
}

struct MockVideoStream {
    width: u32,
    height: u32,
    advertised_resolution: (u32, u32),
    broken_frames: bool,
    stop_count: Arc<AtomicUsize>,
}

impl VideoStream for MockVideoStream {
    fn native_resolution(&self) -> (u32, u32) {
        self.advertised_resolution
    }

    fn current_frame(&self) -> Result<FrameBuffer> {
        if self.broken_frames {
            anyhow::bail!("device unplugged");
        }
        FrameBuffer::build_from_raw_data(
            self.width,
            self.height,
            vec![255u8; (self.width * self.height * 4) as usize],
        )
    }

    fn stop_all_tracks(&self) {
        self.stop_count.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct MockTextRecognizer {
    response: std::result::Result<RecognitionResult, String>,
    calls: AtomicUsize,
    gate: Option<Gate>,
}

impl MockTextRecognizer {
    pub fn answering(text: &str) -> Self {
        Self {
            response: Ok(RecognitionResult::new(text, Some(0.8))),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn with_gate(mut self) -> Self {
        self.gate = Some(Gate::default());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn wait_for_request(&self) {
        if let Some(gate) = &self.gate {
            gate.started.notified().await;
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.release.notify_one();
        }
    }
}

#[async_trait]
impl TextRecognizer for MockTextRecognizer {
    async fn recognize(&self, _frame: &FrameBuffer) -> Result<RecognitionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.pass().await;
        }

        match &self.response {
            Ok(result) => Ok(result.clone()),
            Err(message) => anyhow::bail!("{}", message),
        }
    }
}

enum AuthorityBehaviour {
    Answer(PlateVerdict),
    Fail(String),
    History(Vec<HistoryRecord>),
}

pub struct MockPlateAuthority {
    behaviour: AuthorityBehaviour,
    check_requests: Mutex<Vec<PlateCheckRequest>>,
    history_calls: AtomicUsize,
    history_gate: Option<Gate>,
}

impl MockPlateAuthority {
    fn build(behaviour: AuthorityBehaviour) -> Self {
        Self {
            behaviour,
            check_requests: Mutex::new(Vec::new()),
            history_calls: AtomicUsize::new(0),
            history_gate: None,
        }
    }

    pub fn answering(plate: &str, status: impl Into<ReportedStatus>) -> Self {
        Self::build(AuthorityBehaviour::Answer(PlateVerdict {
            plate: plate.to_string(),
            status: status.into(),
        }))
    }

    pub fn failing(message: &str) -> Self {
        Self::build(AuthorityBehaviour::Fail(message.to_string()))
    }

    pub fn with_history(records: Vec<HistoryRecord>) -> Self {
        Self::build(AuthorityBehaviour::History(records))
    }

    pub fn with_history_gate(mut self) -> Self {
        self.history_gate = Some(Gate::default());
        self
    }

    pub fn check_count(&self) -> usize {
        self.check_requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<PlateCheckRequest> {
        self.check_requests.lock().unwrap().last().cloned()
    }

    pub fn history_count(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    pub async fn wait_for_history_request(&self) {
        if let Some(gate) = &self.history_gate {
            gate.started.notified().await;
        }
    }

    pub fn release_history(&self) {
        if let Some(gate) = &self.history_gate {
            gate.release.notify_one();
        }
    }
}

#[async_trait]
impl PlateAuthority for MockPlateAuthority {
    async fn check_plate(
        &self,
        request: &PlateCheckRequest,
        _credential: &AuthCredential,
    ) -> Result<PlateVerdict> {
        self.check_requests.lock().unwrap().push(request.clone());

        match &self.behaviour {
            AuthorityBehaviour::Answer(verdict) => Ok(verdict.clone()),
            AuthorityBehaviour::Fail(message) => anyhow::bail!("{}", message),
            AuthorityBehaviour::History(_) => anyhow::bail!("no verdict configured"),
        }
    }

    async fn fetch_history(&self, _credential: &AuthCredential) -> Result<Vec<HistoryRecord>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.history_gate {
            gate.pass().await;
        }

        match &self.behaviour {
            AuthorityBehaviour::History(records) => Ok(records.clone()),
            AuthorityBehaviour::Fail(message) => anyhow::bail!("{}", message),
            AuthorityBehaviour::Answer(_) => Ok(Vec::new()),
        }
    }

    async fn login(&self, _username: &str, _password: &str) -> Result<AuthCredential> {
        Ok(valid_credential())
    }
}
