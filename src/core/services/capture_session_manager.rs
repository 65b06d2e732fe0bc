use std::sync::Arc;

use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::core::errors::{ScanError, ScanResult};
use crate::core::interfaces::ports::{CaptureDevice, VideoStream};
use crate::core::models::FacingMode;
use crate::global_constants::LOG_TAG_CAPTURE;

pub struct CaptureSession {
    id: Uuid,
    stream: Box<dyn VideoStream>,
    opened_at: DateTime<Local>,
}

impl CaptureSession {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn stream(&self) -> &dyn VideoStream {
        self.stream.as_ref()
    }
}

/// Owns the one device stream the scanner may hold.
///
/// The stream is stopped on `deactivate` and again on drop, so a manager
/// going out of scope never leaks the device lock.
pub struct CaptureSessionManager {
    device: Arc<dyn CaptureDevice>,
    facing_mode: FacingMode,
    session: Option<CaptureSession>,
}

impl CaptureSessionManager {
    pub fn new(device: Arc<dyn CaptureDevice>, facing_mode: FacingMode) -> Self {
        Self {
            device,
            facing_mode,
            session: None,
        }
    }

    pub fn activate(&mut self) -> ScanResult<Uuid> {
        if let Some(session) = &self.session {
            log::debug!(
                "{} session {} already active, reusing it",
                LOG_TAG_CAPTURE,
                session.id
            );
            return Ok(session.id);
        }

        log::info!(
            "{} opening capture device (facing={})",
            LOG_TAG_CAPTURE,
            self.facing_mode
        );

        let stream = self.device.open_stream(self.facing_mode).map_err(|error| {
            log::error!("{} failed to open capture device: {:#}", LOG_TAG_CAPTURE, error);
            ScanError::device_access(error)
        })?;

        let (width, height) = stream.native_resolution();
        let session = CaptureSession {
            id: Uuid::new_v4(),
            stream,
            opened_at: Local::now(),
        };

        log::info!(
            "{} session {} active at {}x{}",
            LOG_TAG_CAPTURE,
            session.id,
            width,
            height
        );

        let id = session.id;
        self.session = Some(session);
        Ok(id)
    }

    /// Returns whether a session was actually stopped.
    pub fn deactivate(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                session.stream.stop_all_tracks();
                log::info!(
                    "{} session {} stopped after {}s",
                    LOG_TAG_CAPTURE,
                    session.id,
                    (Local::now() - session.opened_at).num_seconds()
                );
                true
            }
            None => {
                log::debug!("{} deactivate called while inactive", LOG_TAG_CAPTURE);
                false
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn active_session(&self) -> Option<&CaptureSession> {
        self.session.as_ref()
    }

    pub fn is_current_session(&self, session_id: Uuid) -> bool {
        self.session
            .as_ref()
            .map(|session| session.id == session_id)
            .unwrap_or(false)
    }
}

impl Drop for CaptureSessionManager {
    fn drop(&mut self) {
        self.deactivate();
    }
}
