use crate::core::errors::{ScanError, ScanResult};
use crate::core::models::FrameBuffer;
use crate::core::services::CaptureSession;
use crate::global_constants::LOG_TAG_SAMPLER;

#[derive(Debug, Default, Clone, Copy)]
pub struct FrameSampler;

impl FrameSampler {
    pub fn new() -> Self {
        Self
    }

    pub fn sample(&self, session: Option<&CaptureSession>) -> ScanResult<FrameBuffer> {
        let session = session.ok_or_else(|| {
            log::warn!("{} sample requested without an active session", LOG_TAG_SAMPLER);
            ScanError::NoActiveSession
        })?;

        let stream = session.stream();
        let expected_dimensions = stream.native_resolution();

        let frame = stream.current_frame().map_err(|error| {
            log::error!(
                "{} session {} failed to deliver a frame: {:#}",
                LOG_TAG_SAMPLER,
                session.id(),
                error
            );
            ScanError::device_access(error)
        })?;

        if frame.dimensions() != expected_dimensions {
            log::error!(
                "{} frame is {}x{} but stream advertises {}x{}",
                LOG_TAG_SAMPLER,
                frame.width,
                frame.height,
                expected_dimensions.0,
                expected_dimensions.1
            );
            return Err(ScanError::DeviceAccess {
                message: format!(
                    "frame size {}x{} differs from stream resolution {}x{}",
                    frame.width, frame.height, expected_dimensions.0, expected_dimensions.1
                ),
            });
        }

        log::debug!(
            "{} sampled {}x{} frame from session {}",
            LOG_TAG_SAMPLER,
            frame.width,
            frame.height,
            session.id()
        );

        Ok(frame)
    }
}
