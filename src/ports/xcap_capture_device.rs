use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};

use crate::core::interfaces::ports::{CaptureDevice, VideoStream};
use crate::core::models::{FacingMode, FrameBuffer};
use crate::global_constants::{
    ERROR_CONTEXT_CAPTURE_MONITOR, ERROR_CONTEXT_PRIMARY_MONITOR, LOG_TAG_CAPTURE,
};

/// Treats the primary display as a video source. Displays have no facing
/// direction, so the hint is only logged.
pub struct XcapCaptureDevice;

impl XcapCaptureDevice {
    pub fn initialize() -> Self {
        log::debug!("{} initializing xcap capture device", LOG_TAG_CAPTURE);
        Self
    }

    fn find_primary_monitor() -> Result<xcap::Monitor> {
        let monitors = xcap::Monitor::all().context("Unable to enumerate monitors")?;

        monitors
            .into_iter()
            .find(|monitor| monitor.is_primary().unwrap_or(false))
            .context(ERROR_CONTEXT_PRIMARY_MONITOR)
    }

    fn find_monitor_by_id(monitor_id: u32) -> Result<xcap::Monitor> {
        let monitors = xcap::Monitor::all().context("Unable to enumerate monitors")?;

        monitors
            .into_iter()
            .find(|monitor| monitor.id().map(|id| id == monitor_id).unwrap_or(false))
            .with_context(|| format!("Monitor {} is no longer available", monitor_id))
    }
}

impl CaptureDevice for XcapCaptureDevice {
    fn open_stream(&self, facing_mode: FacingMode) -> Result<Box<dyn VideoStream>> {
        log::debug!(
            "{} facing mode {} has no meaning for a display source",
            LOG_TAG_CAPTURE,
            facing_mode
        );

        let monitor = Self::find_primary_monitor()?;
        let monitor_id = monitor.id().context("Unable to read monitor id")?;

        // Probe once so the advertised resolution is in physical pixels.
        let probe = monitor
            .capture_image()
            .context(ERROR_CONTEXT_CAPTURE_MONITOR)?;
        let native_resolution = (probe.width(), probe.height());

        log::info!(
            "{} opened monitor {} at {}x{}",
            LOG_TAG_CAPTURE,
            monitor_id,
            native_resolution.0,
            native_resolution.1
        );

        Ok(Box::new(XcapVideoStream {
            monitor_id,
            native_resolution,
            stopped: AtomicBool::new(false),
        }))
    }
}

struct XcapVideoStream {
    monitor_id: u32,
    native_resolution: (u32, u32),
    stopped: AtomicBool,
}

fn convert_image_to_frame_buffer(image: xcap::image::RgbaImage) -> Result<FrameBuffer> {
    let width_pixels = image.width();
    let height_pixels = image.height();
    let raw_rgba_data = image.into_raw();

    log::debug!(
        "{} captured {}x{} frame",
        LOG_TAG_CAPTURE,
        width_pixels,
        height_pixels
    );

    FrameBuffer::build_from_raw_data(width_pixels, height_pixels, raw_rgba_data)
}

impl VideoStream for XcapVideoStream {
    fn native_resolution(&self) -> (u32, u32) {
        self.native_resolution
    }

    fn current_frame(&self) -> Result<FrameBuffer> {
        if self.stopped.load(Ordering::SeqCst) {
            anyhow::bail!("Capture stream has been stopped");
        }

        let monitor = XcapCaptureDevice::find_monitor_by_id(self.monitor_id)?;
        let image = monitor
            .capture_image()
            .context(ERROR_CONTEXT_CAPTURE_MONITOR)?;

        convert_image_to_frame_buffer(image)
    }

    fn stop_all_tracks(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            log::info!("{} released monitor {}", LOG_TAG_CAPTURE, self.monitor_id);
        }
    }
}
