use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};

use crate::core::interfaces::ports::{CaptureDevice, VideoStream};
use crate::core::models::{FacingMode, FrameBuffer};
use crate::global_constants::LOG_TAG_CAPTURE;

/// Serves a single image file as if it were a live feed. Useful on machines
/// without a display and for replaying a photo of a plate.
pub struct StillImageCaptureDevice {
    image_path: PathBuf,
}

impl StillImageCaptureDevice {
    pub fn new(image_path: impl Into<PathBuf>) -> Self {
        Self {
            image_path: image_path.into(),
        }
    }

    fn load_frame(&self) -> Result<FrameBuffer> {
        let image = image::open(&self.image_path)
            .with_context(|| format!("Unable to open image {:?}", self.image_path))?;

        FrameBuffer::from_rgba_image(image.to_rgba8())
    }
}

impl CaptureDevice for StillImageCaptureDevice {
    fn open_stream(&self, facing_mode: FacingMode) -> Result<Box<dyn VideoStream>> {
        let frame = self.load_frame()?;

        log::info!(
            "{} streaming {:?} ({}x{}, facing {})",
            LOG_TAG_CAPTURE,
            self.image_path,
            frame.width,
            frame.height,
            facing_mode
        );

        Ok(Box::new(StillImageStream {
            width: frame.width,
            height: frame.height,
            raw_data: frame.raw_data().to_vec(),
            stopped: AtomicBool::new(false),
        }))
    }
}

struct StillImageStream {
    width: u32,
    height: u32,
    raw_data: Vec<u8>,
    stopped: AtomicBool,
}

impl VideoStream for StillImageStream {
    fn native_resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn current_frame(&self) -> Result<FrameBuffer> {
        if self.stopped.load(Ordering::SeqCst) {
            anyhow::bail!("Capture stream has been stopped");
        }
        FrameBuffer::build_from_raw_data(self.width, self.height, self.raw_data.clone())
    }

    fn stop_all_tracks(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            log::info!("{} still image stream stopped", LOG_TAG_CAPTURE);
        }
    }
}
