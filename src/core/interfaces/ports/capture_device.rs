use anyhow::Result;

use crate::core::models::{FacingMode, FrameBuffer};

pub trait CaptureDevice: Send + Sync {
    fn open_stream(&self, facing_mode: FacingMode) -> Result<Box<dyn VideoStream>>;
}

pub trait VideoStream: Send + Sync {
    fn native_resolution(&self) -> (u32, u32);

    fn current_frame(&self) -> Result<FrameBuffer>;

    fn stop_all_tracks(&self);
}
