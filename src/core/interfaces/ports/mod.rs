mod authentication_context;
mod capture_device;

pub use authentication_context::AuthenticationContext;
pub use capture_device::{CaptureDevice, VideoStream};
