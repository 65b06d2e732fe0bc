mod auth_credential;
mod facing_mode;
mod frame_buffer;
mod plate_check;
mod plate_token;
mod recognition;
mod scan_outcome;
mod scanner_settings;

pub use auth_credential::AuthCredential;
pub use facing_mode::FacingMode;
pub use frame_buffer::FrameBuffer;
pub use plate_check::{HistoryRecord, LoginRequest, LoginResponse, PlateCheckRequest, PlateVerdict};
pub use plate_token::PlateToken;
pub use recognition::RecognitionResult;
pub use scan_outcome::{ReportedStatus, ScanOutcome, ScanStatus, StatusSeverity};
pub use scanner_settings::{CaptureSource, ScannerSettings};
