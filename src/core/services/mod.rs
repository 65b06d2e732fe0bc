mod capture_session_manager;
mod frame_sampler;
pub mod plate_token_extractor;
mod scan_history_ledger;
mod verification_client;

pub use capture_session_manager::{CaptureSession, CaptureSessionManager};
pub use frame_sampler::FrameSampler;
pub use scan_history_ledger::{parse_checked_at, LedgerUpdate, ScanHistoryLedger};
pub use verification_client::VerificationClient;
