use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("capture device unavailable: {message}")]
    DeviceAccess { message: String },
    #[error("no active capture session")]
    NoActiveSession,
    #[error("text recognition failed: {message}")]
    Recognition { message: String },
    #[error("missing or expired credential")]
    Unauthenticated,
    #[error("plate verification failed: {message}")]
    Verification { message: String },
    #[error("scan history unavailable: {message}")]
    HistoryUnavailable { message: String },
}

pub type ScanResult<T> = Result<T, ScanError>;

impl ScanError {
    pub fn device_access(error: impl std::fmt::Display) -> Self {
        ScanError::DeviceAccess {
            message: format!("{:#}", error),
        }
    }

    pub fn recognition(error: impl std::fmt::Display) -> Self {
        ScanError::Recognition {
            message: format!("{:#}", error),
        }
    }

    pub fn verification(error: impl std::fmt::Display) -> Self {
        ScanError::Verification {
            message: format!("{:#}", error),
        }
    }

    pub fn history_unavailable(error: impl std::fmt::Display) -> Self {
        ScanError::HistoryUnavailable {
            message: format!("{:#}", error),
        }
    }
}
