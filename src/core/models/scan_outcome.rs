use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::global_constants::{DISPLAY_TIME_FORMAT, UNDETECTED_PLATE_LABEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScanStatus {
    Normal,
    Requerida,
    Desconocida,
    ErrorApi,
    NoDetectada,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSeverity {
    Clear,
    Alert,
    Warning,
}

impl ScanStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ScanStatus::Normal => "Normal",
            ScanStatus::Requerida => "Requerida",
            ScanStatus::Desconocida => "Desconocida",
            ScanStatus::ErrorApi => "Error API",
            ScanStatus::NoDetectada => "No detectada",
        }
    }

    /// Free-text statuses the server knows about but we don't (e.g. "Robada")
    /// classify as `Desconocida`.
    pub fn from_label(label: &str) -> Self {
        let normalized: String = label
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "normal" => ScanStatus::Normal,
            "requerida" => ScanStatus::Requerida,
            "desconocida" => ScanStatus::Desconocida,
            "errorapi" => ScanStatus::ErrorApi,
            "nodetectada" => ScanStatus::NoDetectada,
            _ => {
                log::debug!("[SCAN_STATUS] unrecognized status '{}', using Desconocida", label);
                ScanStatus::Desconocida
            }
        }
    }

    pub fn severity(&self) -> StatusSeverity {
        match self {
            ScanStatus::Requerida => StatusSeverity::Alert,
            ScanStatus::Normal => StatusSeverity::Clear,
            _ => StatusSeverity::Warning,
        }
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for ScanStatus {
    fn from(label: String) -> Self {
        ScanStatus::from_label(&label)
    }
}

impl From<ScanStatus> for String {
    fn from(status: ScanStatus) -> Self {
        status.label().to_string()
    }
}

/// A status as the authority worded it. The label is kept verbatim for
/// display, `status` is what the scanner makes of it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "String")]
pub struct ReportedStatus {
    status: ScanStatus,
    label: String,
}

impl ReportedStatus {
    pub fn status(&self) -> ScanStatus {
        self.status
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl From<String> for ReportedStatus {
    fn from(label: String) -> Self {
        let status = ScanStatus::from_label(&label);
        let label = match label.trim() {
            "" => status.label().to_string(),
            trimmed => trimmed.to_string(),
        };
        Self { status, label }
    }
}

impl From<ScanStatus> for ReportedStatus {
    fn from(status: ScanStatus) -> Self {
        Self {
            status,
            label: status.label().to_string(),
        }
    }
}

impl PartialEq<ScanStatus> for ReportedStatus {
    fn eq(&self, other: &ScanStatus) -> bool {
        self.status == *other
    }
}

impl fmt::Display for ReportedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    plate: String,
    status: ScanStatus,
    status_label: String,
    scanned_at: DateTime<Local>,
}

impl ScanOutcome {
    pub fn new(plate: impl Into<String>, status: ScanStatus, scanned_at: DateTime<Local>) -> Self {
        Self::reported(plate, ReportedStatus::from(status), scanned_at)
    }

    pub fn reported(
        plate: impl Into<String>,
        reported: ReportedStatus,
        scanned_at: DateTime<Local>,
    ) -> Self {
        Self {
            plate: plate.into(),
            status: reported.status,
            status_label: reported.label,
            scanned_at,
        }
    }

    pub fn now(plate: impl Into<String>, status: ScanStatus) -> Self {
        Self::new(plate, status, Local::now())
    }

    pub fn undetected(status: ScanStatus) -> Self {
        Self::now(UNDETECTED_PLATE_LABEL, status)
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    /// The wording to show the operator, e.g. "Robada" for a status the
    /// scanner classifies as `Desconocida`.
    pub fn status_label(&self) -> &str {
        &self.status_label
    }

    pub fn scanned_at(&self) -> DateTime<Local> {
        self.scanned_at
    }

    pub fn display_time(&self) -> String {
        self.scanned_at.format(DISPLAY_TIME_FORMAT).to_string()
    }
}
