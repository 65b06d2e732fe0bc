use serde::{Deserialize, Serialize};

use super::ReportedStatus;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlateCheckRequest {
    pub plate: String,
    pub raw_text: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlateVerdict {
    pub plate: String,
    pub status: ReportedStatus,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HistoryRecord {
    pub plate: String,
    pub status: ReportedStatus,
    pub checked_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}
