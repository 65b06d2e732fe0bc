use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::FacingMode;
use crate::global_constants;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaptureSource {
    #[default]
    Screen,
    StillImage {
        path: PathBuf,
    },
}

impl fmt::Display for CaptureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureSource::Screen => write!(f, "Screen"),
            CaptureSource::StillImage { path } => write!(f, "StillImage({})", path.display()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerSettings {
    pub api_base_url: String,
    pub ocr_language: String,
    pub facing_mode: FacingMode,
    pub capture_source: CaptureSource,
    pub request_timeout_secs: u64,
    pub recognition_timeout_secs: Option<u64>,
    pub default_confidence: f32,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            api_base_url: global_constants::DEFAULT_API_BASE_URL.to_string(),
            ocr_language: global_constants::DEFAULT_OCR_LANGUAGE.to_string(),
            facing_mode: FacingMode::default(),
            capture_source: CaptureSource::default(),
            request_timeout_secs: global_constants::DEFAULT_REQUEST_TIMEOUT_SECS,
            recognition_timeout_secs: None,
            default_confidence: global_constants::DEFAULT_CONFIDENCE,
        }
    }
}

impl ScannerSettings {
    pub fn load() -> anyhow::Result<Self> {
        let settings_path = Self::get_settings_file_path()?;

        let mut settings = if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)?;
            let settings: ScannerSettings = serde_json::from_str(&contents)?;
            log::info!("{} Loaded settings from {:?}", global_constants::LOG_TAG_SETTINGS, settings_path);
            settings
        } else {
            log::info!("{} No settings file found, using defaults", global_constants::LOG_TAG_SETTINGS);
            let default_settings = Self::default();
            default_settings.save()?;
            default_settings
        };

        settings.apply_env_overrides(std::env::var(global_constants::ENV_API_URL).ok());

        log::debug!("{} API base URL: {}", global_constants::LOG_TAG_SETTINGS, settings.api_base_url);
        log::debug!("{} Capture source: {}", global_constants::LOG_TAG_SETTINGS, settings.capture_source);
        log::debug!("{} OCR language: {}", global_constants::LOG_TAG_SETTINGS, settings.ocr_language);

        Ok(settings)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let settings_path = Self::get_settings_file_path()?;

        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&settings_path, contents)?;

        log::info!("{} Saved settings to {:?}", global_constants::LOG_TAG_SETTINGS, settings_path);
        Ok(())
    }

    fn apply_env_overrides(&mut self, api_url_override: Option<String>) {
        if let Some(url) = api_url_override.filter(|url| !url.trim().is_empty()) {
            log::info!("{} API base URL overridden from environment", global_constants::LOG_TAG_SETTINGS);
            self.api_base_url = url.trim().to_string();
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn recognition_timeout(&self) -> Option<Duration> {
        self.recognition_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    fn get_settings_file_path() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join(global_constants::APPLICATION_DIR_NAME);

        Ok(config_dir.join(global_constants::SETTINGS_FILE_NAME))
    }
}
