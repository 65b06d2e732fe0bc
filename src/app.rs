use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::adapters::{
    HttpPlateAuthorityClient, SharedAuthenticationContext, StillImageCaptureDevice,
    TesseractTextRecognizer,
};
use crate::core::errors::ScanError;
use crate::core::interfaces::adapters::PlateAuthority;
use crate::core::interfaces::ports::CaptureDevice;
use crate::core::models::{
    AuthCredential, CaptureSource, ScanOutcome, ScannerSettings, StatusSeverity,
};
use crate::core::orchestrators::{ScanOrchestrator, ScanReport};
use crate::global_constants::{APPLICATION_NAME, ENV_TOKEN, HELP_TEXT, LOG_TAG_APP};
use crate::ports::XcapCaptureDevice;

#[derive(Debug, Clone, PartialEq)]
enum OperatorCommand {
    ToggleCamera,
    Scan,
    History,
    Login { username: String, password: String },
    Token(String),
    Logout,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Option<OperatorCommand> {
    let mut words = line.split_whitespace();
    let verb = words.next()?.to_lowercase();

    let command = match verb.as_str() {
        "camera" | "c" => OperatorCommand::ToggleCamera,
        "scan" | "s" => OperatorCommand::Scan,
        "history" | "h" => OperatorCommand::History,
        "login" => match (words.next(), words.next()) {
            (Some(username), Some(password)) => OperatorCommand::Login {
                username: username.to_string(),
                password: password.to_string(),
            },
            _ => OperatorCommand::Unknown("usage: login <user> <password>".to_string()),
        },
        "token" => match words.next() {
            Some(token) => OperatorCommand::Token(token.to_string()),
            None => OperatorCommand::Unknown("usage: token <bearer>".to_string()),
        },
        "logout" => OperatorCommand::Logout,
        "help" | "?" => OperatorCommand::Help,
        "quit" | "exit" | "q" => OperatorCommand::Quit,
        other => OperatorCommand::Unknown(format!("unknown command '{}'", other)),
    };

    Some(command)
}

fn severity_marker(severity: StatusSeverity) -> &'static str {
    match severity {
        StatusSeverity::Clear => "[ OK ]",
        StatusSeverity::Alert => "[ALERT]",
        StatusSeverity::Warning => "[ ?? ]",
    }
}

fn format_outcome(outcome: &ScanOutcome) -> String {
    format!(
        "{} {}  {:<12} {}",
        severity_marker(outcome.status().severity()),
        outcome.display_time(),
        outcome.plate(),
        outcome.status_label()
    )
}

fn build_capture_device(source: &CaptureSource) -> Arc<dyn CaptureDevice> {
    match source {
        CaptureSource::Screen => Arc::new(XcapCaptureDevice::initialize()),
        CaptureSource::StillImage { path } => Arc::new(StillImageCaptureDevice::new(path)),
    }
}

pub struct ScannerApp {
    orchestrator: Arc<ScanOrchestrator>,
    authority: Arc<HttpPlateAuthorityClient>,
    auth_context: Arc<SharedAuthenticationContext>,
}

impl ScannerApp {
    pub fn build() -> Result<Self> {
        log::info!("{} Initializing application", LOG_TAG_APP);

        let settings = ScannerSettings::load().unwrap_or_else(|e| {
            log::warn!("{} Failed to load settings: {}, using defaults", LOG_TAG_APP, e);
            ScannerSettings::default()
        });

        let authority = Arc::new(HttpPlateAuthorityClient::new(
            &settings.api_base_url,
            settings.request_timeout(),
        )?);
        let text_recognizer = Arc::new(
            TesseractTextRecognizer::build(&settings.ocr_language)
                .context("Failed to initialize text recognizer")?,
        );
        let auth_context = Arc::new(SharedAuthenticationContext::from_bearer_token(
            std::env::var(ENV_TOKEN).ok(),
        ));

        let orchestrator = Arc::new(ScanOrchestrator::build(
            build_capture_device(&settings.capture_source),
            text_recognizer,
            authority.clone(),
            auth_context.clone(),
            &settings,
        ));

        Ok(Self {
            orchestrator,
            authority,
            auth_context,
        })
    }

    pub async fn run(self) -> Result<()> {
        println!("{}", APPLICATION_NAME);
        println!("{}", HELP_TEXT);

        self.spawn_history_load();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .context("Failed to read operator input")?
        {
            let Some(command) = parse_command(&line) else {
                continue;
            };

            if command == OperatorCommand::Quit {
                break;
            }
            self.handle_command(command).await;
        }

        log::info!("{} Operator quit, releasing resources", LOG_TAG_APP);
        self.orchestrator.shutdown();
        Ok(())
    }

    async fn handle_command(&self, command: OperatorCommand) {
        match command {
            OperatorCommand::ToggleCamera => self.toggle_camera(),
            OperatorCommand::Scan => self.spawn_scan(),
            OperatorCommand::History => self.print_history().await,
            OperatorCommand::Login { username, password } => {
                self.login(&username, &password).await
            }
            OperatorCommand::Token(token) => {
                self.auth_context
                    .set_credential(AuthCredential::from_bearer_token(token));
                println!("Credential set.");
                self.spawn_history_load();
            }
            OperatorCommand::Logout => {
                self.auth_context.clear();
                println!("Signed out.");
            }
            OperatorCommand::Help => println!("{}", HELP_TEXT),
            OperatorCommand::Unknown(message) => println!("{}", message),
            OperatorCommand::Quit => {}
        }
    }

    fn toggle_camera(&self) {
        match self.orchestrator.toggle_camera() {
            Ok(true) => println!("Camera on."),
            Ok(false) => println!("Camera off."),
            Err(error) => {
                log::error!("{} {}", LOG_TAG_APP, error);
                println!("Camera unavailable: {}", error);
            }
        }
    }

    fn spawn_scan(&self) {
        let orchestrator = Arc::clone(&self.orchestrator);

        tokio::spawn(async move {
            match orchestrator.scan().await {
                Ok(ScanReport::Recorded(outcome)) => println!("{}", format_outcome(&outcome)),
                Ok(ScanReport::Discarded(outcome)) => {
                    println!("Camera stopped before {} was recorded.", outcome.plate());
                }
                Ok(ScanReport::Busy) => println!("A scan is already running."),
                Err(ScanError::NoActiveSession) => println!("Turn the camera on first."),
                Err(error) => {
                    log::error!("{} {}", LOG_TAG_APP, error);
                    println!("Scan failed: {}", error);
                }
            }
        });
    }

    /// Seeds the ledger in the background unless it already holds the
    /// remote history.
    fn spawn_history_load(&self) {
        if self.orchestrator.is_history_loaded() {
            return;
        }
        let orchestrator = Arc::clone(&self.orchestrator);

        tokio::spawn(async move {
            if let Err(error) = orchestrator.load_history().await {
                log::warn!("{} history not loaded: {}", LOG_TAG_APP, error);
            }
        });
    }

    async fn print_history(&self) {
        if !self.orchestrator.is_history_loaded() {
            if let Err(error) = self.orchestrator.load_history().await {
                println!("Remote history unavailable: {}", error);
            }
        }

        let history = self.orchestrator.history();
        if history.is_empty() {
            println!("No scans yet.");
            return;
        }

        for outcome in &history {
            println!("{}", format_outcome(outcome));
        }
    }

    async fn login(&self, username: &str, password: &str) {
        match self.authority.login(username, password).await {
            Ok(credential) => {
                self.auth_context.set_credential(credential);
                println!("Signed in as {}.", username);
                self.spawn_history_load();
            }
            Err(error) => {
                log::warn!("{} login failed: {:#}", LOG_TAG_APP, error);
                println!("Login failed: {}", error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{ReportedStatus, ScanStatus};
    use chrono::{Local, TimeZone};

    #[test]
    fn test_parse_command_ignores_blank_lines() {
        assert_eq!(parse_command("   "), None);
    }

    #[test]
    fn test_parse_command_recognizes_verbs_case_insensitively() {
        assert_eq!(parse_command("SCAN"), Some(OperatorCommand::Scan));
        assert_eq!(parse_command(" camera "), Some(OperatorCommand::ToggleCamera));
        assert_eq!(parse_command("q"), Some(OperatorCommand::Quit));
    }

    #[test]
    fn test_parse_command_login_requires_both_arguments() {
        assert_eq!(
            parse_command("login agent secret"),
            Some(OperatorCommand::Login {
                username: "agent".to_string(),
                password: "secret".to_string(),
            })
        );
        assert!(matches!(
            parse_command("login agent"),
            Some(OperatorCommand::Unknown(_))
        ));
    }

    #[test]
    fn test_parse_command_token_keeps_case() {
        assert_eq!(
            parse_command("token eyJAbC.x.y"),
            Some(OperatorCommand::Token("eyJAbC.x.y".to_string()))
        );
    }

    #[test]
    fn test_parse_command_unknown_verb() {
        assert!(matches!(
            parse_command("launch"),
            Some(OperatorCommand::Unknown(message)) if message.contains("launch")
        ));
    }

    #[test]
    fn test_format_outcome_marks_severity() {
        let scanned_at = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 5).unwrap();

        let wanted = format_outcome(&ScanOutcome::new("ABC123", ScanStatus::Requerida, scanned_at));
        let clear = format_outcome(&ScanOutcome::new("XYZ9999", ScanStatus::Normal, scanned_at));
        let failed = format_outcome(&ScanOutcome::new("XYZ9999", ScanStatus::ErrorApi, scanned_at));

        assert!(wanted.starts_with("[ALERT] 09:30:05"));
        assert!(wanted.ends_with("Requerida"));
        assert!(clear.starts_with("[ OK ]"));
        assert!(failed.starts_with("[ ?? ]"));
        assert!(failed.ends_with("Error API"));
    }

    #[test]
    fn test_format_outcome_shows_server_wording() {
        let scanned_at = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 5).unwrap();
        let outcome = ScanOutcome::reported(
            "XYZ9999",
            ReportedStatus::from("Robada".to_string()),
            scanned_at,
        );

        let line = format_outcome(&outcome);

        assert!(line.starts_with("[ ?? ]"));
        assert!(line.ends_with("Robada"));
    }

    #[test]
    fn test_build_capture_device_for_still_image() {
        let device = build_capture_device(&CaptureSource::StillImage {
            path: "/nonexistent/plate.png".into(),
        });

        assert!(device
            .open_stream(crate::core::models::FacingMode::Environment)
            .is_err());
    }
}
