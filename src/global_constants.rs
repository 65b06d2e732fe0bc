#![allow(dead_code)]

pub const APPLICATION_NAME: &str = "Plate Scanner";
pub const APPLICATION_DIR_NAME: &str = "plate-scanner";

pub const LOG_TAG_APP: &str = "[APP]";
pub const LOG_TAG_CAPTURE: &str = "[CAPTURE]";
pub const LOG_TAG_SAMPLER: &str = "[SAMPLER]";
pub const LOG_TAG_OCR: &str = "[OCR]";
pub const LOG_TAG_EXTRACTOR: &str = "[EXTRACTOR]";
pub const LOG_TAG_AUTHORITY: &str = "[AUTHORITY]";
pub const LOG_TAG_LEDGER: &str = "[LEDGER]";
pub const LOG_TAG_PIPELINE: &str = "[PIPELINE]";
pub const LOG_TAG_SETTINGS: &str = "[SETTINGS]";
pub const LOG_TAG_AUTH: &str = "[AUTH]";

pub const PLATE_PATTERN: &str = "[A-Z]{1,3}-?[0-9]{1,4}";
pub const UNDETECTED_PLATE_LABEL: &str = "No detectada";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONFIDENCE: f32 = 0.95;

pub const ENDPOINT_PLATE_CHECK: &str = "plates/check";
pub const ENDPOINT_HISTORY: &str = "history";
pub const ENDPOINT_LOGIN: &str = "login";

pub const ENV_API_URL: &str = "PLATE_SCANNER_API_URL";
pub const ENV_TOKEN: &str = "PLATE_SCANNER_TOKEN";

pub const SETTINGS_FILE_NAME: &str = "settings.json";

pub const ERROR_CONTEXT_CAPTURE_MONITOR: &str = "Unable to capture monitor";
pub const ERROR_CONTEXT_PRIMARY_MONITOR: &str = "Unable to find a primary monitor";

pub const DISPLAY_TIME_FORMAT: &str = "%H:%M:%S";

pub const HELP_TEXT: &str = r#"
╔════════════════════════════════════════════════════════╗
║  Plate Scanner                                         ║
║                                                        ║
║  camera              toggle the capture device         ║
║  scan                scan the current frame            ║
║  history             reload and print scan history     ║
║  login <user> <pw>   obtain a credential               ║
║  token <bearer>      use an existing credential        ║
║  logout              forget the credential             ║
║  quit                release the camera and exit       ║
║                                                        ║
╚════════════════════════════════════════════════════════╝
"#;
