mod scan_orchestrator;

pub use scan_orchestrator::{ScanOrchestrator, ScanReport};
