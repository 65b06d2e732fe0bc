use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use crate::core::errors::{ScanError, ScanResult};
use crate::core::interfaces::adapters::PlateAuthority;
use crate::core::models::{AuthCredential, HistoryRecord, ScanOutcome};
use crate::global_constants::LOG_TAG_LEDGER;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerUpdate {
    Applied,
    Discarded,
}

#[derive(Default)]
struct LedgerState {
    entries: VecDeque<ScanOutcome>,
    seeded: bool,
    closed: bool,
}

/// Newest-first scan history for one scanning session.
///
/// `record` only ever prepends. Remote history is appended behind the local
/// entries once per session; later loads are discarded so no recorded attempt
/// is ever dropped or reordered.
pub struct ScanHistoryLedger {
    authority: Arc<dyn PlateAuthority>,
    state: Mutex<LedgerState>,
}

impl ScanHistoryLedger {
    pub fn new(authority: Arc<dyn PlateAuthority>) -> Self {
        Self {
            authority,
            state: Mutex::new(LedgerState::default()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, LedgerState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub async fn load(&self, credential: Option<&AuthCredential>) -> ScanResult<LedgerUpdate> {
        {
            let state = self.lock_state();
            if state.closed {
                log::debug!("{} ledger closed, skipping history load", LOG_TAG_LEDGER);
                return Ok(LedgerUpdate::Discarded);
            }
            if state.seeded {
                log::debug!("{} history already seeded, skipping load", LOG_TAG_LEDGER);
                return Ok(LedgerUpdate::Discarded);
            }
        }

        let credential = credential
            .filter(|credential| credential.is_usable())
            .ok_or_else(|| {
                log::warn!("{} refusing to load history without a valid credential", LOG_TAG_LEDGER);
                ScanError::Unauthenticated
            })?;

        log::info!("{} fetching remote scan history", LOG_TAG_LEDGER);

        let records = self
            .authority
            .fetch_history(credential)
            .await
            .map_err(|error| {
                log::error!("{} history fetch failed: {:#}", LOG_TAG_LEDGER, error);
                ScanError::history_unavailable(error)
            })?;

        let remote_outcomes = records
            .iter()
            .map(project_history_record)
            .collect::<Result<Vec<_>>>()
            .map_err(|error| {
                log::error!("{} history response malformed: {:#}", LOG_TAG_LEDGER, error);
                ScanError::history_unavailable(error)
            })?;

        let mut state = self.lock_state();
        if state.closed || state.seeded {
            log::info!(
                "{} ledger closed or seeded during history load, discarding result",
                LOG_TAG_LEDGER
            );
            return Ok(LedgerUpdate::Discarded);
        }

        // Until seeded, every entry is a local attempt the server may not hold.
        let local_count = state.entries.len();
        let remote_count = remote_outcomes.len();
        state.entries.extend(remote_outcomes);
        state.seeded = true;

        log::info!(
            "{} seeded {} remote entries behind {} local entries",
            LOG_TAG_LEDGER,
            remote_count,
            local_count
        );

        Ok(LedgerUpdate::Applied)
    }

    pub fn is_seeded(&self) -> bool {
        self.lock_state().seeded
    }

    pub fn record(&self, outcome: ScanOutcome) -> LedgerUpdate {
        let mut state = self.lock_state();

        if state.closed {
            log::warn!(
                "{} ledger closed, discarding outcome for {}",
                LOG_TAG_LEDGER,
                outcome.plate()
            );
            return LedgerUpdate::Discarded;
        }

        log::info!(
            "{} recorded {} as {} at {}",
            LOG_TAG_LEDGER,
            outcome.plate(),
            outcome.status(),
            outcome.display_time()
        );

        state.entries.push_front(outcome);
        LedgerUpdate::Applied
    }

    pub fn close(&self) {
        let mut state = self.lock_state();
        if !state.closed {
            state.closed = true;
            log::info!("{} ledger closed with {} entries", LOG_TAG_LEDGER, state.entries.len());
        }
    }

    pub fn entries(&self) -> Vec<ScanOutcome> {
        self.lock_state().entries.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<ScanOutcome> {
        self.lock_state().entries.front().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock_state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn project_history_record(record: &HistoryRecord) -> Result<ScanOutcome> {
    let checked_at = parse_checked_at(&record.checked_at)
        .with_context(|| format!("invalid checked_at for plate {}", record.plate))?;

    Ok(ScanOutcome::reported(
        record.plate.clone(),
        record.status.clone(),
        checked_at,
    ))
}

/// Accepts RFC 3339 and the naive ISO-8601 form the backend emits, which is UTC.
pub fn parse_checked_at(value: &str) -> Result<DateTime<Local>> {
    let trimmed = value.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(with_offset.with_timezone(&Local));
    }

    let naive = trimmed
        .parse::<NaiveDateTime>()
        .with_context(|| format!("unrecognized timestamp '{}'", trimmed))?;

    Ok(Utc.from_utc_datetime(&naive).with_timezone(&Local))
}
