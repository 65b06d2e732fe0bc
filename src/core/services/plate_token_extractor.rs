use std::sync::OnceLock;

use regex::Regex;

use crate::core::models::{PlateToken, RecognitionResult};
use crate::global_constants::{LOG_TAG_EXTRACTOR, PLATE_PATTERN};

fn plate_regex() -> Option<&'static Regex> {
    static PLATE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    PLATE_REGEX
        .get_or_init(|| match Regex::new(PLATE_PATTERN) {
            Ok(regex) => Some(regex),
            Err(error) => {
                log::error!("{} invalid plate pattern: {}", LOG_TAG_EXTRACTOR, error);
                None
            }
        })
        .as_ref()
}

pub fn canonicalize(raw_text: &str) -> String {
    raw_text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Returns the first plate-shaped substring of the canonicalized text.
///
/// Later candidates are ignored even when they look more plausible.
pub fn extract(result: &RecognitionResult) -> Option<PlateToken> {
    let canonical = canonicalize(&result.raw_text);
    let token = plate_regex()
        .and_then(|regex| regex.find(&canonical))
        .map(|found| PlateToken::from_match(found.as_str()));

    match &token {
        Some(token) => log::info!("{} extracted plate {}", LOG_TAG_EXTRACTOR, token),
        None => log::info!(
            "{} no plate pattern in {} canonical characters",
            LOG_TAG_EXTRACTOR,
            canonical.chars().count()
        ),
    }

    token
}
