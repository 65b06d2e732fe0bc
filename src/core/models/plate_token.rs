use std::fmt;

/// Canonical plate text: uppercase, no whitespace, matching the plate pattern.
///
/// Only the extractor builds these, so holding one means the pattern matched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlateToken {
    value: String,
}

impl PlateToken {
    pub(crate) fn from_match(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for PlateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
