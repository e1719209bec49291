//! Accumulated batch validation failures.

use std::fmt;

/// A batch's structural validation failed for one or more independent
/// reasons. All applicable checks run regardless of earlier failures; this
/// is the full set, not the first one encountered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchValidationError {
    pub reasons: Vec<String>,
}

impl std::error::Error for BatchValidationError {}

impl fmt::Display for BatchValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "batch transactions: ")?;
        for (i, reason) in self.reasons.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{reason}")?;
        }
        Ok(())
    }
}
