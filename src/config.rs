//! Reflow configuration.
//!
//! Bounds for the calendar search loops. The defaults are the contract
//! values; lowering them turns slow-but-valid calendars into
//! [`ReflowError::ImpossibleSchedule`](crate::error::ReflowError) errors.

use serde::{Deserialize, Serialize};

use crate::error::ReflowError;

/// Default shift-start search horizon (days).
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 30;
/// Default iteration ceiling for snapping to the next working instant.
pub const DEFAULT_SNAP_ITERATION_LIMIT: usize = 5_000;
/// Default iteration ceiling for the working-minute segment walk.
pub const DEFAULT_ADVANCE_ITERATION_LIMIT: usize = 20_000;

/// Calendar search bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReflowConfig {
    /// How many days ahead to look for the next shift start.
    pub lookahead_days: u32,
    /// Iteration ceiling for `next_working_instant`.
    pub snap_iteration_limit: usize,
    /// Iteration ceiling for `advance_by_working_minutes`.
    pub advance_iteration_limit: usize,
}

impl ReflowConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the shift lookahead horizon.
    pub fn with_lookahead_days(mut self, days: u32) -> Self {
        self.lookahead_days = days;
        self
    }

    /// Sets the snap iteration ceiling.
    pub fn with_snap_iteration_limit(mut self, limit: usize) -> Self {
        self.snap_iteration_limit = limit;
        self
    }

    /// Sets the segment-walk iteration ceiling.
    pub fn with_advance_iteration_limit(mut self, limit: usize) -> Self {
        self.advance_iteration_limit = limit;
        self
    }

    /// Parses a JSON configuration document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ReflowError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for ReflowConfig {
    fn default() -> Self {
        Self {
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            snap_iteration_limit: DEFAULT_SNAP_ITERATION_LIMIT,
            advance_iteration_limit: DEFAULT_ADVANCE_ITERATION_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ReflowConfig::default();
        assert_eq!(cfg.lookahead_days, 30);
        assert_eq!(cfg.snap_iteration_limit, 5_000);
        assert_eq!(cfg.advance_iteration_limit, 20_000);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = ReflowConfig::from_json(r#"{"lookaheadDays": 7}"#).unwrap();
        assert_eq!(cfg.lookahead_days, 7);
        assert_eq!(cfg.advance_iteration_limit, DEFAULT_ADVANCE_ITERATION_LIMIT);
    }

    #[test]
    fn test_builder() {
        let cfg = ReflowConfig::new()
            .with_lookahead_days(3)
            .with_snap_iteration_limit(10)
            .with_advance_iteration_limit(20);
        assert_eq!(cfg.lookahead_days, 3);
        assert_eq!(cfg.snap_iteration_limit, 10);
        assert_eq!(cfg.advance_iteration_limit, 20);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ReflowConfig::from_json("not json"),
            Err(ReflowError::MalformedInput(_))
        ));
    }
}
