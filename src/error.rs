//! Error types for reflow.
//!
//! Every failure aborts the current reflow call. Variants fall into three
//! categories (see [`ErrorCategory`]): malformed caller input, calendar
//! configuration that cannot produce a schedule, and invariant breaks found
//! when re-checking the engine's own output.

use thiserror::Error;

/// Broad classification of a [`ReflowError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller's data is malformed.
    Input,
    /// Calendar data is insufficient to produce a schedule.
    Configuration,
    /// The engine's output failed a re-check (engine defect).
    Invariant,
}

/// Reflow error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReflowError {
    // ===== Input errors =====
    #[error("invalid instant '{value}': {reason}")]
    InvalidInstant { value: String, reason: String },

    #[error("work order {work_order} depends on missing work order {parent}")]
    MissingDependency { work_order: String, parent: String },

    #[error("work order {work_order} references unknown work center {work_center}")]
    UnknownWorkCenter {
        work_order: String,
        work_center: String,
    },

    #[error("dependency cycle detected among work orders: {}", .work_orders.join(", "))]
    CycleDetected { work_orders: Vec<String> },

    #[error("duration must be >= 0 minutes, got {minutes}")]
    InvalidDuration { minutes: i64 },

    #[error("{minutes} working minutes from {from} run past the representable time range")]
    DurationOutOfRange { from: String, minutes: i64 },

    #[error("duplicate work order id {0}")]
    DuplicateWorkOrder(String),

    #[error("malformed reflow input: {0}")]
    MalformedInput(String),

    // ===== Configuration errors =====
    #[error("no shift starts within {lookahead_days} days after {after} (check work center shifts)")]
    NoUpcomingShift { after: String, lookahead_days: u32 },

    #[error("{operation} exceeded {limit} iterations starting at {from} (impossible schedule?)")]
    ImpossibleSchedule {
        operation: &'static str,
        from: String,
        limit: usize,
    },

    // ===== Invariant errors =====
    #[error("dependency violation: {work_order} starts {start} before parent {parent} ends {parent_end}")]
    DependencyViolation {
        work_order: String,
        start: String,
        parent: String,
        parent_end: String,
    },

    #[error("overlap on work center {work_center}: {previous} ({previous_start}..{previous_end}) overlaps {next} ({next_start}..{next_end})")]
    OverlapViolation {
        work_center: String,
        previous: String,
        previous_start: String,
        previous_end: String,
        next: String,
        next_start: String,
        next_end: String,
    },

    #[error("maintenance work order {work_order} moved from {original_start}..{original_end} to {start}..{end}")]
    MaintenanceMoved {
        work_order: String,
        original_start: String,
        original_end: String,
        start: String,
        end: String,
    },
}

impl ReflowError {
    /// Classifies this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInstant { .. }
            | Self::MissingDependency { .. }
            | Self::UnknownWorkCenter { .. }
            | Self::CycleDetected { .. }
            | Self::InvalidDuration { .. }
            | Self::DurationOutOfRange { .. }
            | Self::DuplicateWorkOrder(_)
            | Self::MalformedInput(_) => ErrorCategory::Input,
            Self::NoUpcomingShift { .. } | Self::ImpossibleSchedule { .. } => {
                ErrorCategory::Configuration
            }
            Self::DependencyViolation { .. }
            | Self::OverlapViolation { .. }
            | Self::MaintenanceMoved { .. } => ErrorCategory::Invariant,
        }
    }
}

impl From<serde_json::Error> for ReflowError {
    fn from(err: serde_json::Error) -> Self {
        ReflowError::MalformedInput(err.to_string())
    }
}
