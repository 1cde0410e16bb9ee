//! Input validation and post-reflow constraint checking.
//!
//! Two independent passes:
//!
//! - [`validate_input`] inspects a [`ReflowInput`] before scheduling and
//!   collects every structural problem at once (duplicate IDs, dangling
//!   references, cycles, malformed instants and calendars).
//! - [`validate`] re-checks a reflow result: dependency ordering, no overlap
//!   on a work center, and untouched maintenance orders. It fails on the
//!   first violation and never participates in scheduling decisions.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::ReflowError;
use crate::models::instant::parse_instant;
use crate::models::{ReflowInput, TimeWindow, WorkOrder};
use crate::scheduler::dependency_order;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A work order references a work center that doesn't exist.
    UnknownWorkCenter,
    /// A work order depends on a work order that doesn't exist.
    InvalidPredecessor,
    /// Dependency graph contains a cycle.
    CyclicDependency,
    /// An instant string cannot be parsed.
    InvalidInstant,
    /// A work order has a negative duration.
    NegativeDuration,
    /// A shift is outside day 0-6 or `0 <= start < end <= 24`.
    InvalidShift,
    /// A maintenance window ends before it starts.
    InvalidMaintenanceWindow,
    /// A fixed maintenance order declares dependencies it cannot honor.
    MaintenanceWithDependencies,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a reflow input.
///
/// Checks:
/// 1. No duplicate work order or work center IDs
/// 2. Every instant parses
/// 3. No negative durations
/// 4. Every work order references an existing work center
/// 5. Every dependency references an existing work order
/// 6. No circular dependencies
/// 7. Shifts and maintenance windows are well-formed
/// 8. Maintenance orders have no dependencies
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(input: &ReflowInput) -> ValidationResult {
    let mut errors = Vec::new();

    let mut center_ids = HashSet::new();
    for center in &input.work_centers {
        if !center_ids.insert(center.id()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate work center ID: {}", center.doc_id),
            ));
        }

        for shift in center.shifts() {
            if !shift.is_valid() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidShift,
                    format!(
                        "Work center '{}' has invalid shift: day {} {}..{}",
                        center.doc_id, shift.day_of_week, shift.start_hour, shift.end_hour
                    ),
                ));
            }
        }

        for mw in &center.data.maintenance_windows {
            match mw.window() {
                Ok(w) if w.end < w.start => errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidMaintenanceWindow,
                    format!(
                        "Work center '{}' has maintenance window ending before it starts: {}..{}",
                        center.doc_id, mw.start_date, mw.end_date
                    ),
                )),
                Ok(_) => {}
                Err(e) => errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidInstant,
                    format!("Work center '{}': {e}", center.doc_id),
                )),
            }
        }
    }

    let mut order_ids = HashSet::new();
    for wo in &input.work_orders {
        if !order_ids.insert(wo.id()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate work order ID: {}", wo.doc_id),
            ));
        }

        for value in [&wo.data.start_date, &wo.data.end_date] {
            if let Err(e) = parse_instant(value) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidInstant,
                    format!("Work order '{}': {e}", wo.doc_id),
                ));
            }
        }

        if wo.data.duration_minutes < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeDuration,
                format!(
                    "Work order '{}' has negative duration {}",
                    wo.doc_id, wo.data.duration_minutes
                ),
            ));
        }

        if wo.is_maintenance() && !wo.dependencies().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MaintenanceWithDependencies,
                format!(
                    "Maintenance work order '{}' cannot depend on other work orders",
                    wo.doc_id
                ),
            ));
        }
    }

    for wo in &input.work_orders {
        if !center_ids.contains(wo.data.work_center_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownWorkCenter,
                format!(
                    "Work order '{}' references unknown work center '{}'",
                    wo.doc_id, wo.data.work_center_id
                ),
            ));
        }
        for parent in wo.dependencies() {
            if !order_ids.contains(parent.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPredecessor,
                    format!(
                        "Work order '{}' references unknown predecessor '{}'",
                        wo.doc_id, parent
                    ),
                ));
            }
        }
    }

    // Other resolver failures are already reported above.
    if let Err(ReflowError::CycleDetected { work_orders }) = dependency_order(&input.work_orders)
    {
        errors.push(ValidationError::new(
            ValidationErrorKind::CyclicDependency,
            format!(
                "Circular dependency detected involving work orders: {}",
                work_orders.join(", ")
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Re-checks a reflow result against its input.
///
/// Checks, in order, each over `updated`:
/// 1. Every parent ends no later than its child starts
/// 2. Orders on one work center do not overlap (empty intervals occupy no time)
/// 3. Orders flagged maintenance in `input` kept their exact start/end strings
///
/// # Errors
/// The first `MissingDependency`, `DependencyViolation`, `OverlapViolation`
/// or `MaintenanceMoved` found.
pub fn validate(input: &ReflowInput, updated: &[WorkOrder]) -> Result<(), ReflowError> {
    check_dependencies(updated)?;
    check_no_overlap(updated)?;
    check_maintenance_unchanged(input, updated)
}

fn check_dependencies(orders: &[WorkOrder]) -> Result<(), ReflowError> {
    let by_id: HashMap<&str, &WorkOrder> = orders.iter().map(|w| (w.id(), w)).collect();

    for wo in orders {
        let start = wo.start()?;
        for parent_id in wo.dependencies() {
            let Some(parent) = by_id.get(parent_id.as_str()) else {
                return Err(ReflowError::MissingDependency {
                    work_order: wo.doc_id.clone(),
                    parent: parent_id.clone(),
                });
            };
            if start < parent.end()? {
                return Err(ReflowError::DependencyViolation {
                    work_order: wo.doc_id.clone(),
                    start: wo.data.start_date.clone(),
                    parent: parent_id.clone(),
                    parent_end: parent.data.end_date.clone(),
                });
            }
        }
    }
    Ok(())
}

fn check_no_overlap(orders: &[WorkOrder]) -> Result<(), ReflowError> {
    let mut by_center: BTreeMap<&str, Vec<(TimeWindow, &WorkOrder)>> = BTreeMap::new();
    for wo in orders {
        let window = TimeWindow::new(wo.start()?, wo.end()?);
        // An empty interval occupies no time, same as in the engine's calendars.
        if window.is_empty() {
            continue;
        }
        by_center
            .entry(wo.data.work_center_id.as_str())
            .or_default()
            .push((window, wo));
    }

    for (center, mut slots) in by_center {
        slots.sort_by(|a, b| {
            (a.0.start, a.0.end, a.1.id()).cmp(&(b.0.start, b.0.end, b.1.id()))
        });
        for pair in slots.windows(2) {
            let (prev_window, prev) = pair[0];
            let (next_window, next) = pair[1];
            if prev_window.overlaps(&next_window) {
                return Err(ReflowError::OverlapViolation {
                    work_center: center.to_string(),
                    previous: prev.doc_id.clone(),
                    previous_start: prev.data.start_date.clone(),
                    previous_end: prev.data.end_date.clone(),
                    next: next.doc_id.clone(),
                    next_start: next.data.start_date.clone(),
                    next_end: next.data.end_date.clone(),
                });
            }
        }
    }
    Ok(())
}

fn check_maintenance_unchanged(input: &ReflowInput, updated: &[WorkOrder]) -> Result<(), ReflowError> {
    let originals: HashMap<&str, &WorkOrder> =
        input.work_orders.iter().map(|w| (w.id(), w)).collect();

    for wo in updated {
        let Some(original) = originals.get(wo.id()) else {
            continue;
        };
        if !original.is_maintenance() {
            continue;
        }
        if original.data.start_date != wo.data.start_date || original.data.end_date != wo.data.end_date {
            return Err(ReflowError::MaintenanceMoved {
                work_order: wo.doc_id.clone(),
                original_start: original.data.start_date.clone(),
                original_end: original.data.end_date.clone(),
                start: wo.data.start_date.clone(),
                end: wo.data.end_date.clone(),
            });
        }
    }
    Ok(())
}
