//! Reflow engine: forward propagation of work order timing.
//!
//! # Algorithm
//!
//! 1. Index work centers; synthesize one blackout per fixed maintenance order.
//! 2. Order work orders by dependencies ([`dependency_order`]).
//! 3. Seed every center's free cursor with the first ordered order's start.
//! 4. For each order: `candidate = max(original start, parents' end, center free)`.
//!    Maintenance orders keep their timing and only advance the cursor.
//!    Production orders snap to working time and walk their duration through
//!    the center's calendar; if the result would contain a fixed maintenance
//!    order, they restart after it.
//! 5. Emit updated orders (input order), changes, and explanations.
//!
//! This is a constraint-satisfying reflow, not an optimizer: orders never
//! change work center and never overtake each other on a center.
//!
//! # Complexity
//! O(n * (b + s)) calendar steps per day spanned, for n orders, b blackouts
//! and s shifts per center.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use tracing::{debug, info, trace, warn};

use super::dependency_order;
use crate::config::ReflowConfig;
use crate::error::ReflowError;
use crate::models::instant::{format_instant, minutes_between};
use crate::models::{
    BlackoutWindow, ReflowChange, ReflowInput, ReflowOutput, WorkCenter, WorkOrder,
    WorkingCalendar,
};

/// Reflows a schedule with the default configuration.
///
/// # Example
///
/// ```
/// use u_reflow::models::{ReflowInput, WorkCenter, WorkOrder};
///
/// let center = WorkCenter::new("wc-1").with_weekday_shifts(8.0, 17.0);
/// let order = WorkOrder::new("wo-1", "wc-1", "2026-02-09T16:00:00Z", "2026-02-09T17:00:00Z", 180);
/// let input = ReflowInput::new(vec![order], vec![center]);
///
/// let output = u_reflow::reflow(&input).unwrap();
/// let updated = output.work_order("wo-1").unwrap();
/// assert_eq!(updated.data.end_date, "2026-02-10T10:00:00Z");
/// ```
pub fn reflow(input: &ReflowInput) -> Result<ReflowOutput, ReflowError> {
    ReflowEngine::new().reflow(input)
}

/// Dependency-ordered reflow engine.
#[derive(Debug, Clone, Default)]
pub struct ReflowEngine {
    config: ReflowConfig,
}

/// A work center with its effective calendar for this call.
struct CenterPlan {
    calendar: WorkingCalendar,
}

/// Scheduling state owned by one reflow call.
struct ReflowContext<'a> {
    floor: DateTime<Utc>,
    next_free_by_center: HashMap<&'a str, DateTime<Utc>>,
    scheduled_end: HashMap<&'a str, DateTime<Utc>>,
    updated: HashMap<&'a str, WorkOrder>,
    explanations: BTreeMap<String, Vec<String>>,
}

impl<'a> ReflowContext<'a> {
    fn new(floor: DateTime<Utc>) -> Self {
        Self {
            floor,
            next_free_by_center: HashMap::new(),
            scheduled_end: HashMap::new(),
            updated: HashMap::new(),
            explanations: BTreeMap::new(),
        }
    }

    fn center_free(&self, center_id: &str) -> DateTime<Utc> {
        self.next_free_by_center
            .get(center_id)
            .copied()
            .unwrap_or(self.floor)
    }

    fn record(
        &mut self,
        original: &'a WorkOrder,
        updated: WorkOrder,
        end: DateTime<Utc>,
        reasons: Vec<String>,
    ) {
        self.scheduled_end.insert(original.id(), end);
        self.explanations.insert(original.doc_id.clone(), reasons);
        self.updated.insert(original.id(), updated);
    }
}

impl ReflowEngine {
    /// Creates an engine with default calendar bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets calendar bounds.
    pub fn with_config(mut self, config: ReflowConfig) -> Self {
        self.config = config;
        self
    }

    /// Recomputes start/end for every non-maintenance work order.
    ///
    /// # Errors
    /// `UnknownWorkCenter`, dependency errors from [`dependency_order`], and
    /// calendar errors from [`WorkingCalendar`], all fatal.
    pub fn reflow(&self, input: &ReflowInput) -> Result<ReflowOutput, ReflowError> {
        let centers = self.plan_centers(input)?;
        let ordered = dependency_order(&input.work_orders)?;

        let Some(first) = ordered.first() else {
            return Ok(ReflowOutput::default());
        };
        let mut ctx = ReflowContext::new(first.start()?);

        for wo in ordered {
            self.schedule_order(wo, &centers, &mut ctx)?;
        }

        let output = Self::finish(&input.work_orders, ctx)?;
        info!(
            work_orders = input.work_orders.len(),
            changes = output.changes.len(),
            "reflow complete"
        );
        Ok(output)
    }

    /// Builds each center's calendar: configured windows plus fixed maintenance orders.
    fn plan_centers<'a>(
        &self,
        input: &'a ReflowInput,
    ) -> Result<HashMap<&'a str, CenterPlan>, ReflowError> {
        let mut blackouts: HashMap<&str, Vec<BlackoutWindow>> = HashMap::new();
        for center in &input.work_centers {
            blackouts.insert(center.id(), configured_blackouts(center)?);
        }

        for wo in input.work_orders.iter().filter(|w| w.is_maintenance()) {
            let Some(windows) = blackouts.get_mut(wo.data.work_center_id.as_str()) else {
                return Err(unknown_center(wo));
            };
            let blackout = BlackoutWindow::from_fixed_order(wo)?;
            if blackout.window.is_empty() {
                continue;
            }
            windows.push(blackout);
        }

        Ok(input
            .work_centers
            .iter()
            .map(|center| {
                let windows = blackouts.remove(center.id()).unwrap_or_default();
                let calendar = WorkingCalendar::new(center.shifts().to_vec(), windows)
                    .with_config(self.config);
                (center.id(), CenterPlan { calendar })
            })
            .collect())
    }

    fn schedule_order<'a>(
        &self,
        wo: &'a WorkOrder,
        centers: &HashMap<&str, CenterPlan>,
        ctx: &mut ReflowContext<'a>,
    ) -> Result<(), ReflowError> {
        let center_id = wo.data.work_center_id.as_str();
        let plan = centers.get(center_id).ok_or_else(|| unknown_center(wo))?;
        let mut reasons = Vec::new();

        let mut parents_end: Option<DateTime<Utc>> = None;
        for parent in wo.dependencies() {
            let end = ctx.scheduled_end.get(parent.as_str()).copied().ok_or_else(|| {
                ReflowError::MissingDependency {
                    work_order: wo.doc_id.clone(),
                    parent: parent.clone(),
                }
            })?;
            parents_end = Some(parents_end.map_or(end, |e| e.max(end)));
        }
        if let Some(end) = parents_end {
            reasons.push(format!(
                "Dependency: waits for parents until {}.",
                format_instant(end)
            ));
        }

        let original_start = wo.start()?;
        let original_end = wo.end()?;
        let center_free = ctx.center_free(center_id);
        if center_free > original_start {
            reasons.push(format!(
                "Work center busy until {}.",
                format_instant(center_free)
            ));
        }

        let candidate = original_start
            .max(parents_end.unwrap_or(original_start))
            .max(center_free);

        if wo.is_maintenance() {
            ctx.next_free_by_center
                .insert(center_id, center_free.max(original_end));
            reasons.push("Fixed maintenance: not rescheduled.".to_string());
            debug!(work_order = %wo.doc_id, "fixed maintenance kept");
            ctx.record(wo, wo.clone(), original_end, reasons);
            return Ok(());
        }

        let calendar = &plan.calendar;
        let mut from = candidate;
        let span = loop {
            let span = calendar.advance(from, wo.data.duration_minutes)?;
            match calendar.first_fixed_order_overlapping(span.start, span.end) {
                Some(fixed) => {
                    reasons.push(format!(
                        "Deferred past {} ending {}.",
                        fixed.label(),
                        format_instant(fixed.window.end)
                    ));
                    from = fixed.window.end;
                }
                None => break span,
            }
        };
        let (start, end) = (span.start, span.end);

        if start != candidate {
            reasons.push(format!(
                "Adjusted start to working time: {}.",
                format_instant(start)
            ));
        }
        for segment in &span.segments {
            trace!(
                work_order = %wo.doc_id,
                kind = ?segment.kind,
                from = %format_instant(segment.from),
                to = %format_instant(segment.to),
                "segment"
            );
        }

        ctx.next_free_by_center.insert(center_id, end);

        if let Some(avoided) = calendar.first_blackout_starting_within(start, end) {
            reasons.push(format!(
                "Avoided maintenance block ({}) starting {}.",
                avoided.label(),
                format_instant(avoided.window.start)
            ));
        }

        let moved_start = minutes_between(original_start, start);
        if moved_start != 0 {
            reasons.push(format!("Moved start by {moved_start} minutes."));
        }
        let moved_end = minutes_between(original_end, end);
        if moved_end != 0 {
            reasons.push(format!("Moved end by {moved_end} minutes."));
        }

        debug!(
            work_order = %wo.doc_id,
            center = center_id,
            start = %format_instant(start),
            end = %format_instant(end),
            "scheduled"
        );
        ctx.record(wo, wo.rescheduled(start, end), end, reasons);
        Ok(())
    }

    /// Assembles the output in input order and derives changes.
    fn finish(
        originals: &[WorkOrder],
        mut ctx: ReflowContext<'_>,
    ) -> Result<ReflowOutput, ReflowError> {
        let mut updated_work_orders = Vec::with_capacity(originals.len());
        let mut changes = Vec::new();

        for original in originals {
            let updated = ctx
                .updated
                .remove(original.id())
                .unwrap_or_else(|| original.clone());

            let (old_start, old_end) = (original.start()?, original.end()?);
            let (new_start, new_end) = (updated.start()?, updated.end()?);
            if old_start != new_start || old_end != new_end {
                changes.push(ReflowChange {
                    work_order_doc_id: original.doc_id.clone(),
                    old_start_date: original.data.start_date.clone(),
                    old_end_date: original.data.end_date.clone(),
                    new_start_date: updated.data.start_date.clone(),
                    new_end_date: updated.data.end_date.clone(),
                    delta_start_minutes: minutes_between(old_start, new_start),
                    delta_end_minutes: minutes_between(old_end, new_end),
                    reasons: ctx
                        .explanations
                        .get(original.id())
                        .cloned()
                        .unwrap_or_default(),
                });
            }
            updated_work_orders.push(updated);
        }

        Ok(ReflowOutput {
            updated_work_orders,
            changes,
            explanation_by_work_order_id: ctx.explanations,
        })
    }
}

/// Parses a center's configured maintenance windows, skipping inverted ones.
fn configured_blackouts(center: &WorkCenter) -> Result<Vec<BlackoutWindow>, ReflowError> {
    let mut windows = Vec::with_capacity(center.data.maintenance_windows.len());
    for mw in &center.data.maintenance_windows {
        let blackout = BlackoutWindow::from_maintenance(mw)?;
        if blackout.window.end < blackout.window.start {
            warn!(
                work_center = %center.doc_id,
                start = %mw.start_date,
                end = %mw.end_date,
                "skipping maintenance window that ends before it starts"
            );
            continue;
        }
        windows.push(blackout);
    }
    Ok(windows)
}

fn unknown_center(wo: &WorkOrder) -> ReflowError {
    ReflowError::UnknownWorkCenter {
        work_order: wo.doc_id.clone(),
        work_center: wo.data.work_center_id.clone(),
    }
}
