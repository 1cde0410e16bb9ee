//! Reflow quality metrics (KPIs).
//!
//! Summarizes how much a reflow disturbed the plan and which manufacturing
//! orders now finish after their due date. Reporting only: nothing here
//! feeds back into scheduling.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Changed orders | Orders whose start or end moved |
//! | Total end delay | Sum of positive end deltas (minutes) |
//! | Maximum end delay | Largest single end delay (minutes) |
//! | Makespan end | Latest updated end instant |
//! | Late MOs | Manufacturing orders completing after their due date |
//! | On-time rate | Fraction of scheduled MOs meeting their due date |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ReflowError;
use crate::models::{ReflowInput, ReflowOutput};

/// Reflow performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflowKpi {
    /// Number of orders with a change entry.
    pub changed_orders: usize,
    /// Sum of end delays across changed orders (minutes, delays only).
    pub total_end_delay_minutes: i64,
    /// Largest end delay of any single order (minutes).
    pub max_end_delay_minutes: i64,
    /// Latest end among updated orders. `None` when there are no orders.
    pub makespan_end: Option<DateTime<Utc>>,
    /// Manufacturing orders whose latest work order ends after the due date.
    pub late_manufacturing_orders: Vec<String>,
    /// Fraction of manufacturing orders (with work orders) finishing on time.
    pub on_time_rate: f64,
}

impl ReflowKpi {
    /// Computes KPIs from a reflow input and its output.
    pub fn calculate(input: &ReflowInput, output: &ReflowOutput) -> Result<Self, ReflowError> {
        let delays = output
            .changes
            .iter()
            .map(|c| c.delta_end_minutes.max(0));
        let total_end_delay_minutes: i64 = delays.clone().sum();
        let max_end_delay_minutes = delays.max().unwrap_or(0);

        let mut completion: HashMap<&str, DateTime<Utc>> = HashMap::new();
        let mut makespan_end: Option<DateTime<Utc>> = None;
        for wo in &output.updated_work_orders {
            let end = wo.end()?;
            makespan_end = Some(makespan_end.map_or(end, |m| m.max(end)));
            completion
                .entry(wo.data.manufacturing_order_id.as_str())
                .and_modify(|c| *c = (*c).max(end))
                .or_insert(end);
        }

        let mut late_manufacturing_orders = Vec::new();
        let mut counted = 0usize;
        for mo in &input.manufacturing_orders {
            let Some(&done) = completion.get(mo.id()) else {
                continue;
            };
            counted += 1;
            if done > mo.due()? {
                late_manufacturing_orders.push(mo.doc_id.clone());
            }
        }

        let on_time_rate = if counted == 0 {
            1.0
        } else {
            (counted - late_manufacturing_orders.len()) as f64 / counted as f64
        };

        Ok(Self {
            changed_orders: output.changes.len(),
            total_end_delay_minutes,
            max_end_delay_minutes,
            makespan_end,
            late_manufacturing_orders,
            on_time_rate,
        })
    }

    /// Whether no order was delayed by more than `max_delay_minutes`.
    pub fn within_delay(&self, max_delay_minutes: i64) -> bool {
        self.max_end_delay_minutes <= max_delay_minutes
    }
}
