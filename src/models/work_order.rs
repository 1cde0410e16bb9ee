//! Work order model.
//!
//! A work order is one schedulable unit of production on a single work
//! center. Its `duration_minutes` counts working time only; the wall-clock
//! interval `[start_date, end_date)` is recomputed by the reflow engine.
//!
//! Orders flagged `is_maintenance` are fixed: the engine echoes them back
//! unchanged and treats their interval as a blackout on their center.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::instant::{format_instant, parse_instant};
use super::Document;
use crate::error::ReflowError;

/// Document type tag for work orders.
pub const WORK_ORDER_DOC_TYPE: &str = "workOrder";

/// Work order payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderData {
    /// Human-facing order number.
    pub work_order_number: String,
    /// Parent manufacturing order id (informational).
    pub manufacturing_order_id: String,
    /// Work center this order runs on.
    pub work_center_id: String,
    /// Start instant (ISO-8601 UTC).
    pub start_date: String,
    /// End instant (ISO-8601 UTC).
    pub end_date: String,
    /// Working minutes required.
    pub duration_minutes: i64,
    /// Fixed maintenance order (never rescheduled).
    #[serde(default)]
    pub is_maintenance: bool,
    /// Ids of work orders that must finish before this one starts.
    #[serde(default)]
    pub depends_on_work_order_ids: Vec<String>,
}

/// A work order document.
pub type WorkOrder = Document<WorkOrderData>;

impl Document<WorkOrderData> {
    /// Creates a production work order.
    ///
    /// The order number defaults to the upper-cased id.
    pub fn new(
        id: impl Into<String>,
        work_center_id: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        duration_minutes: i64,
    ) -> Self {
        let id = id.into();
        let data = WorkOrderData {
            work_order_number: id.to_uppercase(),
            manufacturing_order_id: String::new(),
            work_center_id: work_center_id.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            duration_minutes,
            is_maintenance: false,
            depends_on_work_order_ids: Vec::new(),
        };
        Self::from_parts(id, WORK_ORDER_DOC_TYPE, data)
    }

    /// Sets the order number.
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.data.work_order_number = number.into();
        self
    }

    /// Sets the parent manufacturing order.
    pub fn with_manufacturing_order(mut self, id: impl Into<String>) -> Self {
        self.data.manufacturing_order_id = id.into();
        self
    }

    /// Adds a dependency on another work order.
    pub fn with_dependency(mut self, parent_id: impl Into<String>) -> Self {
        self.data.depends_on_work_order_ids.push(parent_id.into());
        self
    }

    /// Flags this order as fixed maintenance.
    pub fn as_maintenance(mut self) -> Self {
        self.data.is_maintenance = true;
        self
    }

    /// Whether this is a fixed maintenance order.
    #[inline]
    pub fn is_maintenance(&self) -> bool {
        self.data.is_maintenance
    }

    /// Dependency parent ids.
    #[inline]
    pub fn dependencies(&self) -> &[String] {
        &self.data.depends_on_work_order_ids
    }

    /// Parsed start instant.
    pub fn start(&self) -> Result<DateTime<Utc>, ReflowError> {
        parse_instant(&self.data.start_date)
    }

    /// Parsed end instant.
    pub fn end(&self) -> Result<DateTime<Utc>, ReflowError> {
        parse_instant(&self.data.end_date)
    }

    /// Returns a copy with new start/end instants; identity and payload are kept.
    pub fn rescheduled(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let mut updated = self.clone();
        updated.data.start_date = format_instant(start);
        updated.data.end_date = format_instant(end);
        updated
    }
}
