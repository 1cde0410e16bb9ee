//! Reflow input and output contracts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ManufacturingOrder, WorkCenter, WorkOrder};
use crate::error::ReflowError;

/// Everything one reflow call needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflowInput {
    /// Work orders to reflow (maintenance orders included).
    pub work_orders: Vec<WorkOrder>,
    /// Work centers referenced by the orders.
    pub work_centers: Vec<WorkCenter>,
    /// Manufacturing orders (informational).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub manufacturing_orders: Vec<ManufacturingOrder>,
}

impl ReflowInput {
    /// Creates an input from orders and centers.
    pub fn new(work_orders: Vec<WorkOrder>, work_centers: Vec<WorkCenter>) -> Self {
        Self {
            work_orders,
            work_centers,
            manufacturing_orders: Vec::new(),
        }
    }

    /// Attaches manufacturing orders.
    pub fn with_manufacturing_orders(mut self, orders: Vec<ManufacturingOrder>) -> Self {
        self.manufacturing_orders = orders;
        self
    }

    /// Parses the JSON wire shape.
    pub fn from_json(json: &str) -> Result<Self, ReflowError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Finds a work order by id.
    pub fn work_order(&self, id: &str) -> Option<&WorkOrder> {
        self.work_orders.iter().find(|w| w.doc_id == id)
    }
}

/// Timing change applied to one work order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflowChange {
    /// Changed work order id.
    pub work_order_doc_id: String,
    /// Original start (as given).
    pub old_start_date: String,
    /// Original end (as given).
    pub old_end_date: String,
    /// New start.
    pub new_start_date: String,
    /// New end.
    pub new_end_date: String,
    /// Start shift in minutes (positive = later).
    pub delta_start_minutes: i64,
    /// End shift in minutes (positive = later).
    pub delta_end_minutes: i64,
    /// Why the order moved.
    pub reasons: Vec<String>,
}

/// Result of one reflow call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflowOutput {
    /// All work orders, in input order, with updated timing.
    pub updated_work_orders: Vec<WorkOrder>,
    /// Orders whose start or end moved.
    pub changes: Vec<ReflowChange>,
    /// Explanation trail for every processed order.
    pub explanation_by_work_order_id: BTreeMap<String, Vec<String>>,
}

impl ReflowOutput {
    /// Finds an updated work order by id.
    pub fn work_order(&self, id: &str) -> Option<&WorkOrder> {
        self.updated_work_orders.iter().find(|w| w.doc_id == id)
    }

    /// Finds the change for a work order.
    pub fn change_for(&self, id: &str) -> Option<&ReflowChange> {
        self.changes.iter().find(|c| c.work_order_doc_id == id)
    }

    /// Explanation lines for a work order (empty if unknown).
    pub fn explanation(&self, id: &str) -> &[String] {
        self.explanation_by_work_order_id
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Pretty-printed JSON wire shape.
    pub fn to_json_pretty(&self) -> Result<String, ReflowError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
