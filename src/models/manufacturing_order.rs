//! Manufacturing order model.
//!
//! Carried through reflow for reporting only; scheduling never reads it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::instant::parse_instant;
use super::Document;
use crate::error::ReflowError;

/// Document type tag for manufacturing orders.
pub const MANUFACTURING_ORDER_DOC_TYPE: &str = "manufacturingOrder";

/// Manufacturing order payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManufacturingOrderData {
    /// Human-facing order number.
    pub manufacturing_order_number: String,
    /// Produced item reference.
    pub item_id: String,
    /// Ordered quantity.
    pub quantity: f64,
    /// Due date (ISO-8601 UTC).
    pub due_date: String,
}

/// A manufacturing order document.
pub type ManufacturingOrder = Document<ManufacturingOrderData>;

impl Document<ManufacturingOrderData> {
    /// Creates a manufacturing order.
    pub fn new(
        id: impl Into<String>,
        item_id: impl Into<String>,
        quantity: f64,
        due_date: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let data = ManufacturingOrderData {
            manufacturing_order_number: id.to_uppercase(),
            item_id: item_id.into(),
            quantity,
            due_date: due_date.into(),
        };
        Self::from_parts(id, MANUFACTURING_ORDER_DOC_TYPE, data)
    }

    /// Parsed due date.
    pub fn due(&self) -> Result<DateTime<Utc>, ReflowError> {
        parse_instant(&self.data.due_date)
    }
}
