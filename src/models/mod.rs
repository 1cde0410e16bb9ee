//! Reflow domain models.
//!
//! Boundary entities travel as [`Document`] envelopes
//! (`{docId, docType, data}`) with ISO-8601 UTC instants kept as strings,
//! so orders that are not rescheduled are echoed back byte-for-byte.
//! The [`WorkingCalendar`] works on parsed `DateTime<Utc>` values.
//!
//! # Domain Mappings
//!
//! | u-reflow | Meaning |
//! |----------|---------|
//! | WorkOrder | Schedulable unit of production on one center |
//! | WorkCenter | Machine/line with weekly shifts and blackouts |
//! | ManufacturingOrder | Customer-facing order (informational) |
//! | BlackoutWindow | Configured maintenance or fixed maintenance order |

mod calendar;
mod document;
pub mod instant;
mod manufacturing_order;
mod reflow;
mod work_center;
mod work_order;

pub use calendar::{
    day_of_week, is_working, start_of_day, BlackoutSource, BlackoutWindow, MaintenanceWindow,
    Segment, SegmentKind, Shift, TimeWindow, WorkingCalendar, WorkingSpan,
};
pub use document::Document;
pub use manufacturing_order::{ManufacturingOrder, ManufacturingOrderData};
pub use reflow::{ReflowChange, ReflowInput, ReflowOutput};
pub use work_center::{WorkCenter, WorkCenterData};
pub use work_order::{WorkOrder, WorkOrderData};
