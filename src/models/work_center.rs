//! Work center model.
//!
//! A work center processes one work order at a time. Its availability is a
//! weekly shift pattern minus absolute maintenance windows.

use serde::{Deserialize, Serialize};

use super::{Document, MaintenanceWindow, Shift};

/// Document type tag for work centers.
pub const WORK_CENTER_DOC_TYPE: &str = "workCenter";

/// Work center payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkCenterData {
    /// Human-readable name.
    pub name: String,
    /// Recurring weekly shifts.
    #[serde(default)]
    pub shifts: Vec<Shift>,
    /// Configured blackout periods.
    #[serde(default)]
    pub maintenance_windows: Vec<MaintenanceWindow>,
}

/// A work center document.
pub type WorkCenter = Document<WorkCenterData>;

impl Document<WorkCenterData> {
    /// Creates a work center with no shifts (never available).
    pub fn new(id: impl Into<String>) -> Self {
        let data = WorkCenterData {
            name: String::new(),
            shifts: Vec::new(),
            maintenance_windows: Vec::new(),
        };
        Self::from_parts(id, WORK_CENTER_DOC_TYPE, data)
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.data.name = name.into();
        self
    }

    /// Adds a shift.
    pub fn with_shift(mut self, shift: Shift) -> Self {
        self.data.shifts.push(shift);
        self
    }

    /// Adds the same shift hours Monday through Friday.
    pub fn with_weekday_shifts(mut self, start_hour: f64, end_hour: f64) -> Self {
        for day in 1..=5 {
            self.data.shifts.push(Shift::new(day, start_hour, end_hour));
        }
        self
    }

    /// Adds a maintenance window.
    pub fn with_maintenance(mut self, window: MaintenanceWindow) -> Self {
        self.data.maintenance_windows.push(window);
        self
    }

    /// Configured shifts.
    #[inline]
    pub fn shifts(&self) -> &[Shift] {
        &self.data.shifts
    }
}
