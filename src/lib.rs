//! Production schedule reflow for manufacturing work orders.
//!
//! When a work order runs long, a machine goes down, or an order lands in an
//! off-shift slot, the downstream plan has to be pushed forward. This crate
//! recomputes start and end times so that dependencies, work center
//! capacity, shift hours, and maintenance are all respected, and explains
//! every move it makes.
//!
//! # Modules
//!
//! - **`models`**: Boundary documents (`WorkOrder`, `WorkCenter`,
//!   `ManufacturingOrder`), calendars (`Shift`, `MaintenanceWindow`,
//!   `WorkingCalendar`), and the reflow contract (`ReflowInput`, `ReflowOutput`)
//! - **`scheduler`**: Dependency ordering, the reflow engine, and KPIs
//! - **`validation`**: Pre-flight input checks and post-reflow constraint checks
//! - **`config`**: Calendar search bounds
//! - **`error`**: The crate error type
//! - **`logging`**: `tracing` subscriber setup
//!
//! # Architecture
//!
//! The engine is a forward pass over a topological order: it never changes an
//! order's work center and never reorders orders on a center. The validator
//! is independent of the engine and re-checks its output from scratch.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Kahn (1962), "Topological sorting of large networks"

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use config::ReflowConfig;
pub use error::{ErrorCategory, ReflowError};
pub use scheduler::{reflow, ReflowEngine, ReflowKpi};
pub use validation::{validate, validate_input};
