//! Dependency resolution, reflow engine, and KPI evaluation.
//!
//! # Algorithm
//!
//! [`dependency_order`] produces a deterministic topological order;
//! [`ReflowEngine`] walks it, threading a per-center free cursor and
//! per-order scheduled end through the work centers' calendars.
//!
//! # KPI
//!
//! [`ReflowKpi`] reports delay and due-date metrics for a finished reflow.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4
//! - Kahn (1962), "Topological sorting of large networks"

mod dependency;
mod engine;
mod kpi;

pub use dependency::dependency_order;
pub use engine::{reflow, ReflowEngine};
pub use kpi::ReflowKpi;
