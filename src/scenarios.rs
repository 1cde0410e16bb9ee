//! Built-in demonstration datasets.

use clap::ValueEnum;

use u_reflow::models::ReflowInput;
use u_reflow::ReflowError;

/// A named, bundled reflow input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Back-to-back A -> B -> C chain that is already feasible.
    DelayCascade,
    /// One order that runs past the end of its shift.
    ShiftSpill,
    /// Production around a fixed maintenance order and a configured window.
    MaintenanceBlock,
    /// An upstream order longer than its slot, pushing its children.
    UpstreamOverrun,
}

impl Scenario {
    /// Short description printed before the results.
    pub fn title(self) -> &'static str {
        match self {
            Scenario::DelayCascade => "Delay cascade (feasible chain)",
            Scenario::ShiftSpill => "Shift spill",
            Scenario::MaintenanceBlock => "Maintenance block",
            Scenario::UpstreamOverrun => "Upstream overrun",
        }
    }

    fn source(self) -> &'static str {
        match self {
            Scenario::DelayCascade => include_str!("../scenarios/delay_cascade.json"),
            Scenario::ShiftSpill => include_str!("../scenarios/shift_spill.json"),
            Scenario::MaintenanceBlock => include_str!("../scenarios/maintenance_block.json"),
            Scenario::UpstreamOverrun => include_str!("../scenarios/upstream_overrun.json"),
        }
    }

    /// Parses the bundled dataset.
    pub fn input(self) -> Result<ReflowInput, ReflowError> {
        ReflowInput::from_json(self.source())
    }
}
