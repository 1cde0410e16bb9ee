//! End-to-end reflow of the bundled datasets.

use u_reflow::models::instant::parse_instant;
use u_reflow::models::{ReflowInput, ReflowOutput, SegmentKind, WorkingCalendar};
use u_reflow::{reflow, validate, validate_input, ReflowKpi};

const DELAY_CASCADE: &str = include_str!("../scenarios/delay_cascade.json");
const SHIFT_SPILL: &str = include_str!("../scenarios/shift_spill.json");
const MAINTENANCE_BLOCK: &str = include_str!("../scenarios/maintenance_block.json");
const UPSTREAM_OVERRUN: &str = include_str!("../scenarios/upstream_overrun.json");

fn run(json: &str) -> (ReflowInput, ReflowOutput) {
    let input = ReflowInput::from_json(json).unwrap();
    validate_input(&input).unwrap();
    let output = reflow(&input).unwrap();
    validate(&input, &output.updated_work_orders).unwrap();
    (input, output)
}

fn times(output: &ReflowOutput, id: &str) -> (String, String) {
    let wo = output.work_order(id).unwrap();
    (wo.data.start_date.clone(), wo.data.end_date.clone())
}

#[test]
fn delay_cascade_is_already_feasible() {
    let (input, output) = run(DELAY_CASCADE);

    assert!(output.changes.is_empty());
    assert_eq!(output.updated_work_orders, input.work_orders);
    assert_eq!(output.explanation_by_work_order_id.len(), 3);
    assert!(output
        .explanation("wo-B")
        .contains(&"Dependency: waits for parents until 2026-02-09T10:00:00Z.".to_string()));

    let kpi = ReflowKpi::calculate(&input, &output).unwrap();
    assert_eq!(kpi.changed_orders, 0);
    assert!(kpi.late_manufacturing_orders.is_empty());
}

#[test]
fn shift_spill_resumes_next_morning() {
    let (input, output) = run(SHIFT_SPILL);

    assert_eq!(
        times(&output, "wo-shift"),
        (
            "2026-02-09T16:00:00Z".to_string(),
            "2026-02-10T10:00:00Z".to_string()
        )
    );
    assert_eq!(output.changes.len(), 1);
    let change = &output.changes[0];
    assert_eq!(change.delta_start_minutes, 0);
    assert_eq!(change.delta_end_minutes, 1020);
    assert!(change
        .reasons
        .contains(&"Moved end by 1020 minutes.".to_string()));

    // 60 minutes on Monday, overnight pause, 120 minutes on Tuesday.
    let center = &input.work_centers[0];
    let calendar = WorkingCalendar::new(center.shifts().to_vec(), Vec::new());
    let span = calendar
        .advance(parse_instant("2026-02-09T16:00:00Z").unwrap(), 180)
        .unwrap();
    let kinds: Vec<_> = span.segments.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![SegmentKind::Work, SegmentKind::Pause, SegmentKind::Work]
    );
    assert_eq!((span.segments[0].to - span.segments[0].from).num_minutes(), 60);
    assert_eq!((span.segments[2].to - span.segments[2].from).num_minutes(), 120);
}

#[test]
fn maintenance_block_is_skipped() {
    let (_, output) = run(MAINTENANCE_BLOCK);

    assert_eq!(
        times(&output, "wo-maint-fixed"),
        (
            "2026-02-09T09:30:00Z".to_string(),
            "2026-02-09T10:30:00Z".to_string()
        )
    );
    assert_eq!(
        times(&output, "wo-prod-1"),
        (
            "2026-02-09T08:00:00Z".to_string(),
            "2026-02-09T09:30:00Z".to_string()
        )
    );
    assert_eq!(
        times(&output, "wo-prod-2"),
        (
            "2026-02-09T10:30:00Z".to_string(),
            "2026-02-09T16:30:00Z".to_string()
        )
    );

    assert_eq!(output.changes.len(), 1);
    let change = output.change_for("wo-prod-2").unwrap();
    assert_eq!(change.delta_start_minutes, 0);
    assert_eq!(change.delta_end_minutes, 240);
    assert!(change.reasons.contains(
        &"Avoided maintenance block (Planned maintenance window) starting 2026-02-09T12:00:00Z."
            .to_string()
    ));
    assert_eq!(
        output.explanation("wo-maint-fixed"),
        ["Fixed maintenance: not rescheduled.".to_string()]
    );
}

#[test]
fn upstream_overrun_cascades_downstream() {
    let (input, output) = run(UPSTREAM_OVERRUN);

    assert_eq!(
        times(&output, "wo-A"),
        (
            "2026-02-09T08:00:00Z".to_string(),
            "2026-02-09T12:00:00Z".to_string()
        )
    );
    assert_eq!(
        times(&output, "wo-B"),
        (
            "2026-02-09T12:00:00Z".to_string(),
            "2026-02-09T14:00:00Z".to_string()
        )
    );
    assert_eq!(
        times(&output, "wo-C"),
        (
            "2026-02-09T14:00:00Z".to_string(),
            "2026-02-09T17:00:00Z".to_string()
        )
    );

    let ids: Vec<_> = output
        .changes
        .iter()
        .map(|c| c.work_order_doc_id.as_str())
        .collect();
    assert_eq!(ids, vec!["wo-A", "wo-B", "wo-C"]);
    assert_eq!(
        output.explanation("wo-B"),
        [
            "Dependency: waits for parents until 2026-02-09T12:00:00Z.".to_string(),
            "Work center busy until 2026-02-09T12:00:00Z.".to_string(),
            "Moved start by 120 minutes.".to_string(),
            "Moved end by 120 minutes.".to_string(),
        ]
    );

    let kpi = ReflowKpi::calculate(&input, &output).unwrap();
    assert_eq!(kpi.changed_orders, 3);
    assert_eq!(kpi.total_end_delay_minutes, 420);
    assert_eq!(kpi.max_end_delay_minutes, 180);
    // Finishes exactly at the due date.
    assert!(kpi.late_manufacturing_orders.is_empty());
}

#[test]
fn output_json_uses_wire_names() {
    let (_, output) = run(MAINTENANCE_BLOCK);
    let value: serde_json::Value =
        serde_json::from_str(&output.to_json_pretty().unwrap()).unwrap();

    let orders = value["updatedWorkOrders"].as_array().unwrap();
    assert_eq!(orders.len(), 3);
    assert_eq!(orders[1]["docId"], "wo-maint-fixed");
    assert_eq!(orders[1]["data"]["isMaintenance"], true);
    assert_eq!(value["changes"][0]["workOrderDocId"], "wo-prod-2");
    assert_eq!(value["changes"][0]["deltaEndMinutes"], 240);
    assert!(value["explanationByWorkOrderId"]["wo-prod-1"].is_array());
}

#[test]
fn inputs_are_left_untouched() {
    let input = ReflowInput::from_json(UPSTREAM_OVERRUN).unwrap();
    let before = input.clone();
    reflow(&input).unwrap();
    assert_eq!(input, before);
}
