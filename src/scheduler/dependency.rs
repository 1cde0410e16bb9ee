//! Dependency ordering of work orders.
//!
//! # Algorithm
//! Kahn's algorithm with a FIFO ready queue. In-degrees come from
//! `depends_on_work_order_ids`. Orders that become ready together (the
//! initial roots, or the children released by one emitted order) are
//! sorted by `(original start, id)` and appended to the back of the queue,
//! so a released child never jumps ahead of an order already waiting.
//! If fewer orders are emitted than given, every order still holding a
//! positive in-degree is on or behind a cycle and all of them are
//! reported together.
//!
//! # Complexity
//! O(V log V + E) for V orders and E dependency edges.
//!
//! # Reference
//! Kahn (1962), "Topological sorting of large networks"

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};

use crate::error::ReflowError;
use crate::models::WorkOrder;

/// Orders work orders so every parent precedes its children.
///
/// # Errors
/// - `DuplicateWorkOrder` if two orders share an id.
/// - `InvalidInstant` if a start date cannot be parsed.
/// - `MissingDependency` if a parent id is not in `work_orders`.
/// - `CycleDetected` if no total order exists.
pub fn dependency_order(work_orders: &[WorkOrder]) -> Result<Vec<&WorkOrder>, ReflowError> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(work_orders.len());
    let mut starts: Vec<DateTime<Utc>> = Vec::with_capacity(work_orders.len());
    for (i, wo) in work_orders.iter().enumerate() {
        if index.insert(wo.id(), i).is_some() {
            return Err(ReflowError::DuplicateWorkOrder(wo.doc_id.clone()));
        }
        starts.push(wo.start()?);
    }

    let mut in_degree = vec![0usize; work_orders.len()];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); work_orders.len()];
    for (i, wo) in work_orders.iter().enumerate() {
        for parent in wo.dependencies() {
            let Some(&p) = index.get(parent.as_str()) else {
                return Err(ReflowError::MissingDependency {
                    work_order: wo.doc_id.clone(),
                    parent: parent.clone(),
                });
            };
            in_degree[i] += 1;
            children[p].push(i);
        }
    }

    let by_start = |batch: &mut Vec<usize>| {
        batch.sort_by(|&a, &b| {
            (starts[a], work_orders[a].id()).cmp(&(starts[b], work_orders[b].id()))
        });
    };

    let mut roots: Vec<usize> = (0..work_orders.len()).filter(|&i| in_degree[i] == 0).collect();
    by_start(&mut roots);
    let mut ready: VecDeque<usize> = roots.into();

    let mut ordered = Vec::with_capacity(work_orders.len());
    while let Some(i) = ready.pop_front() {
        ordered.push(&work_orders[i]);
        let mut released = Vec::new();
        for &child in &children[i] {
            in_degree[child] -= 1;
            if in_degree[child] == 0 {
                released.push(child);
            }
        }
        by_start(&mut released);
        ready.extend(released);
    }

    if ordered.len() < work_orders.len() {
        let blocked = work_orders
            .iter()
            .enumerate()
            .filter(|(i, _)| in_degree[*i] > 0)
            .map(|(_, wo)| wo.doc_id.clone())
            .collect();
        return Err(ReflowError::CycleDetected {
            work_orders: blocked,
        });
    }

    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wo(id: &str, start: &str) -> WorkOrder {
        WorkOrder::new(id, "wc-1", start, start, 60)
    }

    fn ids(ordered: &[&WorkOrder]) -> Vec<String> {
        ordered.iter().map(|w| w.doc_id.clone()).collect()
    }

    #[test]
    fn test_chain_order() {
        let orders = vec![
            wo("c", "2026-02-09T08:00:00Z").with_dependency("b"),
            wo("b", "2026-02-09T08:00:00Z").with_dependency("a"),
            wo("a", "2026-02-09T12:00:00Z"),
        ];
        let ordered = dependency_order(&orders).unwrap();
        assert_eq!(ids(&ordered), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ties_broken_by_start_then_id() {
        let orders = vec![
            wo("late", "2026-02-09T12:00:00Z"),
            wo("zeta", "2026-02-09T08:00:00Z"),
            wo("alpha", "2026-02-09T08:00:00Z"),
        ];
        let ordered = dependency_order(&orders).unwrap();
        assert_eq!(ids(&ordered), vec!["alpha", "zeta", "late"]);
    }

    #[test]
    fn test_released_child_queues_behind_ready_roots() {
        // "b" starts before "m" but only becomes ready once "a" is emitted.
        let orders = vec![
            wo("a", "2026-02-09T08:00:00Z"),
            wo("m", "2026-02-09T12:00:00Z"),
            wo("b", "2026-02-09T09:00:00Z").with_dependency("a"),
        ];
        let ordered = dependency_order(&orders).unwrap();
        assert_eq!(ids(&ordered), vec!["a", "m", "b"]);
    }

    #[test]
    fn test_released_batch_sorted_by_start_then_id() {
        let orders = vec![
            wo("root", "2026-02-09T08:00:00Z"),
            wo("z", "2026-02-09T10:00:00Z").with_dependency("root"),
            wo("late", "2026-02-09T11:00:00Z").with_dependency("root"),
            wo("y", "2026-02-09T10:00:00Z").with_dependency("root"),
        ];
        let ordered = dependency_order(&orders).unwrap();
        assert_eq!(ids(&ordered), vec!["root", "y", "z", "late"]);
    }

    #[test]
    fn test_diamond() {
        let orders = vec![
            wo("a", "2026-02-09T08:00:00Z"),
            wo("b", "2026-02-09T09:00:00Z").with_dependency("a"),
            wo("c", "2026-02-09T08:30:00Z").with_dependency("a"),
            wo("d", "2026-02-09T07:00:00Z")
                .with_dependency("b")
                .with_dependency("c"),
        ];
        let ordered = dependency_order(&orders).unwrap();
        assert_eq!(ids(&ordered), vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn test_missing_dependency() {
        let orders = vec![wo("a", "2026-02-09T08:00:00Z").with_dependency("ghost")];
        assert_eq!(
            dependency_order(&orders).unwrap_err(),
            ReflowError::MissingDependency {
                work_order: "a".into(),
                parent: "ghost".into(),
            }
        );
    }

    #[test]
    fn test_cycle_reports_all_blocked() {
        let orders = vec![
            wo("root", "2026-02-09T08:00:00Z"),
            wo("x", "2026-02-09T08:00:00Z").with_dependency("z"),
            wo("y", "2026-02-09T08:00:00Z").with_dependency("x"),
            wo("z", "2026-02-09T08:00:00Z").with_dependency("y"),
            wo("tail", "2026-02-09T08:00:00Z").with_dependency("z"),
        ];
        let err = dependency_order(&orders).unwrap_err();
        assert_eq!(
            err,
            ReflowError::CycleDetected {
                work_orders: vec!["x".into(), "y".into(), "z".into(), "tail".into()],
            }
        );
    }

    #[test]
    fn test_self_dependency_is_cycle() {
        let orders = vec![wo("a", "2026-02-09T08:00:00Z").with_dependency("a")];
        assert!(matches!(
            dependency_order(&orders),
            Err(ReflowError::CycleDetected { .. })
        ));
    }

    #[test]
    fn test_duplicate_id() {
        let orders = vec![wo("a", "2026-02-09T08:00:00Z"), wo("a", "2026-02-09T09:00:00Z")];
        assert_eq!(
            dependency_order(&orders).unwrap_err(),
            ReflowError::DuplicateWorkOrder("a".into())
        );
    }

    #[test]
    fn test_invalid_start() {
        let orders = vec![wo("a", "yesterday")];
        assert!(matches!(
            dependency_order(&orders),
            Err(ReflowError::InvalidInstant { .. })
        ));
    }

    #[test]
    fn test_empty() {
        assert!(dependency_order(&[]).unwrap().is_empty());
    }
}
