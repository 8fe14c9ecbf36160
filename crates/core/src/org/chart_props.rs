//! Property-based tests for the reporting hierarchy.

use proptest::prelude::*;

use hrm_shared::types::{EmployeeId, TenantId};

use super::chart::{OrgChart, OrgNode};
use super::error::OrgError;

/// A forest shape: entry `i` names a manager among `0..i`, or none.
fn arb_forest() -> impl Strategy<Value = Vec<Option<prop::sample::Index>>> {
    prop::collection::vec(prop::option::weighted(0.85, any::<prop::sample::Index>()), 1..40)
}

/// Reassignment attempts as `(employee, new manager)` index pairs.
fn arb_moves() -> impl Strategy<Value = Vec<(prop::sample::Index, Option<prop::sample::Index>)>> {
    prop::collection::vec(
        (
            any::<prop::sample::Index>(),
            prop::option::weighted(0.9, any::<prop::sample::Index>()),
        ),
        0..30,
    )
}

fn build(shape: &[Option<prop::sample::Index>]) -> (OrgChart, Vec<EmployeeId>) {
    let tenant = TenantId::new();
    let mut chart = OrgChart::new(tenant);
    let mut ids = Vec::with_capacity(shape.len());

    for (i, manager) in shape.iter().enumerate() {
        let manager_id = match manager {
            Some(index) if i > 0 => Some(ids[index.index(i)]),
            _ => None,
        };
        let node = OrgNode {
            id: EmployeeId::new(),
            tenant_id: tenant,
            name: format!("Employee {i}"),
            designation: "Staff".to_string(),
            manager_id,
        };
        ids.push(node.id);
        chart.create(node).expect("manager was inserted earlier");
    }

    (chart, ids)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Following managers from anyone ends at a root within N hops.
    #[test]
    fn prop_chain_terminates_within_employee_count(shape in arb_forest(), moves in arb_moves()) {
        let (mut chart, ids) = build(&shape);

        for (who, target) in moves {
            let employee = ids[who.index(ids.len())];
            let manager = target.map(|t| ids[t.index(ids.len())]);
            match chart.reassign(employee, manager) {
                Ok(()) | Err(OrgError::CycleDetected { .. }) => {}
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }

        for id in &ids {
            let chain: Vec<_> = chart.chain(*id).unwrap().collect();
            prop_assert!(chain.len() < ids.len());
            let top = chain.last().map_or(*id, |n| n.id);
            prop_assert!(chart.get(top).unwrap().manager_id.is_none());
        }
    }

    /// Every employee appears in exactly one root's subtree, or is a root.
    #[test]
    fn prop_roots_partition_the_chart(shape in arb_forest()) {
        let (chart, ids) = build(&shape);

        let roots = chart.roots().count();
        let below: usize = chart
            .roots()
            .map(|root| chart.subtree(root.id).unwrap().count())
            .sum();
        prop_assert_eq!(roots + below, ids.len());
    }

    /// `b` is in the subtree of `a` exactly when `a` is in the chain of `b`.
    #[test]
    fn prop_subtree_mirrors_chain(shape in arb_forest(), a in any::<prop::sample::Index>(), b in any::<prop::sample::Index>()) {
        let (chart, ids) = build(&shape);
        let a = ids[a.index(ids.len())];
        let b = ids[b.index(ids.len())];

        let in_subtree = chart.subtree(a).unwrap().any(|n| n.id == b);
        let in_chain = chart.chain(b).unwrap().any(|n| n.id == a);
        prop_assert_eq!(in_subtree, in_chain);
    }

    /// A rejected reassignment leaves every reporting line as it was.
    #[test]
    fn prop_failed_reassign_is_a_no_op(shape in arb_forest(), who in any::<prop::sample::Index>()) {
        let (mut chart, ids) = build(&shape);
        let employee = ids[who.index(ids.len())];
        let below: Vec<_> = chart.subtree(employee).unwrap().map(|n| n.id).collect();
        let Some(&target) = below.last() else {
            return Ok(());
        };

        let before: Vec<_> = ids.iter().map(|id| chart.get(*id).unwrap().manager_id).collect();
        let result = chart.reassign(employee, Some(target));
        let is_cycle = matches!(result, Err(OrgError::CycleDetected { .. }));
        prop_assert!(is_cycle);

        let after: Vec<_> = ids.iter().map(|id| chart.get(*id).unwrap().manager_id).collect();
        prop_assert_eq!(before, after);
    }
}
