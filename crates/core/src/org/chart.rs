//! In-memory reporting hierarchy with lazy traversals.

use std::collections::{HashMap, VecDeque};
use std::iter::FusedIterator;

use hrm_shared::types::{EmployeeId, TenantId};
use serde::Serialize;

use super::error::OrgError;
use crate::directory::Employee;

/// One employee as seen by the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgNode {
    /// Employee ID.
    pub id: EmployeeId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Display name.
    pub name: String,
    /// Job title.
    pub designation: String,
    /// Direct manager.
    pub manager_id: Option<EmployeeId>,
}

impl From<&Employee> for OrgNode {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id,
            tenant_id: employee.tenant_id,
            name: employee.full_name(),
            designation: employee.designation.clone(),
            manager_id: employee.reporting_manager_id,
        }
    }
}

/// The manager forest of one tenant.
///
/// Children keep insertion order, which makes breadth-first traversal and the
/// rendered chart deterministic.
#[derive(Debug, Clone)]
pub struct OrgChart {
    tenant_id: TenantId,
    nodes: HashMap<EmployeeId, OrgNode>,
    reports: HashMap<EmployeeId, Vec<EmployeeId>>,
    roots: Vec<EmployeeId>,
}

impl OrgChart {
    /// Creates an empty chart for a tenant.
    #[must_use]
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            nodes: HashMap::new(),
            reports: HashMap::new(),
            roots: Vec::new(),
        }
    }

    /// Rebuilds a chart from persisted nodes given in any order.
    ///
    /// Sibling order follows the input order.
    ///
    /// # Errors
    ///
    /// Fails on a foreign-tenant node, a duplicate id, a dangling manager
    /// reference, or a loop in the stored reporting lines.
    pub fn from_nodes(
        tenant_id: TenantId,
        nodes: impl IntoIterator<Item = OrgNode>,
    ) -> Result<Self, OrgError> {
        let mut chart = Self::new(tenant_id);
        let mut edges = Vec::new();

        for node in nodes {
            chart.check_tenant(&node)?;
            edges.push((node.id, node.manager_id));
            if let Some(previous) = chart.nodes.insert(node.id, node) {
                return Err(OrgError::DuplicateEmployee(previous.id));
            }
        }

        for &(id, manager) in &edges {
            if let Some(manager) = manager
                && !chart.nodes.contains_key(&manager)
            {
                return Err(OrgError::InvalidReference(manager));
            }
            chart.link(id, manager);
        }

        for &(id, manager) in &edges {
            if let Some(manager) = manager
                && !chart.reaches_root(id)
            {
                return Err(OrgError::CycleDetected {
                    employee: id,
                    manager,
                });
            }
        }

        Ok(chart)
    }

    /// The tenant this chart belongs to.
    #[must_use]
    pub const fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Number of employees in the chart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the chart has no employees.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if the employee is in the chart.
    #[must_use]
    pub fn contains(&self, id: EmployeeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Looks up one node.
    #[must_use]
    pub fn get(&self, id: EmployeeId) -> Option<&OrgNode> {
        self.nodes.get(&id)
    }

    /// Adds an employee under an optional manager.
    ///
    /// # Errors
    ///
    /// - `TenantMismatch` if the node belongs to another tenant
    /// - `DuplicateEmployee` if the id is already present
    /// - `InvalidReference` if the manager is not in this chart
    /// - `CycleDetected` if the node names itself as manager
    pub fn create(&mut self, node: OrgNode) -> Result<(), OrgError> {
        self.check_tenant(&node)?;
        if self.nodes.contains_key(&node.id) {
            return Err(OrgError::DuplicateEmployee(node.id));
        }
        if let Some(manager) = node.manager_id {
            if manager == node.id {
                return Err(OrgError::CycleDetected {
                    employee: node.id,
                    manager,
                });
            }
            if !self.nodes.contains_key(&manager) {
                return Err(OrgError::InvalidReference(manager));
            }
        }

        // A fresh node has no reports yet, so no longer loop is possible.
        self.link(node.id, node.manager_id);
        self.nodes.insert(node.id, node);
        Ok(())
    }

    /// Moves an employee under a new manager, or to the top when `None`.
    ///
    /// The chart is unchanged when this fails.
    ///
    /// # Errors
    ///
    /// - `EmployeeNotFound` if the employee is not in the chart
    /// - `InvalidReference` if the new manager is not in the chart
    /// - `CycleDetected` if the new manager reports (transitively) to the employee
    pub fn reassign(
        &mut self,
        id: EmployeeId,
        new_manager: Option<EmployeeId>,
    ) -> Result<(), OrgError> {
        let current = self
            .nodes
            .get(&id)
            .ok_or(OrgError::EmployeeNotFound(id))?
            .manager_id;

        if let Some(manager) = new_manager {
            if !self.nodes.contains_key(&manager) {
                return Err(OrgError::InvalidReference(manager));
            }
            if self.would_create_cycle(id, manager) {
                return Err(OrgError::CycleDetected {
                    employee: id,
                    manager,
                });
            }
        }

        if current == new_manager {
            return Ok(());
        }

        self.unlink(id, current);
        self.link(id, new_manager);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.manager_id = new_manager;
        }
        Ok(())
    }

    /// Returns true if placing `employee` under `manager` would close a loop.
    #[must_use]
    pub fn would_create_cycle(&self, employee: EmployeeId, manager: EmployeeId) -> bool {
        manager == employee || self.ancestor_ids(manager).any(|a| a == employee)
    }

    /// Everyone who transitively reports to `id`, breadth-first.
    ///
    /// Each call returns a fresh iterator.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeNotFound` if `id` is not in the chart.
    pub fn subtree(&self, id: EmployeeId) -> Result<Subtree<'_>, OrgError> {
        if !self.nodes.contains_key(&id) {
            return Err(OrgError::EmployeeNotFound(id));
        }
        Ok(Subtree {
            chart: self,
            queue: self.report_ids(id).iter().copied().collect(),
        })
    }

    /// Managers above `id`, nearest first, ending at the top of the hierarchy.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeNotFound` if `id` is not in the chart.
    pub fn chain(&self, id: EmployeeId) -> Result<Chain<'_>, OrgError> {
        let node = self
            .nodes
            .get(&id)
            .ok_or(OrgError::EmployeeNotFound(id))?;
        Ok(Chain {
            chart: self,
            next: node.manager_id,
            remaining: self.nodes.len(),
        })
    }

    /// Employees without a manager, in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = &OrgNode> + '_ {
        self.roots.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Direct reports of `id`, in insertion order.
    pub fn direct_reports(&self, id: EmployeeId) -> impl Iterator<Item = &OrgNode> + '_ {
        self.report_ids(id)
            .iter()
            .filter_map(|report| self.nodes.get(report))
    }

    /// Number of managers above `id`; `None` if absent.
    #[must_use]
    pub fn depth(&self, id: EmployeeId) -> Option<usize> {
        self.chain(id).ok().map(Iterator::count)
    }

    /// Renders the forest as an indented tree, one employee per line.
    ///
    /// Walks with an explicit stack, so reporting depth is bounded by heap
    /// rather than call-stack size.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        // (employee, prefix inherited from the parent, last-sibling flag; None for roots)
        let mut stack: Vec<(EmployeeId, String, Option<bool>)> = self
            .roots
            .iter()
            .rev()
            .map(|root| (*root, String::new(), None))
            .collect();

        while let Some((id, prefix, is_last)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            let child_prefix = match is_last {
                None => {
                    out.push_str(&format!("{} ({})\n", node.name, node.designation));
                    String::new()
                }
                Some(last) => {
                    let branch = if last { "└── " } else { "├── " };
                    out.push_str(&format!(
                        "{prefix}{branch}{} ({})\n",
                        node.name, node.designation
                    ));
                    format!("{prefix}{}", if last { "    " } else { "│   " })
                }
            };

            let reports = self.report_ids(id);
            for (i, report) in reports.iter().enumerate().rev() {
                stack.push((*report, child_prefix.clone(), Some(i + 1 == reports.len())));
            }
        }
        out
    }

    fn check_tenant(&self, node: &OrgNode) -> Result<(), OrgError> {
        if node.tenant_id == self.tenant_id {
            Ok(())
        } else {
            Err(OrgError::TenantMismatch {
                expected: self.tenant_id,
                found: node.tenant_id,
            })
        }
    }

    fn report_ids(&self, id: EmployeeId) -> &[EmployeeId] {
        self.reports.get(&id).map_or(&[], Vec::as_slice)
    }

    fn ancestor_ids(&self, id: EmployeeId) -> impl Iterator<Item = EmployeeId> + '_ {
        let start = self.nodes.get(&id).and_then(|n| n.manager_id);
        std::iter::successors(start, |current| {
            self.nodes.get(current).and_then(|n| n.manager_id)
        })
        .take(self.nodes.len())
    }

    /// True when following managers from `id` ends at a root within `len` hops.
    fn reaches_root(&self, id: EmployeeId) -> bool {
        let mut current = id;
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(&current).and_then(|n| n.manager_id) {
                Some(manager) => current = manager,
                None => return true,
            }
        }
        false
    }

    fn link(&mut self, id: EmployeeId, manager: Option<EmployeeId>) {
        match manager {
            Some(manager) => self.reports.entry(manager).or_default().push(id),
            None => self.roots.push(id),
        }
    }

    fn unlink(&mut self, id: EmployeeId, manager: Option<EmployeeId>) {
        let siblings = match manager {
            Some(manager) => self.reports.get_mut(&manager),
            None => Some(&mut self.roots),
        };
        if let Some(siblings) = siblings {
            siblings.retain(|s| *s != id);
        }
    }
}

/// Breadth-first iterator over everyone below an employee.
#[derive(Debug, Clone)]
pub struct Subtree<'a> {
    chart: &'a OrgChart,
    queue: VecDeque<EmployeeId>,
}

impl<'a> Iterator for Subtree<'a> {
    type Item = &'a OrgNode;

    fn next(&mut self) -> Option<Self::Item> {
        let chart = self.chart;
        while let Some(id) = self.queue.pop_front() {
            if let Some(node) = chart.nodes.get(&id) {
                self.queue.extend(chart.report_ids(id).iter().copied());
                return Some(node);
            }
        }
        None
    }
}

impl FusedIterator for Subtree<'_> {}

/// Iterator over an employee's managers, nearest first.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    chart: &'a OrgChart,
    next: Option<EmployeeId>,
    remaining: usize,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a OrgNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        if self.remaining == 0 {
            self.next = None;
            return None;
        }
        self.remaining -= 1;
        let node = self.chart.nodes.get(&id)?;
        self.next = node.manager_id;
        Some(node)
    }
}

impl FusedIterator for Chain<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        chart: OrgChart,
        ceo: EmployeeId,
        cto: EmployeeId,
        eng_manager: EmployeeId,
        engineer: EmployeeId,
        cfo: EmployeeId,
    }

    fn node(tenant_id: TenantId, name: &str, title: &str, manager: Option<EmployeeId>) -> OrgNode {
        OrgNode {
            id: EmployeeId::new(),
            tenant_id,
            name: name.to_string(),
            designation: title.to_string(),
            manager_id: manager,
        }
    }

    fn fixture() -> Fixture {
        let tenant = TenantId::new();
        let mut chart = OrgChart::new(tenant);

        let ceo = node(tenant, "Rajesh Kumar", "Chief Executive Officer", None);
        let cto = node(tenant, "Priya Sharma", "Chief Technology Officer", Some(ceo.id));
        let cfo = node(tenant, "Vikram Singh", "Chief Financial Officer", Some(ceo.id));
        let eng_manager = node(tenant, "Karthik Iyer", "Engineering Manager", Some(cto.id));
        let engineer = node(tenant, "Arjun Menon", "Senior Software Engineer", Some(eng_manager.id));

        let ids = (ceo.id, cto.id, eng_manager.id, engineer.id, cfo.id);
        for n in [ceo, cto, cfo, eng_manager, engineer] {
            chart.create(n).unwrap();
        }

        Fixture {
            chart,
            ceo: ids.0,
            cto: ids.1,
            eng_manager: ids.2,
            engineer: ids.3,
            cfo: ids.4,
        }
    }

    fn titles<'a>(nodes: impl Iterator<Item = &'a OrgNode>) -> Vec<&'a str> {
        nodes.map(|n| n.designation.as_str()).collect()
    }

    #[test]
    fn test_chain_runs_nearest_first_to_root() {
        let f = fixture();
        let chain = titles(f.chart.chain(f.engineer).unwrap());
        assert_eq!(
            chain,
            vec![
                "Engineering Manager",
                "Chief Technology Officer",
                "Chief Executive Officer"
            ]
        );
        assert_eq!(f.chart.chain(f.ceo).unwrap().count(), 0);
        assert_eq!(f.chart.depth(f.engineer), Some(3));
    }

    #[test]
    fn test_subtree_is_breadth_first_and_restartable() {
        let f = fixture();
        let first = titles(f.chart.subtree(f.ceo).unwrap());
        assert_eq!(
            first,
            vec![
                "Chief Technology Officer",
                "Chief Financial Officer",
                "Engineering Manager",
                "Senior Software Engineer"
            ]
        );
        let again: Vec<_> = titles(f.chart.subtree(f.ceo).unwrap());
        assert_eq!(first, again);
        assert_eq!(f.chart.subtree(f.engineer).unwrap().count(), 0);
    }

    #[test]
    fn test_create_with_unknown_manager_fails() {
        let mut f = fixture();
        let missing = EmployeeId::new();
        let orphan = node(f.chart.tenant_id(), "Ghost", "Intern", Some(missing));
        assert_eq!(
            f.chart.create(orphan),
            Err(OrgError::InvalidReference(missing))
        );
        assert_eq!(f.chart.len(), 5);
    }

    #[test]
    fn test_create_rejects_other_tenant() {
        let mut f = fixture();
        let outsider = node(TenantId::new(), "Outsider", "Consultant", None);
        assert!(matches!(
            f.chart.create(outsider),
            Err(OrgError::TenantMismatch { .. })
        ));
    }

    #[test]
    fn test_create_rejects_duplicate() {
        let mut f = fixture();
        let dup = OrgNode {
            id: f.cfo,
            ..node(f.chart.tenant_id(), "Copy", "Copy", None)
        };
        assert_eq!(f.chart.create(dup), Err(OrgError::DuplicateEmployee(f.cfo)));
    }

    #[test]
    fn test_reassign_under_own_report_is_a_cycle() {
        let mut f = fixture();
        let result = f.chart.reassign(f.cto, Some(f.engineer));
        assert_eq!(
            result,
            Err(OrgError::CycleDetected {
                employee: f.cto,
                manager: f.engineer
            })
        );
        // unchanged
        assert_eq!(f.chart.get(f.cto).unwrap().manager_id, Some(f.ceo));
        assert_eq!(
            f.chart.reassign(f.ceo, Some(f.ceo)),
            Err(OrgError::CycleDetected {
                employee: f.ceo,
                manager: f.ceo
            })
        );
    }

    #[test]
    fn test_reassign_moves_subtree() {
        let mut f = fixture();
        f.chart.reassign(f.eng_manager, Some(f.cfo)).unwrap();

        let chain = titles(f.chart.chain(f.engineer).unwrap());
        assert_eq!(
            chain,
            vec![
                "Engineering Manager",
                "Chief Financial Officer",
                "Chief Executive Officer"
            ]
        );
        assert_eq!(f.chart.direct_reports(f.cto).count(), 0);
        assert_eq!(f.chart.subtree(f.cfo).unwrap().count(), 2);
    }

    #[test]
    fn test_reassign_to_root() {
        let mut f = fixture();
        f.chart.reassign(f.cto, None).unwrap();
        assert_eq!(f.chart.roots().count(), 2);
        assert_eq!(f.chart.subtree(f.ceo).unwrap().count(), 1);
    }

    #[test]
    fn test_from_nodes_detects_stored_cycle() {
        let tenant = TenantId::new();
        let mut a = node(tenant, "A", "A", None);
        let b = node(tenant, "B", "B", Some(a.id));
        a.manager_id = Some(b.id);
        let result = OrgChart::from_nodes(tenant, [a, b]);
        assert!(matches!(result, Err(OrgError::CycleDetected { .. })));
    }

    #[test]
    fn test_from_nodes_accepts_any_order() {
        let tenant = TenantId::new();
        let root = node(tenant, "Root", "CEO", None);
        let mid = node(tenant, "Mid", "VP", Some(root.id));
        let leaf = node(tenant, "Leaf", "Engineer", Some(mid.id));
        let leaf_id = leaf.id;

        let chart = OrgChart::from_nodes(tenant, [leaf, mid, root]).unwrap();
        assert_eq!(chart.depth(leaf_id), Some(2));
        assert_eq!(chart.roots().count(), 1);
    }

    #[test]
    fn test_from_nodes_rejects_dangling_manager() {
        let tenant = TenantId::new();
        let missing = EmployeeId::new();
        let n = node(tenant, "N", "N", Some(missing));
        assert_eq!(
            OrgChart::from_nodes(tenant, [n]).unwrap_err(),
            OrgError::InvalidReference(missing)
        );
    }

    #[test]
    fn test_render() {
        let f = fixture();
        let rendered = f.chart.render();
        let expected = "\
Rajesh Kumar (Chief Executive Officer)
├── Priya Sharma (Chief Technology Officer)
│   └── Karthik Iyer (Engineering Manager)
│       └── Arjun Menon (Senior Software Engineer)
└── Vikram Singh (Chief Financial Officer)
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_deep_chain_on_small_stack() {
        const DEPTH: usize = 2_000;
        let tenant = TenantId::new();
        let mut chart = OrgChart::new(tenant);
        let mut manager = None;
        for level in 0..DEPTH {
            let n = node(tenant, &format!("E{level}"), "Engineer", manager);
            manager = Some(n.id);
            chart.create(n).unwrap();
        }

        let rendered = std::thread::Builder::new()
            .stack_size(64 * 1024)
            .spawn(move || chart.render())
            .unwrap()
            .join()
            .unwrap();

        assert_eq!(rendered.lines().count(), DEPTH);
        assert_eq!(rendered.lines().next(), Some("E0 (Engineer)"));
        let last = rendered.lines().last().unwrap();
        assert!(last.ends_with(&format!("└── E{} (Engineer)", DEPTH - 1)));
        assert_eq!(last.len(), 4 * (DEPTH - 2) + "└── ".len() + "E1999 (Engineer)".len());
    }

    #[test]
    fn test_unknown_employee() {
        let f = fixture();
        let missing = EmployeeId::new();
        assert!(matches!(
            f.chart.subtree(missing),
            Err(OrgError::EmployeeNotFound(_))
        ));
        assert!(f.chart.chain(missing).is_err());
        assert_eq!(f.chart.depth(missing), None);
    }
}
