//! Hierarchy resolution: distinct transitive subordinate counting.

use std::collections::{HashSet, VecDeque};

use uuid::Uuid;

use crate::error::DirectoryError;
use crate::model::{Employee, ReportingStructure};
use crate::store::{EmployeeStore, read_employee};

/// Count the distinct employees reachable from `root` via one or more
/// direct-report hops. The root itself is never counted.
///
/// Breadth-first with a visited set rather than recursion: the same employee
/// may report to several managers, and malformed data can even be cyclic, so
/// the visited discipline is what guarantees termination and exactly-once
/// counting. Pure over the materialized input; no I/O, no failure modes.
pub fn count_reports(root: &Employee) -> usize {
    let mut visited: HashSet<Uuid> = HashSet::new();
    visited.insert(root.employee_id);

    let mut queue: VecDeque<&Employee> = VecDeque::new();
    queue.push_back(root);

    while let Some(current) = queue.pop_front() {
        for report in &current.direct_reports {
            if visited.insert(report.employee_id) {
                queue.push_back(report);
            }
        }
    }

    // Root was seeded into the set but is excluded from the count.
    visited.len() - 1
}

/// Build the reporting-structure view for an employee id.
pub async fn reporting_structure<S>(
    store: &S,
    id: Uuid,
) -> Result<ReportingStructure, DirectoryError>
where
    S: EmployeeStore + ?Sized,
{
    let employee = read_employee(store, id).await?;
    let number_of_reports = count_reports(&employee);
    tracing::debug!(
        employee_id = %id,
        number_of_reports,
        "computed reporting structure"
    );
    Ok(ReportingStructure {
        employee,
        number_of_reports,
    })
}
