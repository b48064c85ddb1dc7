//! sea-orm implementations of the directory store traits.
//!
//! Employees are rows plus an adjacency table; reads materialize the
//! reachable subtree level by level (one batched query per hierarchy level)
//! before handing the nested value to the core.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use anyhow::Context;
use async_trait::async_trait;
use directory::store::{CompensationInsertError, CompensationStore, EmployeeStore};
use directory::{Compensation, Employee, EmployeeInput, EmployeeRef};
use entity::{compensations, employee_reports, employees};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr, TransactionTrait,
};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::DbPool;

/// A write payload referenced a direct report that does not exist.
#[derive(Debug, Error)]
#[error("unknown direct report reference: {0}")]
pub struct UnknownReportRef(pub Uuid);

#[derive(Clone)]
pub struct SqlEmployeeStore {
    db: DbPool,
}

impl SqlEmployeeStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EmployeeStore for SqlEmployeeStore {
    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Employee>> {
        load_employee(self.db.as_ref(), id).await
    }

    async fn insert(&self, input: EmployeeInput) -> anyhow::Result<Employee> {
        let id = Uuid::new_v4();
        let txn = self.db.begin().await?;
        employees::ActiveModel {
            id: Set(id),
            first_name: Set(input.first_name.clone()),
            last_name: Set(input.last_name.clone()),
            position: Set(input.position.clone()),
            department: Set(input.department.clone()),
        }
        .insert(&txn)
        .await?;
        replace_report_edges(&txn, id, &input.direct_reports).await?;
        txn.commit().await?;
        debug!(employee_id = %id, "created employee");

        load_employee(self.db.as_ref(), id)
            .await?
            .context("employee missing after insert")
    }

    async fn update(&self, id: Uuid, input: EmployeeInput) -> anyhow::Result<Employee> {
        let txn = self.db.begin().await?;
        employees::ActiveModel {
            id: Set(id),
            first_name: Set(input.first_name.clone()),
            last_name: Set(input.last_name.clone()),
            position: Set(input.position.clone()),
            department: Set(input.department.clone()),
        }
        .update(&txn)
        .await?;
        replace_report_edges(&txn, id, &input.direct_reports).await?;
        txn.commit().await?;
        debug!(employee_id = %id, "updated employee");

        load_employee(self.db.as_ref(), id)
            .await?
            .context("employee missing after update")
    }
}

/// Replace the manager's direct-report edges, preserving payload order.
async fn replace_report_edges<C: ConnectionTrait>(
    conn: &C,
    manager_id: Uuid,
    reports: &[EmployeeRef],
) -> anyhow::Result<()> {
    // Dedup while keeping first occurrence so the composite key holds.
    let mut seen = HashSet::new();
    let report_ids: Vec<Uuid> = reports
        .iter()
        .map(EmployeeRef::id)
        .filter(|id| seen.insert(*id))
        .collect();

    if !report_ids.is_empty() {
        let existing: HashSet<Uuid> = employees::Entity::find()
            .filter(employees::Column::Id.is_in(report_ids.clone()))
            .all(conn)
            .await?
            .into_iter()
            .map(|model| model.id)
            .collect();
        if let Some(missing) = report_ids.iter().find(|id| !existing.contains(id)) {
            return Err(UnknownReportRef(*missing).into());
        }
    }

    employee_reports::Entity::delete_many()
        .filter(employee_reports::Column::ManagerId.eq(manager_id))
        .exec(conn)
        .await?;
    for (ordinal, report_id) in report_ids.into_iter().enumerate() {
        employee_reports::ActiveModel {
            manager_id: Set(manager_id),
            report_id: Set(report_id),
            ordinal: Set(ordinal as i32),
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

/// Fetch an employee with its reachable subtree materialized.
///
/// Walks the adjacency table level by level, then assembles the nested value.
/// Dangling report ids are skipped; an edge closing a cycle is not embedded
/// (the nested shape cannot represent one), which is also what keeps the
/// assembly depth bounded.
async fn load_employee<C: ConnectionTrait>(conn: &C, id: Uuid) -> anyhow::Result<Option<Employee>> {
    let Some(root) = employees::Entity::find_by_id(id).one(conn).await? else {
        return Ok(None);
    };

    let mut rows: HashMap<Uuid, employees::Model> = HashMap::new();
    rows.insert(id, root);
    let mut edges: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    let mut seen: HashSet<Uuid> = HashSet::from([id]);
    let mut frontier: Vec<Uuid> = vec![id];

    while !frontier.is_empty() {
        let links = employee_reports::Entity::find()
            .filter(employee_reports::Column::ManagerId.is_in(frontier.clone()))
            .order_by_asc(employee_reports::Column::ManagerId)
            .order_by_asc(employee_reports::Column::Ordinal)
            .all(conn)
            .await?;

        let mut next: Vec<Uuid> = Vec::new();
        for link in links {
            edges.entry(link.manager_id).or_default().push(link.report_id);
            if seen.insert(link.report_id) {
                next.push(link.report_id);
            }
        }

        if !next.is_empty() {
            let models = employees::Entity::find()
                .filter(employees::Column::Id.is_in(next.clone()))
                .all(conn)
                .await?;
            for model in models {
                rows.insert(model.id, model);
            }
        }
        frontier = next;
    }

    let mut path = HashSet::new();
    Ok(Some(assemble(id, &rows, &edges, &mut path)))
}

fn assemble(
    id: Uuid,
    rows: &HashMap<Uuid, employees::Model>,
    edges: &HashMap<Uuid, Vec<Uuid>>,
    path: &mut HashSet<Uuid>,
) -> Employee {
    path.insert(id);
    let model = &rows[&id];
    let mut direct_reports = Vec::new();
    if let Some(children) = edges.get(&id) {
        for child in children {
            // Ancestor on the current path: cyclic edge, do not embed.
            if path.contains(child) {
                continue;
            }
            // Row missing: dangling reference, skip.
            if !rows.contains_key(child) {
                continue;
            }
            direct_reports.push(assemble(*child, rows, edges, path));
        }
    }
    path.remove(&id);

    Employee {
        employee_id: model.id,
        first_name: model.first_name.clone(),
        last_name: model.last_name.clone(),
        position: model.position.clone(),
        department: model.department.clone(),
        direct_reports,
    }
}

#[derive(Clone)]
pub struct SqlCompensationStore {
    db: DbPool,
}

impl SqlCompensationStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CompensationStore for SqlCompensationStore {
    async fn find_by_employee(&self, employee_id: Uuid) -> anyhow::Result<Option<Compensation>> {
        let Some(model) = compensations::Entity::find()
            .filter(compensations::Column::EmployeeId.eq(employee_id))
            .one(self.db.as_ref())
            .await?
        else {
            return Ok(None);
        };
        let employee = load_employee(self.db.as_ref(), employee_id)
            .await?
            .context("compensation references a missing employee")?;
        let salary = Decimal::from_str(&model.salary)
            .with_context(|| format!("stored salary is not a decimal: {}", model.salary))?;
        Ok(Some(Compensation {
            compensation_id: model.id,
            salary,
            effective_date: model.effective_date,
            employee,
        }))
    }

    async fn insert(&self, record: &Compensation) -> Result<(), CompensationInsertError> {
        let model = compensations::ActiveModel {
            id: Set(record.compensation_id),
            employee_id: Set(record.employee.employee_id),
            salary: Set(record.salary.to_string()),
            effective_date: Set(record.effective_date),
        };
        match model.insert(self.db.as_ref()).await {
            Ok(_) => Ok(()),
            // The unique index on employee_id settles raced creators.
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(CompensationInsertError::Duplicate)
            }
            Err(err) => Err(CompensationInsertError::Store(err.into())),
        }
    }
}
