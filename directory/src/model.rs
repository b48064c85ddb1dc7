use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An employee with its reachable subordinate subtree materialized.
///
/// The store expands `direct_reports` recursively before handing the value to
/// the hierarchy resolver, so reads need no further lookups. A descendant
/// reachable through two managers appears once per path; counting dedups by
/// id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub employee_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub department: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub direct_reports: Vec<Employee>,
}

/// Write payload for employee create/update. The server assigns the id on
/// create and the path id wins on update.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub direct_reports: Vec<EmployeeRef>,
}

/// A direct-report reference in a write payload: either a bare id string or
/// an embedded object carrying `employeeId`.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(untagged)]
pub enum EmployeeRef {
    Id(Uuid),
    Embedded {
        #[serde(rename = "employeeId")]
        employee_id: Uuid,
    },
}

impl EmployeeRef {
    pub fn id(&self) -> Uuid {
        match *self {
            EmployeeRef::Id(id) => id,
            EmployeeRef::Embedded { employee_id } => employee_id,
        }
    }
}

/// Derived view pairing an employee with its distinct transitive subordinate
/// count. Computed fresh on every read, never persisted.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingStructure {
    pub employee: Employee,
    pub number_of_reports: usize,
}

/// A single compensation record for one employee.
///
/// `salary` carries exact decimal semantics end to end: JSON uses
/// arbitrary-precision numbers, so `200000.00` round-trips with its scale
/// intact rather than passing through an `f64`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compensation {
    pub compensation_id: Uuid,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub salary: Decimal,
    pub effective_date: NaiveDate,
    pub employee: Employee,
}
