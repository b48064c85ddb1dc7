use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::error::DirectoryError;
use crate::model::{Compensation, Employee, EmployeeInput};

/// Employee lookup and persistence boundary.
///
/// `find` returns the employee with its reachable subordinate subtree already
/// materialized (see `platform-db` for the level-batched walk). Failures are
/// opaque store errors; absence is `Ok(None)`.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Employee>>;
    /// Persist a new employee, assigning its id.
    async fn insert(&self, input: EmployeeInput) -> anyhow::Result<Employee>;
    /// Replace the attributes and direct-report edges of an existing
    /// employee. The id is immutable; callers resolve existence first.
    async fn update(&self, id: Uuid, input: EmployeeInput) -> anyhow::Result<Employee>;
}

/// Failure modes of a compensation insert.
#[derive(Debug, Error)]
pub enum CompensationInsertError {
    /// The store's uniqueness constraint rejected a second record for the
    /// employee. Raced creators land here instead of writing a duplicate.
    #[error("employee already has a compensation record")]
    Duplicate,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Compensation lookup and persistence boundary. At most one record exists
/// per employee; `find_by_employee` therefore returns an `Option`.
#[async_trait]
pub trait CompensationStore: Send + Sync {
    async fn find_by_employee(&self, employee_id: Uuid) -> anyhow::Result<Option<Compensation>>;
    async fn insert(&self, record: &Compensation) -> Result<(), CompensationInsertError>;
}

/// Resolve an employee or fail with the client-visible not-found error.
pub async fn read_employee<S>(store: &S, id: Uuid) -> Result<Employee, DirectoryError>
where
    S: EmployeeStore + ?Sized,
{
    tracing::debug!(employee_id = %id, "get employee");
    store
        .find(id)
        .await?
        .ok_or(DirectoryError::EmployeeNotFound(id))
}
