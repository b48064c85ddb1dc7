//! Compensation uniqueness enforcement.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::error::DirectoryError;
use crate::model::{Compensation, Employee};
use crate::store::{CompensationInsertError, CompensationStore};

/// Enforces "at most one compensation record per employee" at creation time
/// and surfaces the existing record for reads.
///
/// The guard trusts that the caller has already resolved the employee; it
/// holds no state of its own and may be used concurrently. The pre-check and
/// the insert are separate store operations, so raced creators are settled by
/// the store's uniqueness constraint, which the guard reports as a conflict.
pub struct CompensationGuard<S> {
    store: S,
}

impl<S: CompensationStore> CompensationGuard<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create the employee's single compensation record. Exactly one write
    /// on success, none on conflict.
    pub async fn create(
        &self,
        employee: Employee,
        salary: Decimal,
        effective_date: NaiveDate,
    ) -> Result<Compensation, DirectoryError> {
        let employee_id = employee.employee_id;
        if self.store.find_by_employee(employee_id).await?.is_some() {
            return Err(DirectoryError::CompensationExists(employee_id));
        }

        let record = Compensation {
            compensation_id: Uuid::new_v4(),
            salary,
            effective_date,
            employee,
        };
        debug!(
            %employee_id,
            compensation_id = %record.compensation_id,
            "creating compensation"
        );
        match self.store.insert(&record).await {
            Ok(()) => Ok(record),
            Err(CompensationInsertError::Duplicate) => {
                Err(DirectoryError::CompensationExists(employee_id))
            }
            Err(CompensationInsertError::Store(err)) => Err(DirectoryError::Store(err)),
        }
    }

    /// Look up the employee's compensation record.
    pub async fn read(&self, employee_id: Uuid) -> Result<Compensation, DirectoryError> {
        debug!(%employee_id, "get compensation");
        self.store
            .find_by_employee(employee_id)
            .await?
            .ok_or(DirectoryError::CompensationNotFound(employee_id))
    }
}
