use thiserror::Error;
use uuid::Uuid;

/// Errors originating in the directory core. Store and transport failures
/// pass through as [`DirectoryError::Store`] without retry or recovery.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("invalid employeeId: {0}")]
    EmployeeNotFound(Uuid),
    #[error("no compensation found for employeeId: {0}")]
    CompensationNotFound(Uuid),
    #[error("compensation already exists for employeeId: {0}")]
    CompensationExists(Uuid),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
