//! Core directory logic, kept free of transport and storage concerns.
//!
//! The two pieces with real semantics live here: [`hierarchy`] computes the
//! distinct transitive subordinate count for an employee, and
//! [`CompensationGuard`] enforces the one-compensation-per-employee rule at
//! creation time. Both operate against the narrow store traits in [`store`];
//! persistence implementations live in `platform-db`.

pub mod compensation;
pub mod error;
pub mod hierarchy;
pub mod model;
pub mod store;

pub use compensation::CompensationGuard;
pub use error::DirectoryError;
pub use model::{Compensation, Employee, EmployeeInput, EmployeeRef, ReportingStructure};
pub use store::{CompensationInsertError, CompensationStore, EmployeeStore};
