//! sea-orm entity models for the employee directory schema.

pub mod compensations;
pub mod employee_reports;
pub mod employees;
