use sea_orm_migration::prelude::*;

// salary is text: the canonical decimal rendering round-trips without any
// numeric coercion by the backend. The UNIQUE constraint on
// compensations.employee_id is what settles concurrent create attempts.
const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS employees (
    id uuid PRIMARY KEY,
    first_name text NOT NULL,
    last_name text NOT NULL,
    position text NOT NULL,
    department text NOT NULL
);

CREATE TABLE IF NOT EXISTS employee_reports (
    manager_id uuid NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    report_id uuid NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    ordinal integer NOT NULL,
    PRIMARY KEY (manager_id, report_id)
);

CREATE INDEX IF NOT EXISTS idx_employee_reports_manager ON employee_reports (manager_id, ordinal);

CREATE TABLE IF NOT EXISTS compensations (
    id uuid PRIMARY KEY,
    employee_id uuid NOT NULL UNIQUE REFERENCES employees(id),
    salary text NOT NULL,
    effective_date date NOT NULL
);
"#;

const DOWN_SQL: &str = r#"
DROP TABLE IF EXISTS compensations;
DROP INDEX IF EXISTS idx_employee_reports_manager;
DROP TABLE IF EXISTS employee_reports;
DROP TABLE IF EXISTS employees;
"#;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(UP_SQL)
            .await
            .map(|_| ())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(DOWN_SQL)
            .await
            .map(|_| ())
    }
}
