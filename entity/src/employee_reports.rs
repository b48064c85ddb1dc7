use crate::employees;
use sea_orm::prelude::*;
use uuid::Uuid;

/// Adjacency rows for the org chart: one row per manager -> direct report
/// edge, ordered by `ordinal` within a manager.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employee_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub manager_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub report_id: Uuid,
    pub ordinal: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "employees::Entity",
        from = "Column::ManagerId",
        to = "employees::Column::Id"
    )]
    Manager,
    #[sea_orm(
        belongs_to = "employees::Entity",
        from = "Column::ReportId",
        to = "employees::Column::Id"
    )]
    Report,
}

impl ActiveModelBehavior for ActiveModel {}
