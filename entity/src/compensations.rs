use crate::employees;
use sea_orm::prelude::*;
use uuid::Uuid;

/// Compensation records. `salary` is stored as the canonical decimal text
/// rendering so the amount survives storage without floating-point rounding
/// on any backend. `employee_id` carries a UNIQUE constraint.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "compensations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub employee_id: Uuid,
    pub salary: String,
    pub effective_date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "employees::Entity",
        from = "Column::EmployeeId",
        to = "employees::Column::Id"
    )]
    Employee,
}

impl Related<employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
