//! Fixture data: the canonical demo org chart.

use anyhow::Result;
use entity::{employee_reports, employees};
use platform_db::DbPool;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use tracing::info;
use uuid::Uuid;

struct SeedEmployee {
    id: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    position: &'static str,
    reports: &'static [&'static str],
}

const JOHN: &str = "16a596ae-edd3-4847-99fe-c4518e82c86f";
const PAUL: &str = "b7839309-3348-463b-a7e3-5de1c168beb3";
const RINGO: &str = "03aa1462-ffa9-4978-901b-7c001562cf6f";
const PETE: &str = "62c1084e-6e34-4630-93fd-9153afb65309";
const GEORGE: &str = "c0c2293d-16bd-4603-8e08-638a9d18b22c";

const DEMO_ORG: &[SeedEmployee] = &[
    SeedEmployee {
        id: JOHN,
        first_name: "John",
        last_name: "Lennon",
        position: "Development Manager",
        reports: &[PAUL, RINGO],
    },
    SeedEmployee {
        id: PAUL,
        first_name: "Paul",
        last_name: "McCartney",
        position: "Developer I",
        reports: &[],
    },
    SeedEmployee {
        id: RINGO,
        first_name: "Ringo",
        last_name: "Starr",
        position: "Developer V",
        reports: &[PETE, GEORGE],
    },
    SeedEmployee {
        id: PETE,
        first_name: "Pete",
        last_name: "Best",
        position: "Developer II",
        reports: &[],
    },
    SeedEmployee {
        id: GEORGE,
        first_name: "George",
        last_name: "Harrison",
        position: "Developer III",
        reports: &[],
    },
];

/// Load the demo org chart into an empty database. A non-empty employees
/// table means a previous run (or real data) is present; nothing is touched.
pub async fn run(pool: &DbPool) -> Result<()> {
    let existing = employees::Entity::find().count(pool.as_ref()).await?;
    if existing > 0 {
        info!(existing, "employees already present; skipping seed");
        return Ok(());
    }

    for person in DEMO_ORG {
        employees::ActiveModel {
            id: Set(Uuid::parse_str(person.id)?),
            first_name: Set(person.first_name.to_string()),
            last_name: Set(person.last_name.to_string()),
            position: Set(person.position.to_string()),
            department: Set("Engineering".to_string()),
        }
        .insert(pool.as_ref())
        .await?;
    }
    for person in DEMO_ORG {
        for (ordinal, report) in person.reports.iter().enumerate() {
            employee_reports::ActiveModel {
                manager_id: Set(Uuid::parse_str(person.id)?),
                report_id: Set(Uuid::parse_str(report)?),
                ordinal: Set(ordinal as i32),
            }
            .insert(pool.as_ref())
            .await?;
        }
    }

    info!(count = DEMO_ORG.len(), "seeded demo org chart");
    Ok(())
}
