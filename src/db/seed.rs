use anyhow::Context;
use chrono::{Duration, TimeZone, Utc};
use rusqlite::Connection;

use crate::db::queries;
use crate::models::{Account, AccountKind, Bike, Timeslot};
use crate::services::password::hash_password;

const BIKES: &[(&str, &str)] = &[
    ("B001", "Mountain Bike"),
    ("B002", "Road Bike"),
    ("B003", "Hybrid Bike"),
    ("B004", "City Bike"),
    ("B005", "Electric Bike"),
];

const CUSTOMERS: &[(&str, &str, &str)] = &[
    ("C1", "John Doe", "johndoe@example.com"),
    ("C2", "Jane Smith", "janesmith@example.com"),
    ("C3", "Bob Johnson", "bobjohnson@example.com"),
];

const ADMINS: &[(&str, &str, &str)] = &[("A1", "Admin User", "admin@example.com")];

const TIMESLOT_COUNT: i64 = 6;
const DEMO_PASSWORD: &str = "password";

/// Fills an empty database with demo bikes, hourly timeslots and accounts.
/// Returns false without touching anything if bikes already exist.
pub fn seed_demo_data(conn: &mut Connection) -> anyhow::Result<bool> {
    if queries::count_bikes(conn).context("failed to count bikes")? > 0 {
        return Ok(false);
    }

    let tx = conn.transaction().context("failed to begin seed transaction")?;

    for (id, name) in BIKES {
        let bike = Bike {
            id: id.to_string(),
            name: name.to_string(),
            is_available: true,
        };
        queries::insert_bike(&tx, &bike).with_context(|| format!("failed to seed bike {id}"))?;
    }

    let first_start = Utc
        .with_ymd_and_hms(2023, 4, 16, 8, 0, 0)
        .single()
        .context("invalid seed start time")?;
    for i in 0..TIMESLOT_COUNT {
        let start_time = first_start + Duration::hours(i);
        let slot = Timeslot {
            id: format!("T{}", i + 1),
            start_time,
            end_time: start_time + Duration::hours(1),
            is_available: true,
        };
        queries::insert_timeslot(&tx, &slot)
            .with_context(|| format!("failed to seed timeslot {}", slot.id))?;
    }

    let password_hash = hash_password(DEMO_PASSWORD)?;
    let accounts = CUSTOMERS
        .iter()
        .map(|a| (AccountKind::Customer, a))
        .chain(ADMINS.iter().map(|a| (AccountKind::Admin, a)));
    for (kind, (id, full_name, email)) in accounts {
        let account = Account {
            id: id.to_string(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.clone(),
            created_at: Utc::now(),
        };
        queries::insert_account(&tx, kind, &account)
            .with_context(|| format!("failed to seed {} {id}", kind.as_str()))?;
    }

    tx.commit().context("failed to commit seed data")?;
    tracing::info!(
        bikes = BIKES.len(),
        timeslots = TIMESLOT_COUNT,
        customers = CUSTOMERS.len(),
        admins = ADMINS.len(),
        "seeded demo data"
    );
    Ok(true)
}
