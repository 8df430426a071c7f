use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{Account, AccountKind, Bike, Booking, BookingStatus, Timeslot};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn format_time(t: &DateTime<Utc>) -> String {
    t.format(TIME_FORMAT).to_string()
}

fn parse_time(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, TIME_FORMAT)
        .map(|t| t.and_utc())
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// True when the error is a UNIQUE or PRIMARY KEY constraint violation.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == rusqlite::ErrorCode::ConstraintViolation
                && (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
        }
        _ => false,
    }
}

/// True when the error is a CHECK constraint violation.
pub fn is_check_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == rusqlite::ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_CHECK
        }
        _ => false,
    }
}

// ── Bikes ──

pub fn insert_bike(conn: &Connection, bike: &Bike) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO bikes (id, name, is_available) VALUES (?1, ?2, ?3)",
        params![bike.id, bike.name, bike.is_available],
    )?;
    Ok(())
}

pub fn get_bike(conn: &Connection, id: &str) -> rusqlite::Result<Option<Bike>> {
    conn.query_row(
        "SELECT id, name, is_available FROM bikes WHERE id = ?1",
        params![id],
        parse_bike_row,
    )
    .optional()
}

pub fn list_available_bikes(conn: &Connection) -> rusqlite::Result<Vec<Bike>> {
    let mut stmt =
        conn.prepare("SELECT id, name, is_available FROM bikes WHERE is_available = 1 ORDER BY id")?;
    let rows = stmt.query_map([], parse_bike_row)?;

    let mut bikes = vec![];
    for row in rows {
        bikes.push(row?);
    }
    Ok(bikes)
}

pub fn count_bikes(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM bikes", [], |row| row.get(0))
}

/// Flips the bike to unavailable only if it is currently available.
/// Returns false when the bike is missing or already taken.
pub fn claim_bike(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE bikes SET is_available = 0 WHERE id = ?1 AND is_available = 1",
        params![id],
    )?;
    Ok(count == 1)
}

pub fn release_bike(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE bikes SET is_available = 1 WHERE id = ?1",
        params![id],
    )?;
    Ok(count == 1)
}

fn parse_bike_row(row: &rusqlite::Row) -> rusqlite::Result<Bike> {
    Ok(Bike {
        id: row.get(0)?,
        name: row.get(1)?,
        is_available: row.get(2)?,
    })
}

// ── Timeslots ──

pub fn insert_timeslot(conn: &Connection, slot: &Timeslot) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO timeslots (id, start_time, end_time, is_available) VALUES (?1, ?2, ?3, ?4)",
        params![
            slot.id,
            format_time(&slot.start_time),
            format_time(&slot.end_time),
            slot.is_available,
        ],
    )?;
    Ok(())
}

pub fn get_timeslot(conn: &Connection, id: &str) -> rusqlite::Result<Option<Timeslot>> {
    conn.query_row(
        "SELECT id, start_time, end_time, is_available FROM timeslots WHERE id = ?1",
        params![id],
        parse_timeslot_row,
    )
    .optional()
}

pub fn list_available_timeslots(conn: &Connection) -> rusqlite::Result<Vec<Timeslot>> {
    let mut stmt = conn.prepare(
        "SELECT id, start_time, end_time, is_available
         FROM timeslots WHERE is_available = 1 ORDER BY start_time ASC",
    )?;
    let rows = stmt.query_map([], parse_timeslot_row)?;

    let mut slots = vec![];
    for row in rows {
        slots.push(row?);
    }
    Ok(slots)
}

/// Same contract as [`claim_bike`].
pub fn claim_timeslot(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE timeslots SET is_available = 0 WHERE id = ?1 AND is_available = 1",
        params![id],
    )?;
    Ok(count == 1)
}

pub fn release_timeslot(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE timeslots SET is_available = 1 WHERE id = ?1",
        params![id],
    )?;
    Ok(count == 1)
}

fn parse_timeslot_row(row: &rusqlite::Row) -> rusqlite::Result<Timeslot> {
    let start_time: String = row.get(1)?;
    let end_time: String = row.get(2)?;

    Ok(Timeslot {
        id: row.get(0)?,
        start_time: parse_time(1, &start_time)?,
        end_time: parse_time(2, &end_time)?,
        is_available: row.get(3)?,
    })
}

// ── Customers & Admins ──

pub fn insert_account(conn: &Connection, kind: AccountKind, account: &Account) -> rusqlite::Result<()> {
    let sql = format!(
        "INSERT INTO {} (id, full_name, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        kind.table()
    );
    conn.execute(
        &sql,
        params![
            account.id,
            account.full_name,
            account.email,
            account.password_hash,
            format_time(&account.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_account(conn: &Connection, kind: AccountKind, id: &str) -> rusqlite::Result<Option<Account>> {
    let sql = format!(
        "SELECT id, full_name, email, password_hash, created_at FROM {} WHERE id = ?1",
        kind.table()
    );
    conn.query_row(&sql, params![id], |row| {
        let created_at: String = row.get(4)?;
        Ok(Account {
            id: row.get(0)?,
            full_name: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            created_at: parse_time(4, &created_at)?,
        })
    })
    .optional()
}

pub fn account_exists(conn: &Connection, kind: AccountKind, id: &str) -> rusqlite::Result<bool> {
    let sql = format!("SELECT COUNT(*) > 0 FROM {} WHERE id = ?1", kind.table());
    conn.query_row(&sql, params![id], |row| row.get(0))
}

// ── Bookings ──

const BOOKING_COLUMNS: &str =
    "id, bike_id, timeslot_id, customer_id, status, booking_date, updated_at";

pub fn insert_booking(conn: &Connection, booking: &Booking) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, bike_id, timeslot_id, customer_id, status, booking_date, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            booking.id,
            booking.bike_id,
            booking.timeslot_id,
            booking.customer_id,
            booking.status.as_str(),
            format_time(&booking.booking_date),
            format_time(&booking.updated_at),
        ],
    )?;
    Ok(())
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> rusqlite::Result<Option<Booking>> {
    let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1");
    conn.query_row(&sql, params![id], parse_booking_row).optional()
}

pub fn get_bookings_for_customer(conn: &Connection, customer_id: &str) -> rusqlite::Result<Vec<Booking>> {
    let sql = format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE customer_id = ?1 ORDER BY booking_date ASC, id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![customer_id], parse_booking_row)?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

pub fn get_all_bookings(conn: &Connection) -> rusqlite::Result<Vec<Booking>> {
    let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY booking_date ASC, id ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], parse_booking_row)?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

/// Moves a booking to `status` only if it is currently `from`.
/// Returns false when no row matched.
pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    from: BookingStatus,
    status: BookingStatus,
) -> rusqlite::Result<bool> {
    let now = format_time(&Utc::now());
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
        params![status.as_str(), now, id, from.as_str()],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> rusqlite::Result<Booking> {
    let status_str: String = row.get(4)?;
    let booking_date: String = row.get(5)?;
    let updated_at: String = row.get(6)?;

    let status = status_str
        .parse::<BookingStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    Ok(Booking {
        id: row.get(0)?,
        bike_id: row.get(1)?,
        timeslot_id: row.get(2)?,
        customer_id: row.get(3)?,
        status,
        booking_date: parse_time(5, &booking_date)?,
        updated_at: parse_time(6, &updated_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use chrono::TimeZone;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn bike(id: &str) -> Bike {
        Bike {
            id: id.to_string(),
            name: "Mountain Bike".to_string(),
            is_available: true,
        }
    }

    fn slot(id: &str, hour: u32) -> Timeslot {
        Timeslot {
            id: id.to_string(),
            start_time: Utc.with_ymd_and_hms(2023, 4, 16, hour, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2023, 4, 16, hour + 1, 0, 0).unwrap(),
            is_available: true,
        }
    }

    #[test]
    fn test_claim_bike_only_once() {
        let conn = setup_db();
        insert_bike(&conn, &bike("B001")).unwrap();

        assert!(claim_bike(&conn, "B001").unwrap());
        assert!(!claim_bike(&conn, "B001").unwrap());
        assert!(!claim_bike(&conn, "B999").unwrap());
        assert!(list_available_bikes(&conn).unwrap().is_empty());

        assert!(release_bike(&conn, "B001").unwrap());
        assert!(get_bike(&conn, "B001").unwrap().unwrap().is_available);
    }

    #[test]
    fn test_duplicate_bike_is_unique_violation() {
        let conn = setup_db();
        insert_bike(&conn, &bike("B001")).unwrap();
        let err = insert_bike(&conn, &bike("B001")).unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[test]
    fn test_timeslot_pair_unique() {
        let conn = setup_db();
        insert_timeslot(&conn, &slot("T1", 8)).unwrap();
        let err = insert_timeslot(&conn, &slot("T2", 8)).unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[test]
    fn test_timeslot_order_is_check_violation() {
        let conn = setup_db();
        let mut backwards = slot("T1", 9);
        backwards.end_time = backwards.start_time;
        let err = insert_timeslot(&conn, &backwards).unwrap_err();
        assert!(is_check_violation(&err));
        assert!(!is_unique_violation(&err));
    }

    #[test]
    fn test_timeslot_roundtrip_and_order() {
        let conn = setup_db();
        insert_timeslot(&conn, &slot("T2", 9)).unwrap();
        insert_timeslot(&conn, &slot("T1", 8)).unwrap();

        let slots = list_available_timeslots(&conn).unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].id, "T1");
        assert_eq!(slots[0], slot("T1", 8));

        assert!(claim_timeslot(&conn, "T1").unwrap());
        let slots = list_available_timeslots(&conn).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].id, "T2");
    }

    #[test]
    fn test_duplicate_email_is_unique_violation() {
        let conn = setup_db();
        let account = Account {
            id: "C1".to_string(),
            full_name: "John Doe".to_string(),
            email: "johndoe@example.com".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        };
        insert_account(&conn, AccountKind::Customer, &account).unwrap();

        let mut dup = account.clone();
        dup.id = "C2".to_string();
        let err = insert_account(&conn, AccountKind::Customer, &dup).unwrap_err();
        assert!(is_unique_violation(&err));

        // Admins are a separate namespace
        insert_account(&conn, AccountKind::Admin, &dup).unwrap();
        assert!(account_exists(&conn, AccountKind::Admin, "C2").unwrap());
        assert!(!account_exists(&conn, AccountKind::Customer, "C2").unwrap());
    }

    #[test]
    fn test_active_pair_unique_but_finished_pair_reusable() {
        let conn = setup_db();
        insert_bike(&conn, &bike("B001")).unwrap();
        insert_timeslot(&conn, &slot("T1", 8)).unwrap();
        insert_account(
            &conn,
            AccountKind::Customer,
            &Account {
                id: "C1".to_string(),
                full_name: "John Doe".to_string(),
                email: "johndoe@example.com".to_string(),
                password_hash: "hash".to_string(),
                created_at: Utc::now(),
            },
        )
        .unwrap();

        let booking = |id: &str| Booking {
            id: id.to_string(),
            bike_id: "B001".to_string(),
            timeslot_id: "T1".to_string(),
            customer_id: "C1".to_string(),
            status: BookingStatus::Active,
            booking_date: Utc::now(),
            updated_at: Utc::now(),
        };

        insert_booking(&conn, &booking("bk-1")).unwrap();
        let err = insert_booking(&conn, &booking("bk-2")).unwrap_err();
        assert!(is_unique_violation(&err));

        assert!(update_booking_status(&conn, "bk-1", BookingStatus::Active, BookingStatus::Cancelled).unwrap());
        assert!(!update_booking_status(&conn, "bk-1", BookingStatus::Active, BookingStatus::Completed).unwrap());
        insert_booking(&conn, &booking("bk-2")).unwrap();

        let bookings = get_bookings_for_customer(&conn, "C1").unwrap();
        assert_eq!(bookings.len(), 2);
        assert_eq!(
            get_booking_by_id(&conn, "bk-1").unwrap().unwrap().status,
            BookingStatus::Cancelled
        );

        assert!(delete_booking(&conn, "bk-1").unwrap());
        assert!(!delete_booking(&conn, "bk-1").unwrap());
        assert_eq!(get_all_bookings(&conn).unwrap().len(), 1);
    }
}
