use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{Connection, TransactionBehavior};

use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::{Account, AccountKind, Bike, Booking, BookingStatus, Timeslot};

/// Persistence seam for the services. Every method that touches a booking
/// together with its bike and timeslot is atomic.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_bike(&self, bike: &Bike) -> AppResult<()>;
    async fn get_bike(&self, id: &str) -> AppResult<Option<Bike>>;
    async fn list_available_bikes(&self) -> AppResult<Vec<Bike>>;

    async fn insert_timeslot(&self, slot: &Timeslot) -> AppResult<()>;
    async fn get_timeslot(&self, id: &str) -> AppResult<Option<Timeslot>>;
    async fn list_available_timeslots(&self) -> AppResult<Vec<Timeslot>>;

    async fn insert_account(&self, kind: AccountKind, account: &Account) -> AppResult<()>;
    async fn get_account(&self, kind: AccountKind, id: &str) -> AppResult<Option<Account>>;

    async fn get_booking(&self, id: &str) -> AppResult<Option<Booking>>;
    async fn list_bookings_for_customer(&self, customer_id: &str) -> AppResult<Vec<Booking>>;
    async fn list_all_bookings(&self) -> AppResult<Vec<Booking>>;

    /// Claims the booking's bike and timeslot and inserts the booking.
    /// Fails with `ResourceUnavailable` if either resource is missing or
    /// already taken, leaving nothing changed.
    async fn reserve(&self, booking: &Booking) -> AppResult<()>;

    /// Moves an `active` booking to `status` and releases its bike and
    /// timeslot. Returns `None` if no active booking with that id exists.
    async fn finish_booking(&self, id: &str, status: BookingStatus) -> AppResult<Option<Booking>>;

    /// Deletes the booking, releasing its resources if it still held them.
    /// Returns the removed booking, or `None` if it did not exist.
    async fn remove_booking(&self, id: &str) -> AppResult<Option<Booking>>;
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Internal("database connection lock poisoned".into()))
    }
}

fn release_resources(conn: &Connection, booking: &Booking) -> AppResult<()> {
    if !queries::release_bike(conn, &booking.bike_id)? {
        tracing::warn!(booking_id = %booking.id, bike_id = %booking.bike_id, "released bike no longer exists");
    }
    if !queries::release_timeslot(conn, &booking.timeslot_id)? {
        tracing::warn!(booking_id = %booking.id, timeslot_id = %booking.timeslot_id, "released timeslot no longer exists");
    }
    Ok(())
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_bike(&self, bike: &Bike) -> AppResult<()> {
        let conn = self.conn()?;
        queries::insert_bike(&conn, bike).map_err(|e| {
            if queries::is_unique_violation(&e) {
                AppError::Validation(format!("bike id {} already exists", bike.id))
            } else {
                e.into()
            }
        })
    }

    async fn get_bike(&self, id: &str) -> AppResult<Option<Bike>> {
        let conn = self.conn()?;
        Ok(queries::get_bike(&conn, id)?)
    }

    async fn list_available_bikes(&self) -> AppResult<Vec<Bike>> {
        let conn = self.conn()?;
        Ok(queries::list_available_bikes(&conn)?)
    }

    async fn insert_timeslot(&self, slot: &Timeslot) -> AppResult<()> {
        let conn = self.conn()?;
        queries::insert_timeslot(&conn, slot).map_err(|e| {
            if queries::is_unique_violation(&e) {
                AppError::Validation(format!(
                    "timeslot {} or its start/end pair already exists",
                    slot.id
                ))
            } else if queries::is_check_violation(&e) {
                AppError::Validation("end time must be after start time".into())
            } else {
                e.into()
            }
        })
    }

    async fn get_timeslot(&self, id: &str) -> AppResult<Option<Timeslot>> {
        let conn = self.conn()?;
        Ok(queries::get_timeslot(&conn, id)?)
    }

    async fn list_available_timeslots(&self) -> AppResult<Vec<Timeslot>> {
        let conn = self.conn()?;
        Ok(queries::list_available_timeslots(&conn)?)
    }

    async fn insert_account(&self, kind: AccountKind, account: &Account) -> AppResult<()> {
        let conn = self.conn()?;
        queries::insert_account(&conn, kind, account).map_err(|e| {
            if queries::is_unique_violation(&e) {
                AppError::Validation(format!(
                    "{} with this id or email already exists",
                    kind.as_str()
                ))
            } else {
                e.into()
            }
        })
    }

    async fn get_account(&self, kind: AccountKind, id: &str) -> AppResult<Option<Account>> {
        let conn = self.conn()?;
        Ok(queries::get_account(&conn, kind, id)?)
    }

    async fn get_booking(&self, id: &str) -> AppResult<Option<Booking>> {
        let conn = self.conn()?;
        Ok(queries::get_booking_by_id(&conn, id)?)
    }

    async fn list_bookings_for_customer(&self, customer_id: &str) -> AppResult<Vec<Booking>> {
        let conn = self.conn()?;
        Ok(queries::get_bookings_for_customer(&conn, customer_id)?)
    }

    async fn list_all_bookings(&self) -> AppResult<Vec<Booking>> {
        let conn = self.conn()?;
        Ok(queries::get_all_bookings(&conn)?)
    }

    async fn reserve(&self, booking: &Booking) -> AppResult<()> {
        let mut conn = self.conn()?;
        // IMMEDIATE takes the write lock up front so the availability checks
        // below cannot interleave with another writer.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !queries::account_exists(&tx, AccountKind::Customer, &booking.customer_id)? {
            return Err(AppError::Validation(format!(
                "customer {} does not exist",
                booking.customer_id
            )));
        }

        if !queries::claim_bike(&tx, &booking.bike_id)? {
            return Err(AppError::ResourceUnavailable(format!(
                "bike {} is not available",
                booking.bike_id
            )));
        }

        if !queries::claim_timeslot(&tx, &booking.timeslot_id)? {
            return Err(AppError::ResourceUnavailable(format!(
                "timeslot {} is not available",
                booking.timeslot_id
            )));
        }

        queries::insert_booking(&tx, booking).map_err(|e| {
            if queries::is_unique_violation(&e) {
                AppError::ResourceUnavailable(format!(
                    "bike {} is already booked for timeslot {}",
                    booking.bike_id, booking.timeslot_id
                ))
            } else {
                e.into()
            }
        })?;

        tx.commit()?;
        Ok(())
    }

    async fn finish_booking(&self, id: &str, status: BookingStatus) -> AppResult<Option<Booking>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !queries::update_booking_status(&tx, id, BookingStatus::Active, status)? {
            return Ok(None);
        }

        let booking = queries::get_booking_by_id(&tx, id)?
            .ok_or_else(|| AppError::Internal(format!("booking {id} vanished mid-update")))?;
        release_resources(&tx, &booking)?;

        tx.commit()?;
        Ok(Some(booking))
    }

    async fn remove_booking(&self, id: &str) -> AppResult<Option<Booking>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(booking) = queries::get_booking_by_id(&tx, id)? else {
            return Ok(None);
        };

        // Finished bookings already gave their resources back; the bike may
        // belong to a newer booking by now.
        if booking.status.holds_resources() {
            release_resources(&tx, &booking)?;
        }
        queries::delete_booking(&tx, id)?;

        tx.commit()?;
        Ok(Some(booking))
    }
}
