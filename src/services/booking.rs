use std::sync::Arc;

use crate::db::Store;
use crate::errors::{AppError, AppResult};
use crate::models::{AccountKind, Booking, BookingStatus, NewBooking};

/// Owns the booking lifecycle and keeps bike and timeslot availability in
/// step with it.
pub struct BookingService {
    store: Arc<dyn Store>,
}

impl BookingService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, request: NewBooking) -> AppResult<Booking> {
        let booking = Booking::new(request.validate()?);

        if let Err(e) = self.store.reserve(&booking).await {
            if let AppError::ResourceUnavailable(reason) = &e {
                tracing::info!(
                    bike_id = %booking.bike_id,
                    timeslot_id = %booking.timeslot_id,
                    reason = %reason,
                    "booking rejected"
                );
            }
            return Err(e);
        }

        tracing::info!(
            booking_id = %booking.id,
            bike_id = %booking.bike_id,
            timeslot_id = %booking.timeslot_id,
            customer_id = %booking.customer_id,
            "booking created"
        );
        Ok(booking)
    }

    pub async fn get(&self, id: &str) -> AppResult<Booking> {
        self.store
            .get_booking(id)
            .await?
            .ok_or_else(|| booking_not_found(id))
    }

    /// Completing or cancelling a booking hands its bike and timeslot back.
    pub async fn update_status(&self, id: &str, status: BookingStatus) -> AppResult<Booking> {
        let current = self.get(id).await?;
        if !current.status.can_transition_to(status) {
            return Err(AppError::InvalidTransition {
                from: current.status,
                to: status,
            });
        }

        match self.store.finish_booking(id, status).await? {
            Some(booking) => {
                tracing::info!(booking_id = %id, status = %status, "booking status updated");
                Ok(booking)
            }
            // Another request finished or deleted it after we looked.
            None => match self.store.get_booking(id).await? {
                Some(latest) => Err(AppError::InvalidTransition {
                    from: latest.status,
                    to: status,
                }),
                None => Err(booking_not_found(id)),
            },
        }
    }

    pub async fn delete(&self, id: &str) -> AppResult<Booking> {
        let booking = self
            .store
            .remove_booking(id)
            .await?
            .ok_or_else(|| booking_not_found(id))?;

        tracing::info!(booking_id = %id, status = %booking.status, "booking deleted");
        Ok(booking)
    }

    pub async fn list_by_customer(&self, customer_id: &str) -> AppResult<Vec<Booking>> {
        self.ensure_account(AccountKind::Customer, customer_id).await?;
        self.store.list_bookings_for_customer(customer_id).await
    }

    /// Bookings carry no admin reference; any admin oversees all of them.
    pub async fn list_by_admin(&self, admin_id: &str) -> AppResult<Vec<Booking>> {
        self.ensure_account(AccountKind::Admin, admin_id).await?;
        self.store.list_all_bookings().await
    }

    async fn ensure_account(&self, kind: AccountKind, id: &str) -> AppResult<()> {
        match self.store.get_account(kind, id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("{} {id}", kind.as_str()))),
        }
    }
}

fn booking_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("booking {id}"))
}
