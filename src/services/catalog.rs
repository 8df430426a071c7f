use std::sync::Arc;

use chrono::Utc;

use crate::db::Store;
use crate::errors::AppResult;
use crate::models::{Account, AccountKind, Bike, NewAccount, NewBike, NewTimeslot, Timeslot};
use crate::services::password::hash_password;

/// Validated creation and listing of the bookable resources and accounts.
pub struct CatalogService {
    store: Arc<dyn Store>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn available_bikes(&self) -> AppResult<Vec<Bike>> {
        self.store.list_available_bikes().await
    }

    pub async fn available_timeslots(&self) -> AppResult<Vec<Timeslot>> {
        self.store.list_available_timeslots().await
    }

    pub async fn create_bike(&self, input: NewBike) -> AppResult<Bike> {
        let bike = input.validate()?;
        self.store.insert_bike(&bike).await?;
        tracing::info!(bike_id = %bike.id, "bike created");
        Ok(bike)
    }

    pub async fn create_timeslot(&self, input: NewTimeslot) -> AppResult<Timeslot> {
        let slot = input.validate()?;
        self.store.insert_timeslot(&slot).await?;
        tracing::info!(timeslot_id = %slot.id, start = %slot.start_time, end = %slot.end_time, "timeslot created");
        Ok(slot)
    }

    pub async fn create_account(&self, kind: AccountKind, input: NewAccount) -> AppResult<Account> {
        let valid = input.validate()?;
        let account = Account {
            id: valid.id,
            full_name: valid.full_name,
            email: valid.email,
            password_hash: hash_password(&valid.password)?,
            created_at: Utc::now(),
        };
        self.store.insert_account(kind, &account).await?;
        tracing::info!(kind = kind.as_str(), account_id = %account.id, "account created");
        Ok(account)
    }
}
