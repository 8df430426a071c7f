use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub bike_id: String,
    pub timeslot_id: String,
    pub customer_id: String,
    pub status: BookingStatus,
    pub booking_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// A fresh booking holds its bike and timeslot until it leaves `active`.
    pub fn new(request: NewBooking) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            bike_id: request.bike_id,
            timeslot_id: request.timeslot_id,
            customer_id: request.customer_id,
            status: BookingStatus::Active,
            booking_date: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub customer_id: String,
    pub bike_id: String,
    pub timeslot_id: String,
}

impl NewBooking {
    pub fn validate(self) -> Result<Self, AppError> {
        let field = |name: &str, value: String| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Err(AppError::Validation(format!("{name} is required")))
            } else {
                Ok(trimmed.to_string())
            }
        };

        Ok(Self {
            customer_id: field("customerId", self.customer_id)?,
            bike_id: field("bikeId", self.bike_id)?,
            timeslot_id: field("timeslotId", self.timeslot_id)?,
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Active => "active",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Whether a booking in this status still holds its bike and timeslot.
    pub fn holds_resources(&self) -> bool {
        matches!(self, BookingStatus::Active)
    }

    /// `active` may move to either terminal status; terminal statuses never
    /// change again.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Active, BookingStatus::Completed)
                | (BookingStatus::Active, BookingStatus::Cancelled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "active" => Ok(BookingStatus::Active),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(AppError::Validation(format!(
                "unknown booking status: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        use BookingStatus::*;

        assert!(Active.can_transition_to(Completed));
        assert!(Active.can_transition_to(Cancelled));
        assert!(!Active.can_transition_to(Active));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Active));
        assert!(!Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("completed".parse::<BookingStatus>().unwrap(), BookingStatus::Completed);
        assert!(matches!(
            "booked".parse::<BookingStatus>(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_new_booking_starts_active() {
        let booking = Booking::new(NewBooking {
            customer_id: "C1".to_string(),
            bike_id: "B001".to_string(),
            timeslot_id: "T1".to_string(),
        });
        assert_eq!(booking.status, BookingStatus::Active);
        assert!(booking.status.holds_resources());
        assert_eq!(booking.booking_date, booking.updated_at);
    }

    #[test]
    fn test_new_booking_requires_references() {
        let request = NewBooking {
            customer_id: "C1".to_string(),
            bike_id: " ".to_string(),
            timeslot_id: "T1".to_string(),
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.to_string(), "validation failed: bikeId is required");
    }

    #[test]
    fn test_booking_json_shape() {
        let booking = Booking::new(NewBooking {
            customer_id: "C1".to_string(),
            bike_id: "B001".to_string(),
            timeslot_id: "T1".to_string(),
        });
        let json = serde_json::to_value(&booking).unwrap();
        assert_eq!(json["bikeId"], "B001");
        assert_eq!(json["timeslotId"], "T1");
        assert_eq!(json["customerId"], "C1");
        assert_eq!(json["status"], "active");
        assert!(json["bookingDate"].is_string());
    }
}
