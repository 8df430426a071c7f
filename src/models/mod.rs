pub mod account;
pub mod bike;
pub mod booking;
pub mod timeslot;

pub use account::{Account, AccountKind, NewAccount, ValidAccount};
pub use bike::{Bike, NewBike};
pub use booking::{Booking, BookingStatus, NewBooking};
pub use timeslot::{NewTimeslot, Timeslot};
