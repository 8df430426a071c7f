pub mod booking;
pub mod catalog;
pub mod password;

pub use booking::BookingService;
pub use catalog::CatalogService;
