//! Business logic services for the inventory core

pub mod alerts;
pub mod availability;
pub mod catalog;
pub mod ledger;
pub mod reporting;
pub mod reservation;

pub use alerts::AlertService;
pub use availability::AvailabilityService;
pub use catalog::CatalogStore;
pub use ledger::LedgerService;
pub use reporting::ReportingService;
pub use reservation::ReservationService;
