//! Services for checking product availability.

mod availability;

pub use availability::{AvailabilityChecker, CheckOutcome};
