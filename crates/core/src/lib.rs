//! # Slotkeeper Core
//!
//! Availability resolution for service providers. A provider's bookable time
//! is composed from three independently maintained layers:
//!
//! - a recurring weekly **base schedule**,
//! - date-specific **overrides** that replace the base for one day,
//! - **occupancy** committed by confirmed bookings.
//!
//! Writes go through [`engine::AvailabilityEngine`], which validates them and
//! hands them to the [`store`] implementations. Reads are answered by the pure
//! [`resolver`] and [`status`] functions over a snapshot of the stores.

pub mod cache;
pub mod engine;
pub mod errors;
pub mod models;
pub mod resolver;
pub mod status;
pub mod store;
pub mod validation;

pub use engine::{AvailabilityEngine, EngineConfig};
pub use errors::{EngineError, EngineResult};
pub use store::Stores;
