pub mod availability;
pub mod occupancy;
pub mod provider;
pub mod schedule;
pub mod time;
