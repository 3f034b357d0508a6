pub mod availability;
pub mod health;
pub mod occupancy;
pub mod provider;
pub mod schedule;
