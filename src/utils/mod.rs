//! Utility modules

pub mod throttle;

pub use throttle::Throttle;
