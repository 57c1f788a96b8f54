//! Infrastructure for exposure collection

mod collector;

pub use collector::ExposureCollector;
