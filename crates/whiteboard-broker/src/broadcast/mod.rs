//! Property fan-out

mod property_publisher;

pub use property_publisher::PropertyPublisher;
