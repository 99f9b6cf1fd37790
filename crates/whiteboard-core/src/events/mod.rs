//! Events fanned out by the broker

mod property_change;

pub use property_change::PropertyChangeEvent;
