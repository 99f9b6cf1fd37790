//! Draw event - one rendered dot

use serde::{Deserialize, Serialize};

/// Canvas coordinates of a single dot
///
/// Draw events carry no identity beyond their coordinates. They are created per
/// pointer sample and consumed once by the receiving whiteboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawEvent {
    pub x: f64,
    pub y: f64,
}

impl DrawEvent {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Encode as an opaque property value
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Decode from an opaque property value
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let value = DrawEvent::new(12.0, 34.5).to_value().unwrap();
        assert_eq!(value, serde_json::json!({"x": 12.0, "y": 34.5}));
    }

    #[test]
    fn test_from_value_rejects_other_shapes() {
        assert!(DrawEvent::from_value(&serde_json::json!({"x": 1.0})).is_err());
        assert!(DrawEvent::from_value(&serde_json::json!("dot")).is_err());
    }

    #[test]
    fn test_from_value_accepts_integers() {
        let event = DrawEvent::from_value(&serde_json::json!({"x": 3, "y": 4})).unwrap();
        assert_eq!(event, DrawEvent::new(3.0, 4.0));
    }
}
