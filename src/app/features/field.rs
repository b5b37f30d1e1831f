//! Geklemmte Zahlenfelder mit (value, min, max, step)-Metadaten.

use serde::{Deserialize, Serialize};

/// Zahlenwert mit erlaubtem Bereich und Schrittweite.
///
/// Persistiert wird nur der Wert; nach dem Laden ist das Feld unbeschränkt,
/// bis [`ClampedFloat::reattach`] die Metadaten wieder anbringt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct ClampedFloat {
    value: f64,
    min: f64,
    max: f64,
    step: f64,
}

impl ClampedFloat {
    /// Erstellt ein Feld; `value` wird sofort auf `[min, max]` geklemmt.
    pub fn new(value: f64, min: f64, max: f64, step: f64) -> Self {
        Self {
            value: value.clamp(min, max),
            min,
            max,
            step,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Klemmt einen Kandidaten auf den Bereich, ohne das Feld zu ändern.
    pub fn clamped(&self, candidate: f64) -> f64 {
        candidate.clamp(self.min, self.max)
    }

    /// Setzt den Wert geklemmt und gibt den gespeicherten Wert zurück.
    pub fn set(&mut self, candidate: f64) -> f64 {
        self.value = self.clamped(candidate);
        self.value
    }

    /// Bringt Bereich und Schrittweite wieder an; der Wert bleibt erhalten.
    pub fn reattach(&mut self, min: f64, max: f64, step: f64) {
        self.min = min;
        self.max = max;
        self.step = step;
    }

    /// `true` wenn ein endlicher Bereich angebracht ist.
    pub fn is_bounded(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

impl From<f64> for ClampedFloat {
    fn from(value: f64) -> Self {
        Self {
            value,
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            step: 0.0,
        }
    }
}

impl From<ClampedFloat> for f64 {
    fn from(field: ClampedFloat) -> Self {
        field.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_clamps_to_range() {
        let mut field = ClampedFloat::new(1.0, 0.0, 1.0, 0.05);
        assert_eq!(field.set(1.4), 1.0);
        assert_eq!(field.set(-3.0), 0.0);
        assert_eq!(field.set(0.25), 0.25);
    }

    #[test]
    fn test_restored_value_survives_reattach() {
        let json = "0.75";
        let mut field: ClampedFloat = serde_json::from_str(json).expect("Zahl ist gültig");
        assert!(!field.is_bounded());
        field.reattach(0.0, 1.0, 0.05);
        assert!(field.is_bounded());
        assert_eq!(field.value(), 0.75);
        assert_eq!(field.set(7.0), 1.0);
        assert_eq!(serde_json::to_string(&field).expect("serialisierbar"), "1.0");
    }
}
