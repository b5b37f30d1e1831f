//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Laufzeit-Konfiguration, die von `core` und `app`
//! gleichermaßen gelesen wird.

pub mod options;

pub use options::EditorOptions;
pub use options::{DEGREE_MAX, DEGREE_MIN, SCALE_EPSILON};
