//! Parametrische Blend-Kurve zwischen zwei Kanten.
//!
//! Zustand, Validierung der Eingaben und Neuberechnung sind getrennt:
//! - `state`: Felder, Änderungen (`BlendEdit`) und deren Validierung
//! - `recompute`: `ParametricFeature`-Implementierung

mod recompute;
mod state;

pub use state::{BlendEdit, BlendFeature, Continuity, EdgeSlot};

#[cfg(test)]
mod tests;
