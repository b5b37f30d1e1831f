//! Constrained Profile: Interpolationskurve durch frei oder auf Stützgeometrie
//! gebundene Punkte.

mod recompute;
mod state;

pub use state::{DataType, ProfileEdit, ProfileFeature};

#[cfg(test)]
mod tests;
