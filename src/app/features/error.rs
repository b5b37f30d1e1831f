//! Fehler beim Neuberechnen eines Features.

use curve_kernel::KernelError;
use thiserror::Error;

use crate::core::ResolveError;

/// Fehler einer einzelnen Neuberechnung; der vorherige Cache bleibt erhalten.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("Referenz nicht auflösbar: {0}")]
    ReferenceResolution(#[from] ResolveError),

    #[error("Data ({data}) und DataType ({types}) haben unterschiedliche Länge")]
    DataShapeMismatch { data: usize, types: usize },

    #[error("{constrained} gebundene Punkte, aber nur {supports} Stützelemente")]
    SupportOverflow { constrained: usize, supports: usize },

    #[error("zu wenige Punkte für die Interpolation: {got} (mindestens 2)")]
    InsufficientPoints { got: usize },

    #[error("Konstruktion fehlgeschlagen: {0}")]
    Construction(#[from] KernelError),
}

/// Kurzform für Feature-Ergebnisse.
pub type FeatureResult<T> = Result<T, FeatureError>;
