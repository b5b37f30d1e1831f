//! Fehlertypen des Curve-Kernels.

use thiserror::Error;

/// Fehler bei Konstruktion oder Auswertung von Kurven.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    #[error("zu wenige Punkte: {got} vorhanden, mindestens {required} benötigt")]
    InsufficientPoints { got: usize, required: usize },

    #[error("Kontinuität verlangt Grad {required}, erlaubt ist höchstens {max_degree}")]
    ContinuityExceedsDegree { required: usize, max_degree: usize },

    #[error("ungültiger Knotenvektor: {0}")]
    InvalidKnots(String),

    #[error("Gleichungssystem ist singulär")]
    SingularSystem,

    #[error("Punkt {0} fällt mit seinem Vorgänger zusammen")]
    CoincidentPoints(usize),

    #[error("Tangente ist entartet (Kurvengeschwindigkeit ~ 0)")]
    DegenerateTangent,

    #[error("Kurven hängen nicht zusammen (Lücke {gap:.3e})")]
    Disconnected { gap: f64 },

    #[error("Punkt {index} verfehlt die Toleranz (Abweichung {deviation:.3e})")]
    ToleranceExceeded { index: usize, deviation: f64 },

    #[error("leerer Parameterbereich [{first}, {last}]")]
    EmptyRange { first: f64, last: f64 },
}

/// Kurzform für Kernel-Ergebnisse.
pub type KernelResult<T> = Result<T, KernelError>;
