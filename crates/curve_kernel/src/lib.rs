//! Curve-Kernel für den Parametric Curve Editor.
//!
//! Stellt die B-Spline-Mathematik bereit, auf der die parametrischen Features
//! aufbauen: Auswertung und Ableitungen, Zerlegung in Bézier-Segmente,
//! Trimmen und Verbinden, globale Interpolation (offen und periodisch),
//! Blend-Konstruktion mit G0–G4-Anschluss und Abstandsabfragen.
//!
//! Die Knotenalgorithmen folgen "The NURBS Book" (Piegl & Tiller).

pub mod basis;
mod bezier;
mod blend;
mod bspline;
mod distance;
mod error;
mod interpolate;
mod linalg;

pub use bezier::BezierSegment;
pub use blend::{blend_curve, BlendEnd};
pub use bspline::BSplineCurve;
pub use distance::{project_onto_line, segment_closest_parameters, Footpoint};
pub use error::{KernelError, KernelResult};
pub use interpolate::interpolate;

/// Numerische Toleranz für Parameter- und Längenvergleiche im Kernel.
pub const PARAM_EPSILON: f64 = 1e-12;
