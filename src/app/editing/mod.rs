//! Interaktive Bearbeitung: Marker, Verbinder, Constraints und Edit-Session.

pub mod constraint;
pub mod graph;
pub mod pick;
pub mod session;
pub mod viewport;

pub use constraint::ProjectionConstraint;
pub use graph::{
    ConnectorId, ConnectorKind, ConnectorUpdate, ConstraintGraph, ConstraintSolver, DragOutcome,
    MarkerId,
};
pub use pick::MarkerIndex;
pub use session::DragSession;
pub use viewport::{preview_points, SceneHandle, SceneNode, SceneRecorder, Viewport};
