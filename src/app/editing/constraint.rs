//! Projektions-Constraints für Marker.

use crate::app::features::blend::EdgeSlot;
use crate::core::SubElementLink;

/// Korrigiert eine rohe Drag-Position; kann nebenbei einen Feature-Parameter schreiben.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionConstraint {
    /// Auf die Eingangskante projizieren, schreibt `ParameterN`
    OnEdge { slot: EdgeSlot },
    /// Auf die Tangentenlinie am Blend-Ende projizieren, schreibt `ScaleN`
    OnTangentLine { slot: EdgeSlot },
    /// Auf eine Stützgeometrie des Profils projizieren
    OnSupport { link: SubElementLink },
}

impl ProjectionConstraint {
    /// Stütze eines Profil-Constraints.
    pub fn support_link(&self) -> Option<&SubElementLink> {
        match self {
            ProjectionConstraint::OnSupport { link } => Some(link),
            _ => None,
        }
    }
}
