//! Constraint-Graph aus Markern und abhängigen Verbindern.
//!
//! Marker und Verbinder liegen in Arenen und werden über Indizes
//! adressiert. Jeder Marker kennt seine abhängigen Verbinder; eine
//! Bewegung aktualisiert diese sofort, in Registrierungsreihenfolge.

use glam::DVec3;

use super::constraint::ProjectionConstraint;

/// Index eines Markers in der Arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub usize);

/// Index eines Verbinders in der Arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectorId(pub usize);

/// Ziehbarer Punkt.
#[derive(Debug, Clone)]
pub struct Marker {
    pub position: DVec3,
    pub constraints: Vec<ProjectionConstraint>,
    pub deleted: bool,
    dependents: Vec<ConnectorId>,
}

impl Marker {
    pub fn dependents(&self) -> &[ConnectorId] {
        &self.dependents
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorKind {
    Line,
    Polygon,
}

/// Abgeleitetes Element, dessen Stützpunkte die Positionen seiner Marker sind.
#[derive(Debug, Clone)]
pub struct Connector {
    pub kind: ConnectorKind,
    owners: Vec<MarkerId>,
    vertices: Vec<DVec3>,
    deleted: bool,
}

impl Connector {
    pub fn owners(&self) -> &[MarkerId] {
        &self.owners
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// Korrigiert Positionen für einen Constraint; `None` verwirft den Drag.
pub trait ConstraintSolver {
    fn solve(&mut self, constraint: &ProjectionConstraint, position: DVec3) -> Option<DVec3>;
}

/// Ergebnis eines Drag-Ereignisses.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// Mindestens ein Constraint fand keinen Fußpunkt; Marker bleibt stehen
    Rejected,
    Moved {
        position: DVec3,
        updated: Vec<ConnectorId>,
        deleted: Vec<ConnectorId>,
    },
}

/// Ergebnis der Aktualisierung eines Verbinders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorUpdate {
    Updated,
    /// Ein Besitzer ist gelöscht; der Verbinder hat sich selbst entfernt
    Deleted,
    AlreadyDeleted,
}

/// Arena aller Marker und Verbinder einer Edit-Session.
#[derive(Debug, Clone, Default)]
pub struct ConstraintGraph {
    markers: Vec<Marker>,
    connectors: Vec<Connector>,
}

impl ConstraintGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_marker(
        &mut self,
        position: DVec3,
        constraints: Vec<ProjectionConstraint>,
    ) -> MarkerId {
        self.markers.push(Marker {
            position,
            constraints,
            deleted: false,
            dependents: Vec::new(),
        });
        MarkerId(self.markers.len() - 1)
    }

    /// Legt einen Verbinder an und trägt ihn bei allen Besitzern ein.
    pub fn add_connector(&mut self, kind: ConnectorKind, owners: Vec<MarkerId>) -> ConnectorId {
        let id = ConnectorId(self.connectors.len());
        for owner in &owners {
            if let Some(marker) = self.markers.get_mut(owner.0) {
                marker.dependents.push(id);
            }
        }
        let vertices = self.owner_positions(&owners);
        self.connectors.push(Connector {
            kind,
            owners,
            vertices,
            deleted: false,
        });
        id
    }

    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(id.0)
    }

    pub fn connector(&self, id: ConnectorId) -> Option<&Connector> {
        self.connectors.get(id.0)
    }

    /// Alle Marker in Aufbaureihenfolge.
    pub fn markers(&self) -> impl Iterator<Item = (MarkerId, &Marker)> {
        self.markers.iter().enumerate().map(|(i, m)| (MarkerId(i), m))
    }

    pub fn connectors(&self) -> impl Iterator<Item = (ConnectorId, &Connector)> {
        self.connectors
            .iter()
            .enumerate()
            .map(|(i, c)| (ConnectorId(i), c))
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Wendet die Constraints des Markers nacheinander an und verschiebt ihn.
    ///
    /// Jeder Constraint bekommt die laufende Position; der letzte bestimmt das
    /// Ergebnis. Liefert einer `None`, bleibt der Marker an seiner alten Stelle.
    pub fn drag(
        &mut self,
        id: MarkerId,
        raw: DVec3,
        solver: &mut dyn ConstraintSolver,
    ) -> DragOutcome {
        let Some(marker) = self.markers.get(id.0) else {
            return DragOutcome::Rejected;
        };
        if marker.deleted {
            return DragOutcome::Rejected;
        }

        let mut position = raw;
        for constraint in &marker.constraints {
            match solver.solve(constraint, position) {
                Some(corrected) => position = corrected,
                None => {
                    log::debug!("Marker {:?}: kein Fußpunkt für {:?}", id, constraint);
                    return DragOutcome::Rejected;
                }
            }
        }

        let (updated, deleted) = self.set_position(id, position);
        DragOutcome::Moved {
            position,
            updated,
            deleted,
        }
    }

    /// Setzt eine Markerposition ohne Constraints und aktualisiert die Abhängigen.
    pub fn set_position(
        &mut self,
        id: MarkerId,
        position: DVec3,
    ) -> (Vec<ConnectorId>, Vec<ConnectorId>) {
        match self.markers.get_mut(id.0) {
            Some(marker) => marker.position = position,
            None => return (Vec::new(), Vec::new()),
        }
        self.propagate(id)
    }

    /// Markiert einen Marker als gelöscht.
    ///
    /// Abhängige Verbinder entfernen sich erst bei ihrer nächsten Aktualisierung.
    pub fn mark_deleted(&mut self, id: MarkerId) -> bool {
        match self.markers.get_mut(id.0) {
            Some(marker) if !marker.deleted => {
                marker.deleted = true;
                true
            }
            _ => false,
        }
    }

    /// Entfernt die Stützbindung eines Markers; er wird zum freien Punkt.
    pub fn detach_support(&mut self, id: MarkerId) -> bool {
        let Some(marker) = self.markers.get_mut(id.0) else {
            return false;
        };
        let before = marker.constraints.len();
        marker
            .constraints
            .retain(|c| !matches!(c, ProjectionConstraint::OnSupport { .. }));
        marker.constraints.len() != before
    }

    /// Aktualisiert alle direkten Abhängigen eines Markers in Registrierungsreihenfolge.
    pub fn propagate(&mut self, id: MarkerId) -> (Vec<ConnectorId>, Vec<ConnectorId>) {
        let dependents = match self.markers.get(id.0) {
            Some(marker) => marker.dependents.clone(),
            None => return (Vec::new(), Vec::new()),
        };
        let mut updated = Vec::new();
        let mut deleted = Vec::new();
        for connector in dependents {
            match self.update_connector(connector) {
                ConnectorUpdate::Updated => updated.push(connector),
                ConnectorUpdate::Deleted => deleted.push(connector),
                ConnectorUpdate::AlreadyDeleted => {}
            }
        }
        (updated, deleted)
    }

    /// Berechnet die Stützpunkte eines Verbinders neu oder löscht ihn,
    /// sobald einer seiner Besitzer gelöscht ist.
    pub fn update_connector(&mut self, id: ConnectorId) -> ConnectorUpdate {
        let Some(connector) = self.connectors.get(id.0) else {
            return ConnectorUpdate::AlreadyDeleted;
        };
        if connector.deleted {
            return ConnectorUpdate::AlreadyDeleted;
        }
        let owner_deleted = connector
            .owners
            .iter()
            .any(|o| self.markers.get(o.0).is_none_or(|m| m.deleted));
        let vertices = self.owner_positions(&connector.owners);

        let Some(connector) = self.connectors.get_mut(id.0) else {
            return ConnectorUpdate::AlreadyDeleted;
        };
        if owner_deleted {
            connector.deleted = true;
            connector.vertices.clear();
            log::debug!("Verbinder {:?} entfernt (Besitzer gelöscht)", id);
            ConnectorUpdate::Deleted
        } else {
            connector.vertices = vertices;
            ConnectorUpdate::Updated
        }
    }

    fn owner_positions(&self, owners: &[MarkerId]) -> Vec<DVec3> {
        owners
            .iter()
            .filter_map(|o| self.markers.get(o.0))
            .filter(|m| !m.deleted)
            .map(|m| m.position)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PassThrough;

    impl ConstraintSolver for PassThrough {
        fn solve(&mut self, _: &ProjectionConstraint, position: DVec3) -> Option<DVec3> {
            Some(position)
        }
    }

    struct NoFootpoint;

    impl ConstraintSolver for NoFootpoint {
        fn solve(&mut self, _: &ProjectionConstraint, _: DVec3) -> Option<DVec3> {
            None
        }
    }

    #[test]
    fn test_connector_deletes_itself_after_owner_deleted() {
        let mut graph = ConstraintGraph::new();
        let a = graph.add_marker(DVec3::ZERO, Vec::new());
        let b = graph.add_marker(DVec3::X, Vec::new());
        let line = graph.add_connector(ConnectorKind::Line, vec![a, b]);

        assert!(graph.mark_deleted(b));
        assert!(!graph.connector(line).is_some_and(|c| c.is_deleted()));
        assert_eq!(graph.update_connector(line), ConnectorUpdate::Deleted);
        assert!(graph.connector(line).is_some_and(|c| c.is_deleted()));
        assert_eq!(graph.update_connector(line), ConnectorUpdate::AlreadyDeleted);
    }

    #[test]
    fn test_drag_updates_dependents_in_order() {
        let mut graph = ConstraintGraph::new();
        let a = graph.add_marker(DVec3::ZERO, Vec::new());
        let b = graph.add_marker(DVec3::X, Vec::new());
        let c = graph.add_marker(DVec3::Y, Vec::new());
        let ab = graph.add_connector(ConnectorKind::Line, vec![a, b]);
        let bc = graph.add_connector(ConnectorKind::Line, vec![b, c]);

        let outcome = graph.drag(b, DVec3::new(2.0, 2.0, 0.0), &mut PassThrough);
        assert_eq!(
            outcome,
            DragOutcome::Moved {
                position: DVec3::new(2.0, 2.0, 0.0),
                updated: vec![ab, bc],
                deleted: vec![],
            }
        );
        let vertices = graph.connector(bc).map(|c| c.vertices().to_vec());
        assert_eq!(vertices, Some(vec![DVec3::new(2.0, 2.0, 0.0), DVec3::Y]));
    }

    #[test]
    fn test_rejected_drag_keeps_position() {
        let mut graph = ConstraintGraph::new();
        let link = crate::core::SubElementLink::new("A", crate::core::SubElementRef::edge(1));
        let a = graph.add_marker(
            DVec3::ONE,
            vec![ProjectionConstraint::OnSupport { link }],
        );
        assert_eq!(
            graph.drag(a, DVec3::ZERO, &mut NoFootpoint),
            DragOutcome::Rejected
        );
        assert_eq!(graph.marker(a).map(|m| m.position), Some(DVec3::ONE));
    }

    #[test]
    fn test_drag_propagates_deletion() {
        let mut graph = ConstraintGraph::new();
        let a = graph.add_marker(DVec3::ZERO, Vec::new());
        let b = graph.add_marker(DVec3::X, Vec::new());
        let poly = graph.add_connector(ConnectorKind::Polygon, vec![a, b]);
        graph.mark_deleted(b);
        match graph.drag(a, DVec3::Y, &mut PassThrough) {
            DragOutcome::Moved { deleted, .. } => assert_eq!(deleted, vec![poly]),
            DragOutcome::Rejected => panic!("Drag sollte angenommen werden"),
        }
    }

    #[test]
    fn test_detach_support_removes_binding() {
        let mut graph = ConstraintGraph::new();
        let link = crate::core::SubElementLink::new("A", crate::core::SubElementRef::edge(1));
        let a = graph.add_marker(DVec3::ZERO, vec![ProjectionConstraint::OnSupport { link }]);
        assert!(graph.detach_support(a));
        assert!(!graph.detach_support(a));
        assert!(graph.marker(a).is_some_and(|m| m.constraints.is_empty()));
    }
}
