//! Spatial-Index (KD-Tree) über den Markern einer Edit-Session.

use glam::DVec3;
use kiddo::{KdTree, SquaredEuclidean};

use super::graph::{ConstraintGraph, MarkerId};

/// Read-only Index über allen nicht gelöschten Markern.
#[derive(Debug, Clone)]
pub struct MarkerIndex {
    tree: KdTree<f64, 3>,
    marker_ids: Vec<MarkerId>,
}

impl MarkerIndex {
    /// Baut den Index aus dem aktuellen Graph-Zustand.
    pub fn from_graph(graph: &ConstraintGraph) -> Self {
        let (marker_ids, entries): (Vec<MarkerId>, Vec<[f64; 3]>) = graph
            .markers()
            .filter(|(_, m)| !m.deleted)
            .map(|(id, m)| (id, m.position.to_array()))
            .unzip();
        let tree: KdTree<f64, 3> = (&entries).into();
        Self { tree, marker_ids }
    }

    pub fn len(&self) -> usize {
        self.marker_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marker_ids.is_empty()
    }

    /// Nächster Marker innerhalb `radius`.
    pub fn nearest(&self, query: DVec3, radius: f64) -> Option<(MarkerId, f64)> {
        if self.is_empty() {
            return None;
        }
        let result = self
            .tree
            .nearest_one::<SquaredEuclidean>(&query.to_array());
        let distance = result.distance.sqrt();
        if distance > radius {
            return None;
        }
        let id = *self.marker_ids.get(result.item as usize)?;
        Some((id, distance))
    }
}
