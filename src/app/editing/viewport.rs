//! Schnittstelle zur Szene: Overlay-Knoten, Sichtbarkeit, Selektierbarkeit.

use glam::DVec3;
use indexmap::{IndexMap, IndexSet};

/// Handle eines Overlay-Knotens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneHandle(pub u64);

/// Darstellbares Overlay-Element.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Marker { position: DVec3 },
    Line { vertices: Vec<DVec3> },
    Polygon { vertices: Vec<DVec3> },
    /// Vorschau einer berechneten Kurve
    Curve { points: Vec<DVec3> },
    /// Kontrollpolygon eines Features
    ControlPolygon { points: Vec<DVec3> },
}

/// Vom Host bereitgestellte Szene.
pub trait Viewport {
    fn add_node(&mut self, node: SceneNode) -> SceneHandle;
    /// `false` wenn das Handle unbekannt ist.
    fn update_node(&mut self, handle: SceneHandle, node: SceneNode) -> bool;
    fn remove_node(&mut self, handle: SceneHandle) -> bool;
    fn node(&self, handle: SceneHandle) -> Option<&SceneNode>;
    fn node_count(&self) -> usize;

    /// Blendet ein Objekt des Dokuments ein oder aus.
    fn set_visibility(&mut self, object: &str, visible: bool);
    fn is_visible(&self, object: &str) -> bool;
    /// Sperrt oder erlaubt die Auswahl eines Objekts.
    fn set_selectable(&mut self, object: &str, selectable: bool);
    fn is_selectable(&self, object: &str) -> bool;
}

/// Headless-Szene: merkt sich Knoten und Objektzustände.
#[derive(Debug, Default)]
pub struct SceneRecorder {
    nodes: IndexMap<SceneHandle, SceneNode>,
    hidden: IndexSet<String>,
    locked: IndexSet<String>,
    next_handle: u64,
}

impl SceneRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alle lebenden Knoten in Einfügereihenfolge.
    pub fn nodes(&self) -> impl Iterator<Item = (&SceneHandle, &SceneNode)> {
        self.nodes.iter()
    }
}

impl Viewport for SceneRecorder {
    fn add_node(&mut self, node: SceneNode) -> SceneHandle {
        let handle = SceneHandle(self.next_handle);
        self.next_handle += 1;
        self.nodes.insert(handle, node);
        handle
    }

    fn update_node(&mut self, handle: SceneHandle, node: SceneNode) -> bool {
        match self.nodes.get_mut(&handle) {
            Some(slot) => {
                *slot = node;
                true
            }
            None => false,
        }
    }

    fn remove_node(&mut self, handle: SceneHandle) -> bool {
        self.nodes.shift_remove(&handle).is_some()
    }

    fn node(&self, handle: SceneHandle) -> Option<&SceneNode> {
        self.nodes.get(&handle)
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn set_visibility(&mut self, object: &str, visible: bool) {
        if visible {
            self.hidden.shift_remove(object);
        } else {
            self.hidden.insert(object.to_string());
        }
    }

    fn is_visible(&self, object: &str) -> bool {
        !self.hidden.contains(object)
    }

    fn set_selectable(&mut self, object: &str, selectable: bool) {
        if selectable {
            self.locked.shift_remove(object);
        } else {
            self.locked.insert(object.to_string());
        }
    }

    fn is_selectable(&self, object: &str) -> bool {
        !self.locked.contains(object)
    }
}

/// Abtastpunkte aller Kanten eines Shapes für die Vorschau.
pub fn preview_points(shape: &crate::core::Shape, samples_per_edge: usize) -> Vec<DVec3> {
    let samples = samples_per_edge.max(2);
    let mut points = Vec::with_capacity(shape.edges.len() * samples);
    for edge in &shape.edges {
        let width = edge.last - edge.first;
        points.extend(
            (0..samples).map(|i| edge.point_at(edge.first + width * i as f64 / (samples - 1) as f64)),
        );
    }
    points
}
