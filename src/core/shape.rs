//! Geometrische Objekte, auf die Features verweisen.
//!
//! Ein `Shape` besitzt nummerierte Vertices, Edges und Faces; Sub-Element-
//! Namen (`Edge1`, …) adressieren diese Listen 1-basiert.

use curve_kernel::{BSplineCurve, Footpoint};
use glam::DVec3;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Kante: Kurve mit genutztem Parameterbereich `[first, last]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub curve: BSplineCurve,
    pub first: f64,
    pub last: f64,
}

impl Edge {
    /// Kante über den gesamten Definitionsbereich der Kurve.
    pub fn from_curve(curve: BSplineCurve) -> Self {
        let (first, last) = curve.domain();
        Self { curve, first, last }
    }

    /// Gerade Kante von `a` nach `b`.
    pub fn line(a: DVec3, b: DVec3) -> Self {
        Self::from_curve(BSplineCurve::line(a, b))
    }

    pub fn point_at(&self, u: f64) -> DVec3 {
        self.curve.point_at(u)
    }

    pub fn tangent_at(&self, u: f64) -> DVec3 {
        self.curve.tangent_at(u)
    }

    pub fn start_point(&self) -> DVec3 {
        self.point_at(self.first)
    }

    pub fn end_point(&self) -> DVec3 {
        self.point_at(self.last)
    }

    pub fn closest_point(&self, query: DVec3) -> Footpoint {
        self.curve.closest_point(query, (self.first, self.last))
    }
}

/// Ebenes, rechteckig begrenztes Flächenstück.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub origin: DVec3,
    /// Richtung der ersten Kante (wird normiert verwendet)
    pub u_axis: DVec3,
    /// Richtung der zweiten Kante (wird normiert verwendet)
    pub v_axis: DVec3,
    pub width: f64,
    pub height: f64,
}

impl Face {
    /// Nächster Punkt auf dem Flächenstück (Projektion mit Randklemmung).
    pub fn closest_point(&self, query: DVec3) -> DVec3 {
        let u_axis = self.u_axis.normalize_or_zero();
        let v_axis = self.v_axis.normalize_or_zero();
        let rel = query - self.origin;
        let u = rel.dot(u_axis).clamp(0.0, self.width);
        let v = rel.dot(v_axis).clamp(0.0, self.height);
        self.origin + u_axis * u + v_axis * v
    }
}

/// Geometrie eines Objekts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(default)]
    pub vertices: Vec<DVec3>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub faces: Vec<Face>,
}

impl Shape {
    /// Shape aus Kanten; Vertices sind die Kantenenden ohne Duplikate.
    pub fn from_edges(edges: Vec<Edge>) -> Self {
        let mut vertices: Vec<DVec3> = Vec::new();
        for edge in &edges {
            for p in [edge.start_point(), edge.end_point()] {
                if !vertices.iter().any(|v| v.distance(p) < 1e-9) {
                    vertices.push(p);
                }
            }
        }
        Self {
            vertices,
            edges,
            faces: Vec::new(),
        }
    }

    pub fn from_edge(edge: Edge) -> Self {
        Self::from_edges(vec![edge])
    }

    pub fn from_face(face: Face) -> Self {
        Self {
            faces: vec![face],
            ..Self::default()
        }
    }

    /// Alle Kurven in Reihenfolge (für Ausgabe und Vergleich).
    pub fn curves(&self) -> impl Iterator<Item = &BSplineCurve> {
        self.edges.iter().map(|e| &e.curve)
    }
}

/// Benannte Objekte des Dokuments in Einfügereihenfolge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeStore {
    objects: IndexMap<String, Shape>,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fügt ein Objekt ein oder ersetzt es.
    pub fn insert(&mut self, name: impl Into<String>, shape: Shape) {
        self.objects.insert(name.into(), shape);
    }

    pub fn get(&self, name: &str) -> Option<&Shape> {
        self.objects.get(name)
    }

    /// Entfernt ein Objekt unter Erhalt der Reihenfolge der übrigen.
    pub fn remove(&mut self, name: &str) -> Option<Shape> {
        self.objects.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
