//! Auflösung von Sub-Element-Links in konkrete Geometrie.
//!
//! Bietet außerdem die Parameter-Normierung entlang einer Kante, die
//! Projektion von Punkten auf Kanten/Elemente und die Orientierungsheuristik
//! für neue Blend-Kurven.

use curve_kernel::segment_closest_parameters;
use glam::DVec3;
use thiserror::Error;

use super::reference::{SubElementKind, SubElementLink};
use super::shape::{Edge, Face, ShapeStore};

/// Fehler beim Auflösen eines Links.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Objekt '{0}' nicht gefunden")]
    ObjectNotFound(String),

    #[error("'{link}' existiert nicht (Objekt hat {available} Elemente dieser Art)")]
    ElementOutOfRange { link: String, available: usize },

    #[error("'{link}' ist kein {expected:?}")]
    WrongKind {
        link: String,
        expected: SubElementKind,
    },
}

/// Aufgelöstes Sub-Element.
#[derive(Debug, Clone, Copy)]
pub enum ResolvedElement<'a> {
    Vertex(DVec3),
    Edge(&'a Edge),
    Face(&'a Face),
}

/// Ergebnis einer Projektion auf ein Element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Nächster Punkt auf dem Element
    pub point: DVec3,
    /// Roher Kantenparameter; `None` ohne gültigen Lotfußpunkt oder bei Vertex/Face
    pub parameter: Option<f64>,
}

/// Löst Links gegen die Objekte eines Dokuments auf.
#[derive(Debug, Clone, Copy)]
pub struct GeometryResolver<'a> {
    shapes: &'a ShapeStore,
}

impl<'a> GeometryResolver<'a> {
    pub fn new(shapes: &'a ShapeStore) -> Self {
        Self { shapes }
    }

    /// Löst einen Link auf; schlägt fehl, wenn Objekt oder Index fehlen.
    pub fn resolve(&self, link: &SubElementLink) -> Result<ResolvedElement<'a>, ResolveError> {
        let shape = self
            .shapes
            .get(&link.object)
            .ok_or_else(|| ResolveError::ObjectNotFound(link.object.clone()))?;
        let out_of_range = |available: usize| ResolveError::ElementOutOfRange {
            link: link.to_string(),
            available,
        };
        // Namen sind 1-basiert; Index 0 bezeichnet kein Element
        let index = link.element.index.checked_sub(1);
        match link.element.kind {
            SubElementKind::Vertex => index
                .and_then(|i| shape.vertices.get(i))
                .map(|v| ResolvedElement::Vertex(*v))
                .ok_or_else(|| out_of_range(shape.vertices.len())),
            SubElementKind::Edge => index
                .and_then(|i| shape.edges.get(i))
                .map(ResolvedElement::Edge)
                .ok_or_else(|| out_of_range(shape.edges.len())),
            SubElementKind::Face => index
                .and_then(|i| shape.faces.get(i))
                .map(ResolvedElement::Face)
                .ok_or_else(|| out_of_range(shape.faces.len())),
        }
    }

    /// Löst einen Link auf, der eine Kante bezeichnen muss.
    pub fn resolve_edge(&self, link: &SubElementLink) -> Result<&'a Edge, ResolveError> {
        match self.resolve(link)? {
            ResolvedElement::Edge(edge) => Ok(edge),
            _ => Err(ResolveError::WrongKind {
                link: link.to_string(),
                expected: SubElementKind::Edge,
            }),
        }
    }

    /// Projiziert `point` auf das verlinkte Element.
    ///
    /// Vertex: der Vertex selbst. Face: geklemmte Ebenenprojektion.
    /// Edge: nächster Punkt der Kante, Parameter nur bei gültigem Lotfußpunkt.
    pub fn project_onto_element(
        &self,
        link: &SubElementLink,
        point: DVec3,
    ) -> Result<Projection, ResolveError> {
        Ok(match self.resolve(link)? {
            ResolvedElement::Vertex(v) => Projection {
                point: v,
                parameter: None,
            },
            ResolvedElement::Edge(edge) => project(edge, point),
            ResolvedElement::Face(face) => Projection {
                point: face.closest_point(point),
                parameter: None,
            },
        })
    }
}

/// Normiert einen Rohparameter auf [0, 1] bezogen auf `[first, last]`.
pub fn normalize(edge: &Edge, raw: f64) -> f64 {
    let width = edge.last - edge.first;
    if width.abs() < f64::EPSILON {
        return 0.0;
    }
    ((raw - edge.first) / width).clamp(0.0, 1.0)
}

/// Umkehrung von [`normalize`]: `first + t * (last - first)`.
pub fn denormalize(edge: &Edge, t: f64) -> f64 {
    edge.first + t * (edge.last - edge.first)
}

/// Nächster Punkt auf der Kante; `parameter` ist `None`, wenn das Minimum an
/// einem Kantenende liegt und dort kein Lot existiert.
pub fn project(edge: &Edge, point: DVec3) -> Projection {
    let foot = edge.closest_point(point);
    Projection {
        point: foot.point,
        parameter: foot.interior.then_some(foot.parameter),
    }
}

/// Schätzt die Tangentenorientierung zweier Kantenstellen für einen Blend.
///
/// Best-Effort-Heuristik, kein Beweis: An beiden Stellen wird ein langer
/// Strahl in Tangentenrichtung gelegt. Liefert die Abstandsabfrage zwischen
/// beiden Strahlen auf einer Seite einen inneren Fußpunkt, wird diese Seite
/// `+1`; ohne Fußpunkt bleibt sie bei `-1` (umgekehrt).
pub fn orientation_sign(
    a: (&Edge, f64),
    b: (&Edge, f64),
    ray_length: f64,
) -> (f64, f64) {
    let ray = |(edge, u): (&Edge, f64)| {
        let origin = edge.point_at(u);
        let direction = edge.tangent_at(u).normalize_or_zero();
        (origin, origin + direction * ray_length, direction != DVec3::ZERO)
    };
    let (a0, a1, a_valid) = ray(a);
    let (b0, b1, b_valid) = ray(b);
    if !a_valid || !b_valid {
        log::debug!("Orientierung: entartete Tangente, Standard (-1, -1)");
        return (-1.0, -1.0);
    }

    let (sa, sb) = segment_closest_parameters(a0, a1, b0, b1);
    let sign = |found: Option<f64>| if found.is_some() { 1.0 } else { -1.0 };
    (sign(sa), sign(sb))
}
