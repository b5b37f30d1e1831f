//! Kurvenkonstruktion: Blend-Modus und Interpolations-Modus.
//!
//! Reine Funktionen von Parametern auf Kurven; die Mathematik selbst liegt
//! im `curve_kernel`. Der Engine löst Eingangskanten über den
//! `GeometryResolver` auf und formt das Ergebnis je nach Ausgabemodus.

use curve_kernel::{blend_curve, BSplineCurve, BlendEnd, KernelError};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::features::{FeatureError, FeatureResult};
use crate::core::{denormalize, CurveReference, Edge, GeometryResolver, Shape};
use crate::shared::EditorOptions;

/// Ausgabeform einer Blend-Kurve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputMode {
    /// Eingangskanten-Teilstücke und Blend als drei Kanten
    #[default]
    Wire,
    /// Teilstücke und Blend zu einer Kurve verbunden
    Joined,
    /// Nur die Blend-Kurve
    Single,
}

impl OutputMode {
    /// `true` wenn die Ausgabe die Eingangskanten enthält (Eingänge ausblenden).
    pub fn subsumes_inputs(self) -> bool {
        !matches!(self, OutputMode::Single)
    }
}

/// Eine Seite der Blend-Anfrage.
#[derive(Debug, Clone, PartialEq)]
pub struct BlendSide {
    /// Kante plus normierter Parameter
    pub reference: CurveReference,
    /// Anschlussordnung 0..=4
    pub continuity: usize,
    /// Vorzeichenbehaftete Tangentenskalierung (≠ 0)
    pub scale: f64,
}

/// Vollständige Eingabe des Blend-Modus.
#[derive(Debug, Clone, PartialEq)]
pub struct BlendRequest {
    pub start: BlendSide,
    pub end: BlendSide,
    pub max_degree: usize,
}

/// Ergebnis des Blend-Modus.
#[derive(Debug, Clone)]
pub struct BlendConstruction {
    pub curve: BSplineCurve,
    /// Teilstück von Kante 1, das im Blend-Start endet
    pub edge1_part: Option<BSplineCurve>,
    /// Teilstück von Kante 2, das im Blend-Ende beginnt
    pub edge2_part: Option<BSplineCurve>,
}

impl BlendConstruction {
    /// Kontrollpolygon der Blend-Kurve.
    pub fn poles(&self) -> Vec<DVec3> {
        self.curve.poles().to_vec()
    }

    fn chain(&self) -> Vec<BSplineCurve> {
        self.edge1_part
            .iter()
            .chain(std::iter::once(&self.curve))
            .chain(self.edge2_part.iter())
            .cloned()
            .collect()
    }
}

/// Konstruiert Blend- und Profilkurven.
#[derive(Debug, Clone)]
pub struct CurveConstructionEngine {
    join_tolerance: f64,
}

impl Default for CurveConstructionEngine {
    fn default() -> Self {
        Self::new(&EditorOptions::default())
    }
}

impl CurveConstructionEngine {
    pub fn new(options: &EditorOptions) -> Self {
        Self {
            join_tolerance: options.join_tolerance,
        }
    }

    /// Blend-Modus: löst beide Kanten auf und baut die Blend-Kurve.
    pub fn blend(
        &self,
        resolver: &GeometryResolver<'_>,
        request: &BlendRequest,
    ) -> FeatureResult<BlendConstruction> {
        let edge1 = resolver.resolve_edge(&request.start.reference.link)?;
        let edge2 = resolver.resolve_edge(&request.end.reference.link)?;
        let t1 = denormalize(edge1, request.start.reference.parameter.unwrap_or(0.0));
        let t2 = denormalize(edge2, request.end.reference.parameter.unwrap_or(0.0));

        let curve = blend_curve(
            BlendEnd {
                curve: &edge1.curve,
                parameter: t1,
                continuity: request.start.continuity,
                scale: request.start.scale,
            },
            BlendEnd {
                curve: &edge2.curve,
                parameter: t2,
                continuity: request.end.continuity,
                scale: request.end.scale,
            },
            request.max_degree,
        )?;

        // Positive Skalierung verlässt die Kante vorwärts: davor liegt [first, t]
        let edge1_part = if request.start.scale > 0.0 {
            trimmed_part(edge1, edge1.first, t1, false)?
        } else {
            trimmed_part(edge1, t1, edge1.last, true)?
        };
        let edge2_part = if request.end.scale > 0.0 {
            trimmed_part(edge2, edge2.first, t2, true)?
        } else {
            trimmed_part(edge2, t2, edge2.last, false)?
        };

        Ok(BlendConstruction {
            curve,
            edge1_part,
            edge2_part,
        })
    }

    /// Formt das Blend-Ergebnis entsprechend dem Ausgabemodus.
    pub fn blend_shape(
        &self,
        construction: &BlendConstruction,
        mode: OutputMode,
    ) -> FeatureResult<Shape> {
        Ok(match mode {
            OutputMode::Single => Shape::from_edge(Edge::from_curve(construction.curve.clone())),
            OutputMode::Wire => Shape::from_edges(
                construction
                    .chain()
                    .into_iter()
                    .map(Edge::from_curve)
                    .collect(),
            ),
            OutputMode::Joined => {
                let joined = BSplineCurve::join(&construction.chain(), self.join_tolerance)?;
                Shape::from_edge(Edge::from_curve(joined))
            }
        })
    }

    /// Interpolations-Modus: Kurve durch alle Punkte innerhalb `tolerance`.
    pub fn interpolate(
        &self,
        points: &[DVec3],
        periodic: bool,
        tolerance: f64,
    ) -> FeatureResult<BSplineCurve> {
        if points.len() < 2 {
            return Err(FeatureError::InsufficientPoints { got: points.len() });
        }
        Ok(curve_kernel::interpolate(points, periodic, tolerance)?)
    }
}

/// Teilstück `[a, b]` einer Kante, optional umgedreht.
///
/// Ein leerer Bereich ergibt `None`; andere Kernel-Fehler werden weitergereicht.
fn trimmed_part(
    edge: &Edge,
    a: f64,
    b: f64,
    reverse: bool,
) -> FeatureResult<Option<BSplineCurve>> {
    match edge.curve.trimmed(a, b) {
        Ok(part) => Ok(Some(if reverse { part.reversed() } else { part })),
        Err(KernelError::EmptyRange { .. }) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
