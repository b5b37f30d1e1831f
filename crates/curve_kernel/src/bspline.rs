//! Nicht-rationale B-Spline-Kurve im 3D-Raum.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::basis::find_span;
use crate::bezier::BezierSegment;
use crate::error::{KernelError, KernelResult};
use crate::PARAM_EPSILON;

/// B-Spline-Kurve mit Grad, Polen und Knotenvektor.
///
/// Der Knotenvektor darf ungeklemmt sein (periodische Kurven); der
/// Definitionsbereich ist `[knots[p], knots[n + 1]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveRecord", into = "CurveRecord")]
pub struct BSplineCurve {
    degree: usize,
    poles: Vec<DVec3>,
    knots: Vec<f64>,
    closed: bool,
}

/// Persistenzform; wird beim Laden über `BSplineCurve::new` validiert.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CurveRecord {
    degree: usize,
    poles: Vec<DVec3>,
    knots: Vec<f64>,
    #[serde(default)]
    closed: bool,
}

impl TryFrom<CurveRecord> for BSplineCurve {
    type Error = KernelError;

    fn try_from(record: CurveRecord) -> Result<Self, Self::Error> {
        Ok(Self::new(record.degree, record.poles, record.knots)?.with_closed(record.closed))
    }
}

impl From<BSplineCurve> for CurveRecord {
    fn from(curve: BSplineCurve) -> Self {
        Self {
            degree: curve.degree,
            poles: curve.poles,
            knots: curve.knots,
            closed: curve.closed,
        }
    }
}

impl BSplineCurve {
    /// Erstellt eine Kurve und prüft Grad, Polanzahl und Knotenvektor.
    pub fn new(degree: usize, poles: Vec<DVec3>, knots: Vec<f64>) -> KernelResult<Self> {
        if degree == 0 {
            return Err(KernelError::InvalidKnots("Grad 0 wird nicht unterstützt".into()));
        }
        if poles.len() < degree + 1 {
            return Err(KernelError::InsufficientPoints {
                got: poles.len(),
                required: degree + 1,
            });
        }
        if knots.len() != poles.len() + degree + 1 {
            return Err(KernelError::InvalidKnots(format!(
                "{} Knoten für {} Pole bei Grad {} (erwartet {})",
                knots.len(),
                poles.len(),
                degree,
                poles.len() + degree + 1
            )));
        }
        if knots.windows(2).any(|w| w[1] < w[0] || !w[0].is_finite()) {
            return Err(KernelError::InvalidKnots("Knoten nicht monoton".into()));
        }
        let n = poles.len() - 1;
        if knots[n + 1] - knots[degree] <= PARAM_EPSILON {
            return Err(KernelError::EmptyRange {
                first: knots[degree],
                last: knots[n + 1],
            });
        }
        Ok(Self {
            degree,
            poles,
            knots,
            closed: false,
        })
    }

    /// Gerade Strecke von `a` nach `b`, parametrisiert nach Bogenlänge.
    ///
    /// Fallen beide Punkte zusammen, läuft der Parameter über [0, 1].
    pub fn line(a: DVec3, b: DVec3) -> Self {
        let length = a.distance(b);
        let length = if length > PARAM_EPSILON { length } else { 1.0 };
        Self {
            degree: 1,
            poles: vec![a, b],
            knots: vec![0.0, 0.0, length, length],
            closed: false,
        }
    }

    /// Markiert die Kurve als geschlossen (periodisch).
    pub fn with_closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn poles(&self) -> &[DVec3] {
        &self.poles
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// `true` wenn die Kurve periodisch konstruiert wurde.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Definitionsbereich `(first, last)`.
    pub fn domain(&self) -> (f64, f64) {
        let n = self.poles.len() - 1;
        (self.knots[self.degree], self.knots[n + 1])
    }

    fn clamp_to_domain(&self, u: f64) -> f64 {
        let (a, b) = self.domain();
        u.clamp(a, b)
    }

    fn span(&self, u: f64) -> usize {
        find_span(self.poles.len() - 1, self.degree, u, &self.knots)
    }

    /// Polarform (Blossom) des Spanns `span` an den Argumenten `args`.
    ///
    /// `args.len()` muss dem Grad entsprechen.
    fn blossom(&self, span: usize, args: &[f64]) -> DVec3 {
        let p = self.degree;
        let mut d: Vec<DVec3> = (0..=p).map(|j| self.poles[span - p + j]).collect();
        for r in 1..=p {
            let x = args[r - 1];
            for j in (r..=p).rev() {
                let i = span - p + j;
                let left = self.knots[i];
                let right = self.knots[i + p + 1 - r];
                let denom = right - left;
                let alpha = if denom.abs() < PARAM_EPSILON {
                    0.0
                } else {
                    (x - left) / denom
                };
                d[j] = d[j - 1] * (1.0 - alpha) + d[j] * alpha;
            }
        }
        d[p]
    }

    fn segment_of_span(&self, span: usize, a: f64, b: f64) -> BezierSegment {
        let p = self.degree;
        let poles = (0..=p)
            .map(|i| {
                let mut args = vec![a; p - i];
                args.extend(std::iter::repeat_n(b, i));
                self.blossom(span, &args)
            })
            .collect();
        BezierSegment::new(poles, (a, b))
    }

    /// Punkt am Parameter `u` (außerhalb des Bereichs geklemmt).
    pub fn point_at(&self, u: f64) -> DVec3 {
        let u = self.clamp_to_domain(u);
        let span = self.span(u);
        self.blossom(span, &vec![u; self.degree])
    }

    /// Ableitungen 0..=order am Parameter `u`.
    pub fn derivatives(&self, u: f64, order: usize) -> Vec<DVec3> {
        let u = self.clamp_to_domain(u);
        let span = self.span(u);
        self.segment_of_span(span, self.knots[span], self.knots[span + 1])
            .derivatives(u, order)
    }

    /// Erste Ableitung (nicht normiert).
    pub fn tangent_at(&self, u: f64) -> DVec3 {
        self.derivatives(u, 1)[1]
    }

    /// Gleiche Geometrie in umgekehrter Laufrichtung auf demselben Bereich.
    pub fn reversed(&self) -> Self {
        let (a, b) = self.domain();
        let knots = self.knots.iter().rev().map(|k| a + b - k).collect();
        let mut poles = self.poles.clone();
        poles.reverse();
        Self {
            degree: self.degree,
            poles,
            knots,
            closed: self.closed,
        }
    }

    /// Zerlegt den Bereich `[a, b]` in Bézier-Segmente (ein Segment pro Spann).
    pub fn bezier_segments(&self, a: f64, b: f64) -> Vec<BezierSegment> {
        let a = self.clamp_to_domain(a);
        let b = self.clamp_to_domain(b);
        let n = self.poles.len() - 1;
        let mut segments = Vec::new();
        for span in self.degree..=n {
            let lo = self.knots[span].max(a);
            let hi = self.knots[span + 1].min(b);
            if hi - lo > PARAM_EPSILON {
                segments.push(self.segment_of_span(span, lo, hi));
            }
        }
        segments
    }

    /// Schneidet den Bereich `[a, b]` als eigenständige, geklemmte Kurve aus.
    pub fn trimmed(&self, a: f64, b: f64) -> KernelResult<Self> {
        let (lo, hi) = (self.clamp_to_domain(a), self.clamp_to_domain(b));
        if hi - lo <= PARAM_EPSILON {
            return Err(KernelError::EmptyRange { first: a, last: b });
        }
        Self::from_bezier_segments(&self.bezier_segments(lo, hi))
    }

    /// Baut eine C0-Kurve aus lückenlos aneinandergereihten Bézier-Segmenten.
    ///
    /// Segmente niedrigeren Grades werden auf den höchsten Grad angehoben.
    pub fn from_bezier_segments(segments: &[BezierSegment]) -> KernelResult<Self> {
        let degree = segments
            .iter()
            .map(BezierSegment::degree)
            .max()
            .ok_or(KernelError::InsufficientPoints { got: 0, required: 1 })?;

        let mut poles = Vec::new();
        let mut knots = Vec::new();
        for (index, segment) in segments.iter().enumerate() {
            let segment = segment.elevated(degree);
            if index == 0 {
                knots.extend(std::iter::repeat_n(segment.range.0, degree + 1));
                poles.extend_from_slice(&segment.poles);
            } else {
                knots.extend(std::iter::repeat_n(segment.range.0, degree));
                poles.extend_from_slice(&segment.poles[1..]);
            }
        }
        if let Some(last) = segments.last() {
            knots.extend(std::iter::repeat_n(last.range.1, degree + 1));
        }
        Self::new(degree, poles, knots)
    }

    /// Verbindet Kurven in der gegebenen Reihenfolge zu einer Kurve.
    ///
    /// Das Ende jeder Kurve muss innerhalb `tolerance` am Anfang der nächsten
    /// liegen. Die Parameterbereiche werden lückenlos hintereinandergelegt.
    pub fn join(curves: &[BSplineCurve], tolerance: f64) -> KernelResult<Self> {
        let first = curves
            .first()
            .ok_or(KernelError::InsufficientPoints { got: 0, required: 1 })?;

        let mut segments = Vec::new();
        let mut cursor = first.domain().0;
        let mut previous_end: Option<DVec3> = None;
        for curve in curves {
            let (a, b) = curve.domain();
            if let Some(end) = previous_end {
                let gap = end.distance(curve.point_at(a));
                if gap > tolerance {
                    return Err(KernelError::Disconnected { gap });
                }
            }
            let offset = cursor - a;
            segments.extend(curve.bezier_segments(a, b).into_iter().map(|mut segment| {
                segment.range = (segment.range.0 + offset, segment.range.1 + offset);
                segment
            }));
            cursor = b + offset;
            previous_end = Some(curve.point_at(b));
        }
        log::debug!("{} Kurven zu {} Segmenten verbunden", curves.len(), segments.len());
        Self::from_bezier_segments(&segments)
    }
}
