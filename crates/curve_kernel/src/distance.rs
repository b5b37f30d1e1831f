//! Minimalabstand-Abfragen: Punkt–Kurve, Segment–Segment, Punkt–Gerade.

use glam::DVec3;

use crate::bspline::BSplineCurve;
use crate::PARAM_EPSILON;

/// Abtastungen pro Knotenspann für den Startwert der Newton-Iteration.
const SAMPLES_PER_SPAN: usize = 8;
const NEWTON_MAX_ITERATIONS: usize = 32;
/// Maximaler Kosinus zwischen Abstandsvektor und Tangente für einen Lotfußpunkt.
const ORTHOGONALITY_TOLERANCE: f64 = 1e-6;
/// Abstand, unterhalb dessen ein Punkt als auf der Kurve liegend gilt.
const ON_CURVE_TOLERANCE: f64 = 1e-9;

/// Ergebnis einer Punkt-Kurve-Abstandsabfrage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footpoint {
    /// Nächster Punkt auf der Kurve
    pub point: DVec3,
    /// Kurvenparameter des nächsten Punkts
    pub parameter: f64,
    /// Abstand zum Abfragepunkt
    pub distance: f64,
    /// `false` wenn das Minimum an einem Bereichsende liegt und kein Lot ist
    pub interior: bool,
}

impl BSplineCurve {
    /// Sucht den nächsten Punkt im Bereich `[first, last]` zum Punkt `query`.
    ///
    /// Abtastung pro Spann, danach Newton-Iteration auf `(C - P) · C' = 0`
    /// mit Klemmung an den Bereichsgrenzen.
    pub fn closest_point(&self, query: DVec3, range: (f64, f64)) -> Footpoint {
        let (domain_lo, domain_hi) = self.domain();
        let first = range.0.clamp(domain_lo, domain_hi);
        let last = range.1.clamp(first, domain_hi);

        let mut best_u = first;
        let mut best_distance = f64::INFINITY;
        let mut probe = |u: f64| {
            let distance = self.point_at(u).distance_squared(query);
            if distance < best_distance {
                best_distance = distance;
                best_u = u;
            }
        };
        for segment in self.bezier_segments(first, last) {
            let (a, b) = segment.range;
            for i in 0..SAMPLES_PER_SPAN {
                probe(a + (b - a) * i as f64 / SAMPLES_PER_SPAN as f64);
            }
        }
        probe(last);

        let mut u = best_u;
        let width = (last - first).max(PARAM_EPSILON);
        for _ in 0..NEWTON_MAX_ITERATIONS {
            let ders = self.derivatives(u, 2);
            let diff = ders[0] - query;
            let f = diff.dot(ders[1]);
            let df = ders[1].length_squared() + diff.dot(ders[2]);
            if df.abs() < PARAM_EPSILON {
                break;
            }
            let next = (u - f / df).clamp(first, last);
            let step = (next - u).abs();
            u = next;
            if step < PARAM_EPSILON * width {
                break;
            }
        }

        let point = self.point_at(u);
        let distance = point.distance(query);
        let at_boundary = (u - first).abs() < PARAM_EPSILON * width.max(1.0)
            || (last - u).abs() < PARAM_EPSILON * width.max(1.0);
        let interior = if !at_boundary || distance < ON_CURVE_TOLERANCE {
            true
        } else {
            let tangent = self.tangent_at(u);
            let tangent_length = tangent.length();
            tangent_length > PARAM_EPSILON
                && ((point - query).dot(tangent) / (distance * tangent_length)).abs()
                    < ORTHOGONALITY_TOLERANCE
        };

        Footpoint {
            point,
            parameter: u,
            distance,
            interior,
        }
    }
}

/// Nächste Punkte zwischen den Strecken `a0–a1` und `b0–b1`.
///
/// Liefert je Strecke den Parameter in (0, 1), falls der nächste Punkt im
/// Inneren liegt, sonst `None`. Parallele Strecken liefern `(None, None)`.
pub fn segment_closest_parameters(
    a0: DVec3,
    a1: DVec3,
    b0: DVec3,
    b1: DVec3,
) -> (Option<f64>, Option<f64>) {
    let d1 = a1 - a0;
    let d2 = b1 - b0;
    let r = a0 - b0;
    let a = d1.length_squared();
    let e = d2.length_squared();
    if a < PARAM_EPSILON || e < PARAM_EPSILON {
        return (None, None);
    }
    let b = d1.dot(d2);
    let c = d1.dot(r);
    let f = d2.dot(r);
    let denom = a * e - b * b;
    if denom <= PARAM_EPSILON * a * e {
        return (None, None);
    }

    let mut s = ((b * f - c * e) / denom).clamp(0.0, 1.0);
    let mut t = (b * s + f) / e;
    if t < 0.0 {
        t = 0.0;
        s = (-c / a).clamp(0.0, 1.0);
    } else if t > 1.0 {
        t = 1.0;
        s = ((b - c) / a).clamp(0.0, 1.0);
    }

    let inner = |v: f64| (v > PARAM_EPSILON && v < 1.0 - PARAM_EPSILON).then_some(v);
    (inner(s), inner(t))
}

/// Projiziert `point` auf die Strecke `origin ± direction * half_length`.
///
/// Gibt den projizierten Punkt und den vorzeichenbehafteten Abstand entlang
/// der normierten Richtung zurück; `None` bei entarteter Richtung.
pub fn project_onto_line(
    point: DVec3,
    origin: DVec3,
    direction: DVec3,
    half_length: f64,
) -> Option<(DVec3, f64)> {
    let unit = direction.try_normalize()?;
    let along = (point - origin).dot(unit).clamp(-half_length, half_length);
    Some((origin + unit * along, along))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_closest_point_on_line_interior() {
        let line = BSplineCurve::line(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0));
        let foot = line.closest_point(DVec3::new(4.0, 3.0, 0.0), line.domain());
        assert!(foot.interior);
        assert_relative_eq!(foot.parameter, 4.0, epsilon = 1e-9);
        assert_relative_eq!(foot.distance, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_closest_point_beyond_end_is_not_interior() {
        let line = BSplineCurve::line(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0));
        let foot = line.closest_point(DVec3::new(12.0, 1.0, 0.0), line.domain());
        assert!(!foot.interior);
        assert_relative_eq!(foot.parameter, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_closest_point_on_endpoint_counts_as_footpoint() {
        let line = BSplineCurve::line(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0));
        let foot = line.closest_point(DVec3::new(10.0, 0.0, 0.0), line.domain());
        assert!(foot.interior);
    }

    #[test]
    fn test_segments_crossing() {
        let (s, t) = segment_closest_parameters(
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(10.0, 0.0, 0.0),
            DVec3::new(5.0, -5.0, 1.0),
            DVec3::new(5.0, 5.0, 1.0),
        );
        assert_relative_eq!(s.unwrap_or(-1.0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(t.unwrap_or(-1.0), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_segments_diverging_touch_only_at_start() {
        let (s, t) = segment_closest_parameters(
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(-10.0, 0.0, 0.0),
            DVec3::new(5.0, 1.0, 0.0),
            DVec3::new(5.0, 10.0, 0.0),
        );
        assert_eq!(s, None);
        assert_eq!(t, None);
    }

    #[test]
    fn test_parallel_segments_have_no_footpoint() {
        let (s, t) = segment_closest_parameters(
            DVec3::ZERO,
            DVec3::X,
            DVec3::Y,
            DVec3::new(1.0, 1.0, 0.0),
        );
        assert_eq!((s, t), (None, None));
    }

    #[test]
    fn test_project_onto_line_clamps_to_half_length() {
        let (p, along) = project_onto_line(DVec3::new(50.0, 2.0, 0.0), DVec3::ZERO, DVec3::X, 10.0)
            .expect("Richtung gültig");
        assert_relative_eq!(along, 10.0);
        assert_relative_eq!(p.x, 10.0);
        assert_eq!(project_onto_line(DVec3::X, DVec3::ZERO, DVec3::ZERO, 1.0), None);
    }
}
