//! Bézier-Segmente als Zwischenform für Trimmen, Verbinden und Ableitungen.

use glam::DVec3;

/// Ein Bézier-Segment mit globalem Parameterbereich.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierSegment {
    /// Kontrollpunkte (Grad = Anzahl - 1)
    pub poles: Vec<DVec3>,
    /// Globaler Parameterbereich `(start, end)`
    pub range: (f64, f64),
}

impl BezierSegment {
    /// Erstellt ein Segment aus Polen und Parameterbereich.
    pub fn new(poles: Vec<DVec3>, range: (f64, f64)) -> Self {
        Self { poles, range }
    }

    /// Grad des Segments.
    pub fn degree(&self) -> usize {
        self.poles.len().saturating_sub(1)
    }

    fn local(&self, u: f64) -> f64 {
        let width = self.range.1 - self.range.0;
        if width.abs() < crate::PARAM_EPSILON {
            0.0
        } else {
            (u - self.range.0) / width
        }
    }

    /// Punkt am globalen Parameter `u` (de Casteljau).
    pub fn point_at(&self, u: f64) -> DVec3 {
        de_casteljau(&self.poles, self.local(u))
    }

    /// Ableitungen 0..=order am globalen Parameter `u`.
    ///
    /// Ableitungen oberhalb des Grades sind null.
    pub fn derivatives(&self, u: f64, order: usize) -> Vec<DVec3> {
        let t = self.local(u);
        let width = self.range.1 - self.range.0;
        let inv_width = if width.abs() < crate::PARAM_EPSILON {
            0.0
        } else {
            1.0 / width
        };

        let mut result = Vec::with_capacity(order + 1);
        let mut hodograph = self.poles.clone();
        let mut scale = 1.0;
        for _ in 0..=order {
            if hodograph.is_empty() {
                result.push(DVec3::ZERO);
                continue;
            }
            result.push(de_casteljau(&hodograph, t) * scale);
            // Nächste Hodographe: (p - k) * Differenzen
            let degree = hodograph.len() - 1;
            hodograph = hodograph
                .windows(2)
                .map(|w| (w[1] - w[0]) * degree as f64)
                .collect();
            scale *= inv_width;
        }
        result
    }

    /// Hebt den Grad schrittweise bis `target` an.
    pub fn elevated(&self, target: usize) -> Self {
        let mut poles = self.poles.clone();
        while poles.len() - 1 < target {
            let p = poles.len() - 1;
            let mut next = Vec::with_capacity(p + 2);
            next.push(poles[0]);
            for i in 1..=p {
                let alpha = i as f64 / (p + 1) as f64;
                next.push(poles[i - 1] * alpha + poles[i] * (1.0 - alpha));
            }
            next.push(poles[p]);
            poles = next;
        }
        Self {
            poles,
            range: self.range,
        }
    }

    /// Gleiche Geometrie in umgekehrter Laufrichtung auf demselben Bereich.
    pub fn reversed(&self) -> Self {
        let mut poles = self.poles.clone();
        poles.reverse();
        Self {
            poles,
            range: self.range,
        }
    }
}

/// De-Casteljau-Auswertung bei lokalem Parameter `t` in [0, 1].
pub(crate) fn de_casteljau(poles: &[DVec3], t: f64) -> DVec3 {
    let mut work = poles.to_vec();
    let n = work.len();
    for r in 1..n {
        for i in 0..(n - r) {
            work[i] = work[i].lerp(work[i + 1], t);
        }
    }
    work.first().copied().unwrap_or(DVec3::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cubic() -> BezierSegment {
        BezierSegment::new(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 2.0, 0.0),
                DVec3::new(3.0, 2.0, 0.0),
                DVec3::new(4.0, 0.0, 0.0),
            ],
            (2.0, 4.0),
        )
    }

    #[test]
    fn test_endpoint_derivative_matches_control_leg() {
        let seg = cubic();
        let ders = seg.derivatives(2.0, 2);
        // C'(0) = 3 (P1 - P0) / Breite
        let expected = (DVec3::new(1.0, 2.0, 0.0) * 3.0) / 2.0;
        assert_relative_eq!(ders[1].x, expected.x, epsilon = 1e-12);
        assert_relative_eq!(ders[1].y, expected.y, epsilon = 1e-12);
    }

    #[test]
    fn test_derivative_above_degree_is_zero() {
        let ders = cubic().derivatives(3.0, 5);
        assert_eq!(ders.len(), 6);
        assert_eq!(ders[4], DVec3::ZERO);
        assert_eq!(ders[5], DVec3::ZERO);
    }

    #[test]
    fn test_elevation_keeps_geometry() {
        let seg = cubic();
        let high = seg.elevated(6);
        assert_eq!(high.degree(), 6);
        for i in 0..=10 {
            let u = 2.0 + i as f64 * 0.2;
            let a = seg.point_at(u);
            let b = high.point_at(u);
            assert!(a.distance(b) < 1e-12, "Abweichung bei u={u}");
        }
    }
}
