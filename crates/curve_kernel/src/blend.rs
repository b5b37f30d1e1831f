//! Blend-Kurve zwischen zwei Kurvenstellen mit vorgegebener Anschlussordnung.

use glam::DVec3;

use crate::bspline::BSplineCurve;
use crate::error::{KernelError, KernelResult};
use crate::PARAM_EPSILON;

/// Ein Ende der Blend-Kurve: Eingangskurve, Rohparameter, Ordnung, Skalierung.
#[derive(Debug, Clone, Copy)]
pub struct BlendEnd<'a> {
    pub curve: &'a BSplineCurve,
    /// Parameter im nativen Bereich der Kurve
    pub parameter: f64,
    /// Anschlussordnung 0..=4 (C0, G1, …, G4)
    pub continuity: usize,
    /// Vorzeichenbehaftete Tangentenskalierung, bezogen auf die Sehnenlänge
    pub scale: f64,
}

/// Konstruiert eine Bézier-Blend-Kurve vom Grad `k1 + k2 + 1` auf [0, 1].
///
/// Pol 0 liegt auf `start`, der letzte Pol auf `end`. Die ersten `k1`
/// Ableitungen am Start entsprechen denen der linear umparametrisierten
/// Startkurve (Geschwindigkeit `scale * Sehne`), am Ende entsprechend in
/// gespiegelter Richtung: positive Skalierung verlässt jede Eingangskurve
/// entlang ihrer Tangente.
pub fn blend_curve(
    start: BlendEnd<'_>,
    end: BlendEnd<'_>,
    max_degree: usize,
) -> KernelResult<BSplineCurve> {
    let degree = start.continuity + end.continuity + 1;
    if degree > max_degree {
        return Err(KernelError::ContinuityExceedsDegree {
            required: degree,
            max_degree,
        });
    }

    let d1 = start.curve.derivatives(start.parameter, start.continuity);
    let d2 = end.curve.derivatives(end.parameter, end.continuity);
    let chord = d1[0].distance(d2[0]);

    let factor1 = speed_factor(&d1, start.scale * chord)?;
    let factor2 = -speed_factor(&d2, end.scale * chord)?;

    let start_targets: Vec<DVec3> = d1
        .iter()
        .enumerate()
        .map(|(k, v)| *v * factor1.powi(k as i32))
        .collect();
    let end_targets: Vec<DVec3> = d2
        .iter()
        .enumerate()
        .map(|(k, v)| *v * factor2.powi(k as i32))
        .collect();

    let mut poles = vec![DVec3::ZERO; degree + 1];
    for k in 0..=start.continuity {
        let mut acc = start_targets[k] / falling_factorial(degree, k);
        for i in 0..k {
            acc -= poles[i] * (sign(k - i) * binomial(k, i));
        }
        poles[k] = acc;
    }
    for k in 0..=end.continuity {
        let mut acc = end_targets[k] / falling_factorial(degree, k);
        for i in 0..k {
            acc -= poles[degree - i] * (sign(i) * binomial(k, i));
        }
        poles[degree - k] = acc * sign(k);
    }

    log::debug!(
        "Blend Grad {} (G{}/G{}), Sehne {:.4}",
        degree,
        start.continuity,
        end.continuity,
        chord
    );

    let mut knots = vec![0.0; degree + 1];
    knots.extend(std::iter::repeat_n(1.0, degree + 1));
    BSplineCurve::new(degree, poles, knots)
}

/// Faktor `lambda / |c'|` für die lineare Umparametrisierung.
fn speed_factor(derivatives: &[DVec3], lambda: f64) -> KernelResult<f64> {
    match derivatives.get(1) {
        None => Ok(0.0),
        Some(first) => {
            let speed = first.length();
            if speed < PARAM_EPSILON {
                Err(KernelError::DegenerateTangent)
            } else {
                Ok(lambda / speed)
            }
        }
    }
}

fn sign(power: usize) -> f64 {
    if power % 2 == 0 { 1.0 } else { -1.0 }
}

fn binomial(n: usize, k: usize) -> f64 {
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// `n! / (n - k)!`
fn falling_factorial(n: usize, k: usize) -> f64 {
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64)
}
