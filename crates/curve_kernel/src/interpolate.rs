//! Globale Kurveninterpolation durch eine Punktfolge.

use glam::DVec3;

use crate::basis::{basis_funs, find_span};
use crate::bspline::BSplineCurve;
use crate::error::{KernelError, KernelResult};
use crate::linalg::solve;

/// Maximaler Interpolationsgrad.
const MAX_DEGREE: usize = 3;

/// Interpoliert eine Kurve, die alle `points` innerhalb `tolerance` trifft.
///
/// Offen: Grad `min(3, n - 1)`, Sehnenlängen-Parameter, gemittelte Knoten.
/// Periodisch: gleichmäßige periodische Kubik; ein abschließender Punkt, der
/// mit dem ersten zusammenfällt, wird verworfen. Benötigt dann mindestens
/// drei verschiedene Punkte.
pub fn interpolate(points: &[DVec3], periodic: bool, tolerance: f64) -> KernelResult<BSplineCurve> {
    if points.len() < 2 {
        return Err(KernelError::InsufficientPoints {
            got: points.len(),
            required: 2,
        });
    }
    for index in 1..points.len() {
        if points[index].distance(points[index - 1]) <= tolerance {
            return Err(KernelError::CoincidentPoints(index));
        }
    }

    let (curve, params) = if periodic {
        interpolate_periodic(points, tolerance)?
    } else {
        interpolate_open(points)?
    };

    for (index, (point, u)) in points.iter().zip(&params).enumerate() {
        let deviation = curve.point_at(*u).distance(*point);
        if deviation > tolerance {
            return Err(KernelError::ToleranceExceeded { index, deviation });
        }
    }
    Ok(curve)
}

/// Sehnenlängen-Parametrisierung auf [0, 1].
fn chord_length_params(points: &[DVec3]) -> Vec<f64> {
    let mut params = Vec::with_capacity(points.len());
    params.push(0.0);
    let mut acc = 0.0;
    for w in points.windows(2) {
        acc += w[0].distance(w[1]);
        params.push(acc);
    }
    params.iter().map(|u| u / acc).collect()
}

fn interpolate_open(points: &[DVec3]) -> KernelResult<(BSplineCurve, Vec<f64>)> {
    let n = points.len() - 1;
    let p = MAX_DEGREE.min(n);
    let params = chord_length_params(points);

    // Knotenmittelung (NURBS Book, Gl. 9.8)
    let mut knots = vec![0.0; p + 1];
    for j in 1..=(n - p) {
        let avg = params[j..j + p].iter().sum::<f64>() / p as f64;
        knots.push(avg);
    }
    knots.extend(std::iter::repeat_n(1.0, p + 1));

    let mut matrix = vec![vec![0.0; n + 1]; n + 1];
    for (row, &u) in params.iter().enumerate() {
        let span = find_span(n, p, u, &knots);
        for (j, value) in basis_funs(span, u, p, &knots).into_iter().enumerate() {
            matrix[row][span - p + j] = value;
        }
    }
    let poles = solve(matrix, points.to_vec())?;
    Ok((BSplineCurve::new(p, poles, knots)?, params))
}

fn interpolate_periodic(
    points: &[DVec3],
    tolerance: f64,
) -> KernelResult<(BSplineCurve, Vec<f64>)> {
    let mut data = points.to_vec();
    if let (Some(first), Some(last)) = (data.first(), data.last()) {
        if data.len() > 1 && first.distance(*last) <= tolerance {
            data.pop();
        }
    }
    let count = data.len();
    if count < 3 {
        return Err(KernelError::InsufficientPoints {
            got: count,
            required: 3,
        });
    }

    let p = MAX_DEGREE;
    let pole_count = count + p;
    let knots: Vec<f64> = (0..=(pole_count + p))
        .map(|j| (j as f64 - p as f64) / count as f64)
        .collect();
    let params: Vec<f64> = (0..count).map(|i| i as f64 / count as f64).collect();

    // Zyklisches System: die letzten p Pole wiederholen die ersten p
    let mut matrix = vec![vec![0.0; count]; count];
    for (row, &u) in params.iter().enumerate() {
        let span = find_span(pole_count - 1, p, u, &knots);
        for (j, value) in basis_funs(span, u, p, &knots).into_iter().enumerate() {
            matrix[row][(span - p + j) % count] += value;
        }
    }
    let mut poles = solve(matrix, data.clone())?;
    let wrapped: Vec<DVec3> = poles[..p].to_vec();
    poles.extend(wrapped);

    let curve = BSplineCurve::new(p, poles, knots)?.with_closed(true);

    // Geprüft werden alle Originalpunkte, ein Schlusspunkt liegt bei u = 1
    let mut all_params = params;
    if points.len() > count {
        all_params.push(1.0);
    }
    Ok((curve, all_params))
}
