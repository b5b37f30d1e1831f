//! Dichter Gleichungslöser für die Interpolation.

use glam::DVec3;

use crate::error::{KernelError, KernelResult};

const PIVOT_EPSILON: f64 = 1e-14;

/// Löst `A · X = B` mit Gauß-Elimination und Spaltenpivotsuche.
///
/// Die rechte Seite enthält drei Spalten (x, y, z) in Form von `DVec3`.
pub(crate) fn solve(mut matrix: Vec<Vec<f64>>, mut rhs: Vec<DVec3>) -> KernelResult<Vec<DVec3>> {
    let n = rhs.len();
    if matrix.len() != n || matrix.iter().any(|row| row.len() != n) {
        return Err(KernelError::SingularSystem);
    }

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&a, &b| matrix[a][col].abs().total_cmp(&matrix[b][col].abs()))
            .ok_or(KernelError::SingularSystem)?;
        if matrix[pivot_row][col].abs() < PIVOT_EPSILON {
            return Err(KernelError::SingularSystem);
        }
        matrix.swap(col, pivot_row);
        rhs.swap(col, pivot_row);

        let pivot = matrix[col].clone();
        let pivot_rhs = rhs[col];
        for row in (col + 1)..n {
            let factor = matrix[row][col] / pivot[col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                matrix[row][k] -= factor * pivot[k];
            }
            rhs[row] -= pivot_rhs * factor;
        }
    }

    let mut solution = vec![DVec3::ZERO; n];
    for row in (0..n).rev() {
        let mut acc = rhs[row];
        for k in (row + 1)..n {
            acc -= solution[k] * matrix[row][k];
        }
        solution[row] = acc / matrix[row][row];
    }
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solve_needs_pivoting() {
        let matrix = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let rhs = vec![DVec3::new(1.0, 2.0, 3.0), DVec3::new(4.0, 5.0, 6.0)];
        let x = solve(matrix, rhs).expect("System ist regulär");
        assert_relative_eq!(x[0].x, 4.0);
        assert_relative_eq!(x[1].z, 3.0);
    }

    #[test]
    fn test_solve_singular_is_error() {
        let matrix = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        let rhs = vec![DVec3::ONE, DVec3::ONE];
        assert_eq!(solve(matrix, rhs), Err(KernelError::SingularSystem));
    }
}
