//! Banded storage of a tridiagonal matrix and the Thomas algorithm.
//!
//! The Crank-Nicolson system matrices are tridiagonal (also after the Dirichlet
//! rows are overwritten), so each time step costs O(n) instead of a dense O(n³) solve.

use crate::solver_error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};

/// `lower[i]` is the entry at (i, i-1) (`lower[0]` unused), `upper[i]` at (i, i+1)
/// (`upper[n-1]` unused).
#[derive(Debug, Clone, PartialEq)]
pub struct Tridiagonal {
    pub lower: Vec<f64>,
    pub diag: Vec<f64>,
    pub upper: Vec<f64>,
}

impl Tridiagonal {
    pub fn len(&self) -> usize {
        self.diag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diag.is_empty()
    }

    /// Extracts the three central bands of a square matrix.
    /// Entries outside the band are ignored.
    pub fn from_dense(matrix: &DMatrix<f64>) -> SolverResult<Self> {
        if !matrix.is_square() {
            return Err(SolverError::domain(format!(
                "tridiagonal extraction needs a square matrix, got {:?}",
                matrix.shape()
            )));
        }
        let n = matrix.nrows();
        let mut lower = vec![0.0; n];
        let mut diag = vec![0.0; n];
        let mut upper = vec![0.0; n];
        for i in 0..n {
            diag[i] = matrix[(i, i)];
            if i > 0 {
                lower[i] = matrix[(i, i - 1)];
            }
            if i + 1 < n {
                upper[i] = matrix[(i, i + 1)];
            }
        }
        Ok(Self { lower, diag, upper })
    }

    /// y = M·v
    pub fn mul_vec(&self, v: &DVector<f64>) -> DVector<f64> {
        let n = self.len();
        DVector::from_fn(n, |i, _| {
            let mut acc = self.diag[i] * v[i];
            if i > 0 {
                acc += self.lower[i] * v[i - 1];
            }
            if i + 1 < n {
                acc += self.upper[i] * v[i + 1];
            }
            acc
        })
    }

    /// Solves M·x = d with the Thomas algorithm (no pivoting).
    pub fn solve(&self, d: &DVector<f64>) -> SolverResult<DVector<f64>> {
        let n = self.len();
        if d.len() != n {
            return Err(SolverError::domain(format!(
                "right-hand side has length {}, system has {}",
                d.len(),
                n
            )));
        }
        if n == 0 {
            return Ok(DVector::zeros(0));
        }
        let mut c_prime = vec![0.0; n];
        let mut d_prime = vec![0.0; n];

        let pivot = self.diag[0];
        if pivot == 0.0 {
            return Err(SolverError::domain("zero pivot in tridiagonal solve at row 0"));
        }
        c_prime[0] = self.upper[0] / pivot;
        d_prime[0] = d[0] / pivot;
        for i in 1..n {
            let pivot = self.diag[i] - self.lower[i] * c_prime[i - 1];
            if pivot == 0.0 || !pivot.is_finite() {
                return Err(SolverError::domain(format!(
                    "zero pivot in tridiagonal solve at row {}",
                    i
                )));
            }
            c_prime[i] = if i + 1 < n { self.upper[i] / pivot } else { 0.0 };
            d_prime[i] = (d[i] - self.lower[i] * d_prime[i - 1]) / pivot;
        }

        let mut x = DVector::zeros(n);
        x[n - 1] = d_prime[n - 1];
        for i in (0..n - 1).rev() {
            x[i] = d_prime[i] - c_prime[i] * x[i + 1];
        }
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_matrix() -> DMatrix<f64> {
        DMatrix::from_row_slice(
            4,
            4,
            &[
                4.0, -1.0, 0.0, 0.0, //
                -1.0, 4.0, -1.0, 0.0, //
                0.0, -1.0, 4.0, -1.0, //
                0.0, 0.0, -1.0, 4.0,
            ],
        )
    }

    #[test]
    fn test_from_dense_bands() {
        let band = Tridiagonal::from_dense(&sample_matrix()).unwrap();
        assert_eq!(band.diag, vec![4.0; 4]);
        assert_eq!(band.lower[1..], [-1.0, -1.0, -1.0]);
        assert_eq!(band.upper[..3], [-1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_mul_vec_matches_dense() {
        let dense = sample_matrix();
        let band = Tridiagonal::from_dense(&dense).unwrap();
        let v = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        let expected = &dense * &v;
        let got = band.mul_vec(&v);
        for i in 0..4 {
            assert_relative_eq!(got[i], expected[i], epsilon = 1e-14);
        }
    }

    #[test]
    fn test_solve_matches_lu() {
        let dense = sample_matrix();
        let band = Tridiagonal::from_dense(&dense).unwrap();
        let d = DVector::from_vec(vec![5.0, -2.0, 0.5, 7.0]);
        let thomas = band.solve(&d).unwrap();
        let lu = dense.lu().solve(&d).unwrap();
        for i in 0..4 {
            assert_relative_eq!(thomas[i], lu[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_solve_rejects_zero_pivot() {
        let band = Tridiagonal {
            lower: vec![0.0, 1.0],
            diag: vec![0.0, 1.0],
            upper: vec![1.0, 0.0],
        };
        let d = DVector::from_vec(vec![1.0, 1.0]);
        assert!(matches!(band.solve(&d), Err(SolverError::DomainError(_))));
    }

    #[test]
    fn test_non_square_rejected() {
        let m = DMatrix::<f64>::zeros(2, 3);
        assert!(Tridiagonal::from_dense(&m).is_err());
    }
}
