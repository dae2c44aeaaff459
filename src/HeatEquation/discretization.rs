use super::stability::{calculate_ratio, validate_stability};
use crate::Utils::grid::linspace;
use crate::solver_error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Discretization of the rod problem: domain, time span, grid sizes and diffusivity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatProblem {
    pub length: f64,
    pub time: f64,
    pub nx: usize,
    pub nt: usize,
    pub alpha: f64,
}

impl HeatProblem {
    pub fn new(length: f64, time: f64, nx: usize, nt: usize, alpha: f64) -> Self {
        Self {
            length,
            time,
            nx,
            nt,
            alpha,
        }
    }

    /// r = alpha * dt / dx^2
    pub fn ratio(&self) -> SolverResult<f64> {
        calculate_ratio(self.length, self.time, self.nx, self.nt, self.alpha)
    }

    /// Fails with `UnstableConfiguration` if r >= 0.5, returns r otherwise.
    pub fn validate(&self) -> SolverResult<f64> {
        validate_stability(self.length, self.time, self.nx, self.nt, self.alpha)
    }

    pub fn dx(&self) -> f64 {
        self.length / (self.nx as f64 - 1.0)
    }

    pub fn dt(&self) -> f64 {
        self.time / (self.nt as f64 - 1.0)
    }

    /// Spatial grid, `nx` points over [0, length]
    pub fn grid(&self) -> Vec<f64> {
        linspace(0.0, self.length, self.nx)
    }

    /// Time axis, `nt` samples over [0, time]
    pub fn time_axis(&self) -> Vec<f64> {
        linspace(0.0, self.time, self.nt)
    }
}

/// Space-time temperature field produced by the heat solvers.
///
/// `w` has `nx` rows and `nt` columns: `w[(i, k)]` is the temperature at `x[i]`, `t[k]`.
#[derive(Debug, Clone)]
pub struct HeatSolution {
    pub x: Vec<f64>,
    pub t: Vec<f64>,
    pub w: DMatrix<f64>,
}

impl HeatSolution {
    pub fn nx(&self) -> usize {
        self.w.nrows()
    }

    pub fn nt(&self) -> usize {
        self.w.ncols()
    }

    /// Temperature profile at the time sample closest to `time`.
    pub fn profile_at_time(&self, time: f64) -> SolverResult<DVector<f64>> {
        let index = self.nearest_time_index(time)?;
        Ok(self.w.column(index).into_owned())
    }

    pub fn nearest_time_index(&self, time: f64) -> SolverResult<usize> {
        if !time.is_finite() {
            return Err(SolverError::domain(format!("time {} is not finite", time)));
        }
        self.t
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (*a - time).abs().total_cmp(&(*b - time).abs()))
            .map(|(i, _)| i)
            .ok_or_else(|| SolverError::domain("solution has an empty time axis"))
    }

    /// Largest |self - other| over the whole field.
    pub fn max_abs_difference(&self, other: &HeatSolution) -> SolverResult<f64> {
        if self.w.shape() != other.w.shape() {
            return Err(SolverError::domain(format!(
                "cannot compare fields of shape {:?} and {:?}",
                self.w.shape(),
                other.w.shape()
            )));
        }
        Ok((&self.w - &other.w).amax())
    }

    /// Largest |self - other| over the profile nearest to `time`.
    pub fn max_abs_difference_at(&self, other: &HeatSolution, time: f64) -> SolverResult<f64> {
        let a = self.profile_at_time(time)?;
        let b = other.profile_at_time(time)?;
        if a.len() != b.len() {
            return Err(SolverError::domain(format!(
                "cannot compare profiles of length {} and {}",
                a.len(),
                b.len()
            )));
        }
        Ok((a - b).amax())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_problem_spacing() {
        let problem = HeatProblem::new(1.0, 2.0, 11, 5, 0.01);
        assert_relative_eq!(problem.dx(), 0.1, epsilon = 1e-15);
        assert_relative_eq!(problem.dt(), 0.5, epsilon = 1e-15);
        assert_eq!(problem.grid().len(), 11);
        assert_eq!(problem.time_axis(), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_profile_at_time_picks_nearest_column() {
        let w = DMatrix::from_fn(3, 3, |i, k| (i * 10 + k) as f64);
        let solution = HeatSolution {
            x: vec![0.0, 0.5, 1.0],
            t: vec![0.0, 1.0, 2.0],
            w,
        };
        let profile = solution.profile_at_time(1.2).unwrap();
        assert_eq!(profile.as_slice(), &[1.0, 11.0, 21.0]);
        assert!(solution.profile_at_time(f64::NAN).is_err());
    }

    #[test]
    fn test_max_abs_difference_shape_mismatch() {
        let a = HeatSolution {
            x: vec![0.0, 1.0],
            t: vec![0.0],
            w: DMatrix::zeros(2, 1),
        };
        let b = HeatSolution {
            x: vec![0.0, 0.5, 1.0],
            t: vec![0.0],
            w: DMatrix::zeros(3, 1),
        };
        assert!(matches!(
            a.max_abs_difference(&b),
            Err(SolverError::DomainError(_))
        ));
    }
}
