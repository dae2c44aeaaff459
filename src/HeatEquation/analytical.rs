//! Closed-form reference for the rod with `u(x,0) = sin(πx/L)` and zero ends:
//!
//! ```text
//! w(x, t) = sin(πx/L) · exp(-α (π/L)² t)
//! ```
//!
//! Valid only for this initial/boundary pair. It runs the same stability check as
//! the numerical solver so both are compared on an admissible discretization.

use super::discretization::{HeatProblem, HeatSolution};
use crate::solver_error::SolverResult;
use log::info;
use nalgebra::DMatrix;
use std::f64::consts::PI;

pub fn analytical_temperature(x: f64, t: f64, length: f64, alpha: f64) -> f64 {
    (PI * x / length).sin() * (-alpha * (PI / length).powi(2) * t).exp()
}

#[derive(Debug, Clone, Copy)]
pub struct AnalyticalHeatSolver {
    pub problem: HeatProblem,
}

impl AnalyticalHeatSolver {
    pub fn new(problem: HeatProblem) -> Self {
        Self { problem }
    }

    pub fn solve(&self) -> SolverResult<HeatSolution> {
        let r = self.problem.validate()?;
        let HeatProblem {
            length,
            nx,
            nt,
            alpha,
            ..
        } = self.problem;
        let x = self.problem.grid();
        let t = self.problem.time_axis();

        let mut w = DMatrix::from_fn(nx, nt, |i, k| {
            analytical_temperature(x[i], t[k], length, alpha)
        });
        w.row_mut(0).fill(0.0);
        w.row_mut(nx - 1).fill(0.0);

        info!("analytical solution evaluated: nx={}, nt={}, r={:.4}", nx, nt, r);
        Ok(HeatSolution { x, t, w })
    }
}

pub fn heat_equation_analytical(
    length: f64,
    nx: usize,
    time: f64,
    nt: usize,
    alpha: f64,
) -> SolverResult<HeatSolution> {
    AnalyticalHeatSolver::new(HeatProblem::new(length, time, nx, nt, alpha)).solve()
}
