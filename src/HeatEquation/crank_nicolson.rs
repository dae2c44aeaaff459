//! # Crank-Nicolson solver
//!
//! Stages: validate r -> build grid -> build A, B -> Dirichlet rows -> time loop.
//!
//! ```text
//! A = I - (r/2)·Δ,   B = I + (r/2)·Δ,   Δ = tridiag(1, -2, 1)
//! A·w[:, k] = B·w[:, k-1]
//! ```
//!
//! Rows 0 and n-1 of both matrices are replaced by identity rows and the
//! right-hand side is zeroed at both ends, so `u(0,t) = u(L,t) = 0` holds
//! exactly at every step.

use super::discretization::{HeatProblem, HeatSolution};
use super::tridiagonal::Tridiagonal;
use crate::solver_error::{SolverError, SolverResult};
use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use std::f64::consts::PI;

/// Linear solver used inside the time loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinearSolver {
    /// O(n) per step on the banded system
    #[default]
    Thomas,
    /// nalgebra LU factorisation of the dense A, factorised once
    DenseLu,
}

/// The implicit (`a`) and explicit (`b`) halves of the Crank-Nicolson update.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemMatrices {
    pub a: DMatrix<f64>,
    pub b: DMatrix<f64>,
}

impl SystemMatrices {
    /// Builds A = I - (r/2)Δ and B = I + (r/2)Δ without boundary rows.
    pub fn new(nx: usize, r: f64) -> Self {
        let identity = DMatrix::<f64>::identity(nx, nx);
        let delta = second_difference(nx);
        let a = &identity - &delta * (r / 2.0);
        let b = &identity + &delta * (r / 2.0);
        Self { a, b }
    }

    /// Applies the same Dirichlet transform to both matrices.
    pub fn with_dirichlet_boundaries(mut self) -> Self {
        apply_dirichlet_boundary(&mut self.a);
        apply_dirichlet_boundary(&mut self.b);
        self
    }
}

/// Discrete second difference: -2 on the diagonal, 1 on both neighbours.
pub fn second_difference(nx: usize) -> DMatrix<f64> {
    DMatrix::from_fn(nx, nx, |i, j| {
        if i == j {
            -2.0
        } else if i.abs_diff(j) == 1 {
            1.0
        } else {
            0.0
        }
    })
}

/// Overwrites the first and last rows with identity rows (u = 0 at both ends).
pub fn apply_dirichlet_boundary(matrix: &mut DMatrix<f64>) {
    let n = matrix.nrows();
    if n == 0 {
        return;
    }
    for &row in &[0, n - 1] {
        matrix.row_mut(row).fill(0.0);
        matrix[(row, row)] = 1.0;
    }
}

/// Default initial temperature: sin(πx/L)
pub fn sine_initial_temperature(x: f64, length: f64) -> f64 {
    (PI * x / length).sin()
}

#[derive(Debug, Clone, Copy)]
pub struct CrankNicolsonSolver {
    pub problem: HeatProblem,
    pub linear_solver: LinearSolver,
}

impl CrankNicolsonSolver {
    pub fn new(problem: HeatProblem) -> Self {
        Self {
            problem,
            linear_solver: LinearSolver::default(),
        }
    }

    pub fn with_linear_solver(mut self, linear_solver: LinearSolver) -> Self {
        self.linear_solver = linear_solver;
        self
    }

    /// Runs the full scheme for the initial profile `initial(x, length)`.
    pub fn solve<F>(&self, initial: F) -> SolverResult<HeatSolution>
    where
        F: Fn(f64, f64) -> f64,
    {
        let r = self.problem.validate()?;
        let HeatProblem { length, nx, nt, .. } = self.problem;

        let x = self.problem.grid();
        let t = self.problem.time_axis();
        let mut w = DMatrix::<f64>::zeros(nx, nt);
        for (i, &xi) in x.iter().enumerate() {
            w[(i, 0)] = initial(xi, length);
        }
        w[(0, 0)] = 0.0;
        w[(nx - 1, 0)] = 0.0;

        let matrices = SystemMatrices::new(nx, r).with_dirichlet_boundaries();
        debug!("Crank-Nicolson matrices built: nx={}, r={}", nx, r);

        match self.linear_solver {
            LinearSolver::Thomas => {
                let a = Tridiagonal::from_dense(&matrices.a)?;
                let b = Tridiagonal::from_dense(&matrices.b)?;
                for k in 1..nt {
                    let mut d = b.mul_vec(&w.column(k - 1).into_owned());
                    zero_ends(&mut d);
                    let next = a.solve(&d)?;
                    w.set_column(k, &next);
                }
            }
            LinearSolver::DenseLu => {
                let lu = matrices.a.clone().lu();
                for k in 1..nt {
                    let mut d = &matrices.b * w.column(k - 1);
                    zero_ends(&mut d);
                    let next = lu.solve(&d).ok_or_else(|| {
                        SolverError::domain("Crank-Nicolson system matrix is singular")
                    })?;
                    w.set_column(k, &next);
                }
            }
        }

        info!(
            "Crank-Nicolson solve finished: nx={}, nt={}, r={:.4}, solver={:?}",
            nx, nt, r, self.linear_solver
        );
        Ok(HeatSolution { x, t, w })
    }
}

fn zero_ends(d: &mut DVector<f64>) {
    let n = d.len();
    if n > 0 {
        d[0] = 0.0;
        d[n - 1] = 0.0;
    }
}

/// Solves the rod problem with the Crank-Nicolson scheme and the Thomas solver.
pub fn heat_equation_cn<F>(
    length: f64,
    nx: usize,
    time: f64,
    nt: usize,
    alpha: f64,
    initial: F,
) -> SolverResult<HeatSolution>
where
    F: Fn(f64, f64) -> f64,
{
    CrankNicolsonSolver::new(HeatProblem::new(length, time, nx, nt, alpha)).solve(initial)
}
