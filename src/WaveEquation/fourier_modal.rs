//! Two-phase modal solver for the fixed-edge membrane.
//!
//! Both phases are written as products of sine tables. With
//! `Sx[(m-1, i)] = sin(mπx_i/Lx)` and `Sy[(n-1, j)] = sin(nπy_j/Ly)`:
//!
//! ```text
//! A    = 4/(Lx·Ly)·dx·dy · Sx · U0 · Syᵀ
//! u(t) = Sxᵀ · (A ∘ cos(Ω t)) · Sy
//! ```
//!
//! which is the same Riemann sum as the explicit double loop over (m, n).

use super::initial_shapes::{Displacement, InitialShape, sample_on_grid};
use crate::Utils::grid::{linspace, spacing};
use crate::solver_error::{SolverError, SolverResult};
use log::{debug, info};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Domain size, grid resolution (per axis) and number of modes per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModalDomain {
    pub lx: f64,
    pub ly: f64,
    pub grid_points: usize,
    pub modes: usize,
}

impl ModalDomain {
    pub fn new(lx: f64, ly: f64, grid_points: usize, modes: usize) -> Self {
        Self {
            lx,
            ly,
            grid_points,
            modes,
        }
    }

    pub fn validate(&self) -> SolverResult<()> {
        if !(self.lx.is_finite() && self.lx > 0.0 && self.ly.is_finite() && self.ly > 0.0) {
            return Err(SolverError::domain(format!(
                "domain size must be positive, got Lx={}, Ly={}",
                self.lx, self.ly
            )));
        }
        if self.grid_points < 2 {
            return Err(SolverError::domain(format!(
                "grid resolution must be at least 2, got {}",
                self.grid_points
            )));
        }
        if self.modes == 0 {
            return Err(SolverError::domain("mode count must be positive"));
        }
        Ok(())
    }

    pub fn x(&self) -> Vec<f64> {
        linspace(0.0, self.lx, self.grid_points)
    }

    pub fn y(&self) -> Vec<f64> {
        linspace(0.0, self.ly, self.grid_points)
    }
}

/// Displacement sampled on the grid: `u[(i, j)]` is the value at `(x[i], y[j])`.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveField {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub u: DMatrix<f64>,
}

/// Immutable result of the coefficient phase.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalCoefficientTable {
    pub domain: ModalDomain,
    /// `coefficients[(m-1, n-1)] = A[m, n]`
    pub coefficients: DMatrix<f64>,
    /// u0 on the grid, same indexing as `WaveField::u`
    pub initial_field: DMatrix<f64>,
    sine_x: DMatrix<f64>,
    sine_y: DMatrix<f64>,
}

/// `table[(m-1, i)] = sin(mπ·coords[i]/extent)`
pub fn sine_table(modes: usize, coords: &[f64], extent: f64) -> DMatrix<f64> {
    DMatrix::from_fn(modes, coords.len(), |k, i| {
        ((k + 1) as f64 * PI * coords[i] / extent).sin()
    })
}

/// ω_mn = c·π·√((m/Lx)² + (n/Ly)²)
pub fn angular_frequency(m: usize, n: usize, lx: f64, ly: f64, c: f64) -> f64 {
    c * PI * ((m as f64 / lx).powi(2) + (n as f64 / ly).powi(2)).sqrt()
}

impl ModalCoefficientTable {
    /// A[m, n] with 1-based mode indices; `None` outside 1..=M.
    pub fn coefficient(&self, m: usize, n: usize) -> Option<f64> {
        if m == 0 || n == 0 || m > self.domain.modes || n > self.domain.modes {
            return None;
        }
        Some(self.coefficients[(m - 1, n - 1)])
    }

    /// Reconstructs the displacement grid at time `t` for wave speed `c`.
    pub fn solve_at_time(&self, t: f64, c: f64) -> SolverResult<WaveField> {
        if !t.is_finite() {
            return Err(SolverError::domain(format!("time {} is not finite", t)));
        }
        if !(c.is_finite() && c >= 0.0) {
            return Err(SolverError::domain(format!(
                "wave speed must be non-negative, got {}",
                c
            )));
        }
        let ModalDomain { lx, ly, modes, .. } = self.domain;
        let weighted = DMatrix::from_fn(modes, modes, |a, b| {
            self.coefficients[(a, b)] * (angular_frequency(a + 1, b + 1, lx, ly, c) * t).cos()
        });
        let u = self.sine_x.transpose() * weighted * &self.sine_y;
        debug!("wave field evaluated at t={}", t);
        Ok(WaveField {
            x: self.domain.x(),
            y: self.domain.y(),
            u,
        })
    }
}

/// Coefficient phase for an arbitrary field `u0` sampled on the domain grid.
pub fn coefficients_from_field(
    domain: &ModalDomain,
    initial_field: DMatrix<f64>,
) -> SolverResult<ModalCoefficientTable> {
    domain.validate()?;
    let g = domain.grid_points;
    if initial_field.shape() != (g, g) {
        return Err(SolverError::domain(format!(
            "initial field has shape {:?}, grid is {}x{}",
            initial_field.shape(),
            g,
            g
        )));
    }
    Ok(build_table(domain, initial_field))
}

/// Coefficient phase for one of the built-in shapes.
pub fn calculate_fourier_coefficients(
    domain: &ModalDomain,
    shape: &InitialShape,
) -> SolverResult<ModalCoefficientTable> {
    domain.validate()?;
    shape.validate()?;
    Ok(compute_table(domain, shape))
}

/// Unchecked coefficient phase; inputs must already be validated.
pub(crate) fn compute_table(domain: &ModalDomain, shape: &InitialShape) -> ModalCoefficientTable {
    let initial_field = sample_on_grid(shape, &domain.x(), &domain.y());
    build_table(domain, initial_field)
}

fn build_table(domain: &ModalDomain, initial_field: DMatrix<f64>) -> ModalCoefficientTable {
    let ModalDomain {
        lx,
        ly,
        grid_points,
        modes,
    } = *domain;
    let x = domain.x();
    let y = domain.y();
    let dx = spacing(lx, grid_points);
    let dy = spacing(ly, grid_points);

    let sine_x = sine_table(modes, &x, lx);
    let sine_y = sine_table(modes, &y, ly);
    let scale = 4.0 / (lx * ly) * dx * dy;
    let coefficients = (&sine_x * &initial_field * sine_y.transpose()) * scale;

    info!(
        "Fourier coefficients calculated: Lx={}, Ly={}, grid={}, modes={}",
        lx, ly, grid_points, modes
    );
    ModalCoefficientTable {
        domain: *domain,
        coefficients,
        initial_field,
        sine_x,
        sine_y,
    }
}

/// Evaluation phase; the table carries the domain.
pub fn solve_wave_at_time(t: f64, table: &ModalCoefficientTable, c: f64) -> SolverResult<WaveField> {
    table.solve_at_time(t, c)
}
