//! Parameter surface of the interactive membrane demo.
//!
//! | Parameter | Range | Step | Default |
//! |-----------|-------|------|---------|
//! | `lx`, `ly` | [1, 5] | - | 1 |
//! | `c` | [0.5, 5] | - | 1 |
//! | `grid_points` | [20, 100] | 10 | 50 |
//! | `modes` | [5, 50] | 5 | 20 |
//! | `x0` | [0, lx] | - | 0.6·lx |
//! | `y0` | [0, ly] | - | 0.4·ly |
//! | `sigma` | [0.05, 0.5] | - | 0.1 |
//! | `t` | [0, 5] | 0.05 | 0 |

use super::coefficient_cache::CoefficientCache;
use super::fourier_modal::{ModalDomain, WaveField};
use super::initial_shapes::{GaussianPluck, InitialShape};
use crate::solver_error::{SolverError, SolverResult};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const DOMAIN_RANGE: RangeInclusive<f64> = 1.0..=5.0;
pub const WAVE_SPEED_RANGE: RangeInclusive<f64> = 0.5..=5.0;
pub const GRID_RANGE: RangeInclusive<usize> = 20..=100;
pub const GRID_STEP: usize = 10;
pub const MODES_RANGE: RangeInclusive<usize> = 5..=50;
pub const MODES_STEP: usize = 5;
pub const SIGMA_RANGE: RangeInclusive<f64> = 0.05..=0.5;
pub const TIME_RANGE: RangeInclusive<f64> = 0.0..=5.0;
pub const TIME_STEP: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveDemoParameters {
    pub lx: f64,
    pub ly: f64,
    pub c: f64,
    pub grid_points: usize,
    pub modes: usize,
    pub x0: f64,
    pub y0: f64,
    pub sigma: f64,
    pub t: f64,
}

impl Default for WaveDemoParameters {
    fn default() -> Self {
        Self::with_domain(1.0, 1.0)
    }
}

fn check_range<T: PartialOrd + std::fmt::Display>(
    name: &str,
    value: T,
    range: &RangeInclusive<T>,
) -> SolverResult<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(SolverError::domain(format!(
            "{} = {} is outside [{}, {}]",
            name,
            value,
            range.start(),
            range.end()
        )))
    }
}

fn check_step(name: &str, value: usize, start: usize, step: usize) -> SolverResult<()> {
    if (value - start) % step == 0 {
        Ok(())
    } else {
        Err(SolverError::domain(format!(
            "{} = {} is not on the {}-step grid starting at {}",
            name, value, step, start
        )))
    }
}

/// Time slider positions are multiples of `TIME_STEP` up to rounding.
fn check_time_step(t: f64) -> SolverResult<()> {
    let steps = (t - TIME_RANGE.start()) / TIME_STEP;
    if (steps - steps.round()).abs() < 1e-9 {
        Ok(())
    } else {
        Err(SolverError::domain(format!(
            "t = {} is not a multiple of {}",
            t, TIME_STEP
        )))
    }
}

impl WaveDemoParameters {
    /// Defaults for a given domain; the pluck centre follows the domain size.
    pub fn with_domain(lx: f64, ly: f64) -> Self {
        Self {
            lx,
            ly,
            c: 1.0,
            grid_points: 50,
            modes: 20,
            x0: 0.6 * lx,
            y0: 0.4 * ly,
            sigma: 0.1,
            t: 0.0,
        }
    }

    pub fn validate(&self) -> SolverResult<()> {
        check_range("lx", self.lx, &DOMAIN_RANGE)?;
        check_range("ly", self.ly, &DOMAIN_RANGE)?;
        check_range("c", self.c, &WAVE_SPEED_RANGE)?;
        check_range("grid_points", self.grid_points, &GRID_RANGE)?;
        check_step("grid_points", self.grid_points, *GRID_RANGE.start(), GRID_STEP)?;
        check_range("modes", self.modes, &MODES_RANGE)?;
        check_step("modes", self.modes, *MODES_RANGE.start(), MODES_STEP)?;
        check_range("x0", self.x0, &(0.0..=self.lx))?;
        check_range("y0", self.y0, &(0.0..=self.ly))?;
        check_range("sigma", self.sigma, &SIGMA_RANGE)?;
        check_range("t", self.t, &TIME_RANGE)?;
        check_time_step(self.t)
    }

    pub fn domain(&self) -> ModalDomain {
        ModalDomain::new(self.lx, self.ly, self.grid_points, self.modes)
    }

    pub fn shape(&self) -> InitialShape {
        GaussianPluck::new(self.x0, self.y0, self.sigma).into()
    }

    /// Validates, fetches (or computes) the coefficients through `cache` and
    /// evaluates the membrane at `self.t`.
    pub fn displacement_at(&self, cache: &CoefficientCache) -> SolverResult<WaveField> {
        self.validate()?;
        let table = cache.get_or_compute(&self.domain(), &self.shape())?;
        table.solve_at_time(self.t, self.c)
    }
}
