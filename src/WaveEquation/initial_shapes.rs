use crate::solver_error::{SolverError, SolverResult};
use enum_dispatch::enum_dispatch;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Canonical, hashable identity of a shape: parameters as f64 bit patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKey {
    Gaussian { x0: u64, y0: u64, sigma: u64 },
    SineMode {
        m: usize,
        n: usize,
        amplitude: u64,
        lx: u64,
        ly: u64,
    },
}

/// Bit pattern of `v` with -0.0 folded onto 0.0
pub(crate) fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() }
}

#[enum_dispatch]
pub trait Displacement {
    /// u0(x, y)
    fn displacement(&self, x: f64, y: f64) -> f64;
    fn cache_key(&self) -> ShapeKey;
    fn validate(&self) -> SolverResult<()>;
}

/// exp(-((x-x0)² + (y-y0)²) / (2σ²))
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianPluck {
    pub x0: f64,
    pub y0: f64,
    pub sigma: f64,
}

impl GaussianPluck {
    pub fn new(x0: f64, y0: f64, sigma: f64) -> Self {
        Self { x0, y0, sigma }
    }
}

impl Displacement for GaussianPluck {
    fn displacement(&self, x: f64, y: f64) -> f64 {
        let r2 = (x - self.x0).powi(2) + (y - self.y0).powi(2);
        (-r2 / (2.0 * self.sigma.powi(2))).exp()
    }

    fn cache_key(&self) -> ShapeKey {
        ShapeKey::Gaussian {
            x0: canonical_bits(self.x0),
            y0: canonical_bits(self.y0),
            sigma: canonical_bits(self.sigma),
        }
    }

    fn validate(&self) -> SolverResult<()> {
        if !(self.x0.is_finite() && self.y0.is_finite()) {
            return Err(SolverError::domain("pluck center must be finite"));
        }
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(SolverError::domain(format!(
                "pluck width sigma must be positive, got {}",
                self.sigma
            )));
        }
        Ok(())
    }
}

/// amplitude · sin(mπx/Lx) · sin(nπy/Ly): a single membrane eigenmode.
/// Needs the domain size, so it stores it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SineModeShape {
    pub m: usize,
    pub n: usize,
    pub amplitude: f64,
    pub lx: f64,
    pub ly: f64,
}

impl SineModeShape {
    pub fn new(m: usize, n: usize, amplitude: f64, lx: f64, ly: f64) -> Self {
        Self {
            m,
            n,
            amplitude,
            lx,
            ly,
        }
    }
}

impl Displacement for SineModeShape {
    fn displacement(&self, x: f64, y: f64) -> f64 {
        self.amplitude
            * (self.m as f64 * PI * x / self.lx).sin()
            * (self.n as f64 * PI * y / self.ly).sin()
    }

    // the shape's own extent may differ from the modal domain it is sampled on
    fn cache_key(&self) -> ShapeKey {
        ShapeKey::SineMode {
            m: self.m,
            n: self.n,
            amplitude: canonical_bits(self.amplitude),
            lx: canonical_bits(self.lx),
            ly: canonical_bits(self.ly),
        }
    }

    fn validate(&self) -> SolverResult<()> {
        if self.m == 0 || self.n == 0 {
            return Err(SolverError::domain("mode indices start at 1"));
        }
        if !self.amplitude.is_finite() {
            return Err(SolverError::domain("mode amplitude must be finite"));
        }
        if !(self.lx > 0.0 && self.ly > 0.0) {
            return Err(SolverError::domain("mode shape needs a positive domain size"));
        }
        Ok(())
    }
}

#[enum_dispatch(Displacement)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InitialShape {
    GaussianPluck(GaussianPluck),
    SineModeShape(SineModeShape),
}

/// Samples `shape` on the tensor grid: entry (i, j) is u0(x[i], y[j]).
pub fn sample_on_grid<S: Displacement>(shape: &S, x: &[f64], y: &[f64]) -> DMatrix<f64> {
    DMatrix::from_fn(x.len(), y.len(), |i, j| shape.displacement(x[i], y[j]))
}
