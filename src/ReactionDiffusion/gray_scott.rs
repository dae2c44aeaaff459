use crate::solver_error::{SolverError, SolverResult};
use log::{debug, warn};
use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Diffusion rate of U
pub const DU: f64 = 0.16;
/// Diffusion rate of V
pub const DV: f64 = 0.08;

/// Laplacian stencil, indexed `[row offset + 1][col offset + 1]`
pub const LAPLACIAN_KERNEL: [[f64; 3]; 3] = [[0.05, 0.2, 0.05], [0.2, -1.0, 0.2], [0.05, 0.2, 0.05]];

/// Forward Euler on this kernel is stable while dt·D ≤ 2/1.6 (its most negative
/// eigenvalue is -1.6).
pub const EXPLICIT_EULER_LIMIT: f64 = 1.25;

/// Amplitude of the uniform noise added at initialisation
pub const NOISE_AMPLITUDE: f64 = 0.1;

/// Feed and kill rates, read at the start of every `GrayScott::step` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiveParameters {
    pub feed: f64,
    pub kill: f64,
}

impl LiveParameters {
    pub fn new(feed: f64, kill: f64) -> Self {
        Self { feed, kill }
    }

    pub fn set(&mut self, feed: f64, kill: f64) {
        self.feed = feed;
        self.kill = kill;
    }

    fn validate(&self) -> SolverResult<()> {
        if self.feed.is_finite() && self.kill.is_finite() {
            Ok(())
        } else {
            Err(SolverError::domain(format!(
                "feed/kill must be finite, got f={}, k={}",
                self.feed, self.kill
            )))
        }
    }
}

/// Two concentration grids, mutated in place by `step`.
#[derive(Debug, Clone)]
pub struct GrayScott {
    u: DMatrix<f64>,
    v: DMatrix<f64>,
}

impl GrayScott {
    /// Seeded pattern with noise drawn from the operating system's entropy.
    pub fn new(size: usize) -> SolverResult<Self> {
        Self::initialise(size, &mut StdRng::from_os_rng())
    }

    /// Seeded pattern with reproducible noise.
    pub fn with_seed(size: usize, seed: u64) -> SolverResult<Self> {
        Self::initialise(size, &mut StdRng::seed_from_u64(seed))
    }

    /// U = 1, V = 0 everywhere except a centred square of side size/8
    /// (U = 0.5, V = 0.25), plus uniform noise in [0, 0.1) on both fields.
    fn initialise<R: Rng>(size: usize, rng: &mut R) -> SolverResult<Self> {
        if size < 2 {
            return Err(SolverError::domain(format!(
                "grid size must be at least 2, got {}",
                size
            )));
        }
        let mut u = DMatrix::from_element(size, size, 1.0);
        let mut v = DMatrix::zeros(size, size);

        let mid = size / 2;
        let r = size / 16;
        let seed_len = 2 * r;
        if seed_len > 0 {
            u.view_mut((mid - r, mid - r), (seed_len, seed_len)).fill(0.50);
            v.view_mut((mid - r, mid - r), (seed_len, seed_len)).fill(0.25);
        }

        add_noise(&mut u, rng);
        add_noise(&mut v, rng);
        debug!("Gray-Scott grid initialised: {}x{}, seed square side {}", size, size, seed_len);
        Ok(Self { u, v })
    }

    /// Starts from given concentrations; both must be square and of equal shape.
    pub fn from_fields(u: DMatrix<f64>, v: DMatrix<f64>) -> SolverResult<Self> {
        if u.shape() != v.shape() || !u.is_square() || u.nrows() < 2 {
            return Err(SolverError::domain(format!(
                "U and V must be equal square grids of side >= 2, got {:?} and {:?}",
                u.shape(),
                v.shape()
            )));
        }
        Ok(Self { u, v })
    }

    pub fn size(&self) -> usize {
        self.u.nrows()
    }

    pub fn u(&self) -> &DMatrix<f64> {
        &self.u
    }

    pub fn v(&self) -> &DMatrix<f64> {
        &self.v
    }

    /// Advances `steps` explicit Euler steps of size `dt` with the feed/kill
    /// values `params` holds at the time of the call.
    pub fn step(&mut self, params: &LiveParameters, dt: f64, steps: usize) -> SolverResult<()> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SolverError::domain(format!("dt must be positive, got {}", dt)));
        }
        params.validate()?;
        let LiveParameters { feed, kill } = *params;
        if dt * DU.max(DV) > EXPLICIT_EULER_LIMIT {
            warn!(
                "dt={} exceeds the explicit Euler bound (dt*D <= {}), the pattern may blow up",
                dt, EXPLICIT_EULER_LIMIT
            );
        }

        let n = self.size();
        let mut next_u = DMatrix::zeros(n, n);
        let mut next_v = DMatrix::zeros(n, n);
        for _ in 0..steps {
            let lap_u = laplacian(&self.u);
            let lap_v = laplacian(&self.v);
            for j in 0..n {
                for i in 0..n {
                    let u = self.u[(i, j)];
                    let v = self.v[(i, j)];
                    let uvv = u * v * v;
                    let du = DU * lap_u[(i, j)] - uvv + feed * (1.0 - u);
                    let dv = DV * lap_v[(i, j)] + uvv - (feed + kill) * v;
                    next_u[(i, j)] = u + du * dt;
                    next_v[(i, j)] = v + dv * dt;
                }
            }
            std::mem::swap(&mut self.u, &mut next_u);
            std::mem::swap(&mut self.v, &mut next_v);
        }
        Ok(())
    }

    /// V clamped to [0, 1] and scaled to 0..=255.
    pub fn v_channel_as_image(&self) -> DMatrix<u8> {
        to_image(&self.v)
    }

    /// U clamped to [0, 1] and scaled to 0..=255.
    pub fn u_channel_as_image(&self) -> DMatrix<u8> {
        to_image(&self.u)
    }
}

fn add_noise<R: Rng>(field: &mut DMatrix<f64>, rng: &mut R) {
    // row-major draw order
    let (rows, cols) = field.shape();
    for i in 0..rows {
        for j in 0..cols {
            field[(i, j)] += rng.random::<f64>() * NOISE_AMPLITUDE;
        }
    }
}

/// Index of `i + offset` mirrored at the edges (`-1 -> 0`, `n -> n-1`).
fn reflect(i: usize, offset: isize, n: usize) -> usize {
    let k = i as isize + offset;
    if k < 0 {
        (-k - 1) as usize
    } else if k as usize >= n {
        2 * n - 1 - k as usize
    } else {
        k as usize
    }
}

/// Convolution with `LAPLACIAN_KERNEL`, edges mirrored.
pub fn laplacian(field: &DMatrix<f64>) -> DMatrix<f64> {
    let (rows, cols) = field.shape();
    DMatrix::from_fn(rows, cols, |i, j| {
        let mut acc = 0.0;
        for (a, kernel_row) in LAPLACIAN_KERNEL.iter().enumerate() {
            let ii = reflect(i, a as isize - 1, rows);
            for (b, weight) in kernel_row.iter().enumerate() {
                let jj = reflect(j, b as isize - 1, cols);
                acc += weight * field[(ii, jj)];
            }
        }
        acc
    })
}

/// Clamp to [0, 1], scale by 255 and truncate.
pub fn to_image(field: &DMatrix<f64>) -> DMatrix<u8> {
    field.map(|value| (value.clamp(0.0, 1.0) * 255.0) as u8)
}
