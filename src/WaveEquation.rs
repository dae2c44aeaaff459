//! # Wave Equation Module
//!
//! Vibrating rectangular membrane `[0, Lx] × [0, Ly]` with fixed edges, solved by
//! modal superposition:
//!
//! ```text
//! ∂²u/∂t² = c² (∂²u/∂x² + ∂²u/∂y²)
//!
//! A[m,n]   = 4/(Lx·Ly) · Σ u0(x,y)·sin(mπx/Lx)·sin(nπy/Ly)·dx·dy
//! u(x,y,t) = Σ A[m,n]·sin(mπx/Lx)·sin(nπy/Ly)·cos(ω_mn·t)
//! ω_mn     = c·π·√((m/Lx)² + (n/Ly)²)
//! ```
//!
//! The coefficient phase costs O(M²·G²) in the naive double sum and is time
//! independent, so it is memoised in `coefficient_cache`. The evaluation phase is
//! cheap and runs once per requested time.
//!
//! ## Submodules
//! - `initial_shapes`: initial displacement fields (Gaussian pluck, single eigenmode)
//! - `fourier_modal`: coefficient table and time evaluation
//! - `coefficient_cache`: bounded LRU with compute-once semantics per key
//! - `demo_parameters`: parameter ranges and defaults of the interactive demo

pub mod coefficient_cache;
pub mod demo_parameters;
pub mod fourier_modal;
pub mod initial_shapes;
