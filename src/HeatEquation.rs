//! # Heat Equation Module
//!
//! Solvers for the one-dimensional heat equation on a rod of length `L`
//! with zero Dirichlet boundaries:
//!
//! ```text
//! ∂u/∂t = α ∂²u/∂x²,   u(0,t) = u(L,t) = 0,   u(x,0) = f(x)
//! ```
//!
//! ## Nomenclature
//!
//! | Symbol | Description |
//! |--------|-------------|
//! | `L` | rod length |
//! | `T` | total simulated time |
//! | `nx` | number of spatial grid points, `dx = L/(nx-1)` |
//! | `nt` | number of time samples, `dt = T/(nt-1)` |
//! | `α` | thermal diffusivity |
//! | `r` | stability ratio `α·dt/dx²` |
//!
//! ## Submodules
//! - `discretization`: `HeatProblem` (grid + time axis) and `HeatSolution` (the `nx × nt` field)
//! - `stability`: the stability ratio, its validation and the admissible (nx, nt) sweep
//! - `tridiagonal`: banded storage and the Thomas algorithm used in the time loop
//! - `crank_nicolson`: system matrices, Dirichlet transform and the time stepping
//! - `analytical`: closed-form reference solution for `f(x) = sin(πx/L)`
//!
//! Every entry point checks `r < 0.5` before doing any work.

pub mod analytical;
pub mod crank_nicolson;
pub mod discretization;
mod heat_equation_tests;
pub mod stability;
pub mod tridiagonal;
