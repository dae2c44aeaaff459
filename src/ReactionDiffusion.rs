//! # Reaction-Diffusion Module
//!
//! Gray-Scott model on a square grid:
//!
//! ```text
//! ∂u/∂t = Du ∇²u - uv² + f(1-u)
//! ∂v/∂t = Dv ∇²v + uv² - (f+k)v
//! ```
//!
//! integrated with explicit Euler steps and a 3×3 Laplacian kernel under
//! reflective edges. Feed `f` and kill `k` are supplied at every `step` call
//! through `LiveParameters`, so they can change while the pattern evolves.
//!
//! Unlike the heat solvers there is no stability gate: the step only warns when
//! `dt·max(Du, Dv)` leaves the explicit-Euler bound of the kernel.

pub mod gray_scott;
pub mod presets;
