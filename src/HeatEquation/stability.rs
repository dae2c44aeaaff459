//! Stability ratio of the rod discretization and the admissible (nx, nt) sweep.
//!
//! `r = α·dt/dx²` with `dx = L/(nx-1)` and `dt = T/(nt-1)`. A discretization is
//! admissible when `r < 0.5`; the sweep additionally requires `r + ε < 0.5` so that
//! values sitting on the boundary up to rounding are rejected.

use crate::solver_error::{SolverError, SolverResult};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Upper (exclusive) bound for the stability ratio
pub const STABILITY_LIMIT: f64 = 0.5;
/// Margin used by the sweep when comparing against `STABILITY_LIMIT`
pub const STABILITY_EPSILON: f64 = 1e-10;

/// One admissible discretization found by `find_stable_combinations`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StableCombination {
    pub length: f64,
    pub time: f64,
    pub nx: usize,
    pub nt: usize,
    pub r: f64,
}

/// Calculates the stability factor r = alpha * dt / dx^2.
pub fn calculate_ratio(length: f64, time: f64, nx: usize, nt: usize, alpha: f64) -> SolverResult<f64> {
    if nx <= 1 {
        return Err(SolverError::domain(format!(
            "nx must be greater than 1, got {}",
            nx
        )));
    }
    if nt <= 1 {
        return Err(SolverError::domain(format!(
            "nt must be greater than 1, got {}",
            nt
        )));
    }
    if !(length.is_finite() && length > 0.0) {
        return Err(SolverError::domain(format!(
            "length must be positive, got {}",
            length
        )));
    }
    if !(time.is_finite() && time >= 0.0) {
        return Err(SolverError::domain(format!(
            "time must be non-negative, got {}",
            time
        )));
    }
    if !(alpha.is_finite() && alpha > 0.0) {
        return Err(SolverError::domain(format!(
            "alpha must be positive, got {}",
            alpha
        )));
    }
    let dx = length / (nx - 1) as f64;
    let dt = time / (nt - 1) as f64;
    let r = alpha * dt / dx.powi(2);
    if !r.is_finite() {
        return Err(SolverError::domain(format!(
            "stability ratio is not finite for length={}, time={}, alpha={}",
            length, time, alpha
        )));
    }
    Ok(r)
}

/// Fails with `UnstableConfiguration` when r >= 0.5. Returns r on success.
pub fn validate_stability(length: f64, time: f64, nx: usize, nt: usize, alpha: f64) -> SolverResult<f64> {
    let r = calculate_ratio(length, time, nx, nt, alpha)?;
    if r >= STABILITY_LIMIT {
        return Err(SolverError::UnstableConfiguration { r });
    }
    debug!("stability check passed: nx={}, nt={}, r={}", nx, nt, r);
    Ok(r)
}

/// Keeps the pairs of the Cartesian product `nx_values × nt_values` for which
/// `r < 0.5` and `r + ε < 0.5`.
///
/// An empty result is not an error here; callers that need at least one
/// combination turn it into `NoStableCombination`.
pub fn find_stable_combinations(
    length: f64,
    time: f64,
    alpha: f64,
    nx_values: &[usize],
    nt_values: &[usize],
) -> SolverResult<Vec<StableCombination>> {
    let mut stable_combinations = Vec::new();
    for &nx in nx_values {
        for &nt in nt_values {
            let r = calculate_ratio(length, time, nx, nt, alpha)?;
            if r < STABILITY_LIMIT && r + STABILITY_EPSILON < STABILITY_LIMIT {
                stable_combinations.push(StableCombination {
                    length,
                    time,
                    nx,
                    nt,
                    r,
                });
            } else {
                debug!("rejected nx={}, nt={}: r={}", nx, nt, r);
            }
        }
    }
    info!(
        "{} of {} (nx, nt) combinations are stable",
        stable_combinations.len(),
        nx_values.len() * nt_values.len()
    );
    Ok(stable_combinations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_calculate_ratio_value() {
        // dx = 0.1, dt = 0.01
        let r = calculate_ratio(1.0, 1.0, 11, 101, 0.5).unwrap();
        assert_relative_eq!(r, 0.5 * 0.01 / 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_calculate_ratio_degenerate_grid() {
        assert!(matches!(
            calculate_ratio(1.0, 1.0, 1, 10, 0.01),
            Err(SolverError::DomainError(_))
        ));
        assert!(matches!(
            calculate_ratio(1.0, 1.0, 10, 0, 0.01),
            Err(SolverError::DomainError(_))
        ));
    }

    #[test]
    fn test_calculate_ratio_rejects_non_physical_parameters() {
        for (length, time, alpha) in [(1.0, 1.0, -0.01), (1.0, 1.0, 0.0), (0.0, 1.0, 0.01), (-1.0, 1.0, 0.01), (1.0, -1.0, 0.01)] {
            assert!(matches!(
                calculate_ratio(length, time, 11, 101, alpha),
                Err(SolverError::DomainError(_))
            ));
        }
        assert!(matches!(
            validate_stability(1.0, 1.0, 11, 101, -0.5),
            Err(SolverError::DomainError(_))
        ));
    }

    #[test]
    fn test_ratio_grows_when_grid_is_coarsened() {
        let fine = calculate_ratio(1.0, 1.0, 101, 200, 0.01).unwrap();
        let coarse = calculate_ratio(1.0, 1.0, 51, 200, 0.01).unwrap();
        let coarser = calculate_ratio(1.0, 1.0, 26, 200, 0.01).unwrap();
        assert!(fine > coarse);
        assert!(coarse > coarser);
    }

    #[test]
    fn test_validate_stability_rejects_limit() {
        // dx = 0.5, dt = 0.5, alpha = 0.25 -> r = 0.5 exactly
        let err = validate_stability(1.0, 1.0, 3, 3, 0.25).unwrap_err();
        assert!(matches!(err, SolverError::UnstableConfiguration { r } if r == 0.5));
        assert!(validate_stability(1.0, 1.0, 3, 3, 0.2).is_ok());
    }

    #[test]
    fn test_find_stable_combinations_filters() {
        let combos = find_stable_combinations(1.0, 1.0, 0.01, &[10, 50], &[10, 1000]).unwrap();
        assert!(!combos.is_empty());
        assert!(combos.iter().any(|c| c.nx == 50 && c.nt == 1000));
        for c in &combos {
            assert!(c.r < STABILITY_LIMIT);
            assert!(validate_stability(c.length, c.time, c.nx, c.nt, 0.01).is_ok());
        }
        // nx = 50, nt = 10: r = 0.01 * (1/9) * 49^2 ~ 2.67
        assert!(!combos.iter().any(|c| c.nx == 50 && c.nt == 10));
        assert!(validate_stability(1.0, 1.0, 50, 10, 0.01).is_err());
    }

    #[test]
    fn test_find_stable_combinations_empty() {
        let combos = find_stable_combinations(1.0, 1.0, 10.0, &[100], &[2, 3]).unwrap();
        assert!(combos.is_empty());
    }

    #[test]
    fn test_find_stable_combinations_rejects_near_limit() {
        // r = 2 * alpha = 0.5 - 1e-12 passes the plain check but not the margin
        let alpha = 0.25 - 5e-13;
        assert!(calculate_ratio(1.0, 1.0, 3, 3, alpha).unwrap() < STABILITY_LIMIT);
        let combos = find_stable_combinations(1.0, 1.0, alpha, &[3], &[3]).unwrap();
        assert!(combos.is_empty());
    }

    #[test]
    fn test_find_stable_combinations_propagates_domain_error() {
        let result = find_stable_combinations(1.0, 1.0, 0.01, &[1, 10], &[100]);
        assert!(matches!(result, Err(SolverError::DomainError(_))));
    }
}
