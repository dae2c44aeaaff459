#[cfg(test)]
mod tests {
    use crate::HeatEquation::analytical::heat_equation_analytical;
    use crate::HeatEquation::crank_nicolson::{heat_equation_cn, sine_initial_temperature};
    use crate::HeatEquation::stability::find_stable_combinations;

    #[test]
    fn test_boundaries_zero_for_every_time_sample() {
        let cases = [(1.0, 11, 1.0, 101, 0.01), (2.0, 33, 0.5, 64, 0.1), (0.5, 5, 3.0, 900, 0.001)];
        for (length, nx, time, nt, alpha) in cases {
            let numerical =
                heat_equation_cn(length, nx, time, nt, alpha, sine_initial_temperature).unwrap();
            let analytical = heat_equation_analytical(length, nx, time, nt, alpha).unwrap();
            for k in 0..nt {
                assert_eq!(numerical.w[(0, k)], 0.0);
                assert_eq!(numerical.w[(nx - 1, k)], 0.0);
                assert_eq!(analytical.w[(0, k)], 0.0);
                assert_eq!(analytical.w[(nx - 1, k)], 0.0);
            }
        }
    }

    #[test]
    fn test_boundaries_zero_even_for_nonzero_initial_ends() {
        // the initial profile is 1 at both ends; the solver must still pin them to 0
        let solution = heat_equation_cn(1.0, 21, 0.2, 50, 0.01, |_, _| 1.0).unwrap();
        for k in 0..solution.nt() {
            assert_eq!(solution.w[(0, k)], 0.0);
            assert_eq!(solution.w[(20, k)], 0.0);
        }
    }

    #[test]
    fn test_crank_nicolson_converges_to_analytical() {
        let (length, time, alpha) = (1.0, 1.0, 0.01);
        let mut errors = Vec::new();
        for (nx, nt) in [(50, 500), (100, 1000), (200, 2000)] {
            let numerical =
                heat_equation_cn(length, nx, time, nt, alpha, sine_initial_temperature).unwrap();
            let analytical = heat_equation_analytical(length, nx, time, nt, alpha).unwrap();
            errors.push(numerical.max_abs_difference_at(&analytical, time / 2.0).unwrap());
        }
        assert!(errors[0] > errors[1], "errors: {:?}", errors);
        assert!(errors[1] > errors[2], "errors: {:?}", errors);
        assert!(errors[2] < 1e-5, "errors: {:?}", errors);
    }

    #[test]
    fn test_numerical_close_to_analytical_over_whole_field() {
        let numerical = heat_equation_cn(1.0, 51, 1.0, 501, 0.05, sine_initial_temperature).unwrap();
        let analytical = heat_equation_analytical(1.0, 51, 1.0, 501, 0.05).unwrap();
        assert!(numerical.max_abs_difference(&analytical).unwrap() < 1e-3);
    }

    #[test]
    fn test_repeated_runs_are_bit_identical() {
        let first = heat_equation_cn(1.0, 40, 1.0, 300, 0.02, sine_initial_temperature).unwrap();
        let second = heat_equation_cn(1.0, 40, 1.0, 300, 0.02, sine_initial_temperature).unwrap();
        assert_eq!(first.w, second.w);
        let first = heat_equation_analytical(1.0, 40, 1.0, 300, 0.02).unwrap();
        let second = heat_equation_analytical(1.0, 40, 1.0, 300, 0.02).unwrap();
        assert_eq!(first.w, second.w);
    }

    #[test]
    fn test_every_stable_combination_solves() {
        let combos = find_stable_combinations(1.0, 1.0, 0.01, &[10, 50], &[10, 1000]).unwrap();
        for c in combos {
            let result = heat_equation_cn(c.length, c.nx, c.time, c.nt, 0.01, sine_initial_temperature);
            assert!(result.is_ok(), "nx={}, nt={} failed", c.nx, c.nt);
        }
    }
}
