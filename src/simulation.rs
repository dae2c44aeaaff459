//! # Heat simulation driver
//!
//! Configuration -> stable (nx, nt) sweep -> numerical and analytical solve per
//! combination -> `.npy` output -> summary table.

use crate::HeatEquation::analytical::AnalyticalHeatSolver;
use crate::HeatEquation::crank_nicolson::{CrankNicolsonSolver, sine_initial_temperature};
use crate::HeatEquation::discretization::HeatProblem;
use crate::HeatEquation::stability::{StableCombination, find_stable_combinations};
use crate::Utils::npy_io::save_matrix;
use crate::settings::HeatConfig;
use crate::solver_error::{SolverError, SolverResult};
use log::info;
use prettytable::{Table, row};
use std::path::{Path, PathBuf};

/// Outcome of one admissible combination.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinationReport {
    pub combination: StableCombination,
    /// max |numerical - analytical| over the whole field
    pub max_error: f64,
    /// max |numerical - analytical| at t = time/2
    pub max_error_mid_time: f64,
    pub numerical_path: PathBuf,
    pub analytical_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimulationReport {
    pub runs: Vec<CombinationReport>,
}

impl SimulationReport {
    pub fn print_table(&self) {
        let mut table = Table::new();
        table.add_row(row!["nx", "nt", "r", "max error", "max error (t/2)", "numerical", "analytical"]);
        for run in &self.runs {
            table.add_row(row![
                run.combination.nx,
                run.combination.nt,
                format!("{:.4}", run.combination.r),
                format!("{:.3e}", run.max_error),
                format!("{:.3e}", run.max_error_mid_time),
                run.numerical_path.display(),
                run.analytical_path.display()
            ]);
        }
        println!("\nStable combinations:");
        table.printstd();
    }
}

/// `<stem>_nx<nx>_nt<nt>.<ext>` next to `base`
pub fn combination_path(base: &Path, nx: usize, nt: usize) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match base.extension() {
        Some(ext) => format!("{}_nx{}_nt{}.{}", stem, nx, nt, ext.to_string_lossy()),
        None => format!("{}_nx{}_nt{}", stem, nx, nt),
    };
    base.with_file_name(file_name)
}

pub fn run_configuration(config: &HeatConfig, source_name: &str) -> SolverResult<SimulationReport> {
    let stable_combinations = find_stable_combinations(
        config.length,
        config.time,
        config.alpha,
        &config.nx_values,
        &config.nt_values,
    )?;
    if stable_combinations.is_empty() {
        return Err(SolverError::NoStableCombination {
            source_name: source_name.to_string(),
        });
    }

    let numerical_base = PathBuf::from(&config.numerical_solution);
    let analytical_base = PathBuf::from(&config.analytical_solution);
    let single = stable_combinations.len() == 1;

    let mut report = SimulationReport::default();
    for combination in stable_combinations {
        let StableCombination {
            length,
            time,
            nx,
            nt,
            r,
        } = combination;
        info!("Running simulation with nx={}, nt={}, r={:.4}", nx, nt, r);

        let problem = HeatProblem::new(length, time, nx, nt, config.alpha);
        let numerical = CrankNicolsonSolver::new(problem).solve(sine_initial_temperature)?;
        let analytical = AnalyticalHeatSolver::new(problem).solve()?;

        let (numerical_path, analytical_path) = if single {
            (numerical_base.clone(), analytical_base.clone())
        } else {
            (
                combination_path(&numerical_base, nx, nt),
                combination_path(&analytical_base, nx, nt),
            )
        };
        save_matrix(&numerical_path, &numerical.w)?;
        save_matrix(&analytical_path, &analytical.w)?;

        report.runs.push(CombinationReport {
            combination,
            max_error: numerical.max_abs_difference(&analytical)?,
            max_error_mid_time: numerical.max_abs_difference_at(&analytical, time / 2.0)?,
            numerical_path,
            analytical_path,
        });
    }
    Ok(report)
}

/// Reads the configuration file and runs every stable combination.
pub fn process_configuration_file<P: AsRef<Path>>(path: P) -> SolverResult<SimulationReport> {
    let path = path.as_ref();
    let config = HeatConfig::from_file(path)?;
    run_configuration(&config, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Utils::npy_io::load_matrix;
    use std::fs;
    use tempfile::tempdir;

    fn config_in(dir: &Path, nx_values: Vec<usize>, nt_values: Vec<usize>) -> HeatConfig {
        HeatConfig {
            length: 1.0,
            nx_values,
            time: 1.0,
            nt_values,
            alpha: 0.01,
            numerical_solution: dir.join("numerical.npy").to_string_lossy().into_owned(),
            analytical_solution: dir.join("analytical.npy").to_string_lossy().into_owned(),
        }
    }

    #[test]
    fn test_combination_path() {
        let p = combination_path(Path::new("out/numerical.npy"), 50, 1000);
        assert_eq!(p, PathBuf::from("out/numerical_nx50_nt1000.npy"));
        let p = combination_path(Path::new("field"), 10, 20);
        assert_eq!(p, PathBuf::from("field_nx10_nt20"));
    }

    #[test]
    fn test_single_combination_uses_configured_paths() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path(), vec![20], vec![200]);
        let report = run_configuration(&config, "test").unwrap();
        assert_eq!(report.runs.len(), 1);
        let w = load_matrix(&config.numerical_solution).unwrap();
        assert_eq!(w.shape(), (20, 200));
        let wa = load_matrix(&config.analytical_solution).unwrap();
        assert_eq!(wa.shape(), (20, 200));
        assert!(report.runs[0].max_error < 1e-3);
    }

    #[test]
    fn test_several_combinations_each_get_a_file() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path(), vec![10, 50], vec![10, 1000]);
        let report = run_configuration(&config, "test").unwrap();
        // (50, 10) is unstable
        assert_eq!(report.runs.len(), 3);
        for run in &report.runs {
            let w = load_matrix(&run.numerical_path).unwrap();
            assert_eq!(w.shape(), (run.combination.nx, run.combination.nt));
            assert!(run.analytical_path.exists());
        }
        report.print_table();
    }

    #[test]
    fn test_no_stable_combination_is_fatal() {
        let dir = tempdir().unwrap();
        let mut config = config_in(dir.path(), vec![100], vec![2]);
        config.alpha = 1.0;
        let err = run_configuration(&config, "configurationB.txt").unwrap_err();
        assert!(matches!(
            err,
            SolverError::NoStableCombination { ref source_name } if source_name == "configurationB.txt"
        ));
        assert!(!Path::new(&config.numerical_solution).exists());
    }

    #[test]
    fn test_process_configuration_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("configurationA.txt");
        let text = format!(
            "[settings]\nlength = 1\nnx_values = 21\ntime = 0.5\nnt_values = 101\nalpha = 0.02\n\n[paths]\nnumerical_solution = {}\nanalytical_solution = {}\n",
            dir.path().join("w.npy").display(),
            dir.path().join("wa.npy").display()
        );
        fs::write(&config_path, text).unwrap();
        let report = process_configuration_file(&config_path).unwrap();
        assert_eq!(report.runs.len(), 1);
        assert!(dir.path().join("w.npy").exists());
    }
}
