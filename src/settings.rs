//! # Settings Module
//!
//! ## Purpose
//! Reads the heat simulation configuration: physical parameters, the candidate
//! grid sizes to sweep and the output paths of the two temperature fields.
//!
//! ## Formats
//! INI text (the default, any extension other than `.json`):
//! ```text
//! [settings]
//! length = 1.0
//! nx_values = 10, 50
//! time = 1.0
//! nt_values = 10, 1000
//! alpha = 0.01
//!
//! [paths]
//! numerical_solution = numerical.npy
//! analytical_solution = analytical.npy
//! ```
//! `key: value` is accepted as well as `key = value`; lines starting with `#` or `;`
//! are comments; section and key names are case-insensitive.
//!
//! JSON (`.json` extension): the serde representation of `HeatConfig`.

use crate::solver_error::{SolverError, SolverResult};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Default configuration file looked up by the command line tool
pub const DEFAULT_CONFIG_FILE: &str = "configurationA.txt";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatConfig {
    pub length: f64,
    pub nx_values: Vec<usize>,
    pub time: f64,
    pub nt_values: Vec<usize>,
    pub alpha: f64,
    pub numerical_solution: String,
    pub analytical_solution: String,
}

type Sections = HashMap<String, HashMap<String, String>>;

impl HeatConfig {
    /// Loads from a file: `.json` through serde_json, anything else as INI.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SolverResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SolverError::config(format!(
                "File '{}' does not exist",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let config = if is_json {
            serde_json::from_str(&content).map_err(|e| {
                SolverError::config(format!("invalid JSON in '{}': {}", path.display(), e))
            })?
        } else {
            Self::from_ini_str(&content)?
        };
        info!("Successfully parsed configuration from file '{}'", path.display());
        Ok(config)
    }

    pub fn from_ini_str(content: &str) -> SolverResult<Self> {
        let sections = parse_sections(content)?;
        let config = HeatConfig {
            length: get_number(&sections, "settings", "length")?,
            nx_values: get_list(&sections, "settings", "nx_values")?,
            time: get_number(&sections, "settings", "time")?,
            nt_values: get_list(&sections, "settings", "nt_values")?,
            alpha: get_number(&sections, "settings", "alpha")?,
            numerical_solution: get_value(&sections, "paths", "numerical_solution")?.to_string(),
            analytical_solution: get_value(&sections, "paths", "analytical_solution")?
                .to_string(),
        };
        Ok(config)
    }

    pub fn to_json(&self) -> SolverResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn parse_sections(content: &str) -> SolverResult<Sections> {
    let mut sections: Sections = HashMap::new();
    let mut current: Option<String> = None;

    for (line_no, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line.starts_with('[') {
            let name = line
                .strip_prefix('[')
                .and_then(|l| l.strip_suffix(']'))
                .ok_or_else(|| {
                    SolverError::config(format!(
                        "malformed section header at line {}: '{}'",
                        line_no + 1,
                        line
                    ))
                })?;
            let name = name.trim().to_lowercase();
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }
        let split_at = line.find(['=', ':']).ok_or_else(|| {
            SolverError::config(format!(
                "expected 'key = value' at line {}: '{}'",
                line_no + 1,
                line
            ))
        })?;
        let key = line[..split_at].trim().to_lowercase();
        let value = line[split_at + 1..].trim().to_string();
        let section = current.as_ref().ok_or_else(|| {
            SolverError::config(format!(
                "key '{}' at line {} is outside of any section",
                key,
                line_no + 1
            ))
        })?;
        let entries = sections.entry(section.clone()).or_default();
        if entries.insert(key.clone(), value).is_some() {
            warn!("key '{}' repeated in section [{}], last value wins", key, section);
        }
    }
    Ok(sections)
}

fn get_value<'a>(sections: &'a Sections, section: &str, key: &str) -> SolverResult<&'a str> {
    let entries = sections
        .get(section)
        .ok_or_else(|| SolverError::config(format!("missing section [{}]", section)))?;
    entries
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| SolverError::config(format!("missing key '{}' in [{}]", key, section)))
}

fn get_number(sections: &Sections, section: &str, key: &str) -> SolverResult<f64> {
    let value = get_value(sections, section, key)?;
    value.parse::<f64>().map_err(|e| {
        SolverError::config(format!(
            "'{}' in [{}] is not a number ('{}'): {}",
            key, section, value, e
        ))
    })
}

fn get_list(sections: &Sections, section: &str, key: &str) -> SolverResult<Vec<usize>> {
    let value = get_value(sections, section, key)?;
    let items = value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse::<usize>().map_err(|e| {
                SolverError::config(format!(
                    "'{}' in [{}] contains a non-integer entry '{}': {}",
                    key, section, item, e
                ))
            })
        })
        .collect::<SolverResult<Vec<usize>>>()?;
    if items.is_empty() {
        return Err(SolverError::config(format!(
            "'{}' in [{}] is an empty list",
            key, section
        )));
    }
    Ok(items)
}
