//! Dense f64 matrices in the NumPy `.npy` format (version 1.0).
//!
//! Layout: magic `\x93NUMPY`, version bytes `1 0`, u16 little-endian header
//! length, an ASCII dict `{'descr': '<f8', 'fortran_order': False, 'shape': (r, c), }`
//! padded with spaces and a trailing `\n` so that the data starts on a 64-byte
//! boundary, then `r*c` little-endian f64 values in row-major order.

use crate::solver_error::{SolverError, SolverResult};
use log::info;
use nalgebra::DMatrix;
use std::fs;
use std::path::Path;

const MAGIC: &[u8] = b"\x93NUMPY";
const ALIGNMENT: usize = 64;

pub fn to_npy_bytes(matrix: &DMatrix<f64>) -> Vec<u8> {
    let (rows, cols) = matrix.shape();
    let mut header = format!(
        "{{'descr': '<f8', 'fortran_order': False, 'shape': ({}, {}), }}",
        rows, cols
    );
    // magic(6) + version(2) + header length(2)
    let preamble = MAGIC.len() + 4;
    let unpadded = preamble + header.len() + 1;
    let padding = (ALIGNMENT - unpadded % ALIGNMENT) % ALIGNMENT;
    header.push_str(&" ".repeat(padding));
    header.push('\n');

    let mut bytes = Vec::with_capacity(preamble + header.len() + rows * cols * 8);
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&[1, 0]);
    bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
    bytes.extend_from_slice(header.as_bytes());
    for i in 0..rows {
        for j in 0..cols {
            bytes.extend_from_slice(&matrix[(i, j)].to_le_bytes());
        }
    }
    bytes
}

pub fn from_npy_bytes(bytes: &[u8]) -> SolverResult<DMatrix<f64>> {
    if bytes.len() < MAGIC.len() + 4 || &bytes[..MAGIC.len()] != MAGIC {
        return Err(SolverError::ArrayFormat("missing .npy magic string".to_string()));
    }
    let major = bytes[MAGIC.len()];
    let (header_len, header_start) = match major {
        1 => {
            let at = MAGIC.len() + 2;
            (u16::from_le_bytes([bytes[at], bytes[at + 1]]) as usize, at + 2)
        }
        2 | 3 => {
            let at = MAGIC.len() + 2;
            if bytes.len() < at + 4 {
                return Err(SolverError::ArrayFormat("truncated .npy header".to_string()));
            }
            let len = u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
            (len as usize, at + 4)
        }
        v => {
            return Err(SolverError::ArrayFormat(format!(
                "unsupported .npy version {}",
                v
            )));
        }
    };
    let data_start = header_start + header_len;
    if bytes.len() < data_start {
        return Err(SolverError::ArrayFormat("truncated .npy header".to_string()));
    }
    let header = std::str::from_utf8(&bytes[header_start..data_start])
        .map_err(|e| SolverError::ArrayFormat(format!("header is not text: {}", e)))?;

    let descr = header_field(header, "descr")?;
    if descr.trim_matches(|c| c == '\'' || c == '"') != "<f8" {
        return Err(SolverError::ArrayFormat(format!(
            "expected dtype '<f8', found {}",
            descr
        )));
    }
    let fortran_order = match header_field(header, "fortran_order")? {
        "True" => true,
        "False" => false,
        other => {
            return Err(SolverError::ArrayFormat(format!(
                "bad fortran_order value '{}'",
                other
            )));
        }
    };
    let (rows, cols) = parse_shape(header)?;

    let data = &bytes[data_start..];
    let expected = rows
        .checked_mul(cols)
        .and_then(|n| n.checked_mul(8))
        .ok_or_else(|| {
            SolverError::ArrayFormat(format!("shape ({}, {}) is too large", rows, cols))
        })?;
    if data.len() != expected {
        return Err(SolverError::ArrayFormat(format!(
            "shape ({}, {}) needs {} bytes of data, found {}",
            rows,
            cols,
            expected,
            data.len()
        )));
    }
    let values: Vec<f64> = data
        .chunks_exact(8)
        .map(|chunk| {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            f64::from_le_bytes(buf)
        })
        .collect();
    Ok(if fortran_order {
        DMatrix::from_vec(rows, cols, values)
    } else {
        DMatrix::from_row_slice(rows, cols, &values)
    })
}

/// Raw value text of `'key': value` in the header dict (up to the next comma
/// outside parentheses).
fn header_field<'a>(header: &'a str, key: &str) -> SolverResult<&'a str> {
    let pattern = format!("'{}':", key);
    let start = header
        .find(&pattern)
        .map(|i| i + pattern.len())
        .ok_or_else(|| SolverError::ArrayFormat(format!("header has no '{}' field", key)))?;
    let rest = &header[start..];
    let mut depth = 0usize;
    let mut end = rest.len();
    for (i, c) in rest.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' | '}' if depth == 0 => {
                end = i;
                break;
            }
            _ => {}
        }
    }
    Ok(rest[..end].trim())
}

fn parse_shape(header: &str) -> SolverResult<(usize, usize)> {
    let shape = header_field(header, "shape")?;
    let inner = shape
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| SolverError::ArrayFormat(format!("bad shape '{}'", shape)))?;
    let dims = inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|e| SolverError::ArrayFormat(format!("bad dimension '{}': {}", s, e)))
        })
        .collect::<SolverResult<Vec<usize>>>()?;
    match dims.as_slice() {
        [rows, cols] => Ok((*rows, *cols)),
        _ => Err(SolverError::ArrayFormat(format!(
            "expected a 2-D array, found shape {}",
            shape
        ))),
    }
}

pub fn save_matrix<P: AsRef<Path>>(path: P, matrix: &DMatrix<f64>) -> SolverResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, to_npy_bytes(matrix))?;
    info!(
        "saved {}x{} array to '{}'",
        matrix.nrows(),
        matrix.ncols(),
        path.display()
    );
    Ok(())
}

pub fn load_matrix<P: AsRef<Path>>(path: P) -> SolverResult<DMatrix<f64>> {
    let bytes = fs::read(path)?;
    from_npy_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_header_is_aligned_and_row_major() {
        let m = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let bytes = to_npy_bytes(&m);
        let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
        let data_start = 10 + header_len;
        assert_eq!(data_start % 64, 0);
        assert_eq!(bytes[data_start - 1], b'\n');
        let header = std::str::from_utf8(&bytes[10..data_start]).unwrap();
        assert!(header.contains("'shape': (2, 3)"));
        // second stored value is m[(0, 1)]
        let second = f64::from_le_bytes(bytes[data_start + 8..data_start + 16].try_into().unwrap());
        assert_eq!(second, 2.0);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("field.npy");
        let m = DMatrix::from_fn(4, 7, |i, j| (i as f64).sin() + j as f64 * 0.25);
        save_matrix(&path, &m).unwrap();
        let loaded = load_matrix(&path).unwrap();
        assert_eq!(loaded, m);
    }

    #[test]
    fn test_fortran_order_is_honoured() {
        let header = "{'descr': '<f8', 'fortran_order': True, 'shape': (2, 2), }";
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&[1, 0]);
        bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
        bytes.extend_from_slice(header.as_bytes());
        for v in [1.0f64, 2.0, 3.0, 4.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let m = from_npy_bytes(&bytes).unwrap();
        // column-major: first column is (1, 2)
        assert_eq!(m[(1, 0)], 2.0);
        assert_eq!(m[(0, 1)], 3.0);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            from_npy_bytes(b"not an array"),
            Err(SolverError::ArrayFormat(_))
        ));
        let m = DMatrix::from_element(2, 2, 1.0);
        let mut bytes = to_npy_bytes(&m);
        bytes.truncate(bytes.len() - 3);
        assert!(matches!(
            from_npy_bytes(&bytes),
            Err(SolverError::ArrayFormat(_))
        ));
        let valid = to_npy_bytes(&m);
        let data_start = 10 + u16::from_le_bytes([valid[8], valid[9]]) as usize;
        let wrong_dtype = std::str::from_utf8(&valid[10..data_start])
            .unwrap()
            .replace("<f8", "<i8");
        let mut bytes = valid[..10].to_vec();
        bytes.extend_from_slice(wrong_dtype.as_bytes());
        bytes.extend_from_slice(&valid[data_start..]);
        assert!(matches!(
            from_npy_bytes(&bytes),
            Err(SolverError::ArrayFormat(_))
        ));

        // element count overflows usize
        let header = "{'descr': '<f8', 'fortran_order': False, 'shape': (4611686018427387904, 4), }";
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&[1, 0]);
        bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
        bytes.extend_from_slice(header.as_bytes());
        bytes.extend_from_slice(&1.0f64.to_le_bytes());
        assert!(matches!(
            from_npy_bytes(&bytes),
            Err(SolverError::ArrayFormat(ref msg)) if msg.contains("too large")
        ));
    }
}
