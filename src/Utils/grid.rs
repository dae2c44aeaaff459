/// Evenly spaced samples over `[start, end]`, both ends included.
/// The last sample equals `end` exactly.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        end
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

/// Spacing of an `n`-point grid over `[0, extent]`.
pub fn spacing(extent: f64, n: usize) -> f64 {
    extent / (n as f64 - 1.0)
}
