//! Small numeric helpers shared by the aggregation and output code.
//!
//! Note: `median` sorts the input slice.

pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

pub fn mean(sum: u64, n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        sum as f64 / n as f64
    }
}

pub fn median(values: &mut [u8]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_unstable();
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2] as f64
    } else {
        let a = values[n / 2 - 1] as f64;
        let b = values[n / 2] as f64;
        (a + b) / 2.0
    }
}

/// Integer form of `count / total >= pct / 100`, free of rounding at the
/// threshold.
pub fn at_least_pct(count: usize, total: usize, pct: u32) -> bool {
    total > 0 && (count as u64) * 100 >= (pct as u64) * (total as u64)
}

pub fn round6(v: f64) -> f64 {
    (v * 1_000_000.0).round() / 1_000_000.0
}
