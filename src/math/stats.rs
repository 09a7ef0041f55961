//! Small statistical primitives shared by the signal statistics.
//!
//! Note: `median` reorders the input slice.

use anyhow::{Result, bail};

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        let a = values[n / 2 - 1];
        let b = values[n / 2];
        (a + b) / 2.0
    }
}

pub fn population_stdev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values
        .iter()
        .map(|v| {
            let d = v - avg;
            d * d
        })
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

pub fn root_sum_sq_dev(values: &[f64]) -> f64 {
    let avg = mean(values);
    values
        .iter()
        .map(|v| {
            let d = v - avg;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Fails for fewer than two items: the mean over zero pairs is undefined.
pub fn pairwise_mean<T, F>(items: &[T], mut f: F) -> Result<f64>
where
    F: FnMut(&T, &T) -> Result<f64>,
{
    if items.len() < 2 {
        bail!(
            "pairwise statistic needs at least 2 members, got {}",
            items.len()
        );
    }
    let mut total = 0.0;
    let mut pairs = 0usize;
    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            total += f(&items[i], &items[j])?;
            pairs += 1;
        }
    }
    Ok(total / pairs as f64)
}
