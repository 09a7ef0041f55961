use crate::trial::Trial;

/// Walks from the largest rank down, carrying the running minimum, so the
/// result is non-decreasing in rank and never exceeds 1.
pub fn adjust_sorted(p_values: &[f64]) -> Vec<f64> {
    let n = p_values.len();
    let mut adjusted = vec![0.0; n];
    let Some(&largest) = p_values.last() else {
        return adjusted;
    };
    let mut prev = largest.min(1.0);
    for i in (0..n).rev() {
        let rank = (i + 1) as f64;
        let scaled = p_values[i] * n as f64 / rank;
        prev = prev.min(scaled).min(1.0);
        adjusted[i] = prev;
    }
    adjusted
}

pub fn benjamini_hochberg(trials: &mut [Trial]) {
    if trials.is_empty() {
        return;
    }
    trials.sort_by(|a, b| a.p_value.total_cmp(&b.p_value));
    let p_values: Vec<f64> = trials.iter().map(|t| t.p_value).collect();
    let adjusted = adjust_sorted(&p_values);
    for (i, (trial, q)) in trials.iter_mut().zip(adjusted).enumerate() {
        trial.rank = i + 1;
        trial.adjusted_p_value = q;
    }
}

