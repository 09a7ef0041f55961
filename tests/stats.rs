use sphere_test::math::stats::{mean, median, pairwise_mean, population_stdev, root_sum_sq_dev};

#[test]
fn mean_of_empty_is_zero() {
    assert_eq!(mean(&[]), 0.0);
    assert!((mean(&[1.0, 2.0, 6.0]) - 3.0).abs() < 1e-12);
}

#[test]
fn median_odd_even() {
    let mut v1 = vec![3.0, 1.0, 2.0];
    assert_eq!(median(&mut v1), 2.0);
    let mut v2 = vec![4.0, 1.0, 2.0, 3.0];
    assert_eq!(median(&mut v2), 2.5);
}

#[test]
fn population_stdev_uses_n_denominator() {
    let s = population_stdev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
    assert!((s - 2.0).abs() < 1e-12);
}

#[test]
fn root_sum_sq_dev_has_no_denominator() {
    // deviations -1, 0, 1
    let s = root_sum_sq_dev(&[1.0, 2.0, 3.0]);
    assert!((s - 2.0f64.sqrt()).abs() < 1e-12);
}

#[test]
fn pairwise_mean_averages_unordered_pairs() {
    let items = [0.0_f64, 1.0, 3.0];
    let m = pairwise_mean(&items, |a, b| Ok((b - a).abs())).unwrap();
    // pairs: 1, 3, 2
    assert!((m - 2.0).abs() < 1e-12);
}

#[test]
fn pairwise_mean_rejects_single_item() {
    let err = pairwise_mean(&[1.0], |_, _| Ok(0.0)).unwrap_err();
    assert!(err.to_string().contains("at least 2"));
}
