use sphere_test::sampler::{PopulationSampler, stream_rng};

#[test]
fn empty_population_is_an_error() {
    assert!(PopulationSampler::new(0, stream_rng(1, 0)).is_err());
}

#[test]
fn sample_has_requested_size_and_range() {
    let mut sampler = PopulationSampler::new(7, stream_rng(1, 0)).unwrap();
    for k in [0, 1, 5, 50] {
        let sample = sampler.sample(k);
        assert_eq!(sample.len(), k);
        assert!(sample.iter().all(|&i| i < 7));
    }
}

#[test]
fn repeats_within_a_sample_are_kept() {
    // 20 picks out of 2 entities must repeat.
    let mut sampler = PopulationSampler::new(2, stream_rng(5, 0)).unwrap();
    let sample = sampler.sample(20);
    assert_eq!(sample.len(), 20);
    assert!(sample.contains(&0));
    assert!(sample.contains(&1));
}

#[test]
fn sample_into_reuses_buffer() {
    let mut sampler = PopulationSampler::new(10, stream_rng(2, 0)).unwrap();
    let mut buf = vec![99; 40];
    sampler.sample_into(3, &mut buf);
    assert_eq!(buf.len(), 3);
    assert!(buf.iter().all(|&i| i < 10));
}

#[test]
fn streams_are_independent() {
    let mut a = PopulationSampler::new(1000, stream_rng(3, 0)).unwrap();
    let mut b = PopulationSampler::new(1000, stream_rng(3, 1)).unwrap();
    assert_ne!(a.sample(16), b.sample(16));
}
