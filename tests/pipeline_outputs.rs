use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use rand::Rng;
use serde_json::Value;
use sphere_test::config::{NullModel, SphereConfig};
use sphere_test::ctx::Ctx;
use sphere_test::entity::{Entity, Vec3};
use sphere_test::pipeline::Pipeline;
use sphere_test::sampler::stream_rng;
use sphere_test::signal::{HistoneDistance, HistoneProfile};
use tempfile::TempDir;

/// A tight histone cluster near one corner of a 40^3 box plus scattered
/// background genes.
fn population() -> Vec<Entity<HistoneProfile>> {
    let mut rng = stream_rng(2024, 0);
    let mut genes = Vec::new();
    for i in 0..30 {
        let p = Vec3::new(
            8.0 + rng.gen_range(-3.0..3.0),
            8.0 + rng.gen_range(-3.0..3.0),
            8.0 + rng.gen_range(-3.0..3.0),
        );
        let marks = vec![rng.gen_range(0.0..0.2), rng.gen_range(0.0..0.2)];
        genes.push(Entity::new(format!("CL{:02}", i), p, HistoneProfile { marks }));
    }
    for i in 0..170 {
        let p = Vec3::new(
            rng.gen_range(0.0..40.0),
            rng.gen_range(0.0..40.0),
            rng.gen_range(0.0..40.0),
        );
        let marks = vec![rng.gen_range(0.0..10.0), rng.gen_range(0.0..10.0)];
        genes.push(Entity::new(format!("BG{:03}", i), p, HistoneProfile { marks }));
    }
    genes
}

fn config(threads: usize, null_model: NullModel) -> SphereConfig {
    SphereConfig {
        sphere_radius: 8.0,
        minimum_gene_count: 3,
        box_min: 0.0,
        box_max: 40.0,
        sample_count: 60,
        random_sample_count: 200,
        p_adj_threshold: 0.05,
        overlap_threshold: 0.05,
        max_rejected_draws: 100_000,
        null_model,
        seed: Some(17),
        threads,
        ..SphereConfig::default()
    }
}

fn run(out: &Path, threads: usize, null_model: NullModel) -> Ctx<HistoneDistance> {
    let mut ctx = Ctx::new(
        "genes.tsv".into(),
        out.to_path_buf(),
        HistoneDistance,
        population(),
        config(threads, null_model),
        17,
    );
    ctx.write_json = true;
    ctx.write_tsv = true;
    Pipeline::sphere_test().run(&mut ctx).unwrap();
    ctx
}

#[test]
fn trials_tsv_header_and_rows() {
    let out = TempDir::new().unwrap();
    run(out.path(), 1, NullModel::PerSize);

    let text = fs::read_to_string(out.path().join("trials.tsv")).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "trial_id\tgene_count\tstatistic_in_sphere\tstatistic_in_random\tnull_mean\tnull_median\tchance_wins\tdraws"
    );
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 60);
    for (i, row) in rows.iter().enumerate() {
        let cols: Vec<&str> = row.split('\t').collect();
        assert_eq!(cols.len(), 8);
        assert_eq!(cols[0], i.to_string());
        assert!(cols[1].parse::<usize>().unwrap() >= 3);
        assert_eq!(cols[7], "200");
    }
}

#[test]
fn pvalues_tsv_is_in_rank_order() {
    let out = TempDir::new().unwrap();
    run(out.path(), 1, NullModel::PerSize);

    let text = fs::read_to_string(out.path().join("pvalues.tsv")).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next().unwrap(), "rank\ttrial_id\tp_value\tadjusted_p_value");
    let mut prev_adj = 0.0;
    for (i, row) in lines.enumerate() {
        let cols: Vec<&str> = row.split('\t').collect();
        assert_eq!(cols[0], (i + 1).to_string());
        let p: f64 = cols[2].parse().unwrap();
        let adj: f64 = cols[3].parse().unwrap();
        assert!(p >= 1.0 / 200.0 - 1e-9 && p <= 1.0);
        assert!(adj + 1e-9 >= prev_adj);
        prev_adj = adj;
    }
}

#[test]
fn report_json_fields_exist() {
    let out = TempDir::new().unwrap();
    run(out.path(), 1, NullModel::PerSize);

    let v: Value = serde_json::from_slice(&fs::read(out.path().join("report.json")).unwrap()).unwrap();
    assert_eq!(v["tool"], "sphere-test");
    assert_eq!(v["schema_version"], "v1");
    assert_eq!(v["seed"], 17);
    assert_eq!(v["signal"]["id"], "histone");
    assert_eq!(v["signal"]["tail"], "lower");
    assert_eq!(v["input_meta"]["entities"], 200);
    assert_eq!(v["sampling"]["accepted_spheres"], 60);
    assert_eq!(v["sampling"]["null_model"], "per-size");
    assert!(v["sampling"]["average_genes_per_sphere"].as_f64().unwrap() >= 3.0);
    assert!(v["significance"]["significant_trials"].is_number());
    assert!(v["clustering"]["clusters"].is_array());
    assert!(v["genome_statistic"].is_number());
    assert_eq!(v["outputs"]["trials_tsv"], "trials.tsv");
    assert_eq!(v["config"]["sphere_radius"], 8.0);
}

#[test]
fn clusters_are_disjoint_and_built_from_significant_genes() {
    let out = TempDir::new().unwrap();
    let ctx = run(out.path(), 2, NullModel::PerSize);

    let mut seen = BTreeSet::new();
    for cluster in &ctx.clusters {
        for gene in &cluster.genes {
            assert!(seen.insert(gene.clone()));
            assert!(ctx.significant_genes.contains(gene));
        }
    }
    for &idx in &ctx.significant {
        assert!(ctx.trials[idx].adjusted_p_value <= ctx.config.p_adj_threshold);
    }

    let clusters_path = out.path().join("clusters.tsv");
    if ctx.clusters.is_empty() {
        assert!(!clusters_path.exists());
    } else {
        let text = fs::read_to_string(clusters_path).unwrap();
        assert_eq!(text.lines().next().unwrap(), "gene\tPromoterFields");
        assert_eq!(text.lines().count(), seen.len() + 1);
    }
}

#[test]
fn results_do_not_depend_on_thread_count() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    let one = run(a.path(), 1, NullModel::PerSize);
    let four = run(b.path(), 4, NullModel::PerSize);
    assert_eq!(one.trials, four.trials);
    assert_eq!(one.clusters, four.clusters);
}

#[test]
fn per_trial_null_model_runs_every_draw() {
    let out = TempDir::new().unwrap();
    let ctx = run(out.path(), 0, NullModel::PerTrial);
    assert!(ctx.null_cache.is_none());
    assert!(ctx.trials.iter().all(|t| t.draws == 200));
    let report = ctx.report.as_ref().unwrap();
    assert_eq!(report.sampling.null_model, "per-trial");
}

#[test]
fn validation_rejects_small_population() {
    let mut genes = population();
    genes.truncate(2);
    let mut ctx = Ctx::new(
        "genes.tsv".into(),
        ".".into(),
        HistoneDistance,
        genes,
        config(1, NullModel::PerSize),
        1,
    );
    let err = Pipeline::validation().run(&mut ctx).unwrap_err();
    assert!(err.to_string().contains("smaller than minimum_gene_count"));
}

#[test]
fn validation_warns_about_entities_outside_box() {
    let mut genes = population();
    genes.push(Entity::new(
        "FAR",
        Vec3::new(500.0, 0.0, 0.0),
        HistoneProfile {
            marks: vec![1.0, 1.0],
        },
    ));
    let mut ctx = Ctx::new(
        "genes.tsv".into(),
        ".".into(),
        HistoneDistance,
        genes,
        config(1, NullModel::PerSize),
        1,
    );
    Pipeline::validation().run(&mut ctx).unwrap();
    assert_eq!(ctx.outside_box, 1);
    assert_eq!(ctx.warnings.len(), 1);
}

#[test]
fn validation_rejects_single_gene_spheres_for_pairwise_signal() {
    let mut ctx = Ctx::new(
        "genes.tsv".into(),
        ".".into(),
        HistoneDistance,
        population(),
        SphereConfig {
            minimum_gene_count: 1,
            ..config(1, NullModel::PerSize)
        },
        1,
    );
    let err = Pipeline::validation().run(&mut ctx).unwrap_err();
    assert!(err.to_string().contains("too small for the histone signal"));
    assert!(ctx.trials.is_empty());
}
