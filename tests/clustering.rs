use sphere_test::cluster::{
    GeneSet, claim_genes, cluster_gene_sets, cluster_label, merge_overlapping, overlap_ratio,
};

fn set(names: &[&str]) -> GeneSet {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn overlap_ratio_uses_smaller_set() {
    let a = set(&["A", "B", "C", "D"]);
    let b = set(&["C", "D", "E"]);
    assert!((overlap_ratio(&a, &b) - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(overlap_ratio(&a, &GeneSet::new()), 0.0);
}

#[test]
fn merges_at_half_threshold() {
    let sets = vec![set(&["A", "B", "C", "D"]), set(&["C", "D", "E"])];
    let out = merge_overlapping(sets, 0.5);
    assert_eq!(out.sets, vec![set(&["A", "B", "C", "D", "E"])]);
    assert_eq!(out.merges, 1);
}

#[test]
fn stays_separate_above_ratio() {
    let sets = vec![set(&["A", "B", "C", "D"]), set(&["C", "D", "E"])];
    let out = merge_overlapping(sets, 0.7);
    assert_eq!(out.sets.len(), 2);
    assert_eq!(out.merges, 0);
    assert!((out.stop_ratio - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn residual_overlap_is_below_threshold() {
    let sets = vec![
        set(&["A", "B", "C"]),
        set(&["C", "D", "E"]),
        set(&["E", "F", "G", "H"]),
        set(&["X", "Y"]),
        set(&["Y", "Z"]),
        set(&["Q"]),
    ];
    let threshold = 0.4;
    let out = merge_overlapping(sets, threshold);
    assert!(out.merges <= 5);
    for i in 0..out.sets.len() {
        for j in (i + 1)..out.sets.len() {
            assert!(overlap_ratio(&out.sets[i], &out.sets[j]) < threshold);
        }
    }
}

#[test]
fn first_pair_wins_ties() {
    // (0,1) and (1,2) both overlap fully; (0,1) is found first.
    let sets = vec![set(&["A", "B"]), set(&["A", "B"]), set(&["B"])];
    let out = merge_overlapping(sets, 1.1);
    assert_eq!(out.merges, 0);
    let sets = vec![set(&["A", "B"]), set(&["A", "B"]), set(&["B", "C"]), set(&["Z"])];
    let out = merge_overlapping(sets, 0.9);
    // After merging (0,1): swap_remove(1) -> [AB, AB, BC, Z] -> [AB, Z, BC];
    // swap_remove(0) -> [BC, Z]; push -> [BC, Z, AB].
    assert_eq!(out.sets[0], set(&["B", "C"]));
    assert_eq!(out.sets[1], set(&["Z"]));
    assert_eq!(out.sets[2], set(&["A", "B"]));
}

#[test]
fn single_set_stops_immediately() {
    let out = merge_overlapping(vec![set(&["A"])], 0.05);
    assert_eq!(out.sets.len(), 1);
    assert_eq!(out.stop_ratio, 0.0);
    let out = merge_overlapping(Vec::new(), 0.05);
    assert!(out.sets.is_empty());
}

#[test]
fn smaller_cluster_keeps_shared_genes() {
    let sets = vec![set(&["A", "B", "C", "D"]), set(&["D", "E"])];
    let out = claim_genes(sets);
    assert_eq!(out, vec![set(&["D", "E"]), set(&["A", "B", "C"])]);
}

#[test]
fn emptied_clusters_are_dropped() {
    let sets = vec![set(&["A", "B", "C"]), set(&["A"]), set(&["B", "C"])];
    let out = claim_genes(sets);
    assert_eq!(out, vec![set(&["A"]), set(&["B", "C"])]);
}

#[test]
fn final_clusters_are_disjoint_and_labelled() {
    let sets = vec![
        set(&["A", "B", "C", "D"]),
        set(&["C", "D", "E"]),
        set(&["P", "Q"]),
        set(&["Q", "R", "S", "T", "U"]),
        set(&["K"]),
    ];
    let outcome = cluster_gene_sets(sets, 0.6);
    let mut seen = GeneSet::new();
    for cluster in &outcome.clusters {
        for gene in &cluster.genes {
            assert!(seen.insert(gene.clone()), "{} appears twice", gene);
        }
    }
    let labels: Vec<&str> = outcome.clusters.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels[0], "A");
    assert_eq!(outcome.input_sets, 5);
    for pair in outcome.clusters.windows(2) {
        assert!(pair[0].genes.len() <= pair[1].genes.len());
    }
}

#[test]
fn labels_continue_after_z() {
    assert_eq!(cluster_label(0), "A");
    assert_eq!(cluster_label(25), "Z");
    assert_eq!(cluster_label(26), "AA");
    assert_eq!(cluster_label(27), "AB");
    assert_eq!(cluster_label(51), "AZ");
    assert_eq!(cluster_label(52), "BA");
    assert_eq!(cluster_label(701), "ZZ");
    assert_eq!(cluster_label(702), "AAA");
}

#[test]
fn emptied_cluster_takes_no_label() {
    // pairwise overlap 0.5 stays below 0.6, so nothing merges
    let sets = vec![set(&["A", "B"]), set(&["C", "D"]), set(&["A", "C"])];
    let out = cluster_gene_sets(sets, 0.6);
    assert_eq!(out.merges, 0);
    let labels: Vec<&str> = out.clusters.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, ["A", "B"]);
    assert_eq!(out.clusters[0].genes, ["A", "B"]);
    assert_eq!(out.clusters[1].genes, ["C", "D"]);
}
