use std::fs;
use std::sync::Arc;

use sphere_test::entity::{Entity, Vec3};
use sphere_test::io::coex::{CoexMatrix, pack_tsv, write_packed};
use sphere_test::signal::coexpression::attach_coex_indices;
use sphere_test::signal::{CoexpressionScore, Signal};
use tempfile::TempDir;

fn packed(genes: &[&str], scores: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for g in genes {
        bytes.extend_from_slice(g.as_bytes());
        bytes.push(0);
    }
    bytes.push(0);
    bytes.extend_from_slice(scores);
    bytes
}

#[test]
fn reads_names_and_scores() {
    let bytes = packed(&["A", "B"], &[0, 25, 30, 0]);
    let m = CoexMatrix::from_bytes(bytes).unwrap();
    assert_eq!(m.len(), 2);
    assert_eq!(m.genes(), &["A".to_string(), "B".to_string()]);
    assert_eq!(m.index_of("B"), Some(1));
    assert_eq!(m.raw(0, 1), Some(25));
    assert!((m.score(1, 0).unwrap() - 3.0).abs() < 1e-12);
    assert!((m.score_by_name("A", "B").unwrap() - 2.5).abs() < 1e-12);
    assert_eq!(m.score(2, 0), None);
}

#[test]
fn truncated_scores_are_rejected() {
    let bytes = packed(&["A", "B"], &[0, 25, 30]);
    let err = CoexMatrix::from_bytes(bytes).unwrap_err();
    assert!(err.to_string().contains("too short"));
}

#[test]
fn unterminated_name_list_is_rejected() {
    let err = CoexMatrix::from_bytes(b"A\0B".to_vec()).unwrap_err();
    assert!(err.to_string().contains("not terminated"));
}

#[test]
fn duplicate_genes_are_rejected() {
    let bytes = packed(&["A", "A"], &[0, 0, 0, 0]);
    assert!(CoexMatrix::from_bytes(bytes).is_err());
}

#[test]
fn pack_tsv_sorts_genes_and_fills_missing_pairs() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("coex.tsv");
    let output = tmp.path().join("coex.bin");
    fs::write(
        &input,
        "gene1\tgene2\tscore\nYBR\tYAL\t2.5\nYAL\tYBR\t2.5\nYAL\tYCR\t12.3\n",
    )
    .unwrap();

    let n = pack_tsv(&input, &output).unwrap();
    assert_eq!(n, 3);

    let m = CoexMatrix::open(&output).unwrap();
    assert_eq!(m.genes(), &["YAL".to_string(), "YBR".to_string(), "YCR".to_string()]);
    assert_eq!(m.raw(0, 1), Some(25));
    assert_eq!(m.raw(0, 2), Some(123));
    assert_eq!(m.raw(2, 0), Some(0));
    assert_eq!(m.raw(1, 1), Some(0));
}

#[test]
fn pack_tsv_rejects_out_of_range_scores() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("coex.tsv");
    fs::write(&input, "A\tB\t30.0\n").unwrap();
    let err = pack_tsv(&input, &tmp.path().join("out.bin")).unwrap_err();
    assert!(err.to_string().contains("outside packable range"));
}

#[test]
fn pack_tsv_header_may_follow_comments() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("coex.tsv");
    let output = tmp.path().join("coex.bin");
    fs::write(
        &input,
        "# exported scores\n\ngene1\tgene2\tscore\nA\tB\t1.5\n",
    )
    .unwrap();
    assert_eq!(pack_tsv(&input, &output).unwrap(), 2);
    let m = CoexMatrix::open(&output).unwrap();
    assert_eq!(m.raw(0, 1), Some(15));
}

#[test]
fn pack_tsv_rejects_bad_score_after_first_row() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("coex.tsv");
    fs::write(&input, "A\tB\t1.5\nB\tC\tscore\n").unwrap();
    let err = pack_tsv(&input, &tmp.path().join("out.bin")).unwrap_err();
    assert!(err.to_string().contains("invalid score"));
}

#[test]
fn write_packed_checks_matrix_size() {
    let tmp = TempDir::new().unwrap();
    let genes = vec!["A".to_string(), "B".to_string()];
    assert!(write_packed(&tmp.path().join("x.bin"), &genes, &[1, 2, 3]).is_err());
}

#[test]
fn coexpression_statistic_reads_shared_matrix() {
    let bytes = packed(&["A", "B", "C"], &[0, 10, 20, 10, 0, 30, 20, 30, 0]);
    let matrix = Arc::new(CoexMatrix::from_bytes(bytes).unwrap());
    let entities = vec![
        Entity::new("C", Vec3::new(0.0, 0.0, 0.0), ()),
        Entity::new("A", Vec3::new(1.0, 0.0, 0.0), ()),
        Entity::new("Q", Vec3::new(2.0, 0.0, 0.0), ()),
        Entity::new("B", Vec3::new(3.0, 0.0, 0.0), ()),
    ];
    let (population, skipped) = attach_coex_indices(entities, &matrix).unwrap();
    assert_eq!(skipped, vec!["Q".to_string()]);
    assert_eq!(population.len(), 3);

    let signal = CoexpressionScore::new(Arc::clone(&matrix));
    let sample: Vec<&Entity<_>> = population.iter().collect();
    // pairs C-A 2.0, C-B 3.0, A-B 1.0
    let stat = signal.statistic(&sample).unwrap();
    assert!((stat - 2.0).abs() < 1e-12);
    assert!(signal.statistic(&sample[..1]).is_err());
    assert_eq!(signal.min_sample_len(), 2);
}
