use std::collections::BTreeSet;

pub type GeneSet = BTreeSet<String>;

pub fn overlap_ratio(a: &GeneSet, b: &GeneSet) -> f64 {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return 0.0;
    }
    let shared = if a.len() <= b.len() {
        a.iter().filter(|g| b.contains(*g)).count()
    } else {
        b.iter().filter(|g| a.contains(*g)).count()
    };
    shared as f64 / smaller as f64
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub sets: Vec<GeneSet>,
    pub stop_ratio: f64,
    pub merges: usize,
}

/// Ties go to the first pair found in scan order. The merged set replaces
/// both inputs at the end of the list.
pub fn merge_overlapping(mut sets: Vec<GeneSet>, threshold: f64) -> MergeOutcome {
    let mut merges = 0;
    loop {
        if sets.len() < 2 {
            return MergeOutcome {
                sets,
                stop_ratio: 0.0,
                merges,
            };
        }
        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..sets.len() {
            for j in (i + 1)..sets.len() {
                let ratio = overlap_ratio(&sets[i], &sets[j]);
                if best.is_none_or(|(_, _, r)| ratio > r) {
                    best = Some((i, j, ratio));
                }
            }
        }
        let Some((i, j, ratio)) = best else {
            return MergeOutcome {
                sets,
                stop_ratio: 0.0,
                merges,
            };
        };
        if ratio < threshold {
            return MergeOutcome {
                sets,
                stop_ratio: ratio,
                merges,
            };
        }
        // j > i, so removing j first leaves i in place.
        let second = sets.swap_remove(j);
        let mut first = sets.swap_remove(i);
        first.extend(second);
        sets.push(first);
        merges += 1;
    }
}

/// Makes clusters disjoint: smaller clusters claim their genes first, and
/// every later cluster loses genes already claimed. Clusters left empty are
/// dropped.
pub fn claim_genes(mut sets: Vec<GeneSet>) -> Vec<GeneSet> {
    sets.sort_by_key(|s| s.len());
    let mut claimed = GeneSet::new();
    let mut out = Vec::with_capacity(sets.len());
    for set in sets {
        let kept: GeneSet = set.difference(&claimed).cloned().collect();
        if kept.is_empty() {
            continue;
        }
        claimed.extend(kept.iter().cloned());
        out.push(kept);
    }
    out
}

/// Spreadsheet-style label: A..Z, then AA, AB, ...
///
/// Labels are dealt after `claim_genes`, so a cluster emptied by claiming
/// takes no letter and later clusters move up one.
pub fn cluster_label(index: usize) -> String {
    let mut n = index + 1;
    let mut label = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub label: String,
    pub genes: Vec<String>,
    pub statistic: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOutcome {
    pub clusters: Vec<Cluster>,
    pub max_overlap_ratio: f64,
    pub merges: usize,
    pub input_sets: usize,
}

pub fn cluster_gene_sets(sets: Vec<GeneSet>, overlap_threshold: f64) -> ClusterOutcome {
    let input_sets = sets.len();
    let merged = merge_overlapping(sets, overlap_threshold);
    let clusters = claim_genes(merged.sets)
        .into_iter()
        .enumerate()
        .map(|(i, genes)| Cluster {
            label: cluster_label(i),
            genes: genes.into_iter().collect(),
            statistic: None,
        })
        .collect();
    ClusterOutcome {
        clusters,
        max_overlap_ratio: merged.stop_ratio,
        merges: merged.merges,
        input_sets,
    }
}
