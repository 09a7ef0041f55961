//! Packed coexpression matrix.
//!
//! Layout: every gene name as a NUL-terminated string, an empty name closing
//! the list, then `n * n` bytes in row-major order. Each byte is a score in
//! tenths (scores run from 0.0 to 25.5 with one decimal digit).

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use memmap2::Mmap;
use tracing::{info, warn};

use crate::io::open_maybe_gz;

const SCORE_SCALE: f64 = 10.0;

#[derive(Debug)]
enum Storage {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Storage {
    fn bytes(&self) -> &[u8] {
        match self {
            Storage::Mapped(m) => &m[..],
            Storage::Owned(v) => &v[..],
        }
    }
}

#[derive(Debug)]
pub struct CoexMatrix {
    genes: Vec<String>,
    index: HashMap<String, usize>,
    storage: Storage,
    scores_offset: usize,
}

impl CoexMatrix {
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("failed to map {}", path.display()))?;
        let matrix = Self::from_storage(Storage::Mapped(mmap))
            .with_context(|| format!("invalid packed coexpression file {}", path.display()))?;
        info!(
            path = %path.display(),
            genes = matrix.len(),
            "coexpression_matrix_loaded"
        );
        Ok(matrix)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_storage(Storage::Owned(bytes))
    }

    fn from_storage(storage: Storage) -> Result<Self> {
        let bytes = storage.bytes();
        let mut genes = Vec::new();
        let mut pos = 0usize;
        loop {
            let Some(rel_end) = bytes[pos..].iter().position(|&b| b == 0) else {
                bail!(
                    "packed file is corrupted: gene name list not terminated after {} genes",
                    genes.len()
                );
            };
            let end = pos + rel_end;
            if end == pos {
                pos += 1;
                break;
            }
            let name = std::str::from_utf8(&bytes[pos..end])
                .with_context(|| format!("gene name {} is not UTF-8", genes.len() + 1))?;
            genes.push(name.to_string());
            pos = end + 1;
        }

        let n = genes.len();
        let needed = n * n;
        let available = bytes.len() - pos;
        if available < needed {
            bail!(
                "packed file is too short: need {} scores, have {}",
                needed,
                available
            );
        }
        if available > needed {
            warn!(
                extra = available - needed,
                "packed coexpression file has trailing bytes"
            );
        }

        let mut index = HashMap::with_capacity(n);
        for (i, gene) in genes.iter().enumerate() {
            if index.insert(gene.clone(), i).is_some() {
                bail!("duplicate gene '{}' in packed file", gene);
            }
        }

        Ok(Self {
            genes,
            index,
            storage,
            scores_offset: pos,
        })
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn index_of(&self, gene: &str) -> Option<usize> {
        self.index.get(gene).copied()
    }

    pub fn raw(&self, i: usize, j: usize) -> Option<u8> {
        let n = self.genes.len();
        if i >= n || j >= n {
            return None;
        }
        self.storage
            .bytes()
            .get(self.scores_offset + i * n + j)
            .copied()
    }

    pub fn score(&self, i: usize, j: usize) -> Option<f64> {
        self.raw(i, j).map(|v| v as f64 / SCORE_SCALE)
    }

    pub fn score_by_name(&self, a: &str, b: &str) -> Option<f64> {
        self.score(self.index_of(a)?, self.index_of(b)?)
    }
}

pub fn write_packed(path: &Path, genes: &[String], scores: &[u8]) -> Result<()> {
    if scores.len() != genes.len() * genes.len() {
        bail!(
            "score matrix has {} entries, expected {}",
            scores.len(),
            genes.len() * genes.len()
        );
    }
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    for gene in genes {
        if gene.is_empty() || gene.as_bytes().contains(&0) {
            bail!("gene name '{}' cannot be packed", gene);
        }
        w.write_all(gene.as_bytes())?;
        w.write_all(&[0])?;
    }
    w.write_all(&[0])?;
    w.write_all(scores)?;
    w.flush()?;
    Ok(())
}

/// Pairs missing from the table score 0. Returns the number of genes packed.
pub fn pack_tsv(input: &Path, output: &Path) -> Result<usize> {
    let reader = BufReader::new(open_maybe_gz(input)?);
    let source = input.display().to_string();
    let mut pairs: BTreeMap<(String, String), u8> = BTreeMap::new();
    let mut genes: BTreeSet<String> = BTreeSet::new();
    let mut header_allowed = true;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("{}:{} read failed", source, line_no))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = trimmed.split('\t').collect();
        if parts.len() != 3 {
            bail!("{}:{} malformed TSV (expected 3 columns)", source, line_no);
        }
        let first_data_line = std::mem::replace(&mut header_allowed, false);
        let score = match parts[2].trim().parse::<f64>() {
            Ok(v) => v,
            Err(_) if first_data_line => continue,
            Err(_) => bail!("{}:{} invalid score '{}'", source, line_no, parts[2]),
        };
        let packed = (score * SCORE_SCALE).round();
        if !(0.0..=255.0).contains(&packed) {
            bail!(
                "{}:{} score {} outside packable range 0.0..=25.5",
                source,
                line_no,
                score
            );
        }
        let (a, b) = (parts[0].trim().to_string(), parts[1].trim().to_string());
        genes.insert(a.clone());
        genes.insert(b.clone());
        pairs.insert((a, b), packed as u8);
    }

    let genes: Vec<String> = genes.into_iter().collect();
    let index: HashMap<&str, usize> = genes
        .iter()
        .enumerate()
        .map(|(i, g)| (g.as_str(), i))
        .collect();
    let n = genes.len();
    let mut scores = vec![0u8; n * n];
    for ((a, b), v) in &pairs {
        scores[index[a.as_str()] * n + index[b.as_str()]] = *v;
    }

    write_packed(output, &genes, &scores)?;
    info!(
        genes = n,
        pairs = pairs.len(),
        out = %output.display(),
        "coexpression_packed"
    );
    Ok(n)
}
