use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::entity::{Entity, FromColumns, Vec3};
use crate::io::open_maybe_gz;

const COORD_COLUMNS: [&str; 4] = ["name", "x", "y", "z"];

/// The first data line is the header. Blank lines and `#` comments are
/// skipped. Payload columns are handed to `P::from_columns` together with
/// the zero-based entity index.
pub fn load_entities<P: FromColumns>(path: &Path) -> Result<Vec<Entity<P>>> {
    let reader = BufReader::new(open_maybe_gz(path)?);
    let source = path.display().to_string();

    let mut entities: Vec<Entity<P>> = Vec::new();
    let mut first_line: HashMap<String, usize> = HashMap::new();
    let mut header_seen = false;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("{}:{} read failed", source, line_no))?;
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.trim().is_empty() || trimmed.trim_start().starts_with('#') {
            continue;
        }
        let columns: Vec<&str> = trimmed.split('\t').collect();

        if !header_seen {
            check_header(&columns).with_context(|| format!("{}:{} bad header", source, line_no))?;
            header_seen = true;
            continue;
        }

        if columns.len() < COORD_COLUMNS.len() {
            bail!(
                "{}:{} malformed row (expected at least {} columns, got {})",
                source,
                line_no,
                COORD_COLUMNS.len(),
                columns.len()
            );
        }
        let name = columns[0].trim();
        if name.is_empty() {
            bail!("{}:{} empty entity name", source, line_no);
        }
        if let Some(first) = first_line.get(name) {
            bail!(
                "{}:{} duplicate entity name '{}' (first seen on line {})",
                source,
                line_no,
                name,
                first
            );
        }
        let position = Vec3::new(
            parse_coord(columns[1], "x", &source, line_no)?,
            parse_coord(columns[2], "y", &source, line_no)?,
            parse_coord(columns[3], "z", &source, line_no)?,
        );
        let payload = P::from_columns(entities.len(), &columns[COORD_COLUMNS.len()..])
            .with_context(|| format!("{}:{} invalid payload for '{}'", source, line_no, name))?;

        first_line.insert(name.to_string(), line_no);
        entities.push(Entity::new(name, position, payload));
    }

    if !header_seen {
        bail!("{} has no header line", source);
    }
    info!(path = %source, entities = entities.len(), "entities_loaded");
    Ok(entities)
}

fn check_header(columns: &[&str]) -> Result<()> {
    if columns.len() < COORD_COLUMNS.len() {
        bail!(
            "expected header starting with name, x, y, z; got {} columns",
            columns.len()
        );
    }
    for (got, expected) in columns.iter().zip(COORD_COLUMNS) {
        if !got.trim().eq_ignore_ascii_case(expected) {
            bail!("expected column '{}', found '{}'", expected, got.trim());
        }
    }
    Ok(())
}

fn parse_coord(raw: &str, axis: &str, source: &str, line_no: usize) -> Result<f64> {
    let value = raw
        .trim()
        .parse::<f64>()
        .with_context(|| format!("{}:{} invalid {} coordinate '{}'", source, line_no, axis, raw))?;
    if !value.is_finite() {
        bail!("{}:{} non-finite {} coordinate", source, line_no, axis);
    }
    Ok(value)
}
