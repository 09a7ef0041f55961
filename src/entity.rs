use std::collections::BTreeSet;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn within_box(&self, min: f64, max: f64) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .all(|v| *v >= min && *v <= max)
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

#[derive(Debug, Clone)]
pub struct Entity<P> {
    pub name: String,
    pub position: Vec3,
    pub payload: P,
}

impl<P> Entity<P> {
    pub fn new(name: impl Into<String>, position: Vec3, payload: P) -> Self {
        Self {
            name: name.into(),
            position,
            payload,
        }
    }
}

/// `row` is the zero-based index of the entity in file order, which some
/// payloads record as their position along the genome.
pub trait FromColumns: Sized {
    fn from_columns(row: usize, columns: &[&str]) -> Result<Self>;
}

impl FromColumns for () {
    fn from_columns(_row: usize, columns: &[&str]) -> Result<Self> {
        if !columns.is_empty() {
            anyhow::bail!("expected no payload columns, got {}", columns.len());
        }
        Ok(())
    }
}

pub fn resolve<'a, P>(population: &'a [Entity<P>], members: &[usize]) -> Vec<&'a Entity<P>> {
    members.iter().map(|&idx| &population[idx]).collect()
}

pub fn name_set<P>(population: &[Entity<P>], members: &[usize]) -> BTreeSet<String> {
    members
        .iter()
        .map(|&idx| population[idx].name.clone())
        .collect()
}
