//! Duplicate and homonym detection over registered individuals.
//!
//! A candidate is compared against everything already indexed: a shared CPF
//! is a duplicate, a shared name is a homonym, and a shared name backed by the
//! same mother or birth date is most likely the same person registered twice.

use crate::domain::model::Individual;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    DuplicateCpf,
    LikelySamePerson,
    Homonym,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryMatch {
    pub row: usize,
    pub kind: MatchKind,
}

/// Upper-cased, whitespace-collapsed comparison key for person names.
pub fn name_key(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn optional_key(value: Option<&str>) -> Option<String> {
    value.map(name_key).filter(|k| !k.is_empty())
}

#[derive(Debug)]
struct Entry {
    row: usize,
    mother: Option<String>,
    birth_date: Option<String>,
}

#[derive(Debug, Default)]
pub struct RegistryIndex {
    entries: Vec<Entry>,
    by_cpf: HashMap<String, Vec<usize>>,
    by_name: HashMap<String, Vec<usize>>,
}

impl RegistryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: &[Individual]) -> Self {
        let mut index = Self::new();
        for (row, individual) in records.iter().enumerate() {
            index.insert(row + 1, individual);
        }
        index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indexes `individual` under `row`. Invalid CPFs are not indexed.
    pub fn insert(&mut self, row: usize, individual: &Individual) {
        let slot = self.entries.len();
        self.entries.push(Entry {
            row,
            mother: optional_key(individual.mother.as_deref()),
            birth_date: individual
                .birth_date
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        });

        if let Some(Ok(cpf)) = individual.cpf() {
            self.by_cpf.entry(cpf.digits()).or_default().push(slot);
        }

        let key = name_key(&individual.name);
        if !key.is_empty() {
            self.by_name.entry(key).or_default().push(slot);
        }
    }

    /// Every indexed row that collides with `candidate`, strongest kind per row,
    /// ordered by row.
    pub fn matches(&self, candidate: &Individual) -> Vec<RegistryMatch> {
        let mut found: BTreeMap<usize, MatchKind> = BTreeMap::new();

        if let Some(Ok(cpf)) = candidate.cpf() {
            for &slot in self.by_cpf.get(&cpf.digits()).into_iter().flatten() {
                found.insert(self.entries[slot].row, MatchKind::DuplicateCpf);
            }
        }

        let mother = optional_key(candidate.mother.as_deref());
        let birth_date = candidate
            .birth_date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());

        let key = name_key(&candidate.name);
        for &slot in self.by_name.get(&key).into_iter().flatten() {
            let entry = &self.entries[slot];
            let same_mother = matches!((&mother, &entry.mother), (Some(a), Some(b)) if a == b);
            let same_birth =
                matches!((birth_date, entry.birth_date.as_deref()), (Some(a), Some(b)) if a == b);

            let kind = if same_mother || same_birth {
                MatchKind::LikelySamePerson
            } else {
                MatchKind::Homonym
            };

            found
                .entry(entry.row)
                .and_modify(|existing| *existing = (*existing).min(kind))
                .or_insert(kind);
        }

        found
            .into_iter()
            .map(|(row, kind)| RegistryMatch { row, kind })
            .collect()
    }
}

/// Case-insensitive substring search on name or alias. An empty query keeps
/// every record.
pub fn search<'a>(records: &'a [Individual], query: &str) -> Vec<&'a Individual> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|ind| {
            ind.name.to_lowercase().contains(&needle)
                || ind
                    .alias
                    .as_deref()
                    .is_some_and(|alias| alias.to_lowercase().contains(&needle))
        })
        .collect()
}
