//! compression/optimisation.rs
//! Dense re-ranking of token indices ahead of entropy coding.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::compression::types::CompressionError;

pub const FREQUENCY_DENSE: &str = "frequency-dense";

/// Serialized form stored under `optimisation` in compression extras.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimisationMetadata {
    pub strategy: String,
    pub dense_to_original: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOptimisationPlan {
    strategy: String,
    dense_to_original: Vec<u32>,
    original_to_dense: HashMap<u32, u32>,
}

impl TokenOptimisationPlan {
    /// Plan for one stream; `None` when there is nothing to rank.
    pub fn build(symbols: &[u32]) -> Option<Self> {
        let mut counts = BTreeMap::new();
        for symbol in symbols {
            *counts.entry(*symbol).or_insert(0u64) += 1;
        }
        Self::from_counts(&counts)
    }

    /// Plan from pre-aggregated counts (project-wide planning).
    pub fn from_counts(counts: &BTreeMap<u32, u64>) -> Option<Self> {
        if counts.is_empty() {
            return None;
        }
        let mut ordered: Vec<(u32, u64)> = counts.iter().map(|(s, c)| (*s, *c)).collect();
        ordered.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let dense_to_original: Vec<u32> = ordered.into_iter().map(|(s, _)| s).collect();
        Some(Self::from_palette(FREQUENCY_DENSE.to_string(), dense_to_original))
    }

    pub fn from_metadata(meta: &OptimisationMetadata) -> Result<Self, CompressionError> {
        let plan = Self::from_palette(meta.strategy.clone(), meta.dense_to_original.clone());
        if plan.original_to_dense.len() != plan.dense_to_original.len() {
            return Err(CompressionError::Model(
                "optimisation palette contains duplicate symbols".into(),
            ));
        }
        Ok(plan)
    }

    fn from_palette(strategy: String, dense_to_original: Vec<u32>) -> Self {
        let original_to_dense = dense_to_original
            .iter()
            .enumerate()
            .map(|(dense, original)| (*original, dense as u32))
            .collect();
        Self { strategy, dense_to_original, original_to_dense }
    }

    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    pub fn alphabet_size(&self) -> usize {
        self.dense_to_original.len().max(1)
    }

    pub fn apply(&self, tokens: &[u32]) -> Result<Vec<u32>, CompressionError> {
        tokens
            .iter()
            .map(|t| {
                self.original_to_dense.get(t).copied().ok_or_else(|| {
                    CompressionError::Model(format!("token {} is not covered by the plan", t))
                })
            })
            .collect()
    }

    pub fn restore(&self, dense: &[u32]) -> Result<Vec<u32>, CompressionError> {
        dense
            .iter()
            .map(|d| {
                self.dense_to_original.get(*d as usize).copied().ok_or(
                    CompressionError::SymbolOutOfRange {
                        symbol: *d,
                        alphabet: self.dense_to_original.len(),
                    },
                )
            })
            .collect()
    }

    pub fn to_metadata(&self) -> OptimisationMetadata {
        OptimisationMetadata {
            strategy: self.strategy.clone(),
            dense_to_original: self.dense_to_original.clone(),
        }
    }
}
