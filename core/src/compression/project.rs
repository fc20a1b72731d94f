//! compression/project.rs
//! Project-wide planning of shared compression assets.
//!
//! Planning sees every stream before any file is encoded. The resulting
//! assets are read-only and shared by the parallel encode phase.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::compression::config::CompressionConfig;
use crate::compression::optimisation::TokenOptimisationPlan;
use crate::model::{StringTable, TokenStream};

/// Assets computed once per project and reused for every file.
#[derive(Debug, Clone, Default)]
pub struct ProjectAssets {
    pub token_plan: Option<Arc<TokenOptimisationPlan>>,
    pub string_table: Option<Arc<StringTable>>,
}

impl ProjectAssets {
    pub fn is_empty(&self) -> bool {
        self.token_plan.is_none() && self.string_table.is_none()
    }
}

pub struct ProjectCompressionPlanner {
    config: CompressionConfig,
}

impl ProjectCompressionPlanner {
    pub fn new(config: CompressionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    pub fn plan(&self, streams: &[TokenStream]) -> ProjectAssets {
        if !self.config.wants_project_planning() {
            debug!(mode = %self.config.mode, "project planning skipped");
            return ProjectAssets::default();
        }

        let token_plan = if self.config.project_token_plan {
            let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
            for stream in streams {
                for token in &stream.tokens {
                    *counts.entry(*token).or_insert(0) += 1;
                }
            }
            TokenOptimisationPlan::from_counts(&counts).map(Arc::new)
        } else {
            None
        };

        let string_table = if self.config.shared_string_table {
            let mut values = Vec::new();
            for stream in streams {
                stream.payloads.collect_strings(&mut values);
            }
            Some(Arc::new(StringTable::build(values)))
        } else {
            None
        };

        debug!(
            files = streams.len(),
            plan_symbols = token_plan.as_ref().map(|p| p.alphabet_size()).unwrap_or(0),
            shared_strings = string_table.as_ref().map(|t| t.len()).unwrap_or(0),
            "project assets planned"
        );
        ProjectAssets { token_plan, string_table }
    }
}
