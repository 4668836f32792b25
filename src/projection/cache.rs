//! Memoised projection for callers that re-project on every input change
//!
//! A dashboard re-requests the projection whenever anything upstream
//! re-renders. Only a structural change in the inputs warrants running the
//! engine again; otherwise the last output is handed back as-is.

use log::debug;

use super::engine::{project, ProjectionParams};
use super::output::CombinedScenariosOutput;

/// Last-input memo around [`project`]
#[derive(Debug, Default)]
pub struct ProjectionCache {
    entry: Option<CacheEntry>,
    hits: u64,
    misses: u64,
}

#[derive(Debug)]
struct CacheEntry {
    params: ProjectionParams,
    output: CombinedScenariosOutput,
}

impl ProjectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output for `params`, recomputed only when they differ from the last call
    pub fn get_or_project(&mut self, params: &ProjectionParams) -> &CombinedScenariosOutput {
        let entry = match self.entry.take() {
            Some(entry) if entry.params == *params => {
                self.hits += 1;
                debug!("Projection inputs unchanged, reusing cached output");
                entry
            }
            _ => {
                self.misses += 1;
                let output = project(params);
                debug!(
                    "Recomputed projection: {} points in {:.3} ms",
                    output.metadata.data_points, output.metadata.computation_time_ms
                );
                CacheEntry {
                    params: params.clone(),
                    output,
                }
            }
        };

        &self.entry.insert(entry).output
    }

    /// Last computed output without triggering a projection
    pub fn cached(&self) -> Option<&CombinedScenariosOutput> {
        self.entry.as_ref().map(|e| &e.output)
    }

    /// Drop the cached entry so the next call recomputes
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
