//! Benchmark lookup with percentile ranking
//!
//! Resolves a free-form component name through [`ComponentMatcher`] and
//! returns every benchmark score the catalog defines for the matched
//! entry, each ranked against the rest of the catalog. A failed
//! resolution yields an empty map — absence is a normal outcome here,
//! never an error.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{BenchmarkCatalog, ComponentKind};
use crate::matcher::ComponentMatcher;

/// One resolved benchmark score with its catalog ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Benchmark id (e.g. `single_thread`, `raster_1080p`)
    pub benchmark: String,
    /// Raw score
    pub score: f64,
    /// Canonical catalog name the input resolved to
    pub matched_name: String,
    /// Share of catalog entries with a strictly lower score, 0–100,
    /// rounded to one decimal
    pub percentile: f64,
}

/// Benchmark lookup service over an immutable catalog.
#[derive(Debug, Clone)]
pub struct BenchmarkLookup {
    catalog: Arc<BenchmarkCatalog>,
}

impl BenchmarkLookup {
    pub fn new(catalog: Arc<BenchmarkCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &BenchmarkCatalog {
        &self.catalog
    }

    /// All benchmark results for a CPU name. Empty map on no match.
    pub fn get_cpu_benchmarks(&self, name: &str) -> BTreeMap<String, BenchmarkResult> {
        self.get_benchmarks(name, ComponentKind::Cpu)
    }

    /// All benchmark results for a GPU name. Empty map on no match.
    pub fn get_gpu_benchmarks(&self, name: &str) -> BTreeMap<String, BenchmarkResult> {
        self.get_benchmarks(name, ComponentKind::Gpu)
    }

    /// All benchmark results for a component name. Empty map on no match.
    pub fn get_benchmarks(
        &self,
        name: &str,
        kind: ComponentKind,
    ) -> BTreeMap<String, BenchmarkResult> {
        let matcher = ComponentMatcher::new(kind);
        let entries = self.catalog.entries(kind);
        let matched = match matcher.best_match(name, entries.iter().map(|e| e.name.as_str())) {
            Some(key) => key.to_string(),
            None => {
                log::debug!("no {kind} catalog match for '{name}'");
                return BTreeMap::new();
            }
        };
        let entry = match self.catalog.get(kind, &matched) {
            Some(e) => e,
            None => return BTreeMap::new(),
        };
        entry
            .scores
            .iter()
            .map(|(bench, score)| {
                (
                    bench.clone(),
                    BenchmarkResult {
                        benchmark: bench.clone(),
                        score: *score,
                        matched_name: matched.clone(),
                        percentile: self.percentile(kind, bench, *score),
                    },
                )
            })
            .collect()
    }

    /// Single benchmark result for a component name.
    pub fn get_benchmark(
        &self,
        name: &str,
        kind: ComponentKind,
        benchmark: &str,
    ) -> Option<BenchmarkResult> {
        self.get_benchmarks(name, kind).remove(benchmark)
    }

    /// Percentile of `score` among catalog entries defining `benchmark`:
    /// strictly-lower count over population size, as a 0–100 value
    /// rounded to one decimal. Ties therefore do not rank above each
    /// other, and a unique maximum lands at `(n-1)/n * 100`.
    fn percentile(&self, kind: ComponentKind, benchmark: &str, score: f64) -> f64 {
        let population: Vec<f64> = self
            .catalog
            .entries(kind)
            .iter()
            .filter_map(|e| e.score(benchmark))
            .collect();
        if population.is_empty() {
            return 0.0;
        }
        let lower = population.iter().filter(|s| **s < score).count();
        let pct = lower as f64 / population.len() as f64 * 100.0;
        (pct * 10.0).round() / 10.0
    }
}
