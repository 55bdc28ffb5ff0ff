//! Consolidated performance analysis
//!
//! Orchestrates benchmark lookups, the FPS prediction grid, bottleneck
//! classification and compatibility checking into one report per build.
//! The whole pipeline is a pure function of the build configuration and
//! the immutable catalogs: identical inputs produce byte-for-byte
//! identical serialized reports.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::benchmarks::{BenchmarkLookup, BenchmarkResult};
use crate::catalog::{
    BenchmarkCatalog, GameCatalog, Resolution, CPU_SINGLE_THREAD, GPU_RASTER_1080P,
};
use crate::compat::{BuildConfig, CompatibilityChecker, CompatibilityReport, Slot};
use crate::error::{Error, Result};
use crate::fps::{FpsEngine, FpsPrediction, FpsTuning};

/// Analyzer knobs. Defaults match the documented behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Cap on games in the prediction grid, catalog order
    pub max_games: usize,
    /// Percentile gap below which the build counts as balanced
    pub balanced_gap: f64,
    /// Percentile gap above which a bottleneck is high severity
    pub high_gap: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_games: 8,
            balanced_gap: 15.0,
            high_gap: 30.0,
        }
    }
}

/// Which side limits frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottleneckStatus {
    Balanced,
    CpuBound,
    GpuBound,
}

/// How pronounced a bottleneck is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BottleneckSeverity {
    Medium,
    High,
}

/// Percentile-gap bottleneck classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottleneckVerdict {
    pub status: BottleneckStatus,
    /// Absolute CPU/GPU percentile gap
    pub magnitude_percent: f64,
    /// Present only for non-balanced verdicts
    pub severity: Option<BottleneckSeverity>,
}

/// Everything the engine knows about one build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Benchmark dataset version the analysis ran against
    pub benchmark_dataset: String,
    /// Game dataset version the analysis ran against
    pub game_dataset: String,
    /// CPU benchmark results; empty when the CPU is absent or unknown
    pub cpu_benchmarks: BTreeMap<String, BenchmarkResult>,
    /// GPU benchmark results; empty when the GPU is absent or unknown
    pub gpu_benchmarks: BTreeMap<String, BenchmarkResult>,
    /// FPS prediction grid; empty without a resolvable GPU
    pub predictions: Vec<FpsPrediction>,
    /// Present only when both CPU and GPU resolved
    pub bottleneck: Option<BottleneckVerdict>,
    pub compatibility: CompatibilityReport,
    /// 0–3 fixed-template recommendations
    pub recommendations: Vec<String>,
}

/// Orchestration root. Construct once over shared catalogs and call
/// [`analyze`](Self::analyze) from any number of threads.
#[derive(Debug, Clone)]
pub struct PerformanceAnalyzer {
    lookup: BenchmarkLookup,
    fps: FpsEngine,
    compat: CompatibilityChecker,
    config: AnalyzerConfig,
}

impl PerformanceAnalyzer {
    pub fn new(benchmarks: Arc<BenchmarkCatalog>, games: Arc<GameCatalog>) -> Self {
        Self::with_config(benchmarks, games, AnalyzerConfig::default(), FpsTuning::default())
    }

    /// Constructor injection of every knob, for callers that version
    /// their own catalogs or pin tuning constants in tests.
    pub fn with_config(
        benchmarks: Arc<BenchmarkCatalog>,
        games: Arc<GameCatalog>,
        config: AnalyzerConfig,
        tuning: FpsTuning,
    ) -> Self {
        let lookup = BenchmarkLookup::new(benchmarks);
        let fps = FpsEngine::with_tuning(lookup.clone(), games, tuning);
        Self {
            lookup,
            fps,
            compat: CompatibilityChecker::new(),
            config,
        }
    }

    /// Analyzer over the embedded reference datasets.
    pub fn with_builtin_catalogs() -> Self {
        Self::new(
            Arc::new(BenchmarkCatalog::builtin()),
            Arc::new(GameCatalog::builtin()),
        )
    }

    pub fn lookup(&self) -> &BenchmarkLookup {
        &self.lookup
    }

    pub fn fps_engine(&self) -> &FpsEngine {
        &self.fps
    }

    pub fn compatibility_checker(&self) -> &CompatibilityChecker {
        &self.compat
    }

    /// Produce a consolidated report. Unknown or missing components
    /// degrade the corresponding sections to empty; an entirely empty
    /// configuration is a contract violation.
    pub fn analyze(&self, config: &BuildConfig) -> Result<PerformanceReport> {
        if config.is_empty() {
            return Err(Error::InsufficientInput(
                "configuration has no components".into(),
            ));
        }
        config.validate()?;

        let cpu_name = config.get(Slot::Cpu).map(|c| c.name.as_str());
        let gpu_name = config.get(Slot::Gpu).map(|c| c.name.as_str());

        let cpu_benchmarks = cpu_name
            .map(|n| self.lookup.get_cpu_benchmarks(n))
            .unwrap_or_default();
        let gpu_benchmarks = gpu_name
            .map(|n| self.lookup.get_gpu_benchmarks(n))
            .unwrap_or_default();

        let predictions = match gpu_name {
            Some(gpu) => self.prediction_grid(gpu, cpu_name)?,
            None => Vec::new(),
        };

        let bottleneck = self.bottleneck_verdict(&cpu_benchmarks, &gpu_benchmarks);
        let compatibility = self.compat.check(config)?;
        let recommendations = self.recommendations(bottleneck.as_ref());

        log::info!(
            "analyzed build: {} predictions, {} critical issues, bottleneck {:?}",
            predictions.len(),
            compatibility.issues.len(),
            bottleneck.as_ref().map(|b| b.status)
        );

        Ok(PerformanceReport {
            benchmark_dataset: self.lookup.catalog().version.clone(),
            game_dataset: self.fps.games().version.clone(),
            cpu_benchmarks,
            gpu_benchmarks,
            predictions,
            bottleneck,
            compatibility,
            recommendations,
        })
    }

    /// Predictions for the top-N games at every resolution, with an RT
    /// variant for titles that support it.
    fn prediction_grid(
        &self,
        gpu_name: &str,
        cpu_name: Option<&str>,
    ) -> Result<Vec<FpsPrediction>> {
        let cpu = cpu_name.unwrap_or("");
        let mut grid = Vec::new();
        for profile in self.fps.games().games().iter().take(self.config.max_games) {
            for resolution in Resolution::ALL {
                if let Some(p) =
                    self.fps.predict(gpu_name, cpu, &profile.name, resolution, false, None)?
                {
                    grid.push(p);
                }
                if profile.supports_ray_tracing() {
                    if let Some(p) =
                        self.fps.predict(gpu_name, cpu, &profile.name, resolution, true, None)?
                    {
                        grid.push(p);
                    }
                }
            }
        }
        Ok(grid)
    }

    /// Compare CPU single-thread percentile against GPU raster
    /// percentile. Needs both sides; otherwise no verdict.
    fn bottleneck_verdict(
        &self,
        cpu: &BTreeMap<String, BenchmarkResult>,
        gpu: &BTreeMap<String, BenchmarkResult>,
    ) -> Option<BottleneckVerdict> {
        let cpu_pct = cpu.get(CPU_SINGLE_THREAD)?.percentile;
        let gpu_pct = gpu.get(GPU_RASTER_1080P)?.percentile;
        let gap = (cpu_pct - gpu_pct).abs();
        if gap < self.config.balanced_gap {
            return Some(BottleneckVerdict {
                status: BottleneckStatus::Balanced,
                magnitude_percent: gap,
                severity: None,
            });
        }
        let status = if cpu_pct < gpu_pct {
            BottleneckStatus::CpuBound
        } else {
            BottleneckStatus::GpuBound
        };
        let severity = if gap > self.config.high_gap {
            BottleneckSeverity::High
        } else {
            BottleneckSeverity::Medium
        };
        Some(BottleneckVerdict {
            status,
            magnitude_percent: gap,
            severity: Some(severity),
        })
    }

    /// Fixed-template advice keyed off the bottleneck verdict.
    fn recommendations(&self, verdict: Option<&BottleneckVerdict>) -> Vec<String> {
        let Some(verdict) = verdict else {
            return Vec::new();
        };
        let mut out = Vec::new();
        match verdict.status {
            BottleneckStatus::Balanced => {
                out.push(
                    "CPU and GPU are well matched; no component upgrade is needed for this pairing."
                        .to_string(),
                );
            }
            BottleneckStatus::CpuBound => {
                out.push(
                    "The CPU limits this build; a faster CPU would raise frame rates, especially at 1080p."
                        .to_string(),
                );
                out.push(
                    "Raising the render resolution shifts load toward the GPU and narrows the gap."
                        .to_string(),
                );
                if verdict.severity == Some(BottleneckSeverity::High) {
                    out.push(
                        "The gap is large; consider rebalancing the budget toward the CPU."
                            .to_string(),
                    );
                }
            }
            BottleneckStatus::GpuBound => {
                out.push(
                    "The GPU limits this build; a faster GPU would raise frame rates at every resolution."
                        .to_string(),
                );
                out.push(
                    "Enabling upscaling (DLSS/FSR/XeSS) or lowering the resolution recovers frame rate."
                        .to_string(),
                );
                if verdict.severity == Some(BottleneckSeverity::High) {
                    out.push(
                        "The gap is large; consider rebalancing the budget toward the GPU."
                            .to_string(),
                    );
                }
            }
        }
        out
    }
}
