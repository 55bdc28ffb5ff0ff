//! Reference benchmark and game-profile catalogs
//!
//! Static reference data for the estimation engine: component-name →
//! benchmark-score tables for CPUs and GPUs, and per-game profiles
//! (baseline FPS, CPU sensitivity, frame-time stability, VRAM needs).
//!
//! Catalogs are loaded once at startup — from the embedded dataset via
//! [`BenchmarkCatalog::builtin`] / [`GameCatalog::builtin`], or from an
//! external TOML file — and treated as immutable for the process
//! lifetime. Entry declaration order is preserved because the component
//! matcher breaks substring-match ties by first-declared-wins.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Benchmark id: CPU single-thread composite score
pub const CPU_SINGLE_THREAD: &str = "single_thread";
/// Benchmark id: CPU multi-thread composite score
pub const CPU_MULTI_THREAD: &str = "multi_thread";
/// Benchmark id: GPU rasterization score, 1080p preset (primary)
pub const GPU_RASTER_1080P: &str = "raster_1080p";
/// Benchmark id: GPU rasterization score, 1440p preset
pub const GPU_RASTER_1440P: &str = "raster_1440p";
/// Benchmark id: GPU rasterization score, 4K preset
pub const GPU_RASTER_4K: &str = "raster_4k";

const BUILTIN_BENCHMARKS: &str = include_str!("../../data/benchmarks.toml");
const BUILTIN_GAMES: &str = include_str!("../../data/games.toml");

/// Which benchmark table a component belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Cpu,
    Gpu,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "CPU"),
            Self::Gpu => write!(f, "GPU"),
        }
    }
}

/// Target render resolution
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Resolution {
    #[serde(rename = "1080p")]
    R1080p,
    #[serde(rename = "1440p")]
    R1440p,
    #[serde(rename = "4k")]
    R4k,
}

impl Resolution {
    /// All resolutions, lowest to highest
    pub const ALL: [Resolution; 3] = [Self::R1080p, Self::R1440p, Self::R4k];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::R1080p => "1080p",
            Self::R1440p => "1440p",
            Self::R4k => "4k",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "1080p" | "1080" | "fhd" => Ok(Self::R1080p),
            "1440p" | "1440" | "qhd" => Ok(Self::R1440p),
            "4k" | "2160p" | "uhd" => Ok(Self::R4k),
            other => Err(Error::InsufficientInput(format!(
                "unknown resolution '{other}' (expected 1080p, 1440p or 4k)"
            ))),
        }
    }
}

/// One component's benchmark scores. Immutable reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    /// Canonical component name (catalog key)
    pub name: String,
    /// Chip manufacturer (NVIDIA, AMD, Intel)
    pub manufacturer: String,
    /// benchmark id → score
    pub scores: BTreeMap<String, f64>,
}

impl BenchmarkEntry {
    /// Score for one benchmark, if the entry defines it
    pub fn score(&self, benchmark: &str) -> Option<f64> {
        self.scores.get(benchmark).copied()
    }
}

/// CPU and GPU benchmark tables, in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkCatalog {
    /// Dataset version, reported in analysis output
    pub version: String,
    #[serde(rename = "cpu", default)]
    cpus: Vec<BenchmarkEntry>,
    #[serde(rename = "gpu", default)]
    gpus: Vec<BenchmarkEntry>,
}

impl BenchmarkCatalog {
    /// The embedded reference dataset.
    ///
    /// The embedded TOML is validated by tests, so a parse failure here
    /// is a build defect, not a runtime condition.
    pub fn builtin() -> Self {
        Self::from_toml(BUILTIN_BENCHMARKS).unwrap_or_else(|e| {
            panic!("embedded benchmark dataset is invalid: {e}");
        })
    }

    /// Load from a TOML file
    pub fn from_toml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Catalog(format!("cannot read {path}: {e}")))?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string and validate invariants
    pub fn from_toml(content: &str) -> Result<Self> {
        let catalog: Self = toml::from_str(content)
            .map_err(|e| Error::Catalog(format!("TOML parse error: {e}")))?;
        catalog.validate()?;
        log::debug!(
            "benchmark catalog v{} loaded: {} CPUs, {} GPUs",
            catalog.version,
            catalog.cpus.len(),
            catalog.gpus.len()
        );
        Ok(catalog)
    }

    fn validate(&self) -> Result<()> {
        for entry in self.cpus.iter().chain(self.gpus.iter()) {
            if entry.name.trim().is_empty() {
                return Err(Error::Catalog("entry with empty name".into()));
            }
            for (bench, score) in &entry.scores {
                if *score < 0.0 || !score.is_finite() {
                    return Err(Error::Catalog(format!(
                        "{}: {bench} score {score} is negative or non-finite",
                        entry.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Entries of one kind, in declaration order
    pub fn entries(&self, kind: ComponentKind) -> &[BenchmarkEntry] {
        match kind {
            ComponentKind::Cpu => &self.cpus,
            ComponentKind::Gpu => &self.gpus,
        }
    }

    /// Entry by canonical name (case-insensitive)
    pub fn get(&self, kind: ComponentKind, canonical: &str) -> Option<&BenchmarkEntry> {
        self.entries(kind)
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(canonical))
    }
}

/// Per-game performance profile. Static reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameProfile {
    /// Game title (catalog key)
    pub name: String,
    /// How CPU-limited the title is, 0.0 (pure GPU) to 1.0
    pub cpu_bound: f64,
    /// Ratio of 1% low FPS to average FPS on balanced hardware
    pub stability_factor: f64,
    /// FPS multiplier with ray tracing enabled; absent means no RT mode
    #[serde(default)]
    pub rt_penalty: Option<f64>,
    /// Baseline average FPS per resolution on the reference pair
    pub base_fps: BTreeMap<Resolution, f64>,
    /// VRAM needed per resolution, in GB
    pub vram_gb: BTreeMap<Resolution, f64>,
}

impl GameProfile {
    /// Whether the title has a ray-tracing mode
    pub fn supports_ray_tracing(&self) -> bool {
        self.rt_penalty.is_some()
    }
}

/// Game profile table, in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameCatalog {
    /// Dataset version, reported in analysis output
    pub version: String,
    #[serde(rename = "game", default)]
    games: Vec<GameProfile>,
}

impl GameCatalog {
    /// The embedded reference dataset.
    pub fn builtin() -> Self {
        Self::from_toml(BUILTIN_GAMES).unwrap_or_else(|e| {
            panic!("embedded game dataset is invalid: {e}");
        })
    }

    /// Load from a TOML file
    pub fn from_toml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Catalog(format!("cannot read {path}: {e}")))?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string and validate invariants
    pub fn from_toml(content: &str) -> Result<Self> {
        let catalog: Self = toml::from_str(content)
            .map_err(|e| Error::Catalog(format!("TOML parse error: {e}")))?;
        catalog.validate()?;
        log::debug!(
            "game catalog v{} loaded: {} titles",
            catalog.version,
            catalog.games.len()
        );
        Ok(catalog)
    }

    fn validate(&self) -> Result<()> {
        for game in &self.games {
            if game.name.trim().is_empty() {
                return Err(Error::Catalog("game with empty name".into()));
            }
            if !(0.0..=1.0).contains(&game.cpu_bound) {
                return Err(Error::Catalog(format!(
                    "{}: cpu_bound {} outside [0, 1]",
                    game.name, game.cpu_bound
                )));
            }
            if !(game.stability_factor > 0.0 && game.stability_factor <= 1.0) {
                return Err(Error::Catalog(format!(
                    "{}: stability_factor {} outside (0, 1]",
                    game.name, game.stability_factor
                )));
            }
            if let Some(rt) = game.rt_penalty {
                if !(rt > 0.0 && rt <= 1.0) {
                    return Err(Error::Catalog(format!(
                        "{}: rt_penalty {rt} outside (0, 1]",
                        game.name
                    )));
                }
            }
            for res in Resolution::ALL {
                match game.base_fps.get(&res) {
                    Some(fps) if *fps > 0.0 => {}
                    _ => {
                        return Err(Error::Catalog(format!(
                            "{}: missing or non-positive base_fps at {res}",
                            game.name
                        )))
                    }
                }
            }
        }
        Ok(())
    }

    /// Titles in declaration order
    pub fn games(&self) -> &[GameProfile] {
        &self.games
    }

    /// Fuzzy title lookup: case-insensitive exact match first, then
    /// substring containment either direction, first declared wins.
    pub fn find(&self, name: &str) -> Option<&GameProfile> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        if let Some(game) = self
            .games
            .iter()
            .find(|g| g.name.to_lowercase() == needle)
        {
            return Some(game);
        }
        self.games.iter().find(|g| {
            let key = g.name.to_lowercase();
            key.contains(&needle) || needle.contains(&key)
        })
    }
}
