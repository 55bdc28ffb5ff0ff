//! # rigmark
//!
//! Performance estimation and compatibility engine for PC hardware
//! builds: fuzzy benchmark lookup with percentile ranking, weighted FPS
//! prediction (resolution, ray tracing and upscaling aware), tiered
//! cross-component compatibility checks, and bottleneck analysis — all
//! pure, synchronous computation over immutable reference catalogs.
//!
//! # Examples
//!
//! ```
//! use rigmark::analyzer::PerformanceAnalyzer;
//! use rigmark::compat::{BuildConfig, ComponentSpec, Slot};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let analyzer = PerformanceAnalyzer::with_builtin_catalogs();
//!
//! let mut build = BuildConfig::new();
//! build.set(Slot::Cpu, ComponentSpec::named("AMD Ryzen 7 7800X3D"));
//! build.set(Slot::Gpu, ComponentSpec::named("ASUS TUF RTX 4070 OC"));
//!
//! let report = analyzer.analyze(&build)?;
//! for prediction in &report.predictions {
//!     println!(
//!         "{} @ {}: {:.0} fps ({:.0} 1% low)",
//!         prediction.game,
//!         prediction.resolution,
//!         prediction.predicted_fps,
//!         prediction.fps_1_percent_low,
//!     );
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Catalogs are loaded once ([`catalog::BenchmarkCatalog::builtin`] or
//! from TOML files) and shared read-only; every analysis call is safe
//! to run concurrently without synchronization.

pub mod analyzer;
pub mod benchmarks;
pub mod catalog;
pub mod compat;
pub mod error;
pub mod fps;
pub mod matcher;

pub use analyzer::{BottleneckStatus, BottleneckVerdict, PerformanceAnalyzer, PerformanceReport};
pub use benchmarks::{BenchmarkLookup, BenchmarkResult};
pub use catalog::{BenchmarkCatalog, ComponentKind, GameCatalog, Resolution};
pub use compat::{BuildConfig, CompatibilityChecker, CompatibilityReport, ComponentSpec, Slot};
pub use error::{Error, Result};
pub use fps::{FpsEngine, FpsPrediction, UpscalingMode};
