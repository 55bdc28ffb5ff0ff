//! CLI tool for rig-insight (riq)

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;

use rigmark::analyzer::{BottleneckStatus, PerformanceAnalyzer};
use rigmark::catalog::{BenchmarkCatalog, ComponentKind, GameCatalog, Resolution};
use rigmark::compat::BuildConfig;
use rigmark::error::{Error, Result};
use rigmark::fps::UpscalingMode;

#[derive(Parser)]
#[command(name = "riq")]
#[command(about = "Performance estimation and compatibility analysis for PC hardware builds", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (json or text)
    #[arg(short, long, default_value = "text", global = true)]
    format: String,

    /// Benchmark dataset file (defaults to the embedded dataset)
    #[arg(long, global = true)]
    benchmarks: Option<PathBuf>,

    /// Game dataset file (defaults to the embedded dataset)
    #[arg(long, global = true)]
    games: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Full performance and compatibility report for a build config
    Analyze {
        /// Build configuration TOML file
        build: PathBuf,
    },
    /// Compatibility checks only
    Check {
        /// Build configuration TOML file
        build: PathBuf,
    },
    /// Predict FPS for one GPU/CPU/game combination
    Predict {
        /// GPU name (free-form, fuzzy matched)
        #[arg(long)]
        gpu: String,
        /// CPU name; omit to assume a mid-range CPU
        #[arg(long, default_value = "")]
        cpu: String,
        /// Game title (fuzzy matched)
        #[arg(long)]
        game: String,
        /// Target resolution: 1080p, 1440p or 4k
        #[arg(long, default_value = "1080p")]
        resolution: String,
        /// Enable ray tracing
        #[arg(long)]
        ray_tracing: bool,
        /// Upscaling mode, e.g. "dlss:quality" or "fsr"
        #[arg(long)]
        upscaling: Option<String>,
    },
    /// Look up benchmark scores and percentiles for a component
    Bench {
        /// Component name (free-form, fuzzy matched)
        name: String,
        /// Component kind: cpu or gpu
        #[arg(long)]
        kind: String,
    },
    /// Print a sample build configuration
    SampleConfig,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn load_analyzer(cli: &Cli) -> Result<PerformanceAnalyzer> {
    let benchmarks = match &cli.benchmarks {
        Some(path) => BenchmarkCatalog::from_toml_file(&path.to_string_lossy())?,
        None => BenchmarkCatalog::builtin(),
    };
    let games = match &cli.games {
        Some(path) => GameCatalog::from_toml_file(&path.to_string_lossy())?,
        None => GameCatalog::builtin(),
    };
    Ok(PerformanceAnalyzer::new(Arc::new(benchmarks), Arc::new(games)))
}

fn run(cli: &Cli) -> Result<()> {
    let json = cli.format.eq_ignore_ascii_case("json");
    match &cli.command {
        Commands::Analyze { build } => {
            let config = BuildConfig::from_toml_file(&build.to_string_lossy())?;
            let report = load_analyzer(cli)?.analyze(&config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Check { build } => {
            let config = BuildConfig::from_toml_file(&build.to_string_lossy())?;
            let analyzer = load_analyzer(cli)?;
            let report = analyzer.compatibility_checker().check(&config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_compatibility(&report);
            }
        }
        Commands::Predict {
            gpu,
            cpu,
            game,
            resolution,
            ray_tracing,
            upscaling,
        } => {
            let resolution: Resolution = resolution.parse()?;
            let upscaling = upscaling
                .as_deref()
                .map(str::parse::<UpscalingMode>)
                .transpose()?;
            let analyzer = load_analyzer(cli)?;
            let prediction = analyzer
                .fps_engine()
                .predict(gpu, cpu, game, resolution, *ray_tracing, upscaling)?;
            match prediction {
                None => {
                    return Err(Error::InsufficientInput(format!(
                        "no prediction possible: GPU '{gpu}' or game '{game}' not in the catalogs"
                    )))
                }
                Some(p) if json => println!("{}", serde_json::to_string_pretty(&p)?),
                Some(p) => {
                    let rt = if p.ray_tracing { " +RT" } else { "" };
                    let up = p
                        .upscaling
                        .as_deref()
                        .map(|u| format!(" +{u}"))
                        .unwrap_or_default();
                    println!(
                        "{} @ {}{}{}",
                        p.game.bold(),
                        p.resolution.to_string().cyan(),
                        rt,
                        up
                    );
                    println!(
                        "  {:.0} fps average, {:.0} fps 1% low (confidence {:.0}%)",
                        p.predicted_fps, p.fps_1_percent_low, p.confidence
                    );
                }
            }
        }
        Commands::Bench { name, kind } => {
            let kind = match kind.to_ascii_lowercase().as_str() {
                "cpu" => ComponentKind::Cpu,
                "gpu" => ComponentKind::Gpu,
                other => {
                    return Err(Error::InsufficientInput(format!(
                        "unknown component kind '{other}' (expected cpu or gpu)"
                    )))
                }
            };
            let analyzer = load_analyzer(cli)?;
            let results = analyzer.lookup().get_benchmarks(name, kind);
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else if results.is_empty() {
                println!("{} no catalog match for '{name}'", "miss:".yellow());
            } else {
                for result in results.values() {
                    println!(
                        "{} {} = {:.0} ({}th percentile)",
                        result.matched_name.bold(),
                        result.benchmark,
                        result.score,
                        result.percentile
                    );
                }
            }
        }
        Commands::SampleConfig => {
            print!("{}", BuildConfig::sample_toml());
        }
    }
    Ok(())
}

fn print_report(report: &rigmark::PerformanceReport) {
    println!(
        "{} (datasets: benchmarks {}, games {})",
        "Performance report".bold().underline(),
        report.benchmark_dataset,
        report.game_dataset
    );

    if report.cpu_benchmarks.is_empty() && report.gpu_benchmarks.is_empty() {
        println!("\n{}", "no components resolved against the catalogs".yellow());
    }
    for (label, results) in [
        ("CPU", &report.cpu_benchmarks),
        ("GPU", &report.gpu_benchmarks),
    ] {
        if results.is_empty() {
            continue;
        }
        println!("\n{}", label.bold());
        for result in results.values() {
            println!(
                "  {} {} = {:.0} ({}th percentile)",
                result.matched_name,
                result.benchmark,
                result.score,
                result.percentile
            );
        }
    }

    if let Some(verdict) = &report.bottleneck {
        let status = match verdict.status {
            BottleneckStatus::Balanced => "balanced".green(),
            BottleneckStatus::CpuBound => "CPU-bound".yellow(),
            BottleneckStatus::GpuBound => "GPU-bound".yellow(),
        };
        println!(
            "\n{} {status} (gap {:.1} percentile points)",
            "Bottleneck:".bold(),
            verdict.magnitude_percent
        );
    }

    if !report.predictions.is_empty() {
        println!("\n{}", "Predicted FPS".bold());
        for p in &report.predictions {
            let rt = if p.ray_tracing { " +RT" } else { "" };
            println!(
                "  {:<28} {:>5}{:<4} {:>5.0} avg  {:>5.0} low",
                p.game,
                p.resolution.as_str(),
                rt,
                p.predicted_fps,
                p.fps_1_percent_low
            );
        }
    }

    print_compatibility(&report.compatibility);

    if !report.recommendations.is_empty() {
        println!("\n{}", "Recommendations".bold());
        for rec in &report.recommendations {
            println!("  - {rec}");
        }
    }
}

fn print_compatibility(report: &rigmark::CompatibilityReport) {
    let verdict = if report.compatible {
        "compatible".green().bold()
    } else {
        "incompatible".red().bold()
    };
    println!("\n{} {verdict}", "Compatibility:".bold());
    for issue in &report.issues {
        println!("  {} [{}] {}", "critical".red(), issue.kind, issue.message);
    }
    for warning in &report.warnings {
        println!("  {} [{}] {}", "warning".yellow(), warning.kind, warning.message);
    }
}
