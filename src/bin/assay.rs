//! assay CLI — run simulated water quality test batches and compare
//! serial against concurrent execution.

use assay_rs::config::Config;
use assay_rs::engine::{Engine, Mode, RunOutput};
use assay_rs::history::Summary;
use assay_rs::model::band::generate_batch;
use assay_rs::model::{WorkItem, quality_distribution};
use assay_rs::preset::PresetCatalog;
use assay_rs::telemetry::{TelemetryConfig, init_telemetry};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "assay", about = "Simulated water quality lab: serial vs. parallel testing")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Test a batch of samples
    Run {
        /// Number of random samples to generate (ignored with --preset)
        #[arg(long)]
        samples: Option<usize>,
        /// Execution mode
        #[arg(long, value_enum, default_value_t = RunMode::Compare)]
        mode: RunMode,
        /// Worker count for concurrent runs (defaults to ASSAY_WORKERS or CPU count)
        #[arg(long)]
        workers: Option<usize>,
        /// Use a named preset instead of random samples
        #[arg(long)]
        preset: Option<String>,
        /// TOML file with additional presets
        #[arg(long)]
        preset_file: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a randomly generated batch as JSON
    Generate {
        /// Number of samples
        #[arg(long)]
        samples: Option<usize>,
    },
    /// List available presets
    Presets {
        /// TOML file with additional presets
        #[arg(long)]
        preset_file: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RunMode {
    Serial,
    Concurrent,
    /// Serial then concurrent on the same batch
    Compare,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    match cli.command {
        Command::Run {
            samples,
            mode,
            workers,
            preset,
            preset_file,
            json,
        } => {
            if let Some(w) = workers {
                config.workers = Some(w);
            }
            let _guard = init_telemetry(TelemetryConfig {
                endpoint: config.otel_endpoint.clone(),
                service_name: "assay".to_string(),
                log_level: config.log_level.clone(),
            })?;
            let items = match preset {
                Some(name) => {
                    let items = load_catalog(preset_file.as_deref())?.items(&name)?;
                    config.check_batch_size(items.len())?;
                    items
                }
                None => generate_batch(sample_count(&config, samples)?)?,
            };
            cmd_run(&config, items, mode, json).await
        }
        Command::Generate { samples } => {
            let items = generate_batch(sample_count(&config, samples)?)?;
            println!("{}", serde_json::to_string_pretty(&items)?);
            Ok(())
        }
        Command::Presets { preset_file } => {
            let catalog = load_catalog(preset_file.as_deref())?;
            for name in catalog.names() {
                let count = catalog.get(name).map_or(0, <[_]>::len);
                println!("{name:<20} {count} samples");
            }
            Ok(())
        }
    }
}

/// Resolve the requested batch size against the configured bound.
fn sample_count(config: &Config, requested: Option<usize>) -> anyhow::Result<usize> {
    Ok(config.check_batch_size(requested.unwrap_or(config.default_samples))?)
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<PresetCatalog> {
    Ok(match path {
        Some(path) => PresetCatalog::load_from_file(path)?,
        None => PresetCatalog::builtin(),
    })
}

/// Run on the blocking pool; the engine parks its calling thread.
async fn run_blocking(
    engine: Arc<Engine>,
    mode: Mode,
    items: Vec<WorkItem>,
) -> anyhow::Result<RunOutput> {
    let output = tokio::task::spawn_blocking(move || engine.run(mode, items)).await??;
    Ok(output)
}

async fn cmd_run(
    config: &Config,
    items: Vec<WorkItem>,
    mode: RunMode,
    json: bool,
) -> anyhow::Result<()> {
    let engine = Arc::new(config.engine()?);
    let count = items.len();

    if !json {
        println!("Engine workers: {}", engine.workers());
        println!("Samples:        {count}");
        for item in &items {
            println!("  - Sample {}: {}", item.id(), item.source_location);
        }
    }

    let modes: &[Mode] = match mode {
        RunMode::Serial => &[Mode::Serial],
        RunMode::Concurrent => &[Mode::Concurrent],
        RunMode::Compare => &[Mode::Serial, Mode::Concurrent],
    };

    let mut tested = Vec::new();
    for &mode in modes {
        if !json {
            println!("\n{} run...", mode);
        }
        // Each run gets a fresh copy of the untested batch.
        let (mut out, elapsed) = run_blocking(Arc::clone(&engine), mode, items.clone()).await?;
        out.sort_by_key(WorkItem::id);
        if !json {
            println!("Total time:     {elapsed:.2}s");
            if count > 0 {
                println!("Per sample:     {:.2}s", elapsed / count as f64);
            }
        }
        tested = out;
    }

    let summary = engine.summary();

    if json {
        let report = serde_json::json!({
            "runs": engine.history().records(),
            "summary": summary,
            "samples": tested
                .iter()
                .map(|item| serde_json::json!({
                    "sample": item,
                    "rating": item.rating(),
                }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if let Some(summary) = summary {
        print_summary(&summary);
    }
    print_results(&tested);
    Ok(())
}

fn print_summary(s: &Summary) {
    println!("\n{}", "=".repeat(60));
    println!("PERFORMANCE COMPARISON");
    println!("{}", "=".repeat(60));
    println!("Sequential time:  {:.2}s", s.sequential_time);
    println!("Parallel time:    {:.2}s", s.parallel_time);
    println!("Speedup:          {:.2}x", s.speedup);
    println!("Efficiency:       {:.1}% ({} workers)", s.efficiency_pct, s.worker_count);
    println!(
        "Time saved:       {:.2}s ({:.1}%)",
        s.time_saved_seconds, s.time_saved_pct
    );
}

fn print_results(items: &[WorkItem]) {
    if items.is_empty() {
        return;
    }
    let total = items.len();

    println!("\n{}", "=".repeat(60));
    println!("WATER QUALITY RESULTS");
    println!("{}", "=".repeat(60));
    for (quality, n) in quality_distribution(items) {
        if n == 0 {
            continue;
        }
        let pct = n as f64 / total as f64 * 100.0;
        let bar = "#".repeat((pct / 5.0) as usize);
        println!("  {:<10} : {bar} ({n}/{total} - {pct:.0}%)", quality.label());
    }

    println!();
    for item in items {
        let r = &item.readings;
        println!(
            "  {:<5} {:<22} pH {:>5.2}  turb {:>6.2}  DO {:>5.2}  coli {:>4}  NO3 {:>6.2}  {:<9} {:.2}s",
            item.id().to_string(),
            item.source_location,
            r.ph,
            r.turbidity,
            r.dissolved_oxygen,
            r.coliform,
            r.nitrate,
            item.rating().label(),
            item.processing_duration(),
        );
    }
}
