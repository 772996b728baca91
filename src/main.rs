// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use portmux::metrics::analyzer::SweepPoint;
use portmux::metrics::logger::ResultLogger;
use portmux::prelude::*;

use anyhow::{Context, Result};
use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

const DEFAULT_SEED: u64 = 42;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Single run, prints the report line.
    Run {
        #[command(flatten)]
        config: ConfigArgs,
        #[arg(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,
        #[arg(long)]
        json: bool,
    },

    /// Averages independent replications over a range of horizons or buffer sizes.
    Sweep {
        #[command(flatten)]
        config: ConfigArgs,
        #[arg(long, value_delimiter = ',', conflicts_with = "capacities", required_unless_present = "capacities")]
        horizons: Vec<f64>,
        #[arg(long, value_delimiter = ',')]
        capacities: Vec<usize>,
        #[arg(short, long, default_value_t = 10, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        replications: usize,
        #[arg(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,
        #[arg(short, long, default_value = "results")]
        output: PathBuf,
    },

    /// Reference scenario: one source, one queue, lambda 9, mu 12, buffer 1000, T 1000.
    Scenario {
        #[arg(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
}

/// Either a JSON config file or the flat positional form
/// `T N M <N*M probabilities> <N arrival rates> <M capacities> <M service rates>`.
#[derive(Args)]
struct ConfigArgs {
    #[arg(short, long, conflicts_with_all = ["horizon", "inputs", "outputs", "values"])]
    config: Option<PathBuf>,

    horizon: Option<f64>,
    inputs: Option<usize>,
    outputs: Option<usize>,
    #[arg(allow_negative_numbers = true)]
    values: Vec<f64>,
}

impl ConfigArgs {
    fn load(&self) -> Result<SimulationConfig> {
        if let Some(path) = &self.config {
            return SimulationConfig::from_json_file(path);
        }

        let (Some(horizon), Some(n), Some(m)) = (self.horizon, self.inputs, self.outputs) else {
            anyhow::bail!("expected --config FILE or positional arguments: T N M VALUES...");
        };
        let config = SimulationConfig::from_flat(horizon, n, m, &self.values)
            .context("invalid positional arguments")?;
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let program_start = Instant::now();

    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run { config, seed, json } => {
            let config = config.load()?;
            let result = Engine::new(config, seed)?.run();
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.report_line());
            }
        }

        Commands::Sweep {
            config,
            horizons,
            capacities,
            replications,
            seed,
            output,
        } => {
            let axis = if horizons.is_empty() {
                SweepAxis::Capacity(capacities)
            } else {
                SweepAxis::Horizon(horizons)
            };
            let sweep = Sweep::new(config.load()?, axis)
                .with_replications(replications)
                .with_seed(seed)
                .with_progress(true);

            let points = sweep.run()?;
            summary_table(&points);
            save_points(&points, &output)?;
        }

        Commands::Scenario { seed } => {
            let config = SimulationConfig::default();
            info!("Utilization: {:.3}", config.utilization()[0]);
            let result = Engine::new(config, seed)?.run();
            println!("{}", result.report_line());
            if let Some(loss) = result.loss_ratio() {
                info!("Loss ratio: {:.4}%", loss * 100.0);
            }
        }
    }

    info!("Total runtime: {:.2}s", program_start.elapsed().as_secs_f64());

    Ok(())
}

fn save_points(points: &[SweepPoint], dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");

    let csv_path = dir.join(format!("sweep_{}.csv", timestamp));
    let mut logger = ResultLogger::new(&csv_path)?;
    logger.log_batch(points)?;
    info!("Results saved to: {}", csv_path.display());

    let json_path = dir.join(format!("sweep_{}.json", timestamp));
    std::fs::write(&json_path, serde_json::to_string_pretty(points)?)?;
    info!("Summary saved to: {}", json_path.display());

    Ok(())
}

fn fmt_metric(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.4}", v))
}

fn summary_table(points: &[SweepPoint]) {
    println!("\n╔════════════╦════════════╦════════════╦══════════╦════════════╦════════════╗");
    println!("║ Value      ║ Handled    ║ Blocked    ║ Loss (%) ║ Avg wait   ║ Avg service║");
    println!("╠════════════╬════════════╬════════════╬══════════╬════════════╬════════════╣");

    for p in points {
        println!(
            "║ {:<10} ║ {:>10.1} ║ {:>10.1} ║ {:>8} ║ {:>10} ║ {:>10} ║",
            p.value,
            p.mean_handled,
            p.mean_blocked,
            p.mean_loss_ratio.map_or_else(|| "-".to_string(), |l| format!("{:.2}", l * 100.0)),
            fmt_metric(p.mean_wait_time),
            fmt_metric(p.mean_service_time),
        );
    }

    println!("╚════════════╩════════════╩════════════╩══════════╩════════════╩════════════╝\n");
}
