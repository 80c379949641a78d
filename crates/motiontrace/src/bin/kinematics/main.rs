mod cli;

use std::process::ExitCode;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing::info;

use motiontrace_core::kinematics::PlotSeries;
use motiontrace_core::series::PositionSeries;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    match run(&cli) {
        Ok(plot) => {
            println!("{},{}", plot.labels.x_label, plot.labels.y_label);
            for (t, v) in plot.times.iter().zip(&plot.values) {
                println!("{t},{v}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &cli::Cli) -> Result<PlotSeries> {
    let mut series = PositionSeries::read_csv(&cli.input)
        .with_context(|| format!("failed to load {}", cli.input.display()))?;

    if let Some(factor) = cli.scale {
        ensure!(factor.is_finite() && factor > 0.0, "scale must be positive, got {factor}");
        series = series.scaled(factor);
    }

    let plot = cli
        .quantity
        .evaluate(&series)
        .with_context(|| format!("cannot derive {}", cli.quantity))?;

    info!(
        quantity = %cli.quantity,
        title = plot.labels.title,
        points = plot.values.len(),
        "series derived"
    );
    Ok(plot)
}
