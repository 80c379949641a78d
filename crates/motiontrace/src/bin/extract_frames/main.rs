mod cli;

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use motiontrace_core::sampler::{self, SampleReport, SamplerConfig};

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
        Ok(report) => {
            print!("{}", render_report(&report));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &cli::Cli) -> Result<SampleReport> {
    info!(
        infile = ?cli.infile,
        outdir = ?cli.outdir,
        force = cli.force,
        skip = cli.skip,
        "starting frame extraction"
    );

    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancel);
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst))
        .context("failed to install Ctrl-C handler")?;

    let config = SamplerConfig {
        frame_skip: cli.skip,
        overwrite: cli.force,
        cancel: Some(cancel),
    };

    let report = sampler::sample_video(&cli.infile, &cli.outdir, &config)
        .context("frame extraction failed")?;

    if report.cancelled {
        bail!(
            "frame extraction interrupted after writing {} frames",
            report.frames_written
        );
    }

    info!(
        frames_decoded = report.frames_decoded,
        frames_written = report.frames_written,
        outdir = ?cli.outdir,
        "frame extraction complete"
    );
    Ok(report)
}

/// Result lines for stdout. Floats keep their decimal point (`30.0`, not `30`).
fn render_report(report: &SampleReport) -> String {
    format!(
        "frame_rate = {:?}\nframe_delta_t = {:?}\n",
        report.frame_rate, report.sample_interval
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(frame_rate: f64, sample_interval: f64) -> SampleReport {
        SampleReport {
            frame_rate,
            sample_interval,
            frames_decoded: 10,
            frames_written: 4,
            cancelled: false,
        }
    }

    #[test]
    fn whole_rates_keep_decimal_point() {
        assert_eq!(
            render_report(&report(30.0, 3.0 / 30.0)),
            "frame_rate = 30.0\nframe_delta_t = 0.1\n"
        );
    }

    #[test]
    fn fractional_rates_print_shortest_form() {
        assert_eq!(
            render_report(&report(25.0, 1.0 / 25.0)),
            "frame_rate = 25.0\nframe_delta_t = 0.04\n"
        );
        assert_eq!(
            render_report(&report(29.97, 2.0 / 29.97)),
            format!("frame_rate = 29.97\nframe_delta_t = {:?}\n", 2.0 / 29.97)
        );
    }
}
