mod cli;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use image::GrayImage;
use tracing::info;

use motiontrace_core::debug::RegionOverlay;
use motiontrace_core::rect::Region;
use motiontrace_core::threshold::{self, RegionSelector, ThresholdOutcome, ThresholdRequest};
use motiontrace_core::Error;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse_args();

    match run(&cli) {
        Ok(outcome) => {
            println!("Threshold Amount: {}", outcome.threshold);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &cli::Cli) -> Result<ThresholdOutcome> {
    let request = ThresholdRequest {
        first_frame: cli.path1.clone(),
        second_frame: cli.path2.clone(),
        spans: cli.dimension_x.zip(cli.dimension_y),
    };

    let mut selector = TerminalSelector;
    let outcome = threshold::calculate_threshold(&request, &mut selector, None)
        .context("threshold calculation failed")?;

    if let Some(path) = &cli.debug_frame {
        let frame = threshold::load_grayscale(&cli.path1)?;
        RegionOverlay::new(cli.font.as_deref()).save(
            &frame,
            outcome.region,
            Some(outcome.threshold),
            path,
        )?;
        info!(?path, "region overlay written");
    }

    Ok(outcome)
}

/// Asks for the region on the terminal when `-x`/`-y` are not given.
struct TerminalSelector;

impl RegionSelector for TerminalSelector {
    fn select(&mut self, frame: &GrayImage) -> motiontrace_core::Result<Region> {
        let mut stderr = io::stderr();
        write!(
            stderr,
            "Frame is {}x{}. Enter region as 'x y width height': ",
            frame.width(),
            frame.height()
        )?;
        stderr.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(Error::invalid_input("no region entered"));
        }
        parse_region_line(&line)
    }
}

fn parse_region_line(line: &str) -> motiontrace_core::Result<Region> {
    let values: Vec<u32> = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| Error::invalid_input(format!("malformed region '{}'", line.trim())))?;

    match values[..] {
        [x, y, w, h] => Region::new(x, y, w, h),
        _ => Err(Error::invalid_input(format!(
            "expected 4 numbers for the region, got {}",
            values.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_region_line() {
        assert_eq!(parse_region_line("1 2 3 4\n").unwrap(), Region::new(1, 2, 3, 4).unwrap());
        assert_eq!(parse_region_line("1, 2, 3, 4").unwrap(), Region::new(1, 2, 3, 4).unwrap());
    }

    #[test]
    fn rejects_bad_region_lines() {
        assert!(matches!(parse_region_line("1 2 3"), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_region_line("a b c d"), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_region_line("1 2 0 4"), Err(Error::InvalidRegion(_))));
    }
}
