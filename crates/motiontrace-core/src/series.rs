use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};

const CSV_HEADER: &str = "time,x,y";

/// Tracked object positions sharing one time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSeries {
    pub times: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl PositionSeries {
    /// Times must be non-negative and non-decreasing; all columns the same length.
    pub fn new(times: Vec<f64>, x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if times.len() != x.len() || times.len() != y.len() {
            return Err(Error::invalid_input(format!(
                "column lengths differ: {} times, {} x, {} y",
                times.len(),
                x.len(),
                y.len()
            )));
        }
        if let Some(t) = times.iter().find(|t| !(t.is_finite() && **t >= 0.0)) {
            return Err(Error::invalid_input(format!("invalid sample time {t}")));
        }
        if let Some(i) = times.windows(2).position(|p| p[1] < p[0]) {
            return Err(Error::invalid_input(format!(
                "sample times out of order at row {}",
                i + 1
            )));
        }
        Ok(Self { times, x, y })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Positions multiplied by `factor`, e.g. to turn pixels into metres.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            times: self.times.clone(),
            x: self.x.iter().map(|v| v * factor).collect(),
            y: self.y.iter().map(|v| v * factor).collect(),
        }
    }

    /// Parse `time,x,y` rows. A leading non-numeric header line and blank lines are skipped.
    pub fn parse_csv(text: &str) -> Result<Self> {
        let mut times = Vec::new();
        let mut xs = Vec::new();
        let mut ys = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split(',').map(str::trim).collect();
            let parsed: Option<Vec<f64>> = parts.iter().map(|p| p.parse().ok()).collect();
            match parsed {
                Some(row) if row.len() == 3 => {
                    times.push(row[0]);
                    xs.push(row[1]);
                    ys.push(row[2]);
                }
                None if times.is_empty() && index == 0 => {
                    debug!(header = line, "skipping csv header");
                }
                _ => {
                    return Err(Error::invalid_input(format!(
                        "line {}: expected 'time,x,y', got '{line}'",
                        index + 1
                    )));
                }
            }
        }

        Self::new(times, xs, ys)
    }

    pub fn read_csv(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let series = Self::parse_csv(&text)?;
        info!(?path, samples = series.len(), "position series loaded");
        Ok(series)
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut file = fs::File::create(path)?;
        writeln!(file, "{CSV_HEADER}")?;
        for i in 0..self.len() {
            writeln!(file, "{},{},{}", self.times[i], self.x[i], self.y[i])?;
        }
        file.sync_all()?;
        info!(?path, samples = self.len(), "position series written");
        Ok(())
    }
}
