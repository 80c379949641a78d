use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use image::{GrayImage, ImageError, Luma, RgbImage};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::rect::{AxisSpan, Region};

/// Supplies a region interactively when none was given explicitly.
pub trait RegionSelector {
    /// Pick a region on `frame`, typically by asking the operator.
    fn select(&mut self, frame: &GrayImage) -> Result<Region>;
}

/// Inputs of a threshold calculation.
#[derive(Debug, Clone)]
pub struct ThresholdRequest {
    pub first_frame: PathBuf,
    pub second_frame: PathBuf,
    /// Explicit `(x1,x2)` / `(y1,y2)` spans; the selector is used when absent.
    pub spans: Option<(AxisSpan, AxisSpan)>,
}

/// Result of [`calculate_threshold`], keeping the region that was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdOutcome {
    pub threshold: u32,
    pub region: Region,
}

/// Load an image from disk as 8-bit grayscale.
pub fn load_grayscale(path: &Path) -> Result<GrayImage> {
    if !path.is_file() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    let img = image::open(path).map_err(|e| match e {
        ImageError::IoError(io) if io.kind() == io::ErrorKind::NotFound => {
            Error::NotFound(path.to_path_buf())
        }
        other => Error::invalid_input(format!("cannot decode {}: {other}", path.display())),
    })?;
    debug!(?path, width = img.width(), height = img.height(), "loaded frame");
    Ok(to_gray_bt601(&img.to_rgb8()))
}

/// BT.601 luma in 14-bit fixed point, rounded: `Y = 0.299 R + 0.587 G + 0.114 B`.
/// Gray inputs (R = G = B) map back to themselves.
pub fn to_gray_bt601(rgb: &RgbImage) -> GrayImage {
    const R: u32 = 4899;
    const G: u32 = 9617;
    const B: u32 = 1868;
    const SHIFT: u32 = 14;

    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let luma = (r as u32 * R + g as u32 * G + b as u32 * B + (1 << (SHIFT - 1))) >> SHIFT;
        Luma([luma as u8])
    })
}

/// Ceiling of the mean absolute intensity difference between two frames over `region`.
///
/// Both frames are expected to share dimensions; a region reaching outside either
/// frame is rejected rather than read out of bounds.
pub fn compute_threshold(first: &GrayImage, second: &GrayImage, region: Region) -> Result<u32> {
    region.ensure_within(first.width(), first.height())?;
    region.ensure_within(second.width(), second.height())?;

    let sum: u64 = region
        .pixels()
        .map(|(x, y)| {
            let a = first.get_pixel(x, y)[0];
            let b = second.get_pixel(x, y)[0];
            a.abs_diff(b) as u64
        })
        .sum();

    let count = region.area();
    let threshold = sum.div_ceil(count);

    debug!(%region, sum, count, threshold, "region difference computed");

    // Mean of u8 differences never exceeds 255.
    Ok(threshold as u32)
}

/// Load both frames, resolve the region and compute the threshold.
///
/// When `sink` is given, `"Threshold Amount: <n>"` is also sent through it.
pub fn calculate_threshold(
    request: &ThresholdRequest,
    selector: &mut dyn RegionSelector,
    sink: Option<&Sender<String>>,
) -> Result<ThresholdOutcome> {
    info!(
        first = ?request.first_frame,
        second = ?request.second_frame,
        explicit_region = request.spans.is_some(),
        "calculating threshold"
    );

    let first = load_grayscale(&request.first_frame)?;
    let second = load_grayscale(&request.second_frame)?;

    let region = match request.spans {
        Some((xs, ys)) => Region::from_spans(xs, ys)?,
        None => selector.select(&first)?,
    };

    let threshold = compute_threshold(&first, &second, region)?;
    info!(%region, threshold, "threshold computed");

    if let Some(tx) = sink {
        if tx.send(format!("Threshold Amount: {threshold}")).is_err() {
            warn!("threshold sink disconnected, value not relayed");
        }
    }

    Ok(ThresholdOutcome { threshold, region })
}
