use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::{ImageError, ImageFormat};
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::video::{Frame, FrameSource, VideoDecoder};

/// Extension a video path must carry to be accepted.
pub const VIDEO_EXTENSION: &str = ".mp4";

/// Extension of the written frame images.
const FRAME_EXTENSION: &str = "jpg";

/// Parameters for a sampling run.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Write every Nth decoded frame (1 = every frame).
    pub frame_skip: u32,
    /// Allow writing into a directory that already holds files.
    pub overwrite: bool,
    /// Checked between frames; set it to stop the run early.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            frame_skip: 1,
            overwrite: false,
            cancel: None,
        }
    }
}

/// Summary of a finished sampling run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleReport {
    pub frame_rate: f64,
    /// Seconds between two consecutive written frames: `frame_skip / frame_rate`.
    pub sample_interval: f64,
    pub frames_decoded: u64,
    pub frames_written: u64,
    /// The cancel flag stopped the run before the stream was exhausted.
    pub cancelled: bool,
}

/// File name of a sampled frame: the zero-padded source frame number.
pub fn frame_file_name(frame_number: u64) -> String {
    format!("{frame_number:05}.{FRAME_EXTENSION}")
}

/// Sample the video at `video_path` into `output_dir`.
///
/// All preconditions are checked before the decoder is started.
pub fn sample_video(video_path: &Path, output_dir: &Path, config: &SamplerConfig) -> Result<SampleReport> {
    check_video_path(video_path)?;
    check_output_dir(output_dir, config.overwrite)?;
    check_frame_skip(config.frame_skip)?;

    let mut decoder = VideoDecoder::open(video_path)?;
    sample_frames(&mut decoder, video_path, output_dir, config)
}

/// Sample frames from an already opened source into `output_dir`.
///
/// `origin` only names the source in errors and logs. The directory checks are
/// repeated here so that callers bypassing [`sample_video`] get the same guarantees.
pub fn sample_frames(
    source: &mut dyn FrameSource,
    origin: &Path,
    output_dir: &Path,
    config: &SamplerConfig,
) -> Result<SampleReport> {
    check_output_dir(output_dir, config.overwrite)?;
    check_frame_skip(config.frame_skip)?;

    let frame_rate = source.fps();
    if !(frame_rate.is_finite() && frame_rate > 0.0) {
        return Err(Error::decode(format!(
            "{} reports invalid frame rate {frame_rate}",
            origin.display()
        )));
    }
    let frame_skip = config.frame_skip;
    let sample_interval = frame_skip as f64 / frame_rate;

    info!(
        ?origin,
        ?output_dir,
        frame_skip,
        frame_rate,
        sample_interval,
        expected_frames = ?source.frame_count(),
        "sampling starting"
    );

    let mut count: u64 = 0;
    let mut written: u64 = 0;
    let mut cancelled = false;

    loop {
        if is_cancelled(config) {
            warn!(frames_decoded = count, frames_written = written, "sampling cancelled");
            cancelled = true;
            break;
        }

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) if count == 0 => {
                error!(?origin, "no frames could be decoded");
                return Err(Error::EmptyStream(origin.to_path_buf()));
            }
            Err(e) if count == 0 => {
                error!(?origin, %e, "first frame failed to decode");
                return Err(Error::EmptyStream(origin.to_path_buf()));
            }
            Ok(None) => break,
            Err(e) => {
                // Indistinguishable from a truncated container; treated as end of stream.
                warn!(frames_decoded = count, %e, "decode failed mid-stream, stopping");
                break;
            }
        };

        debug!(count, timestamp = frame.timestamp_seconds, "read a new frame");

        if count % frame_skip as u64 == 0 {
            let path = output_dir.join(frame_file_name(count));
            write_frame_atomic(&frame, &path)?;
            written += 1;
            debug!(?path, "frame written");
        }

        count += 1;
    }

    // A terminal interrupt can end the decoder's stream before the flag is seen at
    // the top of the loop; the run is still a cancelled one.
    if !cancelled && is_cancelled(config) {
        warn!(frames_decoded = count, frames_written = written, "stream ended after cancellation");
        cancelled = true;
    }

    info!(
        frames_decoded = count,
        frames_written = written,
        cancelled,
        "sampling complete"
    );

    Ok(SampleReport {
        frame_rate,
        sample_interval,
        frames_decoded: count,
        frames_written: written,
        cancelled,
    })
}

fn is_cancelled(config: &SamplerConfig) -> bool {
    config
        .cancel
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::SeqCst))
}

fn check_video_path(path: &Path) -> Result<()> {
    let name_ok = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(VIDEO_EXTENSION));
    if !name_ok {
        return Err(Error::invalid_input(format!(
            "{} is not an {} file",
            path.display(),
            VIDEO_EXTENSION.trim_start_matches('.')
        )));
    }
    if !path.is_file() {
        return Err(Error::invalid_input(format!(
            "{} is not an existing file",
            path.display()
        )));
    }
    Ok(())
}

fn check_output_dir(dir: &Path, overwrite: bool) -> Result<()> {
    if !dir.is_dir() {
        return Err(Error::NotFound(dir.to_path_buf()));
    }
    if !overwrite && fs::read_dir(dir)?.next().is_some() {
        return Err(Error::AlreadyExists(dir.to_path_buf()));
    }
    Ok(())
}

fn check_frame_skip(frame_skip: u32) -> Result<()> {
    if frame_skip == 0 {
        return Err(Error::invalid_input("frame skip must be >= 1"));
    }
    Ok(())
}

/// Encode to a hidden sibling file, then rename over the final name so the
/// image is either complete or absent.
fn write_frame_atomic(frame: &Frame, path: &Path) -> Result<()> {
    let tmp_path = temp_path_for(path);
    let result = frame
        .image
        .save_with_format(&tmp_path, ImageFormat::Jpeg)
        .and_then(|()| fs::rename(&tmp_path, path).map_err(ImageError::IoError));

    if let Err(source) = result {
        let _ = fs::remove_file(&tmp_path);
        error!(?path, %source, frame_number = frame.frame_number, "failed to write frame");
        return Err(Error::WriteFailure {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
