use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use image::RgbImage;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};

use super::frame::Frame;
use super::source::FrameSource;

/// Stream metadata obtained by probing with ffprobe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// `nb_frames` from the container; many formats leave it as N/A.
    pub frame_count: Option<u64>,
}

/// Probe the first video stream of `path`.
pub fn probe(path: &Path) -> Result<VideoInfo> {
    info!(?path, "probing video metadata with ffprobe");

    let output = Command::new("ffprobe")
        .args([
            "-v", "error",
            "-select_streams", "v:0",
            "-show_entries", "stream=width,height,r_frame_rate,nb_frames",
            "-of", "csv=p=0",
        ])
        .arg(path)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| Error::decode(format!("failed to run ffprobe, is ffmpeg installed? {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!(%stderr, ?path, "ffprobe failed");
        return Err(Error::decode(format!("ffprobe failed: {}", stderr.trim())));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let info = parse_probe_output(&stdout)?;
    info!(
        width = info.width,
        height = info.height,
        fps = info.fps,
        frame_count = ?info.frame_count,
        "probe completed"
    );
    Ok(info)
}

/// Parse ffprobe's `width,height,num/den,nb_frames` line.
fn parse_probe_output(stdout: &str) -> Result<VideoInfo> {
    let parts: Vec<&str> = stdout.trim().split(',').map(str::trim).collect();
    if parts.len() < 3 {
        error!(%stdout, "unexpected ffprobe output format, expected width,height,fps");
        return Err(Error::decode(format!("unexpected ffprobe output: {stdout}")));
    }

    let width: u32 = parts[0]
        .parse()
        .map_err(|_| Error::decode(format!("failed to parse width: {}", parts[0])))?;
    let height: u32 = parts[1]
        .parse()
        .map_err(|_| Error::decode(format!("failed to parse height: {}", parts[1])))?;
    let fps = parse_frame_rate(parts[2])?;

    let frame_count = parts.get(3).and_then(|s| s.parse::<u64>().ok());

    if width == 0 || height == 0 {
        return Err(Error::decode(format!("invalid video dimensions: {width}x{height}")));
    }
    if !(fps.is_finite() && fps > 0.0) {
        warn!(fps, "video reports invalid frame rate");
        return Err(Error::decode(format!("stream reports invalid frame rate {fps}")));
    }

    Ok(VideoInfo {
        width,
        height,
        fps,
        frame_count,
    })
}

fn parse_frame_rate(raw: &str) -> Result<f64> {
    let bad = || Error::decode(format!("failed to parse frame rate: {raw}"));
    if let Some((num, den)) = raw.split_once('/') {
        let num: f64 = num.parse().map_err(|_| bad())?;
        let den: f64 = den.parse().map_err(|_| bad())?;
        Ok(if den > 0.0 { num / den } else { 0.0 })
    } else {
        raw.parse().map_err(|_| bad())
    }
}

/// Decodes video frames by piping raw RGB24 data from the ffmpeg CLI.
pub struct VideoDecoder {
    child: Child,
    info: VideoInfo,
    frame_count: u64,
    frame_bytes: usize,
}

impl VideoDecoder {
    /// Open a video file for decoding.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        let info = probe(path)?;

        info!(?path, "spawning ffmpeg decoder process");

        let mut command = Command::new("ffmpeg");
        command
            .args(["-i"])
            .arg(path)
            .args([
                "-f", "rawvideo",
                "-pix_fmt", "rgb24",
                "-v", "error",
                "pipe:1",
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        // Own process group: a terminal Ctrl-C goes to us only, and the sampler
        // decides when to stop reading.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let child = command
            .spawn()
            .map_err(|e| Error::decode(format!("failed to spawn ffmpeg, is ffmpeg installed? {e}")))?;

        let frame_bytes = (info.width as usize) * (info.height as usize) * 3;

        info!(
            width = info.width,
            height = info.height,
            fps = info.fps,
            frame_bytes,
            "video decoder opened"
        );

        Ok(Self {
            child,
            info,
            frame_count: 0,
            frame_bytes,
        })
    }

    pub fn info(&self) -> VideoInfo {
        self.info
    }
}

impl FrameSource for VideoDecoder {
    fn fps(&self) -> f64 {
        self.info.fps
    }

    fn frame_count(&self) -> Option<u64> {
        self.info.frame_count
    }

    /// Read the next frame from the ffmpeg pipe, or `None` if the video is finished.
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let stdout = self
            .child
            .stdout
            .as_mut()
            .ok_or_else(|| Error::decode("ffmpeg stdout not available"))?;

        let mut buf = vec![0u8; self.frame_bytes];
        let mut read = 0;

        while read < self.frame_bytes {
            match stdout.read(&mut buf[read..]) {
                Ok(0) => {
                    if read == 0 {
                        info!(total_frames = self.frame_count, "video stream ended");
                        return Ok(None);
                    }
                    error!(
                        read_bytes = read,
                        expected_bytes = self.frame_bytes,
                        frame = self.frame_count,
                        "ffmpeg stream ended mid-frame"
                    );
                    return Err(Error::decode(format!(
                        "ffmpeg stream ended mid-frame (read {read}/{} bytes)",
                        self.frame_bytes,
                    )));
                }
                Ok(n) => read += n,
                Err(e) => {
                    error!(frame = self.frame_count, %e, "failed to read from ffmpeg pipe");
                    return Err(Error::decode(format!("failed to read from ffmpeg pipe: {e}")));
                }
            }
        }

        let image = RgbImage::from_raw(self.info.width, self.info.height, buf)
            .ok_or_else(|| Error::decode("failed to create RgbImage from raw frame data"))?;

        let frame_number = self.frame_count;
        let timestamp_seconds = frame_number as f64 / self.info.fps;
        self.frame_count += 1;

        debug!(frame_number, timestamp_seconds, "decoded frame");

        Ok(Some(Frame {
            image,
            frame_number,
            timestamp_seconds,
        }))
    }
}

impl Drop for VideoDecoder {
    fn drop(&mut self) {
        info!(total_frames = self.frame_count, "closing video decoder");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rational_frame_rate() {
        let info = parse_probe_output("1920,1080,30000/1001,300\n").unwrap();
        assert_eq!(info.width, 1920);
        assert_eq!(info.height, 1080);
        assert!((info.fps - 29.97).abs() < 0.01);
        assert_eq!(info.frame_count, Some(300));
    }

    #[test]
    fn frame_count_is_optional() {
        let info = parse_probe_output("640,480,25/1,N/A").unwrap();
        assert_eq!(info.fps, 25.0);
        assert_eq!(info.frame_count, None);

        let info = parse_probe_output("640,480,60").unwrap();
        assert_eq!(info.fps, 60.0);
        assert_eq!(info.frame_count, None);
    }

    #[test]
    fn rejects_zero_frame_rate() {
        let err = parse_probe_output("640,480,0/0,10").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn rejects_infinite_frame_rate() {
        let err = parse_probe_output("640,480,inf,10").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn rejects_truncated_output() {
        assert!(matches!(parse_probe_output("640,480"), Err(Error::Decode(_))));
        assert!(matches!(parse_probe_output("abc,480,30/1"), Err(Error::Decode(_))));
    }

    #[test]
    fn open_missing_file_is_not_found() {
        let err = VideoDecoder::open(Path::new("/definitely/not/here.mp4")).err().unwrap();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
