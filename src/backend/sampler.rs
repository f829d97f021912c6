// FFmpeg-backed frame sampler
//
// Probes the video duration with ffprobe, schedules timestamps at a fixed
// interval, and extracts one JPEG per timestamp into a scratch directory.
// Extraction writes to a temp name first and renames, so a crashed ffmpeg run
// never leaves a half-written frame behind.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use super::{FrameSampler, ImageRef};
use crate::constants::FRAME_EXTRACT_QUALITY;
use crate::error::{FramesightError, Result};
use crate::tools::{ffmpeg_path, ffprobe_path};

#[derive(Debug, Deserialize)]
struct FFprobeOutput {
    format: Option<FFprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FFprobeFormat {
    duration: Option<String>,
}

pub struct FfmpegFrameSampler {
    frames_dir: PathBuf,
}

impl FfmpegFrameSampler {
    /// Sampler writing frames under the system temp directory, one scratch
    /// directory per process.
    pub fn new() -> Result<Self> {
        let frames_dir =
            std::env::temp_dir().join(format!("framesight-frames-{}", std::process::id()));
        Self::with_dir(frames_dir)
    }

    /// Sampler writing frames under an explicit directory.
    pub fn with_dir(frames_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&frames_dir)?;
        Ok(Self { frames_dir })
    }

    fn probe_duration_secs(&self, video: &Path) -> Result<u64> {
        let output = Command::new(ffprobe_path())
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(video)
            .output()
            .map_err(|e| FramesightError::FFprobe(format!("Failed to run ffprobe: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FramesightError::FFprobe(format!("ffprobe failed: {}", stderr)));
        }

        let probe: FFprobeOutput = serde_json::from_slice(&output.stdout)
            .map_err(|e| FramesightError::FFprobe(format!("Failed to parse ffprobe output: {}", e)))?;

        let secs = probe
            .format
            .and_then(|f| f.duration)
            .and_then(|d| d.parse::<f64>().ok())
            .ok_or_else(|| FramesightError::FFprobe("video duration unavailable".to_string()))?;

        Ok(secs.floor() as u64)
    }
}

/// Timestamps 0, i, 2i, ... strictly below the duration. A video shorter than
/// one interval yields no samples at all.
fn schedule(duration_secs: u64, interval_secs: u64) -> Vec<u64> {
    if duration_secs < interval_secs {
        return Vec::new();
    }
    (0..duration_secs).step_by(interval_secs as usize).collect()
}

impl FrameSampler for FfmpegFrameSampler {
    fn sample_timestamps(&self, video: &Path, interval_secs: u64) -> Result<Vec<u64>> {
        if interval_secs == 0 {
            return Err(FramesightError::InvalidInterval);
        }

        let duration = self.probe_duration_secs(video)?;
        Ok(schedule(duration, interval_secs))
    }

    fn extract_frame(&self, video: &Path, timestamp_secs: u64) -> Result<ImageRef> {
        let stem = video.file_stem().and_then(|s| s.to_str()).unwrap_or("frame");
        let output_path = self.frames_dir.join(format!("{}_{}.jpg", stem, timestamp_secs));
        let tmp_path = output_path.with_extension("tmp.jpg");

        let output = Command::new(ffmpeg_path())
            .args(["-y", "-ss", &timestamp_secs.to_string(), "-i"])
            .arg(video)
            .args(["-vframes", "1", "-q:v", &FRAME_EXTRACT_QUALITY.to_string()])
            .arg(&tmp_path)
            .output()
            .map_err(|e| FramesightError::FFmpeg(format!("Failed to run ffmpeg: {}", e)))?;

        if !output.status.success() {
            let _ = std::fs::remove_file(&tmp_path);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FramesightError::FFmpeg(format!("frame extraction failed: {}", stderr)));
        }

        std::fs::rename(&tmp_path, &output_path)?;

        if std::fs::metadata(&output_path).map(|m| m.len()).unwrap_or(0) == 0 {
            let _ = std::fs::remove_file(&output_path);
            return Err(FramesightError::FFmpeg("extracted frame is empty".to_string()));
        }

        Ok(ImageRef::new(output_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_spacing() {
        assert_eq!(schedule(20, 5), vec![0, 5, 10, 15]);
        assert_eq!(schedule(12, 5), vec![0, 5, 10]);
    }

    #[test]
    fn test_schedule_video_shorter_than_interval_is_empty() {
        assert!(schedule(3, 5).is_empty());
        assert!(schedule(0, 5).is_empty());
    }

    #[test]
    fn test_schedule_exact_interval_samples_start_only() {
        assert_eq!(schedule(5, 5), vec![0]);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let sampler = FfmpegFrameSampler::with_dir(dir.path().join("frames")).unwrap();

        let err = sampler
            .sample_timestamps(Path::new("missing.mp4"), 0)
            .unwrap_err();
        assert!(matches!(err, FramesightError::InvalidInterval));
    }
}
