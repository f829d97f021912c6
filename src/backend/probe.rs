// FFprobe-backed image inspector
//
// Measures real pixel dimensions and derives an aspect-ratio label. ffprobe
// handles still images the same way it handles video, so one wrapper covers
// every extension the batch runner accepts.

use std::process::Command;

use serde::Deserialize;

use super::{ImageInspector, ImageProperties, ImageRef};
use crate::constants::{ASPECT_RATIO_TOLERANCE, KNOWN_ASPECT_RATIOS};
use crate::error::{FramesightError, Result};
use crate::tools::ffprobe_path;

#[derive(Debug, Deserialize)]
struct FFprobeOutput {
    streams: Option<Vec<FFprobeStream>>,
}

#[derive(Debug, Deserialize)]
struct FFprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

pub struct FfprobeInspector;

impl ImageInspector for FfprobeInspector {
    fn inspect(&self, image: &ImageRef) -> Result<ImageProperties> {
        let output = Command::new(ffprobe_path())
            .args(["-v", "quiet", "-print_format", "json", "-show_streams"])
            .arg(image.path())
            .output()
            .map_err(|e| FramesightError::FFprobe(format!("Failed to run ffprobe: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FramesightError::FFprobe(format!("ffprobe failed: {}", stderr)));
        }

        parse_properties(&output.stdout)
    }
}

/// Parse ffprobe stream JSON into measured properties.
fn parse_properties(stdout: &[u8]) -> Result<ImageProperties> {
    let probe: FFprobeOutput = serde_json::from_slice(stdout)
        .map_err(|e| FramesightError::FFprobe(format!("Failed to parse ffprobe output: {}", e)))?;

    let stream = probe
        .streams
        .unwrap_or_default()
        .into_iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| FramesightError::FFprobe("no image stream found".to_string()))?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => Ok(ImageProperties {
            width,
            height,
            aspect_ratio: aspect_label(width, height),
        }),
        _ => Err(FramesightError::FFprobe("image dimensions unavailable".to_string())),
    }
}

/// Label for measured dimensions: the nearest well-known ratio within
/// tolerance, else the exact reduced W:H.
pub fn aspect_label(width: u32, height: u32) -> String {
    let ratio = width as f64 / height as f64;

    for (label, value) in KNOWN_ASPECT_RATIOS {
        if (ratio - value).abs() / value <= ASPECT_RATIO_TOLERANCE {
            return label.to_string();
        }
    }

    let d = gcd(width, height);
    format!("{}:{}", width / d, height / d)
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
