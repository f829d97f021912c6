// Inference backend ports
//
// The engine never decodes pixels itself: every fragment of analysis output is
// obtained through one of the capability traits below. Implementations wrap a
// vision/ML service, ffprobe/ffmpeg, or fixed fragments for dry runs and tests.

pub mod fixture;
pub mod probe;
pub mod sampler;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tagging::TagRecord;

/// Opaque locator for one still image. The engine passes it to backends and
/// inspectors; only they decide what to do with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef(PathBuf);

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ImageRef(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&Path> for ImageRef {
    fn from(path: &Path) -> Self {
        ImageRef(path.to_path_buf())
    }
}

// ----- Fragment payloads -----

/// Normalized bounding box, all fields in [0,1].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One detected object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObjectDetection {
    pub name: String,
    pub confidence: f64,
    pub bounding_box: BoundingBox,
}

/// Environment classification for the whole frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentClass {
    pub primary: String,
    pub sub_categories: Vec<String>,
    pub confidence: f64,
}

/// One dominant color and the fraction of the image it covers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaletteEntry {
    pub hex: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeOfDay {
    pub period: String,
    pub specific: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherReading {
    pub condition: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Keyword {
    pub keyword: String,
    pub confidence: f64,
}

/// Composition assessment with an optional normalized score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompositionReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub findings: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Lighting assessment with an optional normalized score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LightingReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub brightness: String,
    pub contrast: String,
    pub suggestions: Vec<String>,
}

/// Measured image properties from an inspector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageProperties {
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: String,
}

// ----- Capability traits -----

/// Object and scene inference.
pub trait SceneInference {
    fn detect_objects(&self, image: &ImageRef) -> Result<Vec<ObjectDetection>>;

    /// Classify the environment, choosing the primary label from `categories`.
    fn classify_environment(&self, image: &ImageRef, categories: &[String])
        -> Result<EnvironmentClass>;
}

/// Attribute inference: palette, time-of-day, weather, keywords.
pub trait AttributeInference {
    fn color_palette(&self, image: &ImageRef, palette_size: usize) -> Result<Vec<PaletteEntry>>;

    fn time_of_day(&self, image: &ImageRef) -> Result<TimeOfDay>;

    fn weather(&self, image: &ImageRef) -> Result<WeatherReading>;

    /// Generate keywords. `context` is the tag record accumulated by every
    /// stage that ran before this one.
    fn keywords(&self, image: &ImageRef, context: &TagRecord, keyword_count: usize)
        -> Result<Vec<Keyword>>;
}

/// Composition and lighting quality inference.
pub trait QualityInference {
    fn composition(&self, image: &ImageRef, rules: &[String]) -> Result<CompositionReport>;

    fn lighting(&self, image: &ImageRef, threshold: f64) -> Result<LightingReport>;
}

/// Measures actual image properties (no ML involved).
pub trait ImageInspector {
    fn inspect(&self, image: &ImageRef) -> Result<ImageProperties>;
}

/// Produces sampled frames from a video.
pub trait FrameSampler {
    /// Timestamps (whole seconds) at which frames will be sampled, ascending.
    /// Empty when the video is shorter than one interval.
    fn sample_timestamps(&self, video: &Path, interval_secs: u64) -> Result<Vec<u64>>;

    /// Extract the frame at one timestamp, returning a locator for the still.
    fn extract_frame(&self, video: &Path, timestamp_secs: u64) -> Result<ImageRef>;
}
