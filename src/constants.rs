// Framesight Constants
// Default configuration values and recognition tables. Option defaults here
// must stay in sync with the EngineConfig documentation in config.rs.

// Image extensions accepted by the batch runner
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "bmp"];

// ----- Tagging defaults -----

pub const DEFAULT_MIN_OBJECT_CONFIDENCE: f64 = 0.7;
pub const DEFAULT_PALETTE_SIZE: usize = 5;
pub const DEFAULT_KEYWORD_COUNT: usize = 10;

// Category vocabulary offered to the environment classifier
pub const ENVIRONMENT_CATEGORIES: [&str; 16] = [
    "indoor", "outdoor", "urban", "rural", "natural", "water",
    "beach", "mountain", "forest", "desert", "snow", "office",
    "home", "restaurant", "industrial", "transportation",
];

// ----- Validation defaults -----

pub const DEFAULT_COMPOSITION_RULES: [&str; 3] = ["rule_of_thirds", "leading_lines", "framing"];
pub const DEFAULT_LIGHTING_THRESHOLD: f64 = 0.6;
pub const DEFAULT_MIN_RESOLUTION: (u32, u32) = (1280, 720);
pub const DEFAULT_ASPECT_RATIOS: [&str; 3] = ["16:9", "4:3", "1:1"];

// Well-known aspect ratios the inspector snaps measurements to
pub const KNOWN_ASPECT_RATIOS: [(&str, f64); 8] = [
    ("16:9", 16.0 / 9.0),
    ("9:16", 9.0 / 16.0),
    ("4:3", 4.0 / 3.0),
    ("3:4", 3.0 / 4.0),
    ("3:2", 3.0 / 2.0),
    ("2:3", 2.0 / 3.0),
    ("21:9", 21.0 / 9.0),
    ("1:1", 1.0),
];

// Relative tolerance when snapping a measured ratio to a known label
pub const ASPECT_RATIO_TOLERANCE: f64 = 0.02;

// ----- Frame sampling -----

pub const DEFAULT_FRAME_INTERVAL_SECS: u64 = 5;

// JPEG quality (ffmpeg -q:v scale, 2 is near-lossless) for extracted frames
pub const FRAME_EXTRACT_QUALITY: u32 = 2;
