// Framesight - Scene Analysis Engine
//
// Environment tagging and quality validation for still images and sampled
// video frames. Inference is delegated to pluggable backends; this crate owns
// configuration resolution, stage orchestration, score aggregation, and batch
// fan-out.

pub mod constants;
pub mod error;
pub mod tools;
pub mod config;
pub mod backend;
pub mod tagging;
pub mod validation;
pub mod batch;

pub use backend::ImageRef;
pub use batch::BatchRunner;
pub use config::EngineConfig;
pub use error::{FramesightError, Result};
pub use tagging::EnvironmentTagger;
pub use validation::SceneValidator;
