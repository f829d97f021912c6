// Batch fan-out
//
// Drives the single-image tagger across every image in a directory, or across
// the sampled frames of a video, collecting results keyed by filename or by
// frame timestamp. Failures stay contained per image: one bad file never
// aborts the rest of the batch.

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use walkdir::WalkDir;

use crate::backend::{FrameSampler, ImageRef};
use crate::constants::IMAGE_EXTENSIONS;
use crate::error::{FramesightError, Result};
use crate::tagging::{EnvironmentTagger, TagOutcome};

/// Directory results keyed by filename, in directory-listing order.
pub type TagCollection = IndexMap<String, TagOutcome>;

/// Video results keyed by frame timestamp in whole seconds.
pub type FrameTagCollection = IndexMap<u64, TagOutcome>;

pub struct BatchRunner {
    tagger: EnvironmentTagger,
    sampler: Box<dyn FrameSampler>,
}

impl BatchRunner {
    pub fn new(tagger: EnvironmentTagger, sampler: Box<dyn FrameSampler>) -> Self {
        Self { tagger, sampler }
    }

    pub fn tagger(&self) -> &EnvironmentTagger {
        &self.tagger
    }

    /// Tag every image directly inside `directory`, keyed by filename.
    /// A directory with no images yields an empty collection.
    pub fn batch_tag(&self, directory: &Path, output: Option<&Path>) -> Result<TagCollection> {
        if !directory.is_dir() {
            return Err(FramesightError::InvalidPath(format!(
                "not a directory: {}",
                directory.display()
            )));
        }

        let mut results = TagCollection::new();

        for entry in WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_image_file(path) {
                continue;
            }

            let filename = entry.file_name().to_string_lossy().to_string();
            results.insert(filename, self.tagger.tag_environment(&ImageRef::from(path)));
        }

        if let Some(output) = output {
            persist(&results, output);
        }

        Ok(results)
    }

    /// Tag sampled frames of a video at a fixed interval, keyed by timestamp.
    /// A video shorter than one interval yields an empty collection.
    pub fn tag_video_scenes(
        &self,
        video: &Path,
        frame_interval_secs: u64,
        output: Option<&Path>,
    ) -> Result<FrameTagCollection> {
        let timestamps = self.sampler.sample_timestamps(video, frame_interval_secs)?;

        let mut results = FrameTagCollection::new();

        for timestamp in timestamps {
            let outcome = match self.sampler.extract_frame(video, timestamp) {
                Ok(frame) => self.tagger.tag_environment(&frame),
                Err(e) => {
                    log::warn!(
                        "Frame extraction failed for {} at {}s: {}",
                        video.display(),
                        timestamp,
                        e
                    );
                    TagOutcome::Failed { error: e.to_string() }
                }
            };
            results.insert(timestamp, outcome);
        }

        if let Some(output) = output {
            persist(&results, output);
        }

        Ok(results)
    }
}

/// Check if a file has a recognized image extension
pub fn is_image_file(path: &Path) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(e) => e.to_lowercase(),
        None => return false,
    };

    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// Fire-and-forget persistence: the in-memory collection is already the return
/// value, so a failed write is only worth a warning.
fn persist<T: Serialize>(results: &T, output: &Path) {
    let write = serde_json::to_string_pretty(results)
        .map_err(FramesightError::from)
        .and_then(|json| std::fs::write(output, json).map_err(FramesightError::from));

    match write {
        Ok(()) => log::info!("Results saved to {}", output.display()),
        Err(e) => log::warn!("Failed to save results to {}: {}", output.display(), e),
    }
}
