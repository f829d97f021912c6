// Environment tagging orchestrator
//
// Runs the enabled tagging stages for one image in a fixed order and merges the
// fragments into one record. Tagging is all-or-nothing per image: any stage
// failure turns the whole invocation into a single error payload, so consumers
// never have to guess which fragments of a partial record are trustworthy.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::backend::{
    AttributeInference, EnvironmentClass, ImageRef, Keyword, ObjectDetection, PaletteEntry,
    SceneInference, TimeOfDay, WeatherReading,
};
use crate::config::EngineConfig;
use crate::error::Result;

/// Merged tagging record for one image.
///
/// `objects` and `environment_type` are always present; the remaining fragments
/// appear only when their stage is enabled in the configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagRecord {
    pub objects: Vec<ObjectDetection>,
    pub environment_type: EnvironmentClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_palette: Option<Vec<PaletteEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<TimeOfDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<Keyword>>,
    /// RFC 3339 local time at which the invocation completed.
    pub timestamp: String,
}

/// Whole-image tagging result: a complete record, or one error payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TagOutcome {
    Tagged(TagRecord),
    Failed { error: String },
}

impl TagOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, TagOutcome::Failed { .. })
    }
}

/// Tagging orchestrator for a single engine instance.
pub struct EnvironmentTagger {
    config: EngineConfig,
    scene: Box<dyn SceneInference>,
    attributes: Box<dyn AttributeInference>,
}

impl EnvironmentTagger {
    pub fn new(
        config: EngineConfig,
        scene: Box<dyn SceneInference>,
        attributes: Box<dyn AttributeInference>,
    ) -> Self {
        Self { config, scene, attributes }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Tag one image. Never returns an error: a stage failure is reported as
    /// `TagOutcome::Failed` for this image only.
    pub fn tag_environment(&self, image: &ImageRef) -> TagOutcome {
        match self.run_stages(image) {
            Ok(record) => TagOutcome::Tagged(record),
            Err(e) => {
                log::warn!("Tagging failed for {}: {}", image, e);
                TagOutcome::Failed { error: e.to_string() }
            }
        }
    }

    fn run_stages(&self, image: &ImageRef) -> Result<TagRecord> {
        let mut objects = self.scene.detect_objects(image)?;
        objects.retain(|o| o.confidence >= self.config.min_object_confidence);

        let environment_type = self
            .scene
            .classify_environment(image, &self.config.environment_categories)?;

        let mut record = TagRecord {
            objects,
            environment_type,
            color_palette: None,
            time_of_day: None,
            weather: None,
            keywords: None,
            timestamp: String::new(),
        };

        if self.config.extract_color_palette {
            record.color_palette =
                Some(self.attributes.color_palette(image, self.config.palette_size)?);
        }

        if self.config.detect_time_of_day {
            record.time_of_day = Some(self.attributes.time_of_day(image)?);
        }

        if self.config.detect_weather {
            record.weather = Some(self.attributes.weather(image)?);
        }

        // Keyword generation reads the accumulated record, so it must stay the
        // last stage of the pass.
        if self.config.generate_keywords {
            record.keywords =
                Some(self.attributes.keywords(image, &record, self.config.keyword_count)?);
        }

        record.timestamp = Local::now().to_rfc3339();
        Ok(record)
    }
}
