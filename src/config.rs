// Engine configuration
//
// One immutable EngineConfig per engine instance: built-in defaults shallow-merged
// with an optional JSON override document. An override value replaces the default
// wholesale (no deep merge); unknown override keys pass through untouched.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{
    DEFAULT_ASPECT_RATIOS, DEFAULT_COMPOSITION_RULES, DEFAULT_KEYWORD_COUNT,
    DEFAULT_LIGHTING_THRESHOLD, DEFAULT_MIN_OBJECT_CONFIDENCE, DEFAULT_MIN_RESOLUTION,
    DEFAULT_PALETTE_SIZE, ENVIRONMENT_CATEGORIES,
};
use crate::error::{FramesightError, Result};

/// Effective configuration for one engine instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    // Tagging options
    pub min_object_confidence: f64,
    pub extract_color_palette: bool,
    pub palette_size: usize,
    pub detect_time_of_day: bool,
    pub detect_weather: bool,
    pub generate_keywords: bool,
    pub keyword_count: usize,
    pub environment_categories: Vec<String>,

    // Validation options
    pub composition_rules: Vec<String>,
    pub lighting_threshold: f64,
    pub min_resolution: (u32, u32),
    pub aspect_ratios: Vec<String>,

    /// Override keys this version does not recognize, kept so newer documents
    /// survive a round trip through an older engine.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_object_confidence: DEFAULT_MIN_OBJECT_CONFIDENCE,
            extract_color_palette: true,
            palette_size: DEFAULT_PALETTE_SIZE,
            detect_time_of_day: true,
            detect_weather: true,
            generate_keywords: true,
            keyword_count: DEFAULT_KEYWORD_COUNT,
            environment_categories: ENVIRONMENT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            composition_rules: DEFAULT_COMPOSITION_RULES.iter().map(|s| s.to_string()).collect(),
            lighting_threshold: DEFAULT_LIGHTING_THRESHOLD,
            min_resolution: DEFAULT_MIN_RESOLUTION,
            aspect_ratios: DEFAULT_ASPECT_RATIOS.iter().map(|s| s.to_string()).collect(),
            extra: Map::new(),
        }
    }
}

impl EngineConfig {
    /// Shallow-merge an override mapping onto defaults.
    ///
    /// Keys present in both take the override value wholesale; keys present only
    /// in the override land in `extra`. A mapping that cannot be interpreted
    /// (wrong type for a known option) falls back to the defaults unchanged.
    pub fn resolve(defaults: &EngineConfig, overrides: Option<&Map<String, Value>>) -> EngineConfig {
        let Some(overrides) = overrides else {
            return defaults.clone();
        };

        let mut merged = match serde_json::to_value(defaults) {
            Ok(Value::Object(map)) => map,
            _ => return defaults.clone(),
        };
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }

        match serde_json::from_value(Value::Object(merged)) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Error loading config: {} (using defaults)", e);
                defaults.clone()
            }
        }
    }

    /// Resolve configuration from an optional JSON override file.
    ///
    /// A missing, unreadable, or malformed document is a warning, never an
    /// error: the engine stays usable on defaults alone.
    pub fn load(path: Option<&Path>) -> EngineConfig {
        let defaults = EngineConfig::default();

        let Some(path) = path else {
            return defaults;
        };

        match read_override_document(path) {
            Ok(overrides) => EngineConfig::resolve(&defaults, Some(&overrides)),
            Err(e) => {
                log::warn!("Error loading config {}: {} (using defaults)", path.display(), e);
                defaults
            }
        }
    }
}

/// Read and parse an override document as a JSON object.
fn read_override_document(path: &Path) -> Result<Map<String, Value>> {
    let text = std::fs::read_to_string(path)?;
    match serde_json::from_str(&text)? {
        Value::Object(map) => Ok(map),
        _ => Err(FramesightError::Config(
            "override document is not a JSON object".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn overrides(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("override fixture must be an object"),
        }
    }

    #[test]
    fn test_resolve_without_overrides_is_defaults() {
        let defaults = EngineConfig::default();
        assert_eq!(EngineConfig::resolve(&defaults, None), defaults);
    }

    #[test]
    fn test_override_precedence() {
        let defaults = EngineConfig::default();
        let doc = overrides(json!({
            "palette_size": 8,
            "extract_color_palette": false
        }));

        let resolved = EngineConfig::resolve(&defaults, Some(&doc));

        assert_eq!(resolved.palette_size, 8);
        assert!(!resolved.extract_color_palette);
        // Keys absent from the override keep their defaults
        assert_eq!(resolved.keyword_count, defaults.keyword_count);
        assert_eq!(resolved.min_resolution, defaults.min_resolution);
    }

    #[test]
    fn test_compound_option_replaced_wholesale() {
        let defaults = EngineConfig::default();
        let doc = overrides(json!({ "aspect_ratios": ["16:9"] }));

        let resolved = EngineConfig::resolve(&defaults, Some(&doc));

        assert_eq!(resolved.aspect_ratios, vec!["16:9".to_string()]);
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let defaults = EngineConfig::default();
        let doc = overrides(json!({ "custom_flag": true }));

        let resolved = EngineConfig::resolve(&defaults, Some(&doc));

        assert_eq!(resolved.extra.get("custom_flag"), Some(&Value::Bool(true)));

        // And the key survives serialization
        let serialized = serde_json::to_value(&resolved).unwrap();
        assert_eq!(serialized["custom_flag"], Value::Bool(true));
    }

    #[test]
    fn test_type_mismatch_falls_back_to_defaults() {
        let defaults = EngineConfig::default();
        let doc = overrides(json!({ "palette_size": "five", "detect_weather": false }));

        // No partial corruption: the whole override is discarded
        let resolved = EngineConfig::resolve(&defaults, Some(&doc));
        assert_eq!(resolved, defaults);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let defaults = EngineConfig::default();
        let doc = overrides(json!({ "keyword_count": 3, "custom": [1, 2] }));

        let a = EngineConfig::resolve(&defaults, Some(&doc));
        let b = EngineConfig::resolve(&defaults, Some(&doc));

        assert_eq!(a, b);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let resolved = EngineConfig::load(Some(Path::new("/nonexistent/config.json")));
        assert_eq!(resolved, EngineConfig::default());
    }

    #[test]
    fn test_load_malformed_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let resolved = EngineConfig::load(Some(&path));
        assert_eq!(resolved, EngineConfig::default());
    }

    #[test]
    fn test_load_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "min_object_confidence": 0.5 }"#).unwrap();

        let resolved = EngineConfig::load(Some(&path));
        assert!((resolved.min_object_confidence - 0.5).abs() < f64::EPSILON);
        assert_eq!(resolved.palette_size, DEFAULT_PALETTE_SIZE);
    }
}
