// Scene validation orchestrator
//
// Runs the fixed set of quality checks for one image and folds their scores
// into one overall score. Checks are independent: a failed check becomes a
// zero-scored error fragment in place and the remaining checks still run.

use serde::{Deserialize, Serialize};

use crate::backend::{
    CompositionReport, ImageInspector, ImageProperties, ImageRef, LightingReport, QualityInference,
};
use crate::config::EngineConfig;
use crate::error::Result;

/// Fragments that may expose a normalized score for aggregation.
pub trait Scored {
    fn score(&self) -> Option<f64>;
}

impl Scored for CompositionReport {
    fn score(&self) -> Option<f64> {
        self.score
    }
}

impl Scored for LightingReport {
    fn score(&self) -> Option<f64> {
        self.score
    }
}

/// Measured resolution compared against the configured minimum.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolutionReport {
    pub score: f64,
    pub actual: (u32, u32),
    pub minimum: (u32, u32),
    pub meets_requirements: bool,
}

impl Scored for ResolutionReport {
    fn score(&self) -> Option<f64> {
        Some(self.score)
    }
}

/// Measured aspect-ratio label compared against the approved set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AspectRatioReport {
    pub score: f64,
    pub current: String,
    pub approved: Vec<String>,
    pub meets_requirements: bool,
}

impl Scored for AspectRatioReport {
    fn score(&self) -> Option<f64> {
        Some(self.score)
    }
}

/// One check's fragment: the payload, or an error substitute scored zero so
/// aggregation stays well-defined.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CheckOutcome<T> {
    Passed(T),
    Failed { error: String, score: f64 },
}

impl<T: Scored> CheckOutcome<T> {
    pub fn score(&self) -> Option<f64> {
        match self {
            CheckOutcome::Passed(fragment) => fragment.score(),
            CheckOutcome::Failed { score, .. } => Some(*score),
        }
    }
}

/// Merged validation record for one image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport {
    pub composition: CheckOutcome<CompositionReport>,
    pub lighting: CheckOutcome<LightingReport>,
    pub resolution: CheckOutcome<ResolutionReport>,
    pub aspect_ratio: CheckOutcome<AspectRatioReport>,
    pub overall_score: f64,
}

/// Arithmetic mean of the scores that are present. Fragments without a score
/// stay out of both the sum and the denominator; no scores at all gives 0.0.
pub fn mean_of_scores<I: IntoIterator<Item = Option<f64>>>(scores: I) -> f64 {
    let present: Vec<f64> = scores.into_iter().flatten().collect();
    if present.is_empty() {
        0.0
    } else {
        present.iter().sum::<f64>() / present.len() as f64
    }
}

/// Validation orchestrator for a single engine instance.
pub struct SceneValidator {
    config: EngineConfig,
    quality: Box<dyn QualityInference>,
    inspector: Box<dyn ImageInspector>,
}

impl SceneValidator {
    pub fn new(
        config: EngineConfig,
        quality: Box<dyn QualityInference>,
        inspector: Box<dyn ImageInspector>,
    ) -> Self {
        Self { config, quality, inspector }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate one image. Never returns an error: every check failure is
    /// contained as a zero-scored fragment.
    pub fn validate_scene(&self, image: &ImageRef) -> ValidationReport {
        let composition = check(
            image,
            "composition",
            self.quality.composition(image, &self.config.composition_rules),
        );
        let lighting = check(
            image,
            "lighting",
            self.quality.lighting(image, self.config.lighting_threshold),
        );

        // One measurement serves both property checks; each fails independently
        // when the measurement itself is unavailable.
        let props = self.inspector.inspect(image);
        let resolution = match &props {
            Ok(p) => CheckOutcome::Passed(self.resolution_report(p)),
            Err(e) => {
                log::warn!("resolution check failed for {}: {}", image, e);
                CheckOutcome::Failed { error: e.to_string(), score: 0.0 }
            }
        };
        let aspect_ratio = match &props {
            Ok(p) => CheckOutcome::Passed(self.aspect_ratio_report(p)),
            Err(e) => {
                log::warn!("aspect ratio check failed for {}: {}", image, e);
                CheckOutcome::Failed { error: e.to_string(), score: 0.0 }
            }
        };

        let overall_score = mean_of_scores([
            composition.score(),
            lighting.score(),
            resolution.score(),
            aspect_ratio.score(),
        ]);

        ValidationReport { composition, lighting, resolution, aspect_ratio, overall_score }
    }

    fn resolution_report(&self, props: &ImageProperties) -> ResolutionReport {
        let (min_width, min_height) = self.config.min_resolution;
        let meets = props.width >= min_width && props.height >= min_height;

        ResolutionReport {
            score: if meets { 1.0 } else { 0.0 },
            actual: (props.width, props.height),
            minimum: self.config.min_resolution,
            meets_requirements: meets,
        }
    }

    fn aspect_ratio_report(&self, props: &ImageProperties) -> AspectRatioReport {
        let meets = self.config.aspect_ratios.iter().any(|r| r == &props.aspect_ratio);

        AspectRatioReport {
            score: if meets { 1.0 } else { 0.0 },
            current: props.aspect_ratio.clone(),
            approved: self.config.aspect_ratios.clone(),
            meets_requirements: meets,
        }
    }
}

fn check<T>(image: &ImageRef, name: &str, result: Result<T>) -> CheckOutcome<T> {
    match result {
        Ok(fragment) => CheckOutcome::Passed(fragment),
        Err(e) => {
            log::warn!("{} check failed for {}: {}", name, image, e);
            CheckOutcome::Failed { error: e.to_string(), score: 0.0 }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fixture::FixedBackend;
    use crate::error::FramesightError;

    fn sample_image() -> ImageRef {
        ImageRef::new("sample_scene.jpg")
    }

    /// Inspector reporting fixed measurements.
    struct FakeInspector {
        width: u32,
        height: u32,
        aspect_ratio: &'static str,
    }

    impl ImageInspector for FakeInspector {
        fn inspect(&self, _image: &ImageRef) -> Result<ImageProperties> {
            Ok(ImageProperties {
                width: self.width,
                height: self.height,
                aspect_ratio: self.aspect_ratio.to_string(),
            })
        }
    }

    fn full_hd_inspector() -> Box<FakeInspector> {
        Box::new(FakeInspector { width: 1920, height: 1080, aspect_ratio: "16:9" })
    }

    #[test]
    fn test_mean_of_scores_all_present() {
        let mean = mean_of_scores([Some(0.85), Some(0.75), Some(1.0), Some(1.0)]);
        assert!((mean - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_mean_of_scores_excludes_scoreless_fragments() {
        let mean = mean_of_scores([None, Some(0.6), Some(0.8), Some(1.0)]);
        assert!((mean - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_mean_of_scores_empty_is_zero() {
        assert_eq!(mean_of_scores([None, None]), 0.0);
        assert_eq!(mean_of_scores([]), 0.0);
    }

    #[test]
    fn test_validate_scene_aggregates_all_checks() {
        let validator = SceneValidator::new(
            EngineConfig::default(),
            Box::new(FixedBackend),
            full_hd_inspector(),
        );

        let report = validator.validate_scene(&sample_image());

        // Fixture composition 0.85 and lighting 0.75; both property checks pass
        assert!((report.overall_score - 0.9).abs() < 1e-9);
        assert!(matches!(report.resolution, CheckOutcome::Passed(ref r) if r.meets_requirements));
        assert!(matches!(report.aspect_ratio, CheckOutcome::Passed(ref r) if r.meets_requirements));
    }

    /// Quality backend whose lighting analysis always fails.
    struct BrokenLighting;

    impl QualityInference for BrokenLighting {
        fn composition(&self, image: &ImageRef, rules: &[String]) -> Result<CompositionReport> {
            FixedBackend.composition(image, rules)
        }

        fn lighting(&self, _image: &ImageRef, _threshold: f64) -> Result<LightingReport> {
            Err(FramesightError::Backend("lighting model timed out".to_string()))
        }
    }

    #[test]
    fn test_failed_check_is_isolated_and_zero_scored() {
        let validator = SceneValidator::new(
            EngineConfig::default(),
            Box::new(BrokenLighting),
            full_hd_inspector(),
        );

        let report = validator.validate_scene(&sample_image());

        // All four fragments still present, lighting replaced by an error
        let json = serde_json::to_value(&report).unwrap();
        for key in ["composition", "lighting", "resolution", "aspect_ratio"] {
            assert!(json.get(key).is_some(), "missing fragment {}", key);
        }
        assert_eq!(json["lighting"]["score"], 0.0);
        assert!(json["lighting"]["error"].is_string());

        // Zero-scored failure participates in the mean: (0.85 + 0 + 1 + 1) / 4
        assert!((report.overall_score - 0.7125).abs() < 1e-9);
    }

    /// Quality backend that omits the composition score entirely.
    struct ScorelessComposition;

    impl QualityInference for ScorelessComposition {
        fn composition(&self, _image: &ImageRef, _rules: &[String]) -> Result<CompositionReport> {
            Ok(CompositionReport {
                score: None,
                findings: vec!["Descriptive review only".to_string()],
                suggestions: Vec::new(),
            })
        }

        fn lighting(&self, image: &ImageRef, threshold: f64) -> Result<LightingReport> {
            FixedBackend.lighting(image, threshold)
        }
    }

    #[test]
    fn test_scoreless_fragment_excluded_from_denominator() {
        let validator = SceneValidator::new(
            EngineConfig::default(),
            Box::new(ScorelessComposition),
            full_hd_inspector(),
        );

        let report = validator.validate_scene(&sample_image());

        // Mean over lighting 0.75 and the two passing property checks only
        assert!((report.overall_score - (0.75 + 1.0 + 1.0) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolution_below_minimum_scores_zero() {
        let validator = SceneValidator::new(
            EngineConfig::default(),
            Box::new(FixedBackend),
            Box::new(FakeInspector { width: 640, height: 480, aspect_ratio: "4:3" }),
        );

        let report = validator.validate_scene(&sample_image());

        match report.resolution {
            CheckOutcome::Passed(ref r) => {
                assert!(!r.meets_requirements);
                assert_eq!(r.score, 0.0);
                assert_eq!(r.actual, (640, 480));
                assert_eq!(r.minimum, (1280, 720));
            }
            CheckOutcome::Failed { .. } => panic!("resolution check should not error"),
        }
        // 4:3 is still an approved ratio
        assert!(matches!(report.aspect_ratio, CheckOutcome::Passed(ref r) if r.meets_requirements));
    }

    #[test]
    fn test_unapproved_aspect_ratio_scores_zero() {
        let mut config = EngineConfig::default();
        config.aspect_ratios = vec!["16:9".to_string()];

        let validator = SceneValidator::new(
            config,
            Box::new(FixedBackend),
            Box::new(FakeInspector { width: 640, height: 480, aspect_ratio: "4:3" }),
        );

        let report = validator.validate_scene(&sample_image());

        match report.aspect_ratio {
            CheckOutcome::Passed(ref r) => {
                assert!(!r.meets_requirements);
                assert_eq!(r.score, 0.0);
                assert_eq!(r.current, "4:3");
            }
            CheckOutcome::Failed { .. } => panic!("aspect ratio check should not error"),
        }
    }

    /// Inspector that cannot measure anything.
    struct BrokenInspector;

    impl ImageInspector for BrokenInspector {
        fn inspect(&self, _image: &ImageRef) -> Result<ImageProperties> {
            Err(FramesightError::FFprobe("unreadable image".to_string()))
        }
    }

    #[test]
    fn test_inspector_failure_fails_both_property_checks() {
        let validator = SceneValidator::new(
            EngineConfig::default(),
            Box::new(FixedBackend),
            Box::new(BrokenInspector),
        );

        let report = validator.validate_scene(&sample_image());

        assert!(matches!(report.resolution, CheckOutcome::Failed { .. }));
        assert!(matches!(report.aspect_ratio, CheckOutcome::Failed { .. }));
        // (0.85 + 0.75 + 0 + 0) / 4
        assert!((report.overall_score - 0.4).abs() < 1e-9);
    }
}
