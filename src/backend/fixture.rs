// Fixed-fragment inference backend
//
// Returns canonical fragments without touching the image. Serves two purposes:
// the CLI's dry-run backend until a live vision service is wired in, and the
// fixed-fragment fake the orchestrators are tested against (no network, no
// credentials).

use super::{
    AttributeInference, BoundingBox, CompositionReport, EnvironmentClass, ImageRef, Keyword,
    LightingReport, ObjectDetection, PaletteEntry, QualityInference, SceneInference, TimeOfDay,
    WeatherReading,
};
use crate::error::Result;
use crate::tagging::TagRecord;

pub struct FixedBackend;

impl SceneInference for FixedBackend {
    fn detect_objects(&self, _image: &ImageRef) -> Result<Vec<ObjectDetection>> {
        Ok(vec![
            ObjectDetection {
                name: "person".to_string(),
                confidence: 0.98,
                bounding_box: BoundingBox { x: 0.2, y: 0.3, width: 0.4, height: 0.5 },
            },
            ObjectDetection {
                name: "tree".to_string(),
                confidence: 0.92,
                bounding_box: BoundingBox { x: 0.7, y: 0.2, width: 0.2, height: 0.7 },
            },
            ObjectDetection {
                name: "building".to_string(),
                confidence: 0.85,
                bounding_box: BoundingBox { x: 0.1, y: 0.1, width: 0.3, height: 0.4 },
            },
        ])
    }

    fn classify_environment(
        &self,
        _image: &ImageRef,
        categories: &[String],
    ) -> Result<EnvironmentClass> {
        // Stay inside the configured vocabulary
        let primary = if categories.iter().any(|c| c == "outdoor") {
            "outdoor".to_string()
        } else {
            categories.first().cloned().unwrap_or_else(|| "outdoor".to_string())
        };

        Ok(EnvironmentClass {
            primary,
            sub_categories: vec!["urban".to_string(), "street".to_string()],
            confidence: 0.89,
        })
    }
}

impl AttributeInference for FixedBackend {
    fn color_palette(&self, _image: &ImageRef, palette_size: usize) -> Result<Vec<PaletteEntry>> {
        let full = [
            ("#4A7B9D", 0.35),
            ("#2E4756", 0.25),
            ("#83A7B9", 0.20),
            ("#D9E5EC", 0.15),
            ("#1D2B38", 0.05),
        ];

        Ok(full
            .iter()
            .take(palette_size)
            .map(|(hex, percentage)| PaletteEntry {
                hex: hex.to_string(),
                percentage: *percentage,
            })
            .collect())
    }

    fn time_of_day(&self, _image: &ImageRef) -> Result<TimeOfDay> {
        Ok(TimeOfDay {
            period: "daytime".to_string(),
            specific: "afternoon".to_string(),
            confidence: 0.78,
        })
    }

    fn weather(&self, _image: &ImageRef) -> Result<WeatherReading> {
        Ok(WeatherReading { condition: "clear".to_string(), confidence: 0.92 })
    }

    fn keywords(
        &self,
        _image: &ImageRef,
        _context: &TagRecord,
        keyword_count: usize,
    ) -> Result<Vec<Keyword>> {
        let full = [
            ("urban landscape", 0.95),
            ("city", 0.93),
            ("afternoon", 0.89),
            ("buildings", 0.85),
            ("clear sky", 0.82),
            ("people", 0.80),
            ("street", 0.78),
            ("trees", 0.75),
            ("blue tones", 0.72),
            ("outdoor scene", 0.70),
        ];

        Ok(full
            .iter()
            .take(keyword_count)
            .map(|(keyword, confidence)| Keyword {
                keyword: keyword.to_string(),
                confidence: *confidence,
            })
            .collect())
    }
}

impl QualityInference for FixedBackend {
    fn composition(&self, _image: &ImageRef, _rules: &[String]) -> Result<CompositionReport> {
        Ok(CompositionReport {
            score: Some(0.85),
            findings: vec![
                "Good rule of thirds application".to_string(),
                "Strong leading lines".to_string(),
            ],
            suggestions: vec!["Consider framing subject more prominently".to_string()],
        })
    }

    fn lighting(&self, _image: &ImageRef, _threshold: f64) -> Result<LightingReport> {
        Ok(LightingReport {
            score: Some(0.75),
            brightness: "adequate".to_string(),
            contrast: "good".to_string(),
            suggestions: vec!["Reduce highlights in upper right corner".to_string()],
        })
    }
}
