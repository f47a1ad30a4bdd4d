//! Calculation inputs

use serde::{Deserialize, Serialize};

/// Physical parameters of one gun-drilling operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillingParameters {
    /// Drill diameter (mm)
    pub drill_size: f64,

    /// Depth to drill per feature (mm)
    pub length_to_drill: f64,

    /// Spindle speed
    pub rpm: f64,

    /// Linear feed (mm/min)
    pub feed_rate: f64,

    /// Material grade, matched case-insensitively
    pub material_grade: String,
}

impl DrillingParameters {
    pub fn new(
        drill_size: f64,
        length_to_drill: f64,
        rpm: f64,
        feed_rate: f64,
        material_grade: impl Into<String>,
    ) -> Self {
        Self {
            drill_size,
            length_to_drill,
            rpm,
            feed_rate,
            material_grade: material_grade.into(),
        }
    }

    /// Same parameters with a different depth
    pub fn with_length(&self, length_to_drill: f64) -> Self {
        Self {
            length_to_drill,
            ..self.clone()
        }
    }
}

/// Job-level options for the aggregate standard time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobOptions {
    /// Number of drilled features in the job
    pub number_of_features: u32,

    /// Add the tool-wear surcharge to per-feature time
    pub tool_wear_consideration: bool,

    /// Wall thickness inspection required
    pub wall_thickness_inspection: bool,

    /// Replaces the computed setup time when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_setup_time: Option<f64>,

    /// Replaces the computed grinding time when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_grinding_time: Option<f64>,

    /// Holes between regrinds; grinding cost is divided by this count
    pub grinding_frequency: u32,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            number_of_features: 1,
            tool_wear_consideration: true,
            wall_thickness_inspection: false,
            custom_setup_time: None,
            custom_grinding_time: None,
            grinding_frequency: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_options_defaults() {
        let options = JobOptions::default();
        assert_eq!(options.number_of_features, 1);
        assert!(options.tool_wear_consideration);
        assert!(!options.wall_thickness_inspection);
        assert_eq!(options.grinding_frequency, 10);
        assert!(options.custom_setup_time.is_none());
    }

    #[test]
    fn test_job_options_partial_yaml() {
        let options: JobOptions =
            serde_yml::from_str("number_of_features: 4\ncustom_setup_time: 12.5\n").unwrap();
        assert_eq!(options.number_of_features, 4);
        assert_eq!(options.custom_setup_time, Some(12.5));
        assert_eq!(options.grinding_frequency, 10);
    }

    #[test]
    fn test_with_length() {
        let params = DrillingParameters::new(10.0, 100.0, 1800.0, 80.0, "Steel");
        let longer = params.with_length(500.0);
        assert_eq!(longer.length_to_drill, 500.0);
        assert_eq!(longer.material_grade, "Steel");
    }
}
