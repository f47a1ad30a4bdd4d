//! Calculator configuration with layered hierarchy
//!
//! Every constant the formulas use lives here, so an alternative factor
//! table is just another `CalculatorConfig`. Sources are merged in priority
//! order: built-in defaults, the global user file, the project file in the
//! working directory, an explicit `--config` file, then environment
//! variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::error::ConfigError;
use crate::core::material::{normalize, MaterialFactorTable};

/// Project-level config file, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = ".gundrill.yaml";

/// Environment override for the tool-wear surcharge
pub const ENV_TOOL_WEAR_FACTOR: &str = "GUNDRILL_TOOL_WEAR_FACTOR";

/// Immutable constants for one calculator instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalculatorConfig {
    /// Base setup time before factors (minutes)
    pub default_setup_time: f64,

    /// Base grinding time per regrind before factors (minutes)
    pub default_grinding_time: f64,

    /// Base inspection time per feature (minutes)
    pub default_inspection_time: f64,

    /// Fractional surcharge on per-feature time for tool wear
    pub tool_wear_factor: f64,

    /// Cutting surface speed the RPM factor is measured against (m/min)
    pub optimal_surface_speed: f64,

    /// Grades that take the hard-material setup surcharge
    pub hard_setup_materials: Vec<String>,

    /// Cutting-time multiplier per material grade
    pub material_factors: MaterialFactorTable,

    /// Upper bounds enforced by the parameter validator
    pub limits: ValidationLimits,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            default_setup_time: 5.0,
            default_grinding_time: 2.5,
            default_inspection_time: 1.0,
            tool_wear_factor: 0.02,
            optimal_surface_speed: 40.0,
            hard_setup_materials: vec![
                "steel".to_string(),
                "stainless steel".to_string(),
                "titanium".to_string(),
            ],
            material_factors: MaterialFactorTable::standard(),
            limits: ValidationLimits::default(),
        }
    }
}

/// Maximum supported parameter values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationLimits {
    /// mm
    pub max_drill_size: f64,
    /// mm
    pub max_length_to_drill: f64,
    pub max_rpm: f64,
    /// mm/min
    pub max_feed_rate: f64,
    pub max_number_of_features: i64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_drill_size: 50.0,
            max_length_to_drill: 1000.0,
            max_rpm: 10000.0,
            max_feed_rate: 1000.0,
            max_number_of_features: 100,
        }
    }
}

/// Partial configuration read from one file; present keys override
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverlay {
    pub default_setup_time: Option<f64>,
    pub default_grinding_time: Option<f64>,
    pub default_inspection_time: Option<f64>,
    pub tool_wear_factor: Option<f64>,
    pub optimal_surface_speed: Option<f64>,
    pub hard_setup_materials: Option<Vec<String>>,
    /// Merged into the table rather than replacing it
    pub material_factors: Option<MaterialFactorTable>,
    pub limits: Option<LimitsOverlay>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsOverlay {
    pub max_drill_size: Option<f64>,
    pub max_length_to_drill: Option<f64>,
    pub max_rpm: Option<f64>,
    pub max_feed_rate: Option<f64>,
    pub max_number_of_features: Option<i64>,
}

impl ConfigOverlay {
    /// Read an overlay from a YAML file
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    /// Parse an overlay from YAML text; `path` is used for error messages
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl CalculatorConfig {
    /// Load configuration from all sources relative to the current directory
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let dir = std::env::current_dir().map_err(|source| ConfigError::Read {
            path: PathBuf::from("."),
            source,
        })?;
        Self::load_from(&dir, explicit)
    }

    /// Load configuration from all sources, merging in priority order
    pub fn load_from(dir: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let global = Self::global_config_path();
        let tool_wear = std::env::var(ENV_TOOL_WEAR_FACTOR).ok();
        Self::load_layers(global.as_deref(), dir, explicit, tool_wear.as_deref())
    }

    /// Merge the given layers over the defaults.
    ///
    /// `tool_wear_factor` is the raw value of [`ENV_TOOL_WEAR_FACTOR`].
    pub fn load_layers(
        global: Option<&Path>,
        dir: &Path,
        explicit: Option<&Path>,
        tool_wear_factor: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut config = CalculatorConfig::default();

        // 1. Built-in defaults (already in Default impl)

        // 2-4. Global user file, project file, explicit file
        for path in Self::layer_paths(global, dir, explicit) {
            tracing::debug!(path = %path.display(), "applying config file");
            config.merge(ConfigOverlay::read(&path)?);
        }

        // 5. Environment variables
        if let Some(raw) = tool_wear_factor {
            let factor = raw.trim().parse::<f64>().map_err(|_| ConfigError::Invalid {
                key: ENV_TOOL_WEAR_FACTOR.to_string(),
                message: format!("'{}' is not a number", raw),
            })?;
            config.tool_wear_factor = factor;
        }

        config.validate()?;
        Ok(config)
    }

    /// Config files that will be applied, lowest priority first.
    ///
    /// Global and project files are skipped when absent; an explicit file is
    /// always included so a missing one is reported.
    pub fn sources(dir: &Path, explicit: Option<&Path>) -> Vec<PathBuf> {
        let global = Self::global_config_path();
        Self::layer_paths(global.as_deref(), dir, explicit)
    }

    fn layer_paths(global: Option<&Path>, dir: &Path, explicit: Option<&Path>) -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(global) = global {
            if global.is_file() {
                paths.push(global.to_path_buf());
            }
        }

        let project = Self::project_config_path(dir);
        if project.is_file() {
            paths.push(project);
        }

        if let Some(path) = explicit {
            paths.push(path.to_path_buf());
        }

        paths
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "gundrill")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Get the path to the project config file for a directory
    pub fn project_config_path(dir: &Path) -> PathBuf {
        dir.join(PROJECT_CONFIG_FILE)
    }

    /// Merge an overlay into this config (overlay takes precedence)
    pub fn merge(&mut self, other: ConfigOverlay) {
        if let Some(v) = other.default_setup_time {
            self.default_setup_time = v;
        }
        if let Some(v) = other.default_grinding_time {
            self.default_grinding_time = v;
        }
        if let Some(v) = other.default_inspection_time {
            self.default_inspection_time = v;
        }
        if let Some(v) = other.tool_wear_factor {
            self.tool_wear_factor = v;
        }
        if let Some(v) = other.optimal_surface_speed {
            self.optimal_surface_speed = v;
        }
        if let Some(materials) = other.hard_setup_materials {
            self.hard_setup_materials = materials.iter().map(|m| normalize(m)).collect();
        }
        if let Some(table) = other.material_factors {
            self.material_factors.extend(table);
        }
        if let Some(limits) = other.limits {
            self.limits.merge(limits);
        }
    }

    /// Reject values that would make the formulas meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("default_setup_time", self.default_setup_time)?;
        require_positive("default_grinding_time", self.default_grinding_time)?;
        require_positive("default_inspection_time", self.default_inspection_time)?;
        require_positive("optimal_surface_speed", self.optimal_surface_speed)?;

        if !self.tool_wear_factor.is_finite() || self.tool_wear_factor < 0.0 {
            return Err(ConfigError::Invalid {
                key: "tool_wear_factor".to_string(),
                message: format!("must be 0 or greater, got {}", self.tool_wear_factor),
            });
        }

        for (grade, factor) in self.material_factors.entries() {
            require_positive(&format!("material_factors.{}", grade), factor)?;
        }

        require_positive("limits.max_drill_size", self.limits.max_drill_size)?;
        require_positive("limits.max_length_to_drill", self.limits.max_length_to_drill)?;
        require_positive("limits.max_rpm", self.limits.max_rpm)?;
        require_positive("limits.max_feed_rate", self.limits.max_feed_rate)?;
        if self.limits.max_number_of_features < 1 {
            return Err(ConfigError::Invalid {
                key: "limits.max_number_of_features".to_string(),
                message: format!("must be at least 1, got {}", self.limits.max_number_of_features),
            });
        }

        Ok(())
    }

    /// Whether a grade takes the hard-material setup surcharge
    pub fn is_hard_setup_material(&self, grade: &str) -> bool {
        let grade = normalize(grade);
        self.hard_setup_materials.iter().any(|m| normalize(m) == grade)
    }
}

impl ValidationLimits {
    fn merge(&mut self, other: LimitsOverlay) {
        if let Some(v) = other.max_drill_size {
            self.max_drill_size = v;
        }
        if let Some(v) = other.max_length_to_drill {
            self.max_length_to_drill = v;
        }
        if let Some(v) = other.max_rpm {
            self.max_rpm = v;
        }
        if let Some(v) = other.max_feed_rate {
            self.max_feed_rate = v;
        }
        if let Some(v) = other.max_number_of_features {
            self.max_number_of_features = v;
        }
    }
}

fn require_positive(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            key: key.to_string(),
            message: format!("must be a finite number greater than 0, got {}", value),
        })
    }
}
