use crate::anchors::AnchorModelConfig;
use crate::core::SAVED_ANCHORS_KEY;
use crate::localization::LocalizationThresholds;
use crate::session::TerrainAnchorSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Tracker-wide configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Accuracy bands and localization timeout
    pub thresholds: LocalizationThresholds,
    /// Renderable built for every new anchor
    pub anchor_model: AnchorModelConfig,
    /// Anchors placed on terrain when the session starts
    #[serde(default)]
    pub terrain_anchors: Vec<TerrainAnchorSpec>,
    /// Storage key reserved for persisting anchors (not read or written)
    #[serde(default = "default_saved_anchors_key")]
    pub saved_anchors_key: String,
}

/// Longest localization attempt accepted by validation (one day)
pub const MAX_FAILURE_TIMEOUT_S: f64 = 24.0 * 60.0 * 60.0;

fn default_saved_anchors_key() -> String {
    SAVED_ANCHORS_KEY.to_string()
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            thresholds: LocalizationThresholds::default(),
            anchor_model: AnchorModelConfig::default(),
            terrain_anchors: Vec::new(),
            saved_anchors_key: default_saved_anchors_key(),
        }
    }
}

/// Errors raised while loading or editing the tracker configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A setting is out of range
    InvalidParameter { parameter: String, value: String, reason: String },
    /// Reading or writing the config file failed
    IoError { message: String },
    /// The config file is not valid tracker JSON
    SerializationError { message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidParameter { parameter, value, reason } => {
                write!(f, "Tracker setting '{}' = '{}' rejected: {}", parameter, value, reason)
            }
            ConfigError::IoError { message } => {
                write!(f, "Tracker config file: {}", message)
            }
            ConfigError::SerializationError { message } => {
                write!(f, "Tracker config JSON: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Outcome of checking a configuration before it is applied
#[derive(Debug)]
pub struct ValidationResult {
    /// No errors were found
    pub is_valid: bool,
    /// Validation errors
    pub errors: Vec<ConfigError>,
    /// Validation warnings
    pub warnings: Vec<String>,
}

/// Loads, validates and edits the tracker configuration
pub struct ConfigurationManager {
    config: TrackerConfig,
    config_file_path: Option<String>,
    is_modified: bool,
}

impl ConfigurationManager {
    /// Create a manager holding the default configuration
    pub fn new() -> Self {
        Self {
            config: TrackerConfig::default(),
            config_file_path: None,
            is_modified: false,
        }
    }

    /// Create a manager from a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Replace the whole configuration after validating it
    pub fn update_config(&mut self, config: TrackerConfig) -> Result<(), ConfigError> {
        let validation = self.validate_config(&config);
        if let Some(first) = validation.errors.into_iter().next() {
            return Err(first);
        }
        for warning in &validation.warnings {
            warn!(%warning, "configuration warning");
        }
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_ref = path.as_ref();
        let content = fs::read_to_string(path_ref).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read {}: {}", path_ref.display(), e),
        })?;
        let config: TrackerConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: e.to_string(),
            })?;

        self.update_config(config)?;
        self.config_file_path = Some(path_ref.to_string_lossy().to_string());
        self.is_modified = false;
        info!(path = %path_ref.display(), "configuration loaded");
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_ref = path.as_ref();
        let content = serde_json::to_string_pretty(&self.config).map_err(|e| {
            ConfigError::SerializationError { message: e.to_string() }
        })?;
        fs::write(path_ref, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write {}: {}", path_ref.display(), e),
        })?;

        self.config_file_path = Some(path_ref.to_string_lossy().to_string());
        self.is_modified = false;
        Ok(())
    }

    /// Save back to the file the configuration was loaded from
    pub fn save(&mut self) -> Result<(), ConfigError> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(ConfigError::IoError {
                message: "No configuration file path set".to_string(),
            }),
        }
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Set the localization failure timeout, returning the previous value
    pub fn set_failure_timeout(&mut self, timeout_s: f64) -> Result<f64, ConfigError> {
        check_timeout(timeout_s)?;
        let old = self.config.thresholds.failure_timeout_s;
        self.config.thresholds.failure_timeout_s = timeout_s;
        self.is_modified = true;
        Ok(old)
    }

    /// Set the horizontal accuracy band, returning the previous (low, high)
    pub fn set_horizontal_thresholds(&mut self, low_m: f64, high_m: f64) -> Result<(f64, f64), ConfigError> {
        check_band("horizontal_accuracy", low_m, high_m)?;
        let t = &mut self.config.thresholds;
        let old = (t.horizontal_accuracy_low_m, t.horizontal_accuracy_high_m);
        t.horizontal_accuracy_low_m = low_m;
        t.horizontal_accuracy_high_m = high_m;
        self.is_modified = true;
        Ok(old)
    }

    /// Set the heading accuracy band, returning the previous (low, high)
    pub fn set_heading_thresholds(&mut self, low_deg: f64, high_deg: f64) -> Result<(f64, f64), ConfigError> {
        check_band("heading_accuracy", low_deg, high_deg)?;
        let t = &mut self.config.thresholds;
        let old = (t.heading_accuracy_low_deg, t.heading_accuracy_high_deg);
        t.heading_accuracy_low_deg = low_deg;
        t.heading_accuracy_high_deg = high_deg;
        self.is_modified = true;
        Ok(old)
    }

    pub fn add_terrain_anchor(&mut self, spec: TerrainAnchorSpec) -> Result<(), ConfigError> {
        check_coordinate("terrain_anchor", spec.latitude, spec.longitude)?;
        self.config.terrain_anchors.push(spec);
        self.is_modified = true;
        Ok(())
    }

    /// Validate a configuration without applying it
    pub fn validate_config(&self, config: &TrackerConfig) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let t = &config.thresholds;

        if let Err(e) = check_band("horizontal_accuracy", t.horizontal_accuracy_low_m, t.horizontal_accuracy_high_m) {
            errors.push(e);
        }
        if let Err(e) = check_band("heading_accuracy", t.heading_accuracy_low_deg, t.heading_accuracy_high_deg) {
            errors.push(e);
        }
        if let Err(e) = check_timeout(t.failure_timeout_s) {
            errors.push(e);
        } else if t.failure_timeout_s < 10.0 {
            warnings.push("Very short localization timeout may fail before a fix is possible".to_string());
        }
        if t.horizontal_accuracy_low_m == t.horizontal_accuracy_high_m
            || t.heading_accuracy_low_deg == t.heading_accuracy_high_deg
        {
            warnings.push("Empty hysteresis band may cause state flapping".to_string());
        }

        let model = &config.anchor_model;
        if model.asset_name.trim().is_empty() {
            errors.push(ConfigError::InvalidParameter {
                parameter: "anchor_model.asset_name".to_string(),
                value: model.asset_name.clone(),
                reason: "Asset name cannot be empty".to_string(),
            });
        }
        if !model.scale.is_finite() || model.scale <= 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "anchor_model.scale".to_string(),
                value: model.scale.to_string(),
                reason: "Scale must be positive".to_string(),
            });
        }

        for spec in &config.terrain_anchors {
            if let Err(e) = check_coordinate("terrain_anchor", spec.latitude, spec.longitude) {
                errors.push(e);
            }
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}

fn check_timeout(timeout_s: f64) -> Result<(), ConfigError> {
    if !timeout_s.is_finite() || timeout_s <= 0.0 || timeout_s > MAX_FAILURE_TIMEOUT_S {
        return Err(ConfigError::InvalidParameter {
            parameter: "failure_timeout_s".to_string(),
            value: timeout_s.to_string(),
            reason: format!("Timeout must be between 0 and {} seconds", MAX_FAILURE_TIMEOUT_S),
        });
    }
    Ok(())
}

fn check_band(name: &str, low: f64, high: f64) -> Result<(), ConfigError> {
    if !low.is_finite() || !high.is_finite() || low <= 0.0 || high <= 0.0 {
        return Err(ConfigError::InvalidParameter {
            parameter: name.to_string(),
            value: format!("{}..{}", low, high),
            reason: "Thresholds must be positive".to_string(),
        });
    }
    if low > high {
        return Err(ConfigError::InvalidParameter {
            parameter: name.to_string(),
            value: format!("{}..{}", low, high),
            reason: "Low threshold must not exceed high threshold".to_string(),
        });
    }
    Ok(())
}

fn check_coordinate(name: &str, latitude: f64, longitude: f64) -> Result<(), ConfigError> {
    if latitude.abs() > 90.0 {
        return Err(ConfigError::InvalidParameter {
            parameter: format!("{}.latitude", name),
            value: latitude.to_string(),
            reason: "Latitude must be between -90 and 90 degrees".to_string(),
        });
    }
    if longitude.abs() > 180.0 {
        return Err(ConfigError::InvalidParameter {
            parameter: format!("{}.longitude", name),
            value: longitude.to_string(),
            reason: "Longitude must be between -180 and 180 degrees".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config() {
        let config = TrackerConfig::default();
        assert_eq!(config.thresholds.horizontal_accuracy_low_m, 10.0);
        assert_eq!(config.thresholds.horizontal_accuracy_high_m, 20.0);
        assert_eq!(config.thresholds.heading_accuracy_low_deg, 15.0);
        assert_eq!(config.thresholds.heading_accuracy_high_deg, 25.0);
        assert_eq!(config.thresholds.failure_timeout_s, 180.0);
        assert_eq!(config.anchor_model.asset_name, "nendan");
        assert_eq!(config.saved_anchors_key, "anchors");

        let manager = ConfigurationManager::new();
        assert!(manager.validate_config(&config).is_valid);
        assert!(!manager.is_modified());
    }

    #[test]
    fn test_threshold_adjustment() {
        let mut manager = ConfigurationManager::new();

        assert_eq!(manager.set_horizontal_thresholds(8.0, 16.0).unwrap(), (10.0, 20.0));
        assert!(manager.is_modified());

        // Inverted band is rejected and leaves values unchanged
        assert!(manager.set_heading_thresholds(30.0, 20.0).is_err());
        assert_eq!(manager.config().thresholds.heading_accuracy_low_deg, 15.0);

        assert!(manager.set_failure_timeout(0.0).is_err());
        assert_eq!(manager.set_failure_timeout(60.0).unwrap(), 180.0);
    }

    #[test]
    fn test_oversized_timeout_rejected() {
        let mut manager = ConfigurationManager::new();
        assert!(manager.set_failure_timeout(1e20).is_err());
        assert!(manager.set_failure_timeout(MAX_FAILURE_TIMEOUT_S + 1.0).is_err());
        assert_eq!(manager.config().thresholds.failure_timeout_s, 180.0);
        assert!(manager.set_failure_timeout(MAX_FAILURE_TIMEOUT_S).is_ok());

        let mut config = TrackerConfig::default();
        config.thresholds.failure_timeout_s = 1e20;
        let validation = manager.validate_config(&config);
        assert!(!validation.is_valid);
        assert!(manager.update_config(config).is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut manager = ConfigurationManager::new();
        let mut config = TrackerConfig::default();
        config.anchor_model.asset_name = String::new();
        config.terrain_anchors.push(TerrainAnchorSpec::new(95.0, 0.0));

        let validation = manager.validate_config(&config);
        assert!(!validation.is_valid);
        assert_eq!(validation.errors.len(), 2);
        assert!(manager.update_config(config).is_err());
        assert!(!manager.is_modified());
    }

    #[test]
    fn test_terrain_anchor_validation() {
        let mut manager = ConfigurationManager::new();
        assert!(manager.add_terrain_anchor(TerrainAnchorSpec::new(36.09, 136.21)).is_ok());
        assert!(manager.add_terrain_anchor(TerrainAnchorSpec::new(36.09, 190.0)).is_err());
        assert_eq!(manager.config().terrain_anchors.len(), 1);
    }

    #[test]
    fn test_config_serialization() {
        let mut manager = ConfigurationManager::new();
        manager.add_terrain_anchor(TerrainAnchorSpec::new(36.091526, 136.211851)).unwrap();
        manager.set_failure_timeout(90.0).unwrap();

        let temp_path = std::env::temp_dir().join(format!("geoanchor_config_{}.json", std::process::id()));
        manager.save_to_file(&temp_path).unwrap();
        assert!(!manager.is_modified());

        let loaded = ConfigurationManager::from_file(&temp_path).unwrap();
        assert_eq!(loaded.config(), manager.config());

        let _ = fs::remove_file(temp_path);
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigurationManager::from_file(PathBuf::from("/nonexistent/geoanchor.json"));
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }

    #[test]
    fn test_save_without_path() {
        let mut manager = ConfigurationManager::new();
        assert!(matches!(manager.save(), Err(ConfigError::IoError { .. })));
    }
}
