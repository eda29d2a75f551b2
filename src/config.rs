//! Pipeline configuration.
//!
//! Handles loading, validating, and merging an optional `config.toml` placed
//! in the scanned root. Stock defaults are the base layer; the file only
//! needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [scan]
//! extension = "png"         # File extension to analyze (case-sensitive)
//!
//! [ocr]
//! command = "tesseract"     # Tesseract executable (name on PATH or path)
//! language = "eng"          # Tesseract language code
//!
//! [colors]
//! count = 5                 # Dominant colors to extract (1-5)
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::supported_input_extensions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the optional config file inside the scanned root.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Upper bound on `colors.count`; the manifest never lists more primary colors.
pub const MAX_PRIMARY_COLORS: usize = 5;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Pipeline configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Which files discovery picks up.
    pub scan: ScanConfig,
    /// Text recognition settings.
    pub ocr: OcrConfig,
    /// Dominant color extraction settings.
    pub colors: ColorsConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl PipelineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ext = &self.scan.extension;
        if ext.is_empty() || ext.starts_with('.') {
            return Err(ConfigError::Validation(
                "scan.extension must be a bare extension like \"png\"".into(),
            ));
        }
        if !supported_input_extensions()
            .iter()
            .any(|s| s.eq_ignore_ascii_case(ext))
        {
            return Err(ConfigError::Validation(format!(
                "scan.extension \"{ext}\" is not a supported image format (supported: {})",
                supported_input_extensions().join(", ")
            )));
        }
        if self.ocr.command.trim().is_empty() {
            return Err(ConfigError::Validation(
                "ocr.command must not be empty".into(),
            ));
        }
        if self.ocr.language.trim().is_empty() {
            return Err(ConfigError::Validation(
                "ocr.language must not be empty".into(),
            ));
        }
        if !(1..=MAX_PRIMARY_COLORS).contains(&self.colors.count) {
            return Err(ConfigError::Validation(format!(
                "colors.count must be 1-{MAX_PRIMARY_COLORS}"
            )));
        }
        Ok(())
    }
}

/// Discovery settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Extension without the dot. Matched case-sensitively.
    pub extension: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extension: "png".to_string(),
        }
    }
}

/// OCR settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OcrConfig {
    /// Tesseract executable.
    pub command: String,
    /// Tesseract language code, e.g. `eng` or `eng+deu`.
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            language: "eng".to_string(),
        }
    }
}

/// Dominant color settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorsConfig {
    /// How many dominant colors to request from the quantizer.
    pub count: usize,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            count: MAX_PRIMARY_COLORS,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel analysis workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(PipelineConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PipelineConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PipelineConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<PipelineConfig, ConfigError> {
    resolve_config(stock_defaults_value()?, load_raw_config(root)?)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# screenshot-manifest configuration
# ==================================
# Place this file as config.toml in the directory you scan.
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Discovery
# ---------------------------------------------------------------------------
[scan]
# Extension of the files to analyze, without the dot.
# Matching is case-sensitive: "png" does not pick up "shot.PNG".
extension = "png"

# ---------------------------------------------------------------------------
# Text recognition
# ---------------------------------------------------------------------------
[ocr]
# Tesseract executable: a name looked up on PATH, or a full path.
command = "tesseract"

# Tesseract language code. Combine with '+', e.g. "eng+deu".
language = "eng"

# ---------------------------------------------------------------------------
# Dominant colors
# ---------------------------------------------------------------------------
[colors]
# Number of dominant colors to extract per image (1-5).
count = 5

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel analysis workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn cores() -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    #[test]
    fn default_config_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.scan.extension, "png");
        assert_eq!(config.ocr.command, "tesseract");
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.colors.count, 5);
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn parse_partial_config_keeps_defaults() {
        let toml = r#"
[ocr]
language = "deu"
"#;
        let config: PipelineConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.ocr.language, "deu");
        assert_eq!(config.ocr.command, "tesseract");
        assert_eq!(config.scan.extension, "png");
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[scan]
extension = "jpg"

[colors]
count = 3
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.scan.extension, "jpg");
        assert_eq!(config.colors.count, 3);
        assert_eq!(config.ocr.language, "eng");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[colors]
count = 9
"#,
        )
        .unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn load_config_ignores_directory_named_like_config() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(load_config(tmp.path()).unwrap(), PipelineConfig::default());
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let config = ProcessingConfig {
            max_processes: None,
        };
        assert_eq!(effective_threads(&config), cores());
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        assert_eq!(effective_threads(&config), cores());
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_zero_means_one() {
        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn parse_processing_config() {
        let toml = r#"
[processing]
max_processes = 4
"#;
        let config: PipelineConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.processing.max_processes, Some(4));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"count = 5"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"count = 2"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("count").unwrap().as_integer(), Some(2));
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let base: toml::Value = toml::from_str(
            r#"
[ocr]
command = "tesseract"
language = "eng"
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[ocr]
language = "fra"
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let ocr = merged.get("ocr").unwrap();
        assert_eq!(ocr.get("command").unwrap().as_str(), Some("tesseract"));
        assert_eq!(ocr.get("language").unwrap().as_str(), Some("fra"));
    }

    #[test]
    fn merge_toml_adds_new_tables() {
        let base: toml::Value = toml::from_str(r#"[scan]
extension = "png""#)
            .unwrap();
        let overlay: toml::Value = toml::from_str(r#"[processing]
max_processes = 2"#)
            .unwrap();
        let merged = merge_toml(base, overlay);
        assert!(merged.get("scan").is_some());
        assert_eq!(
            merged
                .get("processing")
                .and_then(|p| p.get("max_processes"))
                .and_then(|v| v.as_integer()),
            Some(2)
        );
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[ocr]
langauge = "eng"
"#;
        let result: Result<PipelineConfig, _> = toml::from_str(toml_str);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<PipelineConfig, _> = toml::from_str("[colours]\ncount = 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "[scan]\nextensions = \"png\"\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    fn with<F: FnOnce(&mut PipelineConfig)>(f: F) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        f(&mut config);
        config
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_color_count_bounds() {
        assert!(with(|c| c.colors.count = 1).validate().is_ok());
        assert!(with(|c| c.colors.count = 5).validate().is_ok());
        assert!(with(|c| c.colors.count = 0).validate().is_err());
        assert!(with(|c| c.colors.count = 6).validate().is_err());
    }

    #[test]
    fn validate_extension() {
        assert!(with(|c| c.scan.extension = "".into()).validate().is_err());
        assert!(with(|c| c.scan.extension = ".png".into()).validate().is_err());
        assert!(with(|c| c.scan.extension = "bmp".into()).validate().is_err());
        assert!(with(|c| c.scan.extension = "PNG".into()).validate().is_ok());
        assert!(with(|c| c.scan.extension = "webp".into()).validate().is_ok());
    }

    #[test]
    fn validate_ocr_fields_not_blank() {
        assert!(with(|c| c.ocr.command = " ".into()).validate().is_err());
        assert!(with(|c| c.ocr.language = "".into()).validate().is_err());
    }

    // =========================================================================
    // Stock config tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let parsed: PipelineConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(parsed, PipelineConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in ["[scan]", "[ocr]", "[colors]", "[processing]"] {
            assert!(content.contains(section), "missing {section}");
        }
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let value = stock_defaults_value().unwrap();
        let table = value.as_table().unwrap();
        for key in ["scan", "ocr", "colors", "processing"] {
            assert!(table.contains_key(key), "missing {key}");
        }
    }
}
