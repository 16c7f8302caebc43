//! TOML Configuration File Support
//!
//! Centralized configuration loading for the generator, supporting a TOML
//! configuration file at `~/.config/screengen/screengen.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied with [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! Run presets sit below all of these: `run_mode` picks the image counts and
//! the export mode, and any explicit value replaces the preset's.
//!
//! # Example Configuration
//!
//! ```toml
//! [generation]
//! run_mode = "prod"
//! family = "windows"
//! seed = 7
//! concurrency = 8
//! fail_fast = false
//! training = 2000
//! validation = 400
//! test = 10
//! background_ratio = 0.2
//!
//! [output]
//! directory = "dataset"
//! mode = "yolo"
//! size = 640
//! class_policy = "first-seen"
//!
//! [resources]
//! directory = "resources"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::annotation::ClassPolicy;
use crate::batch::{default_concurrency, BatchPlan, BatchSettings, RunMode};
use crate::export::{ExportMode, DEFAULT_OUTPUT_SIZE};
use crate::scene::UiFamily;

/// Environment variable for the output directory
pub const ENV_OUTPUT: &str = "SCREENGEN_OUTPUT";
/// Environment variable for the resource directory
pub const ENV_RESOURCES: &str = "SCREENGEN_RESOURCES";
/// Environment variable for the batch seed
pub const ENV_SEED: &str = "SCREENGEN_SEED";
/// Environment variable for the UI family
pub const ENV_FAMILY: &str = "SCREENGEN_FAMILY";
/// Environment variable for the run preset
pub const ENV_RUN_MODE: &str = "SCREENGEN_RUN_MODE";
/// Environment variable for the export mode
pub const ENV_MODE: &str = "SCREENGEN_MODE";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A value outside its allowed set or range
    #[error("Invalid value for {key}: '{value}'")]
    Invalid {
        /// Configuration key
        key: &'static str,
        /// Rejected value
        value: String,
    },
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Generation section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationToml {
    /// Run preset: `test` or `prod`
    pub run_mode: Option<String>,

    /// UI family: `mac` or `windows`
    pub family: Option<String>,

    /// Batch seed
    pub seed: Option<u64>,

    /// Maximum images generated at once
    pub concurrency: Option<usize>,

    /// Abort on the first failed image
    pub fail_fast: Option<bool>,

    /// Training image count
    pub training: Option<usize>,

    /// Validation image count
    pub validation: Option<usize>,

    /// Test image count
    pub test: Option<usize>,

    /// Share of background-only training and validation images
    pub background_ratio: Option<f64>,
}

/// Output section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputToml {
    /// Root output directory
    pub directory: Option<PathBuf>,

    /// Export mode: `raw`, `normalized` or `yolo`
    pub mode: Option<String>,

    /// Side of normalized output images
    pub size: Option<u32>,

    /// Class table policy: `predefined` or `first-seen`
    pub class_policy: Option<String>,
}

/// Resources section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesToml {
    /// Asset root directory
    pub directory: Option<PathBuf>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreengenToml {
    /// Generation section
    pub generation: GenerationToml,

    /// Output section
    pub output: OutputToml,

    /// Resources section
    pub resources: ResourcesToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Centralized generator configuration
///
/// Use [`load_config`] to load configuration with proper priority handling.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Run preset
    pub run_mode: RunMode,

    /// UI family to synthesize
    pub family: UiFamily,

    /// Batch seed
    pub seed: u64,

    /// Maximum images generated at once
    pub concurrency: usize,

    /// Abort on the first failed image
    pub fail_fast: bool,

    /// Root output directory
    pub output_dir: PathBuf,

    /// Export mode; `None` follows the run preset
    pub mode: Option<ExportMode>,

    /// Side of normalized output images
    pub output_size: u32,

    /// Class table policy
    pub class_policy: ClassPolicy,

    /// Asset root; `None` uses procedural sprites
    pub resources_dir: Option<PathBuf>,

    /// Training count; `None` follows the run preset
    pub training: Option<usize>,

    /// Validation count; `None` follows the run preset
    pub validation: Option<usize>,

    /// Test count; `None` follows the run preset
    pub test: Option<usize>,

    /// Background ratio; `None` follows the run preset
    pub background_ratio: Option<f64>,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            run_mode: RunMode::default(),
            family: UiFamily::default(),
            seed: 42,
            concurrency: default_concurrency(),
            fail_fast: false,
            output_dir: PathBuf::from("output"),
            mode: None,
            output_size: DEFAULT_OUTPUT_SIZE,
            class_policy: ClassPolicy::default(),
            resources_dir: None,
            training: None,
            validation: None,
            test: None,
            background_ratio: None,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl GeneratorConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Export mode after applying the run preset
    #[must_use]
    pub fn export_mode(&self) -> ExportMode {
        self.mode.unwrap_or_else(|| self.run_mode.export_mode())
    }

    /// Image counts after applying the run preset
    #[must_use]
    pub fn plan(&self) -> BatchPlan {
        let preset = self.run_mode.plan();
        BatchPlan {
            training: self.training.unwrap_or(preset.training),
            validation: self.validation.unwrap_or(preset.validation),
            test: self.test.unwrap_or(preset.test),
            background_ratio: self.background_ratio.unwrap_or(preset.background_ratio),
        }
    }

    /// Settings for a batch runner
    #[must_use]
    pub fn batch_settings(&self) -> BatchSettings {
        BatchSettings {
            plan: self.plan(),
            family: self.family,
            seed: self.seed,
            concurrency: self.concurrency,
            fail_fast: self.fail_fast,
            mode: self.export_mode(),
            output_size: self.output_size,
            class_policy: self.class_policy,
            output_dir: self.output_dir.clone(),
        }
    }

    /// Check ranges that parsing alone cannot enforce
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero concurrency or output size,
    /// or a background ratio outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid {
                key: "concurrency",
                value: "0".to_string(),
            });
        }
        if self.output_size == 0 {
            return Err(ConfigError::Invalid {
                key: "size",
                value: "0".to_string(),
            });
        }
        if let Some(ratio) = self.background_ratio {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(ConfigError::Invalid {
                    key: "background_ratio",
                    value: ratio.to_string(),
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/screengen/screengen.toml` or
/// `~/.config/screengen/screengen.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("screengen").join("screengen.toml"))
}

/// Load configuration from all sources with proper priority
///
/// Priority order (highest first):
/// 1. CLI arguments (not handled here - caller should apply after)
/// 2. Environment variables
/// 3. TOML configuration file
/// 4. Default values
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if a
/// file or environment value is invalid. A missing config file is not an
/// error (defaults are used).
pub fn load_config() -> Result<GeneratorConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Arguments
///
/// * `path` - Optional path to the configuration file. If `None`, only defaults
///   and environment variables are used.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed, or
/// holds an invalid value.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<GeneratorConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration, reading environment values through `env`
///
/// # Errors
///
/// Same as [`load_config_from_path`].
pub fn load_config_with_env<F>(path: Option<PathBuf>, env: F) -> Result<GeneratorConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // Start with defaults
    let mut config = GeneratorConfig::default();

    // Try to load from file
    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: ScreengenToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    // Apply environment variables (overrides file values)
    apply_env_config(&mut config, env)?;

    config.validate()?;
    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut GeneratorConfig, toml: &ScreengenToml) -> Result<(), ConfigError> {
    // Generation settings
    let generation = &toml.generation;
    if let Some(ref run_mode) = generation.run_mode {
        config.run_mode = RunMode::parse(run_mode)?;
    }
    if let Some(ref family) = generation.family {
        config.family = UiFamily::parse(family)?;
    }
    if let Some(seed) = generation.seed {
        config.seed = seed;
    }
    if let Some(concurrency) = generation.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(fail_fast) = generation.fail_fast {
        config.fail_fast = fail_fast;
    }
    if generation.training.is_some() {
        config.training = generation.training;
    }
    if generation.validation.is_some() {
        config.validation = generation.validation;
    }
    if generation.test.is_some() {
        config.test = generation.test;
    }
    if generation.background_ratio.is_some() {
        config.background_ratio = generation.background_ratio;
    }

    // Output settings
    if let Some(ref directory) = toml.output.directory {
        config.output_dir = directory.clone();
    }
    if let Some(ref mode) = toml.output.mode {
        config.mode = Some(ExportMode::parse(mode)?);
    }
    if let Some(size) = toml.output.size {
        config.output_size = size;
    }
    if let Some(ref policy) = toml.output.class_policy {
        config.class_policy = ClassPolicy::parse(policy)?;
    }

    // Resource settings
    if toml.resources.directory.is_some() {
        config.resources_dir = toml.resources.directory.clone();
    }

    Ok(())
}

/// Apply environment variable overrides to the config
fn apply_env_config<F>(config: &mut GeneratorConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = env(ENV_OUTPUT) {
        config.output_dir = PathBuf::from(dir);
        config.source = ConfigSource::Env;
    }
    if let Some(dir) = env(ENV_RESOURCES) {
        config.resources_dir = Some(PathBuf::from(dir));
        config.source = ConfigSource::Env;
    }
    if let Some(seed) = env(ENV_SEED) {
        config.seed = seed.trim().parse().map_err(|_| ConfigError::Invalid {
            key: "seed",
            value: seed.clone(),
        })?;
        config.source = ConfigSource::Env;
    }
    if let Some(family) = env(ENV_FAMILY) {
        config.family = UiFamily::parse(&family)?;
        config.source = ConfigSource::Env;
    }
    if let Some(run_mode) = env(ENV_RUN_MODE) {
        config.run_mode = RunMode::parse(&run_mode)?;
        config.source = ConfigSource::Env;
    }
    if let Some(mode) = env(ENV_MODE) {
        config.mode = Some(ExportMode::parse(&mode)?);
        config.source = ConfigSource::Env;
    }
    Ok(())
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Run preset override
    pub run_mode: Option<RunMode>,

    /// UI family override
    pub family: Option<UiFamily>,

    /// Seed override
    pub seed: Option<u64>,

    /// Concurrency override
    pub concurrency: Option<usize>,

    /// Fail-fast override
    pub fail_fast: Option<bool>,

    /// Output directory override
    pub output_dir: Option<PathBuf>,

    /// Export mode override
    pub mode: Option<ExportMode>,

    /// Resource directory override
    pub resources_dir: Option<PathBuf>,

    /// Training count override
    pub training: Option<usize>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set run preset override
    #[must_use]
    pub fn with_run_mode(mut self, run_mode: RunMode) -> Self {
        self.run_mode = Some(run_mode);
        self
    }

    /// Set UI family override
    #[must_use]
    pub fn with_family(mut self, family: UiFamily) -> Self {
        self.family = Some(family);
        self
    }

    /// Set seed override
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set concurrency override
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    /// Set fail-fast override
    #[must_use]
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = Some(fail_fast);
        self
    }

    /// Set output directory override
    #[must_use]
    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = Some(dir);
        self
    }

    /// Set export mode override
    #[must_use]
    pub fn with_mode(mut self, mode: ExportMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Set resource directory override
    #[must_use]
    pub fn with_resources_dir(mut self, dir: PathBuf) -> Self {
        self.resources_dir = Some(dir);
        self
    }

    /// Set training count override
    #[must_use]
    pub fn with_training(mut self, count: usize) -> Self {
        self.training = Some(count);
        self
    }

    fn is_empty(&self) -> bool {
        self.run_mode.is_none()
            && self.family.is_none()
            && self.seed.is_none()
            && self.concurrency.is_none()
            && self.fail_fast.is_none()
            && self.output_dir.is_none()
            && self.mode.is_none()
            && self.resources_dir.is_none()
            && self.training.is_none()
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut GeneratorConfig) {
        if !self.is_empty() {
            config.source = ConfigSource::Cli;
        }

        if let Some(run_mode) = self.run_mode {
            config.run_mode = run_mode;
        }
        if let Some(family) = self.family {
            config.family = family;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(fail_fast) = self.fail_fast {
            config.fail_fast = fail_fast;
        }
        if let Some(ref dir) = self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(mode) = self.mode {
            config.mode = Some(mode);
        }
        if let Some(ref dir) = self.resources_dir {
            config.resources_dir = Some(dir.clone());
        }
        if self.training.is_some() {
            config.training = self.training;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_toml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // =========================================================================
    // Default Configuration Tests
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();

        assert_eq!(config.run_mode, RunMode::Test);
        assert_eq!(config.family, UiFamily::Mac);
        assert_eq!(config.seed, 42);
        assert!(config.concurrency >= 1);
        assert!(!config.fail_fast);
        assert_eq!(config.export_mode(), ExportMode::Raw);
        assert_eq!(config.output_size, 640);
        assert_eq!(config.class_policy, ClassPolicy::Predefined);
        assert_eq!(config.plan(), RunMode::Test.plan());
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = default_config_path() {
            assert!(p.to_string_lossy().contains("screengen"));
            assert!(p.to_string_lossy().ends_with("screengen.toml"));
        }
    }

    // =========================================================================
    // TOML Parsing Tests
    // =========================================================================

    #[test]
    fn test_parse_valid_toml() {
        let file = write_toml(
            r#"
[generation]
run_mode = "prod"
family = "windows"
seed = 7
concurrency = 3
fail_fast = true
training = 20
background_ratio = 0.25

[output]
directory = "dataset"
mode = "raw"
size = 320
class_policy = "first-seen"

[resources]
directory = "assets"
"#,
        );

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.run_mode, RunMode::Prod);
        assert_eq!(config.family, UiFamily::Windows);
        assert_eq!(config.seed, 7);
        assert_eq!(config.concurrency, 3);
        assert!(config.fail_fast);
        assert_eq!(config.output_dir, PathBuf::from("dataset"));
        assert_eq!(config.export_mode(), ExportMode::Raw);
        assert_eq!(config.output_size, 320);
        assert_eq!(config.class_policy, ClassPolicy::FirstSeen);
        assert_eq!(config.resources_dir, Some(PathBuf::from("assets")));
        assert_eq!(config.source(), ConfigSource::File);

        // Explicit counts win, the rest follow the prod preset
        let plan = config.plan();
        assert_eq!(plan.training, 20);
        assert_eq!(plan.validation, 500);
        assert_eq!(plan.test, 10);
        assert!((plan.background_ratio - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_run_mode_selects_export_mode() {
        let file = write_toml("[generation]\nrun_mode = \"prod\"\n");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(config.export_mode(), ExportMode::Normalized);
        assert_eq!(config.batch_settings().plan.training, 4000);
    }

    #[test]
    fn test_parse_empty_toml() {
        let file = write_toml("");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.source(), ConfigSource::File);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = PathBuf::from("/nonexistent/screengen/screengen.toml");
        let config = load_config_with_env(Some(path), no_env).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_invalid_toml_syntax() {
        let file = write_toml("[generation\nseed = ");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_unknown_enum_values_are_rejected() {
        for (content, expected) in [
            ("[generation]\nfamily = \"amiga\"\n", "family"),
            ("[generation]\nrun_mode = \"nightly\"\n", "run_mode"),
            ("[output]\nmode = \"coco\"\n", "mode"),
            ("[output]\nclass_policy = \"alphabetical\"\n", "class_policy"),
            ("[generation]\nbackground_ratio = 1.5\n", "background_ratio"),
            ("[generation]\nconcurrency = 0\n", "concurrency"),
        ] {
            let file = write_toml(content);
            let err = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { key, .. } if key == expected),
                "{content}"
            );
        }
    }

    // =========================================================================
    // Environment Tests
    // =========================================================================

    #[test]
    fn test_env_overrides_file() {
        let file = write_toml("[generation]\nseed = 1\nfamily = \"mac\"\n");
        let env: HashMap<&str, &str> = [
            (ENV_SEED, "99"),
            (ENV_FAMILY, "win"),
            (ENV_MODE, "yolo"),
            (ENV_OUTPUT, "/tmp/out"),
            (ENV_RESOURCES, "/tmp/res"),
        ]
        .into_iter()
        .collect();

        let config = load_config_with_env(Some(file.path().to_path_buf()), |key| {
            env.get(key).map(|value| (*value).to_string())
        })
        .unwrap();

        assert_eq!(config.seed, 99);
        assert_eq!(config.family, UiFamily::Windows);
        assert_eq!(config.export_mode(), ExportMode::Normalized);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.resources_dir, Some(PathBuf::from("/tmp/res")));
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_env_invalid_seed() {
        let result = load_config_with_env(None, |key| (key == ENV_SEED).then(|| "abc".to_string()));
        assert!(matches!(result, Err(ConfigError::Invalid { key: "seed", .. })));
    }

    // =========================================================================
    // CLI Override Tests
    // =========================================================================

    #[test]
    fn test_cli_overrides() {
        let mut config = GeneratorConfig::default();
        ConfigOverrides::new()
            .with_run_mode(RunMode::Prod)
            .with_family(UiFamily::Windows)
            .with_seed(5)
            .with_training(3)
            .with_mode(ExportMode::Raw)
            .with_output_dir(PathBuf::from("cli-out"))
            .apply(&mut config);

        assert_eq!(config.source(), ConfigSource::Cli);
        assert_eq!(config.seed, 5);
        assert_eq!(config.family, UiFamily::Windows);
        assert_eq!(config.export_mode(), ExportMode::Raw);
        assert_eq!(config.plan().training, 3);
        assert_eq!(config.plan().validation, 500);
        assert_eq!(config.batch_settings().output_dir, PathBuf::from("cli-out"));
    }

    #[test]
    fn test_empty_overrides_keep_source() {
        let mut config = GeneratorConfig::default();
        ConfigOverrides::new().apply(&mut config);
        assert_eq!(config.source(), ConfigSource::Default);
    }
}
