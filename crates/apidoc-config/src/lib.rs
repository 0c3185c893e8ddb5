//! Configuration management for apidoc.
//!
//! Parses `apidoc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. The loaded
//! [`Config`] is a plain value: callers pass it to the documentation
//! pipeline explicitly, and loading twice yields equal results.
//!
//! Programmatic or CLI overrides are applied during load via [`Overrides`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `output.dir`
//! - `output.templates_dir`
//! - `trace.base_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct Overrides {
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override documentation format.
    pub format: Option<String>,
    /// Override strict validation.
    pub strict: Option<bool>,
    /// Override output layout.
    pub directory_structure: Option<DirectoryStructure>,
    /// Override template directory.
    pub templates_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "apidoc.toml";

/// Default output directory, relative to the config file.
const DEFAULT_OUTPUT_DIR: &str = "target/api-docs";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration (paths are relative strings from TOML).
    output: OutputConfigRaw,
    /// Contract validation configuration.
    pub validation: ValidationConfig,
    /// Exchange extraction configuration.
    pub trace: TraceConfig,

    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// How artifact files are laid out under the output directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryStructure {
    /// `{identifier}-{topic}.{ext}` in one directory.
    #[default]
    Flat,
    /// `{identifier}/{topic}.{ext}`.
    Nested,
}

/// Raw output configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
    format: Option<String>,
    directory_structure: Option<DirectoryStructure>,
    templates_dir: Option<String>,
}

/// Resolved output configuration with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Directory artifacts are written to.
    pub dir: PathBuf,
    /// Documentation format (e.g. "adoc", "md").
    pub format: String,
    /// File layout under `dir`.
    pub directory_structure: DirectoryStructure,
    /// Directory with template overrides.
    pub templates_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: "adoc".to_owned(),
            directory_structure: DirectoryStructure::Flat,
            templates_dir: None,
        }
    }
}

impl OutputConfig {
    /// File extension for the configured format.
    #[must_use]
    pub fn extension(&self) -> &str {
        match self.format.as_str() {
            "markdown" | "md" => "md",
            other => other,
        }
    }
}

/// Contract validation configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Fail on contract mismatches instead of logging them.
    pub strict: bool,
}

/// Exchange extraction configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Base URL that relative request URLs are resolved against.
    pub base_url: String,
    /// Method assumed when the harness recorded none.
    pub default_method: Option<String>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_owned(),
            default_method: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`output.dir`").
        field: String,
        /// Error message (e.g., "${`DOCS_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional overrides.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `apidoc.toml` in current directory and parents.
    ///
    /// Overrides are applied after loading and path resolution, so they take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        overrides: Option<&Overrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(overrides) = overrides {
            config.apply_overrides(overrides);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply overrides to the configuration.
    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(dir) = &overrides.output_dir {
            self.output_resolved.dir.clone_from(dir);
        }
        if let Some(format) = &overrides.format {
            self.output_resolved.format.clone_from(format);
        }
        if let Some(strict) = overrides.strict {
            self.validation.strict = strict;
        }
        if let Some(structure) = overrides.directory_structure {
            self.output_resolved.directory_structure = structure;
        }
        if let Some(templates_dir) = &overrides.templates_dir {
            self.output_resolved.templates_dir = Some(templates_dir.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    #[must_use]
    pub fn default_with_base(base: &Path) -> Self {
        Self {
            output: OutputConfigRaw::default(),
            validation: ValidationConfig::default(),
            trace: TraceConfig::default(),
            output_resolved: OutputConfig {
                dir: base.join(DEFAULT_OUTPUT_DIR),
                ..OutputConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_output()?;
        self.validate_trace()?;
        Ok(())
    }

    fn validate_output(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.output_resolved.format, "output.format")?;
        if self
            .output_resolved
            .format
            .contains(|c: char| c == '/' || c == '\\' || c == '.')
        {
            return Err(ConfigError::Validation(
                "output.format must be a bare name such as \"adoc\" or \"md\"".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_trace(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.trace.base_url, "trace.base_url")?;
        require_http_url(&self.trace.base_url, "trace.base_url")?;

        if let Some(method) = &self.trace.default_method
            && (method.is_empty() || !method.chars().all(|c| c.is_ascii_alphabetic()))
        {
            return Err(ConfigError::Validation(format!(
                "trace.default_method must be an HTTP method name, got {method:?}"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.output.dir {
            self.output.dir = Some(expand::expand_env(dir, "output.dir")?);
        }
        if let Some(ref dir) = self.output.templates_dir {
            self.output.templates_dir = Some(expand::expand_env(dir, "output.templates_dir")?);
        }
        self.trace.base_url = expand::expand_env(&self.trace.base_url, "trace.base_url")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let defaults = OutputConfig::default();
        self.output_resolved = OutputConfig {
            dir: config_dir.join(self.output.dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR)),
            format: self.output.format.clone().unwrap_or(defaults.format),
            directory_structure: self.output.directory_structure.unwrap_or_default(),
            templates_dir: self.output.templates_dir.as_ref().map(|d| config_dir.join(d)),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(
            config.output_resolved.dir,
            PathBuf::from("/test/target/api-docs")
        );
        assert_eq!(config.output_resolved.format, "adoc");
        assert_eq!(
            config.output_resolved.directory_structure,
            DirectoryStructure::Flat
        );
        assert!(!config.validation.strict);
        assert_eq!(config.trace.base_url, "http://localhost");
        assert!(config.trace.default_method.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(!config.validation.strict);
        assert_eq!(config.trace.base_url, "http://localhost");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[output]
dir = "docs/snippets"
format = "md"
directory_structure = "nested"
templates_dir = "templates"

[validation]
strict = true

[trace]
base_url = "https://api.example.com"
default_method = "GET"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert!(config.validation.strict);
        assert_eq!(config.trace.default_method.as_deref(), Some("GET"));
        assert_eq!(
            config.output_resolved,
            OutputConfig {
                dir: PathBuf::from("/project/docs/snippets"),
                format: "md".to_owned(),
                directory_structure: DirectoryStructure::Nested,
                templates_dir: Some(PathBuf::from("/project/templates")),
            }
        );
    }

    #[test]
    fn test_unknown_directory_structure_rejected() {
        let toml = r#"
[output]
directory_structure = "tree"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_extension_follows_format() {
        let mut output = OutputConfig::default();
        assert_eq!(output.extension(), "adoc");
        output.format = "markdown".to_owned();
        assert_eq!(output.extension(), "md");
        output.format = "txt".to_owned();
        assert_eq!(output.extension(), "txt");
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = Overrides {
            output_dir: Some(PathBuf::from("/out")),
            strict: Some(true),
            directory_structure: Some(DirectoryStructure::Nested),
            ..Default::default()
        };

        config.apply_overrides(&overrides);

        assert_eq!(config.output_resolved.dir, PathBuf::from("/out"));
        assert!(config.validation.strict);
        assert_eq!(
            config.output_resolved.directory_structure,
            DirectoryStructure::Nested
        );
        assert_eq!(config.output_resolved.format, "adoc"); // Unchanged
    }

    #[test]
    fn test_apply_overrides_empty() {
        let before = Config::default_with_base(Path::new("/test"));
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_overrides(&Overrides::default());

        assert_eq!(config.output_resolved, before.output_resolved);
        assert_eq!(config.validation.strict, before.validation.strict);
    }

    #[test]
    fn test_load_from_file_is_repeatable() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[output]\ndir = \"snippets\"\n\n[validation]\nstrict = true\n",
        )
        .unwrap();

        let first = Config::load(Some(&path), None).unwrap();
        let second = Config::load(Some(&path), None).unwrap();

        assert_eq!(first.output_resolved, second.output_resolved);
        assert_eq!(first.output_resolved.dir, tmp.path().join("snippets"));
        assert!(first.validation.strict);
        assert_eq!(first.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/apidoc.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_expand_env_vars_output_dir() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("APIDOC_CONFIG_TEST_DIR", "generated");
        }

        let toml = r#"
[output]
dir = "${APIDOC_CONFIG_TEST_DIR}/snippets"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.output_resolved.dir,
            PathBuf::from("/project/generated/snippets")
        );

        unsafe {
            std::env::remove_var("APIDOC_CONFIG_TEST_DIR");
        }
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_format() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.output_resolved.format = String::new();
        assert_validation_error(&config, &["output.format", "empty"]);
    }

    #[test]
    fn test_validate_format_with_path_separator() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.output_resolved.format = "../adoc".to_owned();
        assert_validation_error(&config, &["output.format"]);
    }

    #[test]
    fn test_validate_base_url_scheme() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.trace.base_url = "localhost:8080".to_owned();
        assert_validation_error(&config, &["trace.base_url", "http"]);
    }

    #[test]
    fn test_validate_default_method() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.trace.default_method = Some("GET /".to_owned());
        assert_validation_error(&config, &["trace.default_method"]);

        config.trace.default_method = Some("POST".to_owned());
        assert!(config.validate().is_ok());
    }
}
