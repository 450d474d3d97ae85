//! Shared configuration loader for lyxconv.
//!
//! `defaults/lyxconv.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer user-specific files on
//! top of those defaults via [`Loader`] before deserializing into
//! [`LyxconvConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use lyxconv_core::{ContainerConfig, ContainerKind, KindDefinition, RenderOptions};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/lyxconv.default.toml");

/// Top-level configuration consumed by lyxconv applications.
#[derive(Debug, Clone, Deserialize)]
pub struct LyxconvConfig {
    pub document: DocumentConfig,
    pub containers: ContainersConfig,
    pub convert: ConvertConfig,
    pub inspect: InspectConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentConfig {
    /// Language in effect until the document header sets one
    pub language: String,
}

/// Container tables: start markers, endings and parameter names.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainersConfig {
    pub max_depth: usize,
    pub kinds: Vec<KindConfig>,
    pub parameters: Vec<ParameterConfig>,
    #[serde(default)]
    pub extra_kinds: Vec<KindConfig>,
    #[serde(default)]
    pub extra_parameters: Vec<ParameterConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KindConfig {
    pub kind: ContainerKind,
    pub starts: Vec<String>,
    #[serde(default)]
    pub ending: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParameterConfig {
    /// Keyword at the start of the parameter line
    pub name: String,
    /// Parameter the value is stored under
    pub key: String,
}

impl From<&KindConfig> for KindDefinition {
    fn from(config: &KindConfig) -> Self {
        KindDefinition {
            kind: config.kind,
            starts: config.starts.clone(),
            ending: config.ending.clone(),
        }
    }
}

impl From<&ContainersConfig> for ContainerConfig {
    fn from(config: &ContainersConfig) -> Self {
        ContainerConfig {
            kinds: config
                .kinds
                .iter()
                .chain(&config.extra_kinds)
                .map(KindDefinition::from)
                .collect(),
            parameters: config
                .parameters
                .iter()
                .chain(&config.extra_parameters)
                .map(|p| (p.name.clone(), p.key.clone()))
                .collect(),
            max_depth: config.max_depth,
        }
    }
}

impl From<ContainersConfig> for ContainerConfig {
    fn from(config: ContainersConfig) -> Self {
        ContainerConfig::from(&config)
    }
}

/// Conversion knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub filter_header_footer: bool,
    pub html: HtmlConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HtmlConfig {
    pub title: String,
    pub custom_css: String,
}

impl From<&HtmlConfig> for RenderOptions {
    fn from(config: &HtmlConfig) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        RenderOptions {
            title: non_empty(&config.title),
            custom_css: non_empty(&config.custom_css),
            ..Default::default()
        }
    }
}

/// Controls tree output of the inspect command.
#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    pub treeviz: TreevizConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreevizConfig {
    pub include_all_parameters: bool,
    pub show_line_numbers: bool,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<LyxconvConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<LyxconvConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.document.language, "english");
        assert_eq!(config.containers.max_depth, 200);
        assert!(!config.convert.filter_header_footer);
        assert!(config.inspect.treeviz.show_line_numbers);
    }

    #[test]
    fn default_tables_match_the_builtin_ones() {
        let config = load_defaults().expect("defaults to deserialize");
        let containers = ContainerConfig::from(config.containers);
        assert_eq!(containers, ContainerConfig::standard());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("convert.html.title", "Notes")
            .expect("override to apply")
            .set_override("containers.max_depth", 12i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        let options = RenderOptions::from(&config.convert.html);
        assert_eq!(options.title.as_deref(), Some("Notes"));
        assert_eq!(options.custom_css, None);
        assert_eq!(config.containers.max_depth, 12);
    }

    #[test]
    fn extra_kinds_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extra.toml");
        std::fs::write(
            &path,
            r#"
[[containers.extra_kinds]]
kind = "note"
starts = ['\begin_inset Greyedout']
ending = '\end_inset'

[[containers.extra_parameters]]
name = "width"
key = "width"
"#,
        )
        .unwrap();

        let config = Loader::new().with_file(&path).build().expect("config to build");
        let containers = ContainerConfig::from(&config.containers);
        let standard = ContainerConfig::standard();
        assert_eq!(containers.kinds.len(), standard.kinds.len() + 1);
        assert_eq!(
            containers.kinds.last().map(|def| def.kind),
            Some(ContainerKind::Note)
        );
        assert_eq!(containers.parameter_key("width"), Some("width"));
        assert_eq!(containers.parameter_key("LatexCommand"), Some("command"));
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new().with_file("/nonexistent/lyxconv.toml").build();
        assert!(result.is_err());
    }
}
