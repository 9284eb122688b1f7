use chrono::Locale;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::store::DEFAULT_COOKBOOK_PATH;
use crate::translator::Labels;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Location of the cookbook JSON file
    #[serde(default = "default_cookbook_path")]
    pub cookbook_path: PathBuf,
    /// External LaTeX engine settings
    #[serde(default)]
    pub latex: LatexConfig,
    /// Texts and locale used in the generated document
    #[serde(default)]
    pub document: DocumentConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            cookbook_path: default_cookbook_path(),
            latex: LatexConfig::default(),
            document: DocumentConfig::default(),
        }
    }
}

/// Configuration for the external LaTeX engine
#[derive(Debug, Deserialize, Clone)]
pub struct LatexConfig {
    /// Program to run (e.g., "pdflatex", "lualatex")
    #[serde(default = "default_program")]
    pub program: String,
    /// Extra arguments passed before the input file
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    /// How often the engine runs; the table of contents needs two passes
    #[serde(default = "default_passes")]
    pub passes: u32,
    /// Directory receiving the .tex file and the compiled output
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Base name of the generated files
    #[serde(default = "default_job_name")]
    pub job_name: String,
}

impl Default for LatexConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            passes: default_passes(),
            output_dir: default_output_dir(),
            job_name: default_job_name(),
        }
    }
}

/// Configuration of the generated document
#[derive(Debug, Deserialize, Clone)]
pub struct DocumentConfig {
    /// Locale for month names, e.g. "de_DE" or "en_US"
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Fixed texts; missing entries fall back to German
    #[serde(default)]
    pub labels: Labels,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            labels: Labels::default(),
        }
    }
}

impl DocumentConfig {
    /// Resolve the configured locale name.
    pub fn locale(&self) -> Result<Locale, ConfigError> {
        Locale::try_from(self.locale.as_str())
            .map_err(|_| ConfigError::Message(format!("unknown locale '{}'", self.locale)))
    }
}

// Default value functions
fn default_cookbook_path() -> PathBuf {
    PathBuf::from(DEFAULT_COOKBOOK_PATH)
}

fn default_program() -> String {
    "pdflatex".to_string()
}

fn default_args() -> Vec<String> {
    vec![
        "-interaction=nonstopmode".to_string(),
        "-halt-on-error".to_string(),
    ]
}

fn default_passes() -> u32 {
    2
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

fn default_job_name() -> String {
    "cookbook".to_string()
}

fn default_locale() -> String {
    "de_DE".to_string()
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with COOKBOOK__ prefix
    /// 2. cookbook.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: COOKBOOK__LATEX__PROGRAM
    pub fn load() -> Result<Self, ConfigError> {
        load_config("cookbook")
    }
}

/// Load configuration from the named file (without extension) and the environment
pub fn load_config(file_name: &str) -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name(file_name).required(false))
        // Use double underscore for nested: COOKBOOK__LATEX__PROGRAM
        .add_source(
            Environment::with_prefix("COOKBOOK")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
