use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::NestrapsError;

/// Bundled master templates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStyle {
    /// Twitter Bootstrap 2.3.
    #[default]
    Bootstrap2,
    /// Twitter Bootstrap 3.0.
    Bootstrap3,
    /// Foundation 3.2.
    Foundation3,
    /// Foundation 4.3.
    Foundation4,
    /// Foundation 5.0.
    Foundation5,
}

impl TemplateStyle {
    /// File name of the master template for this style.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            TemplateStyle::Bootstrap2 => "bootstrap-v2.latte",
            TemplateStyle::Bootstrap3 => "bootstrap-v3.latte",
            TemplateStyle::Foundation3 => "foundation-v3.latte",
            TemplateStyle::Foundation4 => "foundation-v4.latte",
            TemplateStyle::Foundation5 => "foundation-v5.latte",
        }
    }
}

impl fmt::Display for TemplateStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

/// Renderer settings, usually read from a TOML file:
///
/// ```toml
/// style = "foundation5"
/// template_dir = "app/templates/forms"
/// show_field_errors_globally = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    pub style: TemplateStyle,
    /// Directory holding the master templates and `controls/`.
    pub template_dir: PathBuf,
    /// Explicit master template. Takes precedence over `style`; relative
    /// paths are resolved against `template_dir`.
    pub master: Option<PathBuf>,
    /// Also list errors reported by individual fields among the form errors.
    pub show_field_errors_globally: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            style: TemplateStyle::default(),
            template_dir: PathBuf::from("templates"),
            master: None,
            show_field_errors_globally: false,
        }
    }
}

impl RendererConfig {
    /// Parse a TOML configuration string.
    ///
    /// # Errors
    ///
    /// Returns [`NestrapsError::Config`] on malformed input or unknown keys.
    pub fn from_toml(input: &str) -> Result<Self, NestrapsError> {
        Ok(toml::from_str(input)?)
    }

    /// Read and parse a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`NestrapsError`] on I/O or parse failure.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, NestrapsError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml(&input)
    }

    /// Path of the master template this configuration selects.
    #[must_use]
    pub fn master_template(&self) -> PathBuf {
        match &self.master {
            Some(master) => self.template_dir.join(master),
            None => self.template_dir.join(self.style.file_name()),
        }
    }
}
