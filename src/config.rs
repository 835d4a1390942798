//! Configuration to acknowledge site preferences as well as set defaults.
//!
//! We try to find a folio.toml, and if present we load settings from there. This covers the
//! headings that are folded, the titles that are never folded, the page extensions to scan and
//! the zoom limits of image viewports.

use crate::error::{Error, Result};
use facet::Facet;
use std::fs;
use std::path::Path;

#[derive(Facet, Clone, Debug, PartialEq)]
/// Site preferences loaded from folio.toml or falling back to defaults.
pub struct Config {
    #[facet(default = vec!["overview".to_string(), "introduction".to_string(), "description".to_string()])]
    /// Heading titles (compared trimmed and lower-cased) that stay ordinary headings.
    pub excluded_titles: Vec<String>,
    #[facet(default = vec![2, 3])]
    /// Heading levels turned into collapsible sections.
    pub fold_levels: Vec<usize>,
    #[facet(default = vec!["md".to_string()])]
    /// File suffixes to match when scanning directories.
    pub file_extensions: Vec<String>,
    #[facet(default = "zoomable".to_string())]
    /// Image title that marks an image for viewport control.
    pub zoom_marker: String,
    #[facet(default = 0.5)]
    /// Smallest viewport scale.
    pub min_scale: f64,
    #[facet(default = 5.0)]
    /// Largest viewport scale.
    pub max_scale: f64,
    #[facet(default = 1.2)]
    /// Factor applied by the zoom buttons.
    pub button_zoom_factor: f64,
    #[facet(default = 1.1)]
    /// Factor applied when the wheel scrolls up.
    pub wheel_zoom_in: f64,
    #[facet(default = 0.9)]
    /// Factor applied when the wheel scrolls down.
    pub wheel_zoom_out: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            excluded_titles: vec![
                "overview".to_string(),
                "introduction".to_string(),
                "description".to_string(),
            ],
            fold_levels: vec![2, 3],
            file_extensions: vec!["md".to_string()],
            zoom_marker: "zoomable".to_string(),
            min_scale: 0.5,
            max_scale: 5.0,
            button_zoom_factor: 1.2,
            wheel_zoom_in: 1.1,
            wheel_zoom_out: 0.9,
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from folio.toml if present.
    ///
    /// A missing or malformed file falls back to the defaults.
    pub fn load() -> Self {
        match Self::from_path(Path::new("folio.toml")) {
            Ok(config) => config,
            Err(e) => {
                log::debug!("using default configuration: {e}");
                Self::default()
            }
        }
    }

    /// Configuration for a run: the file named on the command line, or else folio.toml.
    ///
    /// Only the implicit lookup falls back to defaults; a named file must load.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `explicit` cannot be read or is not valid configuration.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let Some(path) = explicit else {
            return Ok(Self::load());
        };
        Self::from_path(path).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
            other => Error::Config(format!("{}: {other}", path.display())),
        })
    }

    /// Load configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid configuration.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text; absent keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config = facet_toml::from_str::<Self>(contents)
            .map_err(|e| Error::Config(e.to_string()))?;
        config.validated()
    }

    fn validated(self) -> Result<Self> {
        if let Some(level) = self.fold_levels.iter().find(|l| !(1..=6).contains(*l)) {
            return Err(Error::Config(format!("fold level {level} is not 1-6")));
        }
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(Error::Config(format!(
                "scale bounds {}..{} are not an increasing positive range",
                self.min_scale, self.max_scale
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
