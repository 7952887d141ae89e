use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Chainable, Result};

/// The file, at the top of a theme root, that holds [`ThemeSettings`].
pub const SETTINGS_FILE: &str = "theme.toml";

/// Per-theme settings. Every field has a default, so an absent or empty
/// settings file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeSettings {
    /// Directory, relative to each theme root, holding template parts.
    pub parts_dir: String,
    /// Extension of every template file.
    pub extension: String,
    /// Placed between the context title and the site name in the document
    /// title.
    pub title_separator: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        ThemeSettings {
            parts_dir: "parts".into(),
            extension: "html".into(),
            title_separator: " | ".into(),
        }
    }
}

impl ThemeSettings {
    /// Reads `theme.toml` from `root`, falling back to defaults when the
    /// file doesn't exist.
    pub fn discover<P: AsRef<Path>>(root: P) -> Result<Self> {
        let path = root.as_ref().join(SETTINGS_FILE);
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no theme settings, using defaults");
            return Ok(ThemeSettings::default());
        }

        let string = std::fs::read_to_string(&path).chain_with(|| error! {
            "failed to read theme settings",
            "path" => path.display(),
        })?;

        toml::from_str(&string).chain_with(|| error! {
            "invalid theme settings",
            "path" => path.display(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(ThemeSettings::discover(dir.path()).unwrap(), ThemeSettings::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "parts_dir = \"template-parts/\"\n").unwrap();

        let settings = ThemeSettings::discover(dir.path()).unwrap();
        assert_eq!(settings.extension, "html");
        assert_eq!(settings.parts_dir, "template-parts/");
        assert_eq!(settings.title_separator, " | ");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "parts_dir = [").unwrap();

        let error = ThemeSettings::discover(dir.path()).unwrap_err();
        assert_eq!(error.message(), "invalid theme settings");
    }
}
