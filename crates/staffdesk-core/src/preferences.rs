//! Persisted UI preferences. The only one is the theme.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemePreference {
    pub dark_mode: bool,
}

impl ThemePreference {
    /// Missing or unreadable files fall back to light mode.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(pref) => {
                    debug!(path = %path.display(), "theme preference loaded");
                    pref
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to parse preferences");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read preferences");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let content = toml::to_string(self)?;
        fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn toggle(&mut self) {
        self.dark_mode = !self.dark_mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_light() {
        let dir = tempfile::tempdir().unwrap();
        let pref = ThemePreference::load(&dir.path().join("absent.toml"));
        assert!(!pref.dark_mode);
    }

    #[test]
    fn test_toggle_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.toml");

        let mut pref = ThemePreference::load(&path);
        pref.toggle();
        pref.save(&path).unwrap();

        assert!(ThemePreference::load(&path).dark_mode);
    }

    #[test]
    fn test_garbage_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        fs::write(&path, "dark_mode = \"sometimes\"").unwrap();
        assert_eq!(ThemePreference::load(&path), ThemePreference::default());
    }
}
