/// Persisted dark/light theme preference.
///
/// The preference is a single key-value pair stored as `{"theme": "dark"}` in a JSON file.
/// It is read once when the store is created and written synchronously on every toggle.
/// Without a path the preference lives in memory only. A missing, unreadable, or malformed
/// file degrades to [`Theme::Light`] with a warning.
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::CommonError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ThemeFile {
    theme: Theme,
}

pub struct ThemeStore {
    path: Option<PathBuf>,
    current: Mutex<Theme>,
}

impl ThemeStore {
    /// Read the persisted preference from `path`, if any.
    pub fn load(path: Option<PathBuf>) -> Self {
        let theme = path.as_deref().map(read_theme).unwrap_or_default();
        Self {
            path,
            current: Mutex::new(theme),
        }
    }

    pub fn current(&self) -> Theme {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Flip the preference and persist it before returning.
    ///
    /// On a write failure the in-memory preference is left unchanged.
    pub fn toggle(&self) -> Result<Theme, CommonError> {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        let next = current.toggled();
        if let Some(path) = &self.path {
            write_theme(path, next)?;
        }
        *current = next;
        info!(theme = ?next, "theme toggled");
        Ok(next)
    }
}

fn read_theme(path: &Path) -> Theme {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Theme::default(),
        Err(e) => {
            warn!(error = %e, path = %path.display(), "failed to read theme preference");
            return Theme::default();
        }
    };
    serde_json::from_str::<ThemeFile>(&raw)
        .map(|file| file.theme)
        .inspect_err(|e| warn!(error = %e, path = %path.display(), "malformed theme preference"))
        .unwrap_or_default()
}

fn write_theme(path: &Path, theme: Theme) -> Result<(), CommonError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string(&ThemeFile { theme })?;
    std::fs::write(path, json)?;
    Ok(())
}
