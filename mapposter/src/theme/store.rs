use std::path::{Path, PathBuf};

use log::{debug, info};

use super::{Theme, ThemeError};

/// Loads themes from a directory of `<name>.json` files.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    folder_path: PathBuf,
}

impl ThemeStore {
    /// Creates a store reading themes from the given directory.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            folder_path: path.as_ref().into(),
        }
    }

    /// Directory the store reads from.
    pub fn folder_path(&self) -> &Path {
        &self.folder_path
    }

    /// Loads and validates the theme with the given name. The name has no extension.
    pub fn load(&self, name: &str) -> Result<Theme, ThemeError> {
        let file_path = self
            .file_path(name)
            .ok_or_else(|| ThemeError::NotFound(name.to_string()))?;

        if !file_path.is_file() {
            debug!("Theme file {file_path:?} does not exist");
            return Err(ThemeError::NotFound(name.to_string()));
        }

        let contents = std::fs::read_to_string(&file_path).map_err(|err| ThemeError::Invalid {
            theme: name.to_string(),
            reason: format!("failed to read {file_path:?}: {err}"),
        })?;

        let theme = Theme::from_json_str(name, &contents)?;
        info!("Loaded theme '{name}' ({})", theme.name());

        Ok(theme)
    }

    /// Names of the themes in the directory, sorted. A missing directory has no themes.
    pub fn available(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.folder_path) else {
            debug!("Theme folder {:?} cannot be read", self.folder_path);
            return vec![];
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| Some(path.file_stem()?.to_str()?.to_string()))
            .collect();
        names.sort();

        names
    }

    fn file_path(&self, name: &str) -> Option<PathBuf> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | ' '));

        valid.then(|| self.folder_path.join(format!("{name}.json")))
    }
}
