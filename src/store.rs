use log::{debug, info, warn};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::{fs, task};

use crate::error::CookbookError;
use crate::model::Cookbook;

/// Default location of the cookbook file, relative to the working directory.
pub const DEFAULT_COOKBOOK_PATH: &str = "cookBook.json";

/// Reads and writes the cookbook as a single JSON file.
#[derive(Debug, Clone)]
pub struct CookbookStore {
    path: PathBuf,
}

impl Default for CookbookStore {
    fn default() -> Self {
        CookbookStore::new(DEFAULT_COOKBOOK_PATH)
    }
}

impl CookbookStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CookbookStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a cookbook file is present. Errors other than "not found",
    /// such as a permission problem on a parent directory, are returned.
    pub async fn exists(&self) -> Result<bool, CookbookError> {
        fs::try_exists(&self.path).await.map_err(|e| {
            warn!("Cannot check for cookbook at {}: {}", self.path.display(), e);
            CookbookError::from(e)
        })
    }

    /// Load and validate the stored cookbook.
    pub async fn load(&self) -> Result<Cookbook, CookbookError> {
        debug!("Loading cookbook from {}", self.path.display());
        let content = fs::read_to_string(&self.path).await?;
        let cookbook: Cookbook = serde_json::from_str(&content)?;
        cookbook.validate()?;
        info!(
            "Loaded cookbook '{}' with {} recipes",
            cookbook.name,
            cookbook.recipes.len()
        );
        Ok(cookbook)
    }

    /// Replace the stored cookbook.
    ///
    /// The JSON is written to a uniquely named temporary file next to the
    /// target and then renamed over it. A failed write leaves the previous
    /// file intact, and overlapping saves never share a temporary file.
    pub async fn save(&self, cookbook: &Cookbook) -> Result<(), CookbookError> {
        cookbook.validate()?;
        let json = serde_json::to_string_pretty(cookbook)?;
        self.replace_with(move |file| file.write_all(json.as_bytes()))
            .await?;
        info!("Saved cookbook '{}' to {}", cookbook.name, self.path.display());
        Ok(())
    }

    async fn replace_with<F>(&self, write: F) -> Result<(), CookbookError>
    where
        F: FnOnce(&mut File) -> io::Result<()> + Send + 'static,
    {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).await?;
                parent.to_path_buf()
            }
            None => PathBuf::from("."),
        };
        let target = self.path.clone();
        let prefix = self.temp_prefix();

        // The temporary file is removed on drop unless it was persisted.
        task::spawn_blocking(move || -> io::Result<()> {
            let mut temp = tempfile::Builder::new()
                .prefix(&prefix)
                .suffix(".tmp")
                .tempfile_in(&dir)?;
            write(temp.as_file_mut())?;
            temp.as_file().sync_all()?;
            temp.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))??;
        Ok(())
    }

    fn temp_prefix(&self) -> String {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_COOKBOOK_PATH.to_string());
        format!(".{file_name}.")
    }
}
