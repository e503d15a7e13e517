use super::Document;
use crate::error::{Result, SheetError};
use crate::storage::{read_csv_file, write_csv_file};
use std::path::{Path, PathBuf};

impl Document {
    /// Load a CSV file, replacing the grid.
    ///
    /// On failure the document is left unchanged.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let grid = read_csv_file(path, &self.config)?;

        self.grid = grid;
        self.history.clear();
        self.filter = None;
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        tracing::debug!(
            path = %path.display(),
            nrows = self.grid.nrows(),
            ncols = self.grid.ncols(),
            "loaded file"
        );
        Ok(())
    }

    /// Save to current file path.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = self.file_path.clone() else {
            return Err(SheetError::NoFilePath);
        };
        self.write_to(&path)?;
        Ok(path)
    }

    /// Save to `path` and make it the current file path.
    pub fn save_as(&mut self, path: &Path) -> Result<PathBuf> {
        self.write_to(path)?;
        self.file_path = Some(path.to_path_buf());
        Ok(path.to_path_buf())
    }

    /// Export evaluated CSV without changing the current path or modified flag.
    pub fn export_csv(&self, path: &Path) -> Result<()> {
        write_csv_file(path, &self.grid, self.config.decimals)
    }

    fn write_to(&mut self, path: &Path) -> Result<()> {
        self.export_csv(path)?;
        self.modified = false;
        tracing::debug!(path = %path.display(), "saved file");
        Ok(())
    }
}
