use crate::config::SheetConfig;
use crate::error::Result;
use minisheet_engine::engine::Grid;
use std::path::PathBuf;

use super::filter::RowFilter;
use super::history::History;

/// UI-agnostic document state for the spreadsheet.
pub struct Document {
    /// The spreadsheet grid
    pub grid: Grid,
    /// Undo/redo stacks
    pub history: History,
    /// Current file path
    pub file_path: Option<PathBuf>,
    /// Whether the grid has been modified since the last load or save
    pub modified: bool,
    /// Settings this document was created with
    pub config: SheetConfig,
    /// Rows hidden from display unless they match
    pub filter: Option<RowFilter>,
}

impl Document {
    /// Create a new empty document with default settings.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new() -> Self {
        Self::with_config(SheetConfig::default())
    }

    /// Create a new empty document.
    pub fn with_config(config: SheetConfig) -> Self {
        Document {
            grid: Grid::with_extent(config.rows, config.cols, config.limits),
            history: History::new(config.history),
            file_path: None,
            modified: false,
            config,
            filter: None,
        }
    }

    /// Create a new document and load a CSV file if provided.
    ///
    /// A path that does not exist yet becomes the save target of an empty sheet.
    pub fn with_file(path: Option<PathBuf>, config: SheetConfig) -> Result<Self> {
        let mut doc = Self::with_config(config);
        if let Some(p) = path {
            if p.exists() {
                doc.load_file(&p)?;
            } else {
                doc.file_path = Some(p);
                doc.modified = false;
            }
        }
        Ok(doc)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
