//! Working-folder models and top-level error types.

use std::path::PathBuf;

use thiserror::Error;

/// Folders used by one run, resolved against the root folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecWorkingFolders {
    /// Root folder chosen by the operator.
    pub path_dir_root: PathBuf,
    /// Folder holding `FeederSetup.csv`.
    pub path_dir_data: PathBuf,
    /// Folder holding per-part reference images.
    pub path_dir_images: PathBuf,
}

/// Root-folder validation and structure failures.
#[derive(Debug, Error)]
pub enum FolderError {
    /// Root path is missing or not a directory.
    #[error("The selected folder does not exist or is not a valid folder.")]
    InvalidRoot(PathBuf),
    /// DATA/IMAGES creation failed.
    #[error("Could not create DATA/IMAGES folders: {message}")]
    StructureInit {
        /// Folder that could not be created.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
}
