//! `polarity_io_fs` v1:
//! Working-folder contract for a polarity-check run.
//!
//! Module map:
//! - `conf`    : folder names and accepted image extensions
//! - `spec`    : resolved folders and errors
//! - `folders` : DATA/IMAGES resolution and creation
//! - `images`  : part-number image lookup and folder census
//! - `util`    : shared path helpers

pub mod conf;
pub mod folders;
pub mod images;
pub mod spec;
mod util;

pub use folders::{ensure_structure, resolve_working_folders};
pub use images::{collect_image_stems, find_image_for_part};
pub use spec::{FolderError, SpecWorkingFolders};
