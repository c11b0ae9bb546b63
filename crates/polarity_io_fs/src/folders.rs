//! Root-folder validation and DATA/IMAGES structure.

use std::fs;
use std::path::Path;

use log::debug;

use crate::conf::{TUP_DATA_DIR_NAMES, TUP_IMAGES_DIR_NAMES};
use crate::spec::{FolderError, SpecWorkingFolders};
use crate::util::derive_dir_or_default;

/// Validate `dir_root` and resolve its data/images folders.
///
/// Existing `DATA`/`Data`/`data` (and the same for `IMAGES`) spellings are
/// reused; when none exists the upper-case name is planned. Nothing is
/// created here, see [`ensure_structure`].
pub fn resolve_working_folders<P>(dir_root: P) -> Result<SpecWorkingFolders, FolderError>
where
    P: AsRef<Path>,
{
    let path_dir_root = dir_root.as_ref().to_path_buf();
    if !path_dir_root.is_dir() {
        return Err(FolderError::InvalidRoot(path_dir_root));
    }

    let folders = SpecWorkingFolders {
        path_dir_data: derive_dir_or_default(&path_dir_root, &TUP_DATA_DIR_NAMES),
        path_dir_images: derive_dir_or_default(&path_dir_root, &TUP_IMAGES_DIR_NAMES),
        path_dir_root,
    };
    debug!(
        "Working folders: data={} images={}",
        folders.path_dir_data.display(),
        folders.path_dir_images.display()
    );
    Ok(folders)
}

/// Create the data and images folders if they are missing. Idempotent.
pub fn ensure_structure(folders: &SpecWorkingFolders) -> Result<(), FolderError> {
    for path_dir in [&folders.path_dir_data, &folders.path_dir_images] {
        fs::create_dir_all(path_dir).map_err(|e| FolderError::StructureInit {
            path: path_dir.clone(),
            message: e.to_string(),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_rejects_missing_root() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let err = resolve_working_folders(tmp.path().join("nope")).expect_err("must fail");
        assert!(matches!(err, FolderError::InvalidRoot(_)));
        assert_eq!(
            err.to_string(),
            "The selected folder does not exist or is not a valid folder."
        );
    }

    #[test]
    fn resolve_rejects_file_root() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_file = tmp.path().join("file.txt");
        std::fs::write(&path_file, "x").expect("write");
        assert!(resolve_working_folders(&path_file).is_err());
    }

    #[test]
    fn ensure_structure_creates_upper_case_defaults() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let folders = resolve_working_folders(tmp.path()).expect("resolve");
        assert_eq!(folders.path_dir_data, tmp.path().join("DATA"));
        assert_eq!(folders.path_dir_images, tmp.path().join("IMAGES"));

        ensure_structure(&folders).expect("ensure");
        ensure_structure(&folders).expect("ensure twice");
        assert!(folders.path_dir_data.is_dir());
        assert!(folders.path_dir_images.is_dir());
    }

    #[test]
    fn resolve_reuses_existing_spelling() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(tmp.path().join("Images")).expect("mkdir");

        let folders = resolve_working_folders(tmp.path()).expect("resolve");
        assert!(folders.path_dir_images.is_dir());
        ensure_structure(&folders).expect("ensure");
        assert!(folders.path_dir_data.is_dir());
    }

    #[test]
    fn ensure_structure_reports_blocked_path() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::write(tmp.path().join("DATA"), "not a dir").expect("write");
        let folders = SpecWorkingFolders {
            path_dir_root: tmp.path().to_path_buf(),
            path_dir_data: tmp.path().join("DATA"),
            path_dir_images: tmp.path().join("IMAGES"),
        };
        let err = ensure_structure(&folders).expect_err("must fail");
        assert!(matches!(err, FolderError::StructureInit { .. }));
        assert!(err.to_string().starts_with("Could not create DATA/IMAGES folders"));
    }
}
