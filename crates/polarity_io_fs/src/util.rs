use std::path::{Path, PathBuf};

/// Return the first `names` entry that exists as a directory under `path_dir_root`.
pub(crate) fn resolve_existing_dir(path_dir_root: &Path, names: &[&str]) -> Option<PathBuf> {
    names
        .iter()
        .map(|name| path_dir_root.join(name))
        .find(|path_candidate| path_candidate.is_dir())
}

/// Resolve one of `names`, defaulting to the first spelling.
pub(crate) fn derive_dir_or_default(path_dir_root: &Path, names: &[&str]) -> PathBuf {
    resolve_existing_dir(path_dir_root, names)
        .unwrap_or_else(|| path_dir_root.join(names.first().copied().unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_existing_dir_follows_name_order() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(tmp.path().join("data")).expect("mkdir");

        let path_found =
            resolve_existing_dir(tmp.path(), &["DATA", "Data", "data"]).expect("resolved");
        assert!(path_found.is_dir());
        assert!(resolve_existing_dir(tmp.path(), &["IMAGES"]).is_none());
    }

    #[test]
    fn derive_dir_or_default_uses_first_name() {
        let tmp = tempfile::tempdir().expect("tempdir");
        assert_eq!(
            derive_dir_or_default(tmp.path(), &["IMAGES", "images"]),
            tmp.path().join("IMAGES")
        );
    }
}
