//! Reference-image lookup by part number.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::conf::TUP_IMAGE_EXTENSIONS;

/// Find `<part_number>.<ext>` in `dir_images`, trying extensions in priority order.
///
/// The stem must match exactly; blank part numbers and a missing folder
/// yield `None`.
pub fn find_image_for_part<P>(dir_images: P, part_number: &str) -> Option<PathBuf>
where
    P: AsRef<Path>,
{
    let path_dir_images = dir_images.as_ref();
    let c_part = part_number.trim();
    if c_part.is_empty() || !path_dir_images.is_dir() {
        return None;
    }

    let path_found = TUP_IMAGE_EXTENSIONS
        .iter()
        .map(|ext| path_dir_images.join(format!("{c_part}.{ext}")))
        .find(|path_candidate| path_candidate.is_file());
    if path_found.is_none() {
        debug!("No image for part {c_part:?}");
    }
    path_found
}

/// Stems of every regular file in `dir_images`, sorted.
///
/// A missing or unreadable folder counts as empty.
pub fn collect_image_stems<P>(dir_images: P) -> Vec<String>
where
    P: AsRef<Path>,
{
    let Ok(iter_entries) = fs::read_dir(dir_images.as_ref()) else {
        return vec![];
    };

    let mut l_stems: Vec<String> = iter_entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path_entry| path_entry.is_file())
        .filter_map(|path_entry| {
            path_entry
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
        })
        .collect();
    l_stems.sort();
    l_stems
}
