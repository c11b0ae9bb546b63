//! Images-folder backed [`ImageLookup`].

use std::path::PathBuf;

use polarity_io_fs::find_image_for_part;
use polarity_io_xlsx::{ImageLookup, SpecImageAsset, XlsxReportError, read_image_asset};

/// Looks up `<part>.{bmp,png,jpg,jpeg}` in one folder and reads its size.
#[derive(Debug, Clone)]
pub struct FolderImageLookup {
    path_dir_images: PathBuf,
}

impl FolderImageLookup {
    pub fn new(path_dir_images: PathBuf) -> Self {
        Self { path_dir_images }
    }
}

impl ImageLookup for FolderImageLookup {
    fn find_image(&self, part_number: &str) -> Result<Option<SpecImageAsset>, XlsxReportError> {
        match find_image_for_part(&self.path_dir_images, part_number) {
            Some(path_file) => read_image_asset(path_file).map(Some),
            None => Ok(None),
        }
    }
}
