//! Folder naming constants.

/// Accepted spellings of the data folder, in lookup order.
pub const TUP_DATA_DIR_NAMES: [&str; 3] = ["DATA", "Data", "data"];
/// Accepted spellings of the images folder, in lookup order.
pub const TUP_IMAGES_DIR_NAMES: [&str; 3] = ["IMAGES", "Images", "images"];
/// Image extensions, in lookup priority order.
pub const TUP_IMAGE_EXTENSIONS: [&str; 4] = ["bmp", "png", "jpg", "jpeg"];
