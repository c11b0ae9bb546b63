//! Feeder export constants.

/// File name of the machine export inside the data folder.
pub const C_FEEDER_FILE_NAME: &str = "FeederSetup.csv";

/// Header names that must be present in the table-header row.
pub const L_REQUIRED_FEEDER_COLUMNS: [&str; 11] = [
    "ModuleNumber",
    "SideNo",
    "Location",
    "PartNumber",
    "PartComment",
    "PackageName",
    "PartShapeName",
    "FeederType",
    "TapeWidth",
    "FeedPitch",
    "QTY",
];

pub const C_COL_MODULE: &str = "ModuleNumber";
pub const C_COL_SIDE: &str = "SideNo";
pub const C_COL_LOCATION: &str = "Location";
pub const C_COL_PART_NUMBER: &str = "PartNumber";
pub const C_COL_PART_COMMENT: &str = "PartComment";
pub const C_COL_PACKAGE: &str = "PackageName";
pub const C_COL_SHAPE: &str = "PartShapeName";
pub const C_COL_FEEDER_TYPE: &str = "FeederType";
pub const C_COL_TAPE_WIDTH: &str = "TapeWidth";
pub const C_COL_FEED_PITCH: &str = "FeedPitch";
pub const C_COL_QTY: &str = "QTY";

/// Separator used in root folder names (`Job;Revision;Side`).
pub const C_JOB_FOLDER_SEPARATOR: char = ';';
