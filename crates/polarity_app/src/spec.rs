//! Run options, run result and the caller-facing error.

use std::path::PathBuf;

use polarity_feeder::FeederError;
use polarity_io_csv::SpecFeederReadOptions;
use polarity_io_fs::FolderError;
use polarity_io_xlsx::{SpecReportLayoutOptions, SpecWriterCapabilities, XlsxReportError};
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Knobs for [`crate::pipeline::run_with_options`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecRunOptions {
    /// Output workbook; `None` writes a timestamped file into the root folder.
    pub path_file_out: Option<PathBuf>,
    /// Feeder export reading options.
    pub read_options: SpecFeederReadOptions,
    /// Static report tables.
    pub layout_options: SpecReportLayoutOptions,
    /// Writer backend features.
    pub capabilities: SpecWriterCapabilities,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Result

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecProcessResult {
    /// Written workbook.
    pub output_path: PathBuf,
    /// Table rows written.
    pub rows_written: usize,
    /// Files found in the images folder, matched or not.
    pub images_found: usize,
    /// Images embedded into the report.
    pub images_embedded: usize,
    /// Non-fatal writer warnings.
    pub warnings: Vec<String>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Reportable failure of a run; `Display` is the user-facing message.
#[derive(Debug, Error)]
pub enum PolarityAppError {
    #[error(transparent)]
    Folder(#[from] FolderError),
    #[error(transparent)]
    Feeder(#[from] FeederError),
    #[error(transparent)]
    Report(#[from] XlsxReportError),
    /// Anything not classified above.
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
