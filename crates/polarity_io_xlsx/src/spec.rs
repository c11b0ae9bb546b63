//! Shared XLSX specification models.

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::conf::{
    C_FOOTER_LEFT, C_FOOTER_RIGHT, C_HEADER_PAGE_OF, C_SHEET_NAME, C_TITLE, EnumFmtKey,
    N_HEIGHT_ROW_DEFAULT_PT, N_HEIGHT_ROW_IMAGE_MIN_PT, N_HEIGHT_ROW_TITLE_PT, N_IDX_COL_IMAGE,
    N_PX_PER_POINT, N_PX_PER_WIDTH_UNIT, TUP_COLUMN_WIDTHS, TUP_IDX_COLS_PASSIVE,
    TUP_METADATA_LABELS, TUP_TABLE_COLUMNS,
};

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Text wrap.
    pub text_wrap: Option<bool>,

    /// Background fill color.
    pub bg_color: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            text_wrap: other.text_wrap.or(self.text_wrap),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region LayoutOptions

/// Static tables driving the report layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecReportLayoutOptions {
    /// Worksheet name before sanitizing.
    pub sheet_name: String,
    /// Merged title text.
    pub title: String,
    /// Metadata form labels, one row each.
    pub labels_metadata: Vec<String>,
    /// Table column titles.
    pub columns_table: Vec<String>,
    /// Column widths in Excel character units, one per table column.
    pub widths_col: Vec<f64>,
    /// Column receiving the reference image.
    pub col_idx_image: usize,
    /// Columns filled for passive parts.
    pub cols_idx_passive: Vec<usize>,
    /// Title row height in points.
    pub height_row_title_pt: f64,
    /// Height assumed for rows without an explicit one, in points.
    pub height_row_default_pt: f64,
    /// Minimum height of image rows, in points.
    pub height_row_image_min_pt: f64,
    /// Pixels per column-width unit.
    pub px_per_width_unit: f64,
    /// Pixels per point of row height.
    pub px_per_point: f64,
    /// Right header section.
    pub header_right: String,
    /// Left footer section.
    pub footer_left: String,
    /// Right footer section.
    pub footer_right: String,
}

impl Default for SpecReportLayoutOptions {
    fn default() -> Self {
        Self {
            sheet_name: C_SHEET_NAME.to_string(),
            title: C_TITLE.to_string(),
            labels_metadata: TUP_METADATA_LABELS.iter().map(|v| v.to_string()).collect(),
            columns_table: TUP_TABLE_COLUMNS.iter().map(|v| v.to_string()).collect(),
            widths_col: TUP_COLUMN_WIDTHS.to_vec(),
            col_idx_image: N_IDX_COL_IMAGE,
            cols_idx_passive: TUP_IDX_COLS_PASSIVE.to_vec(),
            height_row_title_pt: N_HEIGHT_ROW_TITLE_PT,
            height_row_default_pt: N_HEIGHT_ROW_DEFAULT_PT,
            height_row_image_min_pt: N_HEIGHT_ROW_IMAGE_MIN_PT,
            px_per_width_unit: N_PX_PER_WIDTH_UNIT,
            px_per_point: N_PX_PER_POINT,
            header_right: C_HEADER_PAGE_OF.to_string(),
            footer_left: C_FOOTER_LEFT.to_string(),
            footer_right: C_FOOTER_RIGHT.to_string(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Capabilities

/// Writer backend features, checked once before layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecWriterCapabilities {
    /// Workbook output is available.
    pub if_workbook: bool,
    /// Images can be embedded.
    pub if_images: bool,
    /// The first page can carry a different (blank) running header.
    pub if_header_first_page: bool,
}

impl Default for SpecWriterCapabilities {
    fn default() -> Self {
        Self {
            if_workbook: true,
            if_images: cfg!(feature = "images"),
            if_header_first_page: true,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Images

/// Image file with its pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecImageAsset {
    /// Image file path.
    pub path_file: PathBuf,
    /// Width in pixels.
    pub width_px: f64,
    /// Height in pixels.
    pub height_px: f64,
}

/// Resolves part numbers to reference images.
pub trait ImageLookup {
    /// Image for `part_number`, or `None` when the images folder has none.
    fn find_image(&self, part_number: &str) -> Result<Option<SpecImageAsset>, XlsxReportError>;
}

/// Image anchored inside one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecImagePlacement {
    /// Anchor row (zero-based).
    pub row_idx: usize,
    /// Anchor column (zero-based).
    pub col_idx: usize,
    /// Image file path.
    pub path_file: PathBuf,
    /// Horizontal offset from the cell's left edge, in pixels.
    pub x_offset_px: u32,
    /// Vertical offset from the cell's top edge, in pixels.
    pub y_offset_px: u32,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region LayoutDocument

/// One written cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecLayoutCell {
    /// Row index (zero-based).
    pub row_idx: usize,
    /// Column index (zero-based).
    pub col_idx: usize,
    /// Text; empty text is written as a formatted blank.
    pub text: String,
    /// Format preset.
    pub fmt_key: EnumFmtKey,
}

/// Horizontal merge plan item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetHorizontalMerge {
    /// Row index where merge is applied.
    pub row_idx_start: usize,
    /// Start column index (inclusive).
    pub col_idx_start: usize,
    /// End column index (inclusive).
    pub col_idx_end: usize,
    /// Merge display text.
    pub text: String,
    /// Format preset applied to every merged cell.
    pub fmt_key: EnumFmtKey,
}

/// Left/centre/right sections of a running header or footer.
///
/// Sections hold Excel header codes; user text must already be escaped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecHeaderFooterText {
    /// Left section.
    pub left: String,
    /// Centre section.
    pub center: String,
    /// Right section.
    pub right: String,
}

impl SpecHeaderFooterText {
    /// Excel header/footer string (`&L...&C...&R...`); empty sections are omitted.
    pub fn to_excel_code(&self) -> String {
        let mut c_code = String::new();
        for (c_tag, c_text) in [("&L", &self.left), ("&C", &self.center), ("&R", &self.right)] {
            if !c_text.is_empty() {
                c_code.push_str(c_tag);
                c_code.push_str(c_text);
            }
        }
        c_code
    }
}

/// Inclusive print range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecPrintArea {
    /// First row (zero-based).
    pub row_first: usize,
    /// First column (zero-based).
    pub col_first: usize,
    /// Last row (zero-based).
    pub row_last: usize,
    /// Last column (zero-based).
    pub col_last: usize,
}

/// Page and print configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecPageSetup {
    /// Printed range.
    pub print_area: SpecPrintArea,
    /// Pages wide when fitting.
    pub fit_width_pages: u16,
    /// Pages tall when fitting; `0` means as many as needed.
    pub fit_height_pages: u16,
    /// Portrait orientation.
    pub if_portrait: bool,
    /// Row repeated at the top of every printed page.
    pub row_idx_repeat: usize,
    /// Leave the running header off the first page.
    pub if_header_first_page_blank: bool,
    /// Running header from the second page on.
    pub header: SpecHeaderFooterText,
    /// Running footer.
    pub footer: SpecHeaderFooterText,
}

/// Complete description of the report worksheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecReportLayout {
    /// Sanitized worksheet name.
    pub sheet_name: String,
    /// Individually written cells.
    pub cells: Vec<SpecLayoutCell>,
    /// Merged ranges.
    pub merges: Vec<SpecSheetHorizontalMerge>,
    /// Column widths, index = column.
    pub widths_col: Vec<f64>,
    /// Explicit row heights in points.
    pub heights_row: BTreeMap<usize, f64>,
    /// Embedded images.
    pub images: Vec<SpecImagePlacement>,
    /// Print setup.
    pub page_setup: SpecPageSetup,
    /// Table header row (zero-based).
    pub row_idx_header: usize,
    /// Number of table body rows.
    pub n_rows_data: usize,
}

impl SpecReportLayout {
    /// Cell written at `(row_idx, col_idx)`, if any.
    pub fn cell(&self, row_idx: usize, col_idx: usize) -> Option<&SpecLayoutCell> {
        self.cells
            .iter()
            .find(|cell| cell.row_idx == row_idx && cell.col_idx == col_idx)
    }

    /// First table body row (zero-based).
    pub fn row_idx_data_start(&self) -> usize {
        self.row_idx_header + 1
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Per-write call report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Output workbook path.
    pub path_file_out: PathBuf,
    /// Table body rows written.
    pub n_rows_written: usize,
    /// Images embedded, with or without centering.
    pub n_images_embedded: usize,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Layout and workbook output failures.
#[derive(Debug, Error)]
pub enum XlsxReportError {
    /// Workbook output is not available.
    #[error("Spreadsheet output is not available in this build.")]
    MissingDependency,
    /// Rows need images but image embedding is not available.
    #[error("Image support is required to insert images into the report ({0} rows have images).")]
    MissingImageSupport(usize),
    /// An image file could not be loaded.
    #[error("The image {} could not be loaded: {message}", .path.display())]
    ImageLoad {
        /// Image file path.
        path: PathBuf,
        /// Loader error text.
        message: String,
    },
    /// Layout does not fit a worksheet.
    #[error("{0}")]
    Layout(String),
    /// Workbook could not be built or saved.
    #[error("The Excel file could not be saved: {0}")]
    Write(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overlays_right_side_values() {
        let base = SpecCellFormat {
            border: Some(1),
            align: Some("left".to_string()),
            ..Default::default()
        };
        let merged = base.with_(SpecCellFormat {
            align: Some("center".to_string()),
            bold: Some(true),
            ..Default::default()
        });
        assert_eq!(merged.border, Some(1));
        assert_eq!(merged.align.as_deref(), Some("center"));
        assert_eq!(merged.bold, Some(true));
    }

    #[test]
    fn header_footer_code_skips_empty_sections() {
        let text = SpecHeaderFooterText {
            left: "JOB: A".to_string(),
            center: String::new(),
            right: "&P de &N".to_string(),
        };
        assert_eq!(text.to_excel_code(), "&LJOB: A&R&P de &N");
        assert_eq!(SpecHeaderFooterText::default().to_excel_code(), "");
    }

    #[test]
    fn default_options_match_fixed_tables() {
        let options = SpecReportLayoutOptions::default();
        assert_eq!(options.columns_table.len(), options.widths_col.len());
        assert_eq!(options.widths_col[4], 22.0);
        assert_eq!(options.widths_col[7], 35.0);
        assert_eq!(options.labels_metadata[5], "Fecha");
        assert_eq!(options.columns_table[options.col_idx_image], "Program's Polarities");
    }
}
