//! `polarity_io_xlsx`:
//! polarity-check report layout and XLSX rendering.
//!
//! Modules:
//! - `conf`   : constants and default presets
//! - `spec`   : layout models, options and errors
//! - `util`   : pure helper functions
//! - `layout` : pure report layout planner
//! - `writer` : `rust_xlsxwriter` rendering kernel
pub mod conf;
pub mod layout;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    EnumFmtKey, N_LEN_EXCEL_SHEET_NAME_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
    derive_default_xlsx_formats,
};
pub use layout::plan_report_layout;
pub use spec::{
    ImageLookup, SpecCellFormat, SpecHeaderFooterText, SpecImageAsset, SpecImagePlacement,
    SpecLayoutCell, SpecPageSetup, SpecPrintArea, SpecReportLayout, SpecReportLayoutOptions,
    SpecSheetHorizontalMerge, SpecWriterCapabilities, SpecXlsxReport, XlsxReportError,
};
pub use util::{
    derive_default_output_file_name, escape_header_text, is_passive_shape, sanitize_sheet_name,
};
pub use writer::{XlsxWriter, read_image_asset};
