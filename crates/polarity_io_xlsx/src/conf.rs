//! XLSX constants and default preset factories.

use std::collections::BTreeMap;

use crate::spec::SpecCellFormat;

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Worksheet name.
pub const C_SHEET_NAME: &str = "PolarityCheck";
/// Text of the merged title cell.
pub const C_TITLE: &str = "Polarity Check";
/// Table column titles, left to right.
pub const TUP_TABLE_COLUMNS: [&str; 8] = [
    "Modulo",
    "Slot",
    "Part Number",
    "Package",
    "Program's Polarities",
    "Package's polarities",
    "Name of shape",
    "Coments or presentations changes",
];
/// Column widths A..H in Excel character units.
pub const TUP_COLUMN_WIDTHS: [f64; 8] = [12.0, 12.0, 18.0, 16.0, 22.0, 22.0, 18.0, 35.0];
/// Metadata form labels, top to bottom.
pub const TUP_METADATA_LABELS: [&str; 6] = [
    "Model",
    "Line",
    "Revision",
    "Machine Programmer",
    "Quality",
    "Fecha",
];
/// Zero-based column that receives the reference image.
pub const N_IDX_COL_IMAGE: usize = 4;
/// Zero-based columns highlighted for passive parts (shape, comment).
pub const TUP_IDX_COLS_PASSIVE: [usize; 2] = [6, 7];

/// Zero-based title row.
pub const N_IDX_ROW_TITLE: usize = 0;
/// Zero-based first metadata row (row 3).
pub const N_IDX_ROW_METADATA_START: usize = 2;
/// Title row height in points.
pub const N_HEIGHT_ROW_TITLE_PT: f64 = 25.0;
/// Height assumed for rows without an explicit height, in points.
pub const N_HEIGHT_ROW_DEFAULT_PT: f64 = 20.0;
/// Minimum height of a row carrying an image, in points.
pub const N_HEIGHT_ROW_IMAGE_MIN_PT: f64 = 70.0;
/// Pixels per column-width unit.
pub const N_PX_PER_WIDTH_UNIT: f64 = 7.0;
/// Pixels per point of row height.
pub const N_PX_PER_POINT: f64 = 4.0 / 3.0;
/// Screen DPI at which an image is drawn one pixel per pixel.
pub const N_DPI_NATIVE: f64 = 96.0;

/// Fill for passive-part cells.
pub const C_COLOR_PASSIVE_FILL: &str = "#FFF2CC";
/// Right header section: page X of Y.
pub const C_HEADER_PAGE_OF: &str = "&P de &N";
/// Left footer section.
pub const C_FOOTER_LEFT: &str = "Format: 06-ME30-ME-ALLPLANT-00599-A\nAll rights reserved \u{2013} Confidential document and property of Jabil";
/// Right footer section.
pub const C_FOOTER_RIGHT: &str = "Reference Document: 06-ME30-ME-ALLPLANT-03634";
/// Date format of the centre header section.
pub const C_HEADER_DATE_FORMAT: &str = "%d/%m/%Y";
/// Default output file name prefix.
pub const C_OUTPUT_FILE_PREFIX: &str = "polarity_report_";
/// Timestamp format used in default output file names.
pub const C_OUTPUT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Canonical format preset keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnumFmtKey {
    /// Merged report title.
    Title,
    /// Metadata form label (column A).
    Label,
    /// Metadata form value (columns B..H).
    Value,
    /// Table header cell.
    Header,
    /// Table body cell.
    Body,
    /// Table body cell of a passive part, highlighted.
    BodyPassive,
}

/// Build default named format presets used by [`crate::writer::XlsxWriter`].
pub fn derive_default_xlsx_formats() -> BTreeMap<EnumFmtKey, SpecCellFormat> {
    let cfg_bordered_fmt_spec = SpecCellFormat {
        border: Some(1),
        valign: Some("vcenter".to_string()),
        ..Default::default()
    };
    let cfg_table_fmt_spec = cfg_bordered_fmt_spec.with_(SpecCellFormat {
        align: Some("center".to_string()),
        text_wrap: Some(true),
        ..Default::default()
    });

    let mut dict_fmt = BTreeMap::new();
    dict_fmt.insert(
        EnumFmtKey::Title,
        SpecCellFormat {
            bold: Some(true),
            font_size: Some(16),
            align: Some("center".to_string()),
            valign: Some("vcenter".to_string()),
            ..Default::default()
        },
    );
    dict_fmt.insert(
        EnumFmtKey::Label,
        cfg_bordered_fmt_spec.with_(SpecCellFormat {
            bold: Some(true),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::Value,
        cfg_bordered_fmt_spec.with_(SpecCellFormat {
            align: Some("left".to_string()),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::Header,
        cfg_table_fmt_spec.with_(SpecCellFormat {
            bold: Some(true),
            ..Default::default()
        }),
    );
    dict_fmt.insert(EnumFmtKey::Body, cfg_table_fmt_spec.clone());
    dict_fmt.insert(
        EnumFmtKey::BodyPassive,
        cfg_table_fmt_spec.with_(SpecCellFormat {
            bg_color: Some(C_COLOR_PASSIVE_FILL.to_string()),
            ..Default::default()
        }),
    );

    dict_fmt
}
