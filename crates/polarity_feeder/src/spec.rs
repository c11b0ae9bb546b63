//! Feeder records, job metadata, report rows and top-level errors.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::conf::{
    C_COL_FEED_PITCH, C_COL_FEEDER_TYPE, C_COL_LOCATION, C_COL_MODULE, C_COL_PACKAGE,
    C_COL_PART_COMMENT, C_COL_PART_NUMBER, C_COL_QTY, C_COL_SHAPE, C_COL_SIDE, C_COL_TAPE_WIDTH,
};

////////////////////////////////////////////////////////////////////////////////
// #region FeederRecord

/// One data row of the feeder export, keyed by the table-header row.
///
/// Every field is present; cells missing from a short row are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecFeederRecord {
    /// Machine module identifier.
    pub module_number: String,
    /// Raw side indicator (`"0"`, `"1"` or anything else).
    pub side_no: String,
    /// Slot label; may still carry stray single quotes.
    pub location: String,
    /// Part number, also the image file stem.
    pub part_number: String,
    /// Free-text part comment.
    pub part_comment: String,
    /// Package name.
    pub package_name: String,
    /// Part shape name.
    pub part_shape_name: String,
    /// Feeder type.
    pub feeder_type: String,
    /// Tape width.
    pub tape_width: String,
    /// Feed pitch.
    pub feed_pitch: String,
    /// Quantity text as found in the export.
    pub qty_raw: String,
    /// Parsed quantity; `0` when empty or non-numeric.
    pub qty: i64,
}

impl SpecFeederRecord {
    /// Build a record from a header-name to trimmed-cell mapping.
    pub fn from_columns(dict_cells: &BTreeMap<String, String>) -> Self {
        let get = |c_name: &str| {
            dict_cells
                .get(c_name)
                .map(|val| val.trim().to_string())
                .unwrap_or_default()
        };
        let qty_raw = get(C_COL_QTY);
        Self {
            module_number: get(C_COL_MODULE),
            side_no: get(C_COL_SIDE),
            location: get(C_COL_LOCATION),
            part_number: get(C_COL_PART_NUMBER),
            part_comment: get(C_COL_PART_COMMENT),
            package_name: get(C_COL_PACKAGE),
            part_shape_name: get(C_COL_SHAPE),
            feeder_type: get(C_COL_FEEDER_TYPE),
            tape_width: get(C_COL_TAPE_WIDTH),
            feed_pitch: get(C_COL_FEED_PITCH),
            qty: parse_qty(&qty_raw),
            qty_raw,
        }
    }
}

/// Parse a quantity cell; empty or non-integer text counts as `0`.
///
/// Integers beyond the `i64` range saturate, so they stay non-zero.
pub fn parse_qty(value: &str) -> i64 {
    let c_value = value.trim();
    if let Ok(n_qty) = c_value.parse::<i64>() {
        return n_qty;
    }

    let (if_negative, c_digits) = match c_value.strip_prefix('-') {
        Some(c_rest) => (true, c_rest),
        None => (false, c_value.strip_prefix('+').unwrap_or(c_value)),
    };
    if c_digits.is_empty() || !c_digits.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    match (c_digits.bytes().any(|b| b != b'0'), if_negative) {
        (false, _) => 0,
        (true, false) => i64::MAX,
        (true, true) => i64::MIN,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region JobMetadata

/// Job information printed in the report header and metadata block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecJobMetadata {
    /// Job (model) name from the root folder name.
    pub job_name: String,
    /// Program revision from the root folder name.
    pub revision: String,
    /// Board side label from the root folder name.
    pub side: String,
    /// Line name from the export's job-info rows.
    pub line_name: String,
}

impl SpecJobMetadata {
    /// Value shown in the "Line" field: line name, else the side label.
    pub fn line_display(&self) -> &str {
        if self.line_name.is_empty() {
            &self.side
        } else {
            &self.line_name
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportRow

/// One table line of the polarity report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecReportRow {
    /// "Modulo" column: module number as exported.
    pub module: String,
    /// "Slot" column: trimmed location, quotes kept.
    pub slot: String,
    /// Combined `module[-side]-location` code.
    ///
    /// Computed with the machine-type rule but never printed; the "Slot"
    /// column shows the raw location.
    pub slot_code: String,
    /// "Part Number" column.
    pub part_number: String,
    /// "Package" column.
    pub package: String,
    /// "Program's Polarities" column text (the image goes here).
    pub program_polarity: String,
    /// "Package's polarities" column text, left for manual fill.
    pub package_polarity: String,
    /// "Name of shape" column.
    pub shape_name: String,
    /// "Coments or presentations changes" column.
    pub comment: String,
}

impl SpecReportRow {
    /// Cell texts in table-column order.
    pub fn to_cells(&self) -> [&str; 8] {
        [
            &self.module,
            &self.slot,
            &self.part_number,
            &self.package,
            &self.program_polarity,
            &self.package_polarity,
            &self.shape_name,
            &self.comment,
        ]
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Failures while reading or normalizing the feeder export.
///
/// `Display` output is the user-facing message.
#[derive(Debug, Error)]
pub enum FeederError {
    /// Export file is missing.
    #[error("Required file not found: {}", derive_file_label(.0))]
    NotFound(PathBuf),
    /// Export file exists but could not be opened or read.
    #[error("Failed to read {}: {message}", .path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
    /// None of the configured encodings decoded the file.
    #[error("FeederSetup.csv could not be read due to encoding problems ({0}).")]
    Encoding(String),
    /// Row structure does not match the export convention.
    #[error("{0}")]
    Format(String),
    /// Table-header row lacks required names.
    #[error("Required columns are missing in FeederSetup.csv: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    /// Header rows present but no data rows.
    #[error("FeederSetup.csv does not contain data.")]
    NoData,
    /// Every row was removed by the quantity filter.
    #[error("After filtering QTY=0 there are no rows left to process.")]
    EmptyDataset,
}

fn derive_file_label(path: &Path) -> String {
    path.file_name()
        .map(|val| val.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_columns_fills_missing_fields_with_empty_text() {
        let mut dict_cells = BTreeMap::new();
        dict_cells.insert("ModuleNumber".to_string(), " 3 ".to_string());
        dict_cells.insert("QTY".to_string(), "12".to_string());

        let record = SpecFeederRecord::from_columns(&dict_cells);
        assert_eq!(record.module_number, "3");
        assert_eq!(record.qty, 12);
        assert_eq!(record.qty_raw, "12");
        assert_eq!(record.part_number, "");
        assert_eq!(record.location, "");
    }

    #[test]
    fn parse_qty_defaults_to_zero() {
        assert_eq!(parse_qty(""), 0);
        assert_eq!(parse_qty("abc"), 0);
        assert_eq!(parse_qty("2.5"), 0);
        assert_eq!(parse_qty("-1"), -1);
        assert_eq!(parse_qty(" 3 "), 3);
    }

    #[test]
    fn parse_qty_saturates_out_of_range_integers() {
        assert_eq!(parse_qty("99999999999999999999"), i64::MAX);
        assert_eq!(parse_qty("+99999999999999999999"), i64::MAX);
        assert_eq!(parse_qty("-99999999999999999999"), i64::MIN);
        assert_eq!(parse_qty("000000000000000000000000"), 0);
        assert_eq!(parse_qty("-"), 0);
        assert_eq!(parse_qty("9999999999999999999x"), 0);
    }

    #[test]
    fn line_display_falls_back_to_side() {
        let job = SpecJobMetadata {
            side: "TOP".to_string(),
            ..Default::default()
        };
        assert_eq!(job.line_display(), "TOP");

        let job = SpecJobMetadata {
            side: "TOP".to_string(),
            line_name: "L07".to_string(),
            ..Default::default()
        };
        assert_eq!(job.line_display(), "L07");
    }

    #[test]
    fn missing_columns_message_names_columns() {
        let err = FeederError::MissingColumns(vec!["QTY".to_string(), "SideNo".to_string()]);
        assert_eq!(
            err.to_string(),
            "Required columns are missing in FeederSetup.csv: QTY, SideNo"
        );
    }

    #[test]
    fn not_found_message_uses_file_name() {
        let err = FeederError::NotFound(PathBuf::from("/tmp/job/DATA/FeederSetup.csv"));
        assert_eq!(err.to_string(), "Required file not found: FeederSetup.csv");
    }
}
