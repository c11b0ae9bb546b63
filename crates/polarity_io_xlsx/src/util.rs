//! Stateless helper utilities used by the layout planner and writer.

use chrono::NaiveDateTime;
use polarity_feeder::SpecJobMetadata;

use crate::conf::{
    C_HEADER_DATE_FORMAT, C_OUTPUT_FILE_PREFIX, C_OUTPUT_TIMESTAMP_FORMAT,
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::spec::{
    SpecHeaderFooterText, SpecReportLayoutOptions, SpecWriterCapabilities, XlsxReportError,
};

////////////////////////////////////////////////////////////////////////////////
// #region RowClassification

/// Passive (resistor/capacitor) shape-name convention.
///
/// The upper-cased name is split on its first `_`; the remainder must be
/// non-empty, must not start with `CON`, and must start with `C` or `R`.
pub fn is_passive_shape(shape_name: &str) -> bool {
    let c_shape = shape_name.trim().to_uppercase();
    let Some((_, c_remainder)) = c_shape.split_once('_') else {
        return false;
    };
    if c_remainder.is_empty() || c_remainder.starts_with("CON") {
        return false;
    }
    matches!(c_remainder.chars().next(), Some('C' | 'R'))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ImageGeometry

/// Row height for a row receiving an image: never below the image minimum.
pub fn calculate_image_row_height(
    height_row_current_pt: Option<f64>,
    options: &SpecReportLayoutOptions,
) -> f64 {
    let n_height_pt = height_row_current_pt.unwrap_or(options.height_row_default_pt);
    n_height_pt.max(options.height_row_image_min_pt)
}

/// Pixel offsets `(x, y)` that center an image inside its cell.
///
/// Each axis is `max(0, (cell_px - image_px) / 2)`, truncated to whole pixels.
pub fn calculate_image_offsets(
    width_col_units: f64,
    height_row_pt: f64,
    width_image_px: f64,
    height_image_px: f64,
    options: &SpecReportLayoutOptions,
) -> (u32, u32) {
    let n_width_cell_px = width_col_units * options.px_per_width_unit;
    let n_height_cell_px = height_row_pt * options.px_per_point;
    (
        calculate_centered_offset(n_width_cell_px, width_image_px),
        calculate_centered_offset(n_height_cell_px, height_image_px),
    )
}

fn calculate_centered_offset(size_cell_px: f64, size_image_px: f64) -> u32 {
    let n_offset = ((size_cell_px - size_image_px) / 2.0).max(0.0);
    if n_offset.is_finite() {
        n_offset.trunc() as u32
    } else {
        0
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PageText

/// Escape user text for header/footer sections (`&` is a control code).
pub fn escape_header_text(text: &str) -> String {
    text.replace('&', "&&")
}

/// Running page header: job/side/revision, print date, page counter.
pub fn derive_page_header(
    job: &SpecJobMetadata,
    dt_now: NaiveDateTime,
    options: &SpecReportLayoutOptions,
) -> SpecHeaderFooterText {
    let c_left = format!(
        "JOB: {}  Side: {}  Rev: {}",
        job.job_name, job.side, job.revision
    );
    SpecHeaderFooterText {
        left: escape_header_text(c_left.trim()),
        center: dt_now.format(C_HEADER_DATE_FORMAT).to_string(),
        right: options.header_right.clone(),
    }
}

/// Running page footer with the fixed notices.
pub fn derive_page_footer(options: &SpecReportLayoutOptions) -> SpecHeaderFooterText {
    SpecHeaderFooterText {
        left: escape_header_text(&options.footer_left),
        center: String::new(),
        right: escape_header_text(&options.footer_right),
    }
}

/// `polarity_report_<YYYYMMDD_HHMMSS>.xlsx`.
pub fn derive_default_output_file_name(dt_now: NaiveDateTime) -> String {
    format!(
        "{C_OUTPUT_FILE_PREFIX}{}.xlsx",
        dt_now.format(C_OUTPUT_TIMESTAMP_FORMAT)
    )
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Validation

/// Fail fast when the backend lacks what the report needs.
pub fn validate_capabilities(
    capabilities: &SpecWriterCapabilities,
    n_rows_with_image: usize,
) -> Result<(), XlsxReportError> {
    if !capabilities.if_workbook {
        return Err(XlsxReportError::MissingDependency);
    }
    if n_rows_with_image > 0 && !capabilities.if_images {
        return Err(XlsxReportError::MissingImageSupport(n_rows_with_image));
    }
    Ok(())
}

/// Check that the table fits below `row_idx_data_start` on one worksheet.
pub fn validate_layout_size(
    n_rows_data: usize,
    row_idx_data_start: usize,
) -> Result<(), XlsxReportError> {
    let n_rows_data_max = N_NROWS_EXCEL_MAX.saturating_sub(row_idx_data_start);
    if n_rows_data > n_rows_data_max {
        return Err(XlsxReportError::Layout(format!(
            "Too many rows for one worksheet: {n_rows_data} (limit {n_rows_data_max})."
        )));
    }
    Ok(())
}

/// Check that the static tables agree with each other.
pub fn validate_layout_options(options: &SpecReportLayoutOptions) -> Result<(), XlsxReportError> {
    let n_cols = options.columns_table.len();
    if n_cols == 0 {
        return Err(XlsxReportError::Layout(
            "Layout needs at least one table column.".to_string(),
        ));
    }
    if options.widths_col.len() != n_cols {
        return Err(XlsxReportError::Layout(format!(
            "Column widths ({}) do not match table columns ({n_cols}).",
            options.widths_col.len()
        )));
    }
    if options.col_idx_image >= n_cols {
        return Err(XlsxReportError::Layout(format!(
            "Image column {} is outside the table.",
            options.col_idx_image
        )));
    }
    if let Some(n_idx) = options.cols_idx_passive.iter().find(|n_idx| **n_idx >= n_cols) {
        return Err(XlsxReportError::Layout(format!(
            "Passive highlight column {n_idx} is outside the table."
        )));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt_fixed() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .and_then(|d| d.and_hms_opt(9, 5, 2))
            .expect("valid datetime")
    }

    #[test]
    fn test_is_passive_shape() {
        assert!(is_passive_shape("RC_R0402"));
        assert!(is_passive_shape("cap_c0603"));
        assert!(is_passive_shape("X_R_Y"));
        assert!(!is_passive_shape("SOIC_CON8"));
        assert!(!is_passive_shape("ABC"));
        assert!(!is_passive_shape("RC_"));
        assert!(!is_passive_shape("IC_SOIC8"));
        assert!(!is_passive_shape(""));
    }

    #[test]
    fn test_calculate_image_row_height() {
        let options = SpecReportLayoutOptions::default();
        assert_eq!(calculate_image_row_height(None, &options), 70.0);
        assert_eq!(calculate_image_row_height(Some(40.0), &options), 70.0);
        assert_eq!(calculate_image_row_height(Some(90.0), &options), 90.0);
    }

    #[test]
    fn test_calculate_image_offsets_centers_and_clamps() {
        let options = SpecReportLayoutOptions::default();
        // 22 units -> 154 px wide, 70 pt -> 93.33 px tall.
        assert_eq!(
            calculate_image_offsets(22.0, 70.0, 100.0, 50.0, &options),
            (27, 21)
        );
        assert_eq!(
            calculate_image_offsets(22.0, 70.0, 400.0, 300.0, &options),
            (0, 0)
        );
        assert_eq!(
            calculate_image_offsets(22.0, 70.0, 1.0, 1.0, &options),
            (76, 46)
        );
    }

    #[test]
    fn test_derive_page_header_escapes_and_trims() {
        let options = SpecReportLayoutOptions::default();
        let job = SpecJobMetadata {
            job_name: "A&B".to_string(),
            revision: "R1".to_string(),
            side: "TOP".to_string(),
            line_name: String::new(),
        };
        let header = derive_page_header(&job, dt_fixed(), &options);
        assert_eq!(header.left, "JOB: A&&B  Side: TOP  Rev: R1");
        assert_eq!(header.center, "07/03/2024");
        assert_eq!(header.right, "&P de &N");

        let header = derive_page_header(&SpecJobMetadata::default(), dt_fixed(), &options);
        assert_eq!(header.left, "JOB:   Side:   Rev:");
    }

    #[test]
    fn test_derive_page_footer() {
        let footer = derive_page_footer(&SpecReportLayoutOptions::default());
        assert!(footer.left.starts_with("Format: 06-ME30-ME-ALLPLANT-00599-A\n"));
        assert!(footer.center.is_empty());
        assert_eq!(footer.right, "Reference Document: 06-ME30-ME-ALLPLANT-03634");
    }

    #[test]
    fn test_derive_default_output_file_name() {
        assert_eq!(
            derive_default_output_file_name(dt_fixed()),
            "polarity_report_20240307_090502.xlsx"
        );
    }

    #[test]
    fn test_sanitize_sheet_name() {
        assert_eq!(sanitize_sheet_name("a/b:c", "_"), "a_b_c");
        assert_eq!(sanitize_sheet_name("  ", "_"), "Sheet");
        assert_eq!(sanitize_sheet_name(&"x".repeat(40), "_").len(), 31);
    }

    #[test]
    fn test_validate_capabilities() {
        let caps_full = SpecWriterCapabilities {
            if_workbook: true,
            if_images: true,
            if_header_first_page: false,
        };
        assert!(validate_capabilities(&caps_full, 3).is_ok());

        let caps_no_images = SpecWriterCapabilities {
            if_images: false,
            ..caps_full
        };
        assert!(validate_capabilities(&caps_no_images, 0).is_ok());
        assert!(matches!(
            validate_capabilities(&caps_no_images, 2),
            Err(XlsxReportError::MissingImageSupport(2))
        ));

        let caps_none = SpecWriterCapabilities {
            if_workbook: false,
            ..caps_full
        };
        assert!(matches!(
            validate_capabilities(&caps_none, 0),
            Err(XlsxReportError::MissingDependency)
        ));
    }

    #[test]
    fn test_validate_layout_size() {
        assert!(validate_layout_size(10, 10).is_ok());
        assert!(validate_layout_size(N_NROWS_EXCEL_MAX - 10, 10).is_ok());
        assert!(validate_layout_size(N_NROWS_EXCEL_MAX - 9, 10).is_err());
    }

    #[test]
    fn test_validate_layout_options() {
        let mut options = SpecReportLayoutOptions::default();
        assert!(validate_layout_options(&options).is_ok());
        options.widths_col.pop();
        assert!(validate_layout_options(&options).is_err());

        let mut options = SpecReportLayoutOptions::default();
        options.cols_idx_passive = vec![8];
        assert!(validate_layout_options(&options).is_err());
    }
}
