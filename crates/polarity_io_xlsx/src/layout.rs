//! Pure report layout planning.
//!
//! [`plan_report_layout`] turns report rows into a [`SpecReportLayout`]
//! without touching a workbook, so the whole sheet geometry can be asserted
//! on directly.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use log::debug;
use polarity_feeder::{SpecJobMetadata, SpecReportRow};

use crate::conf::{EnumFmtKey, N_IDX_ROW_METADATA_START, N_IDX_ROW_TITLE};
use crate::spec::{
    ImageLookup, SpecImageAsset, SpecImagePlacement, SpecLayoutCell, SpecPageSetup,
    SpecPrintArea, SpecReportLayout, SpecReportLayoutOptions, SpecSheetHorizontalMerge,
    SpecWriterCapabilities, XlsxReportError,
};
use crate::util::{
    calculate_image_offsets, calculate_image_row_height, derive_page_footer, derive_page_header,
    is_passive_shape, sanitize_sheet_name, validate_capabilities, validate_layout_options,
    validate_layout_size,
};

/// Plan the complete polarity-check worksheet.
///
/// Images are looked up first so the capability check can fail before any
/// geometry is computed.
pub fn plan_report_layout<L>(
    rows: &[SpecReportRow],
    job: &SpecJobMetadata,
    image_lookup: &L,
    options: &SpecReportLayoutOptions,
    capabilities: &SpecWriterCapabilities,
    dt_now: NaiveDateTime,
) -> Result<SpecReportLayout, XlsxReportError>
where
    L: ImageLookup + ?Sized,
{
    validate_layout_options(options)?;

    let mut l_assets: Vec<Option<SpecImageAsset>> = Vec::with_capacity(rows.len());
    for row in rows {
        let c_part_number = row.part_number.trim();
        if c_part_number.is_empty() {
            l_assets.push(None);
            continue;
        }
        l_assets.push(image_lookup.find_image(c_part_number)?);
    }
    let n_rows_with_image = l_assets.iter().filter(|asset| asset.is_some()).count();
    validate_capabilities(capabilities, n_rows_with_image)?;

    let n_col_last = options.columns_table.len() - 1;
    let n_row_header = N_IDX_ROW_METADATA_START + options.labels_metadata.len() + 1;
    let n_row_data_start = n_row_header + 1;
    validate_layout_size(rows.len(), n_row_data_start)?;

    let mut layout = SpecReportLayout {
        sheet_name: sanitize_sheet_name(&options.sheet_name, "_"),
        cells: Vec::new(),
        merges: Vec::new(),
        widths_col: options.widths_col.clone(),
        heights_row: BTreeMap::new(),
        images: Vec::new(),
        page_setup: SpecPageSetup {
            print_area: SpecPrintArea {
                row_first: 0,
                col_first: 0,
                row_last: n_row_header + rows.len(),
                col_last: n_col_last,
            },
            fit_width_pages: 1,
            fit_height_pages: 0,
            if_portrait: true,
            row_idx_repeat: n_row_header,
            if_header_first_page_blank: true,
            header: derive_page_header(job, dt_now, options),
            footer: derive_page_footer(options),
        },
        row_idx_header: n_row_header,
        n_rows_data: rows.len(),
    };

    plan_title(&mut layout, options, n_col_last);
    plan_metadata_block(&mut layout, job, options, n_col_last);
    plan_table(&mut layout, rows, options, n_row_header);
    plan_images(&mut layout, l_assets, options, n_row_data_start);

    debug!(
        "Planned layout: {} data rows, {} images, print area rows 0..={}",
        layout.n_rows_data,
        layout.images.len(),
        layout.page_setup.print_area.row_last
    );
    Ok(layout)
}

fn plan_title(layout: &mut SpecReportLayout, options: &SpecReportLayoutOptions, n_col_last: usize) {
    layout.merges.push(SpecSheetHorizontalMerge {
        row_idx_start: N_IDX_ROW_TITLE,
        col_idx_start: 0,
        col_idx_end: n_col_last,
        text: options.title.clone(),
        fmt_key: EnumFmtKey::Title,
    });
    layout
        .heights_row
        .insert(N_IDX_ROW_TITLE, options.height_row_title_pt);
}

/// Label in column A, value merged over the remaining columns.
///
/// Only Model, Line and Revision are filled; the rest stay blank for manual
/// entry.
fn plan_metadata_block(
    layout: &mut SpecReportLayout,
    job: &SpecJobMetadata,
    options: &SpecReportLayoutOptions,
    n_col_last: usize,
) {
    let l_values = [
        job.job_name.as_str(),
        job.line_display(),
        job.revision.as_str(),
    ];

    for (n_offset, c_label) in options.labels_metadata.iter().enumerate() {
        let n_row = N_IDX_ROW_METADATA_START + n_offset;
        layout.cells.push(SpecLayoutCell {
            row_idx: n_row,
            col_idx: 0,
            text: c_label.clone(),
            fmt_key: EnumFmtKey::Label,
        });
        let c_value = l_values.get(n_offset).copied().unwrap_or("");
        if n_col_last == 0 {
            continue;
        }
        layout.merges.push(SpecSheetHorizontalMerge {
            row_idx_start: n_row,
            col_idx_start: 1,
            col_idx_end: n_col_last,
            text: c_value.to_string(),
            fmt_key: EnumFmtKey::Value,
        });
    }
}

fn plan_table(
    layout: &mut SpecReportLayout,
    rows: &[SpecReportRow],
    options: &SpecReportLayoutOptions,
    n_row_header: usize,
) {
    for (n_col, c_title) in options.columns_table.iter().enumerate() {
        layout.cells.push(SpecLayoutCell {
            row_idx: n_row_header,
            col_idx: n_col,
            text: c_title.clone(),
            fmt_key: EnumFmtKey::Header,
        });
    }

    for (n_offset, row) in rows.iter().enumerate() {
        let n_row = n_row_header + 1 + n_offset;
        let if_passive = is_passive_shape(&row.shape_name);
        for (n_col, c_text) in row
            .to_cells()
            .iter()
            .take(options.columns_table.len())
            .enumerate()
        {
            let fmt_key = if if_passive && options.cols_idx_passive.contains(&n_col) {
                EnumFmtKey::BodyPassive
            } else {
                EnumFmtKey::Body
            };
            layout.cells.push(SpecLayoutCell {
                row_idx: n_row,
                col_idx: n_col,
                text: c_text.to_string(),
                fmt_key,
            });
        }
    }
}

fn plan_images(
    layout: &mut SpecReportLayout,
    l_assets: Vec<Option<SpecImageAsset>>,
    options: &SpecReportLayoutOptions,
    n_row_data_start: usize,
) {
    let n_col = options.col_idx_image;
    let n_width_col = options.widths_col[n_col];

    for (n_offset, asset) in l_assets.into_iter().enumerate() {
        let Some(asset) = asset else {
            continue;
        };
        let n_row = n_row_data_start + n_offset;
        let n_height_row = calculate_image_row_height(layout.heights_row.get(&n_row).copied(), options);
        layout.heights_row.insert(n_row, n_height_row);

        let (x_offset_px, y_offset_px) = calculate_image_offsets(
            n_width_col,
            n_height_row,
            asset.width_px,
            asset.height_px,
            options,
        );
        layout.images.push(SpecImagePlacement {
            row_idx: n_row,
            col_idx: n_col,
            path_file: asset.path_file,
            x_offset_px,
            y_offset_px,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    struct MapLookup(BTreeMap<String, (f64, f64)>);

    impl ImageLookup for MapLookup {
        fn find_image(
            &self,
            part_number: &str,
        ) -> Result<Option<SpecImageAsset>, XlsxReportError> {
            Ok(self.0.get(part_number).map(|(w, h)| SpecImageAsset {
                path_file: PathBuf::from(format!("{part_number}.png")),
                width_px: *w,
                height_px: *h,
            }))
        }
    }

    struct FailingLookup;

    impl ImageLookup for FailingLookup {
        fn find_image(&self, part_number: &str) -> Result<Option<SpecImageAsset>, XlsxReportError> {
            Err(XlsxReportError::ImageLoad {
                path: PathBuf::from(part_number),
                message: "broken".to_string(),
            })
        }
    }

    fn dt_fixed() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 31)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid datetime")
    }

    fn row(part_number: &str, shape_name: &str) -> SpecReportRow {
        SpecReportRow {
            module: "1".to_string(),
            slot: "3".to_string(),
            part_number: part_number.to_string(),
            package: "0402".to_string(),
            shape_name: shape_name.to_string(),
            comment: "note".to_string(),
            ..Default::default()
        }
    }

    fn job() -> SpecJobMetadata {
        SpecJobMetadata {
            job_name: "J100".to_string(),
            revision: "B".to_string(),
            side: "TOP".to_string(),
            line_name: String::new(),
        }
    }

    fn caps(if_images: bool) -> SpecWriterCapabilities {
        SpecWriterCapabilities {
            if_workbook: true,
            if_images,
            if_header_first_page: false,
        }
    }

    fn no_images() -> MapLookup {
        MapLookup(BTreeMap::new())
    }

    #[test]
    fn test_plan_places_title_metadata_and_table() {
        let rows = vec![row("PN-1", "IC_SOIC8"), row("PN-2", "RC_R0402")];
        let layout = plan_report_layout(
            &rows,
            &job(),
            &no_images(),
            &SpecReportLayoutOptions::default(),
            &caps(true),
            dt_fixed(),
        )
        .expect("layout");

        assert_eq!(layout.sheet_name, "PolarityCheck");
        let title = &layout.merges[0];
        assert_eq!((title.row_idx_start, title.col_idx_start, title.col_idx_end), (0, 0, 7));
        assert_eq!(title.text, "Polarity Check");
        assert_eq!(layout.heights_row.get(&0), Some(&25.0));

        assert_eq!(layout.cell(2, 0).map(|c| c.text.as_str()), Some("Model"));
        assert_eq!(layout.cell(7, 0).map(|c| c.text.as_str()), Some("Fecha"));
        let l_values: Vec<&str> = layout.merges[1..].iter().map(|m| m.text.as_str()).collect();
        assert_eq!(l_values, vec!["J100", "TOP", "B", "", "", ""]);
        assert!(layout.merges[1..].iter().all(|m| m.col_idx_start == 1 && m.col_idx_end == 7));

        assert_eq!(layout.row_idx_header, 9);
        assert_eq!(layout.row_idx_data_start(), 10);
        assert_eq!(layout.cell(8, 0), None);
        assert_eq!(layout.cell(9, 0).map(|c| c.text.as_str()), Some("Modulo"));
        assert_eq!(layout.cell(9, 0).map(|c| c.fmt_key), Some(EnumFmtKey::Header));
        assert_eq!(layout.cell(10, 2).map(|c| c.text.as_str()), Some("PN-1"));
        assert_eq!(layout.cell(11, 2).map(|c| c.text.as_str()), Some("PN-2"));
        assert_eq!(layout.cell(12, 0), None);
        assert_eq!(layout.n_rows_data, 2);
    }

    #[test]
    fn test_plan_highlights_passive_rows_on_shape_and_comment() {
        let rows = vec![row("PN-1", "IC_SOIC8"), row("PN-2", "RC_R0402")];
        let layout = plan_report_layout(
            &rows,
            &job(),
            &no_images(),
            &SpecReportLayoutOptions::default(),
            &caps(true),
            dt_fixed(),
        )
        .expect("layout");

        for n_col in 0..8 {
            assert_eq!(layout.cell(10, n_col).map(|c| c.fmt_key), Some(EnumFmtKey::Body));
        }
        for n_col in 0..6 {
            assert_eq!(layout.cell(11, n_col).map(|c| c.fmt_key), Some(EnumFmtKey::Body));
        }
        assert_eq!(layout.cell(11, 6).map(|c| c.fmt_key), Some(EnumFmtKey::BodyPassive));
        assert_eq!(layout.cell(11, 7).map(|c| c.fmt_key), Some(EnumFmtKey::BodyPassive));
    }

    #[test]
    fn test_plan_centers_images_and_raises_row_height() {
        let rows = vec![row("PN-1", ""), row("PN-2", ""), row("", "")];
        let lookup = MapLookup(BTreeMap::from([("PN-2".to_string(), (100.0, 50.0))]));
        let layout = plan_report_layout(
            &rows,
            &job(),
            &lookup,
            &SpecReportLayoutOptions::default(),
            &caps(true),
            dt_fixed(),
        )
        .expect("layout");

        assert_eq!(
            layout.images,
            vec![SpecImagePlacement {
                row_idx: 11,
                col_idx: 4,
                path_file: PathBuf::from("PN-2.png"),
                x_offset_px: 27,
                y_offset_px: 21,
            }]
        );
        assert_eq!(layout.heights_row.get(&11), Some(&70.0));
        assert_eq!(layout.heights_row.get(&10), None);
    }

    #[test]
    fn test_plan_page_setup() {
        let rows = vec![row("PN-1", ""), row("PN-2", ""), row("PN-3", "")];
        let layout = plan_report_layout(
            &rows,
            &job(),
            &no_images(),
            &SpecReportLayoutOptions::default(),
            &caps(true),
            dt_fixed(),
        )
        .expect("layout");

        let page = &layout.page_setup;
        assert_eq!(
            page.print_area,
            SpecPrintArea {
                row_first: 0,
                col_first: 0,
                row_last: 12,
                col_last: 7
            }
        );
        assert_eq!((page.fit_width_pages, page.fit_height_pages), (1, 0));
        assert!(page.if_portrait);
        assert_eq!(page.row_idx_repeat, 9);
        assert!(page.if_header_first_page_blank);
        assert_eq!(page.header.left, "JOB: J100  Side: TOP  Rev: B");
        assert_eq!(page.header.center, "31/01/2025");
        assert_eq!(page.header.right, "&P de &N");
        assert_eq!(page.footer.right, "Reference Document: 06-ME30-ME-ALLPLANT-03634");
    }

    #[test]
    fn test_plan_fails_without_image_support_only_when_needed() {
        let rows = vec![row("PN-1", "")];
        let options = SpecReportLayoutOptions::default();

        assert!(plan_report_layout(&rows, &job(), &no_images(), &options, &caps(false), dt_fixed())
            .is_ok());

        let lookup = MapLookup(BTreeMap::from([("PN-1".to_string(), (10.0, 10.0))]));
        let err = plan_report_layout(&rows, &job(), &lookup, &options, &caps(false), dt_fixed())
            .expect_err("must fail");
        assert!(matches!(err, XlsxReportError::MissingImageSupport(1)));
    }

    #[test]
    fn test_plan_propagates_lookup_errors() {
        let rows = vec![row("PN-1", "")];
        let err = plan_report_layout(
            &rows,
            &job(),
            &FailingLookup,
            &SpecReportLayoutOptions::default(),
            &caps(true),
            dt_fixed(),
        )
        .expect_err("must fail");
        assert!(matches!(err, XlsxReportError::ImageLoad { .. }));
    }

    #[test]
    fn test_plan_uses_line_name_when_present() {
        let mut job = job();
        job.line_name = "SMT-4".to_string();
        let layout = plan_report_layout(
            &[row("PN-1", "")],
            &job,
            &no_images(),
            &SpecReportLayoutOptions::default(),
            &caps(true),
            dt_fixed(),
        )
        .expect("layout");
        assert_eq!(layout.merges[2].text, "SMT-4");
    }

    #[test]
    fn test_plan_is_deterministic_for_fixed_time() {
        let rows = vec![
            row("PN-1", "IC_SOIC8"),
            row("PN-2", "RC_R0402"),
            row("PN-3", "CAP_0603"),
        ];
        let lookup = MapLookup(BTreeMap::from([
            ("PN-1".to_string(), (120.0, 90.0)),
            ("PN-3".to_string(), (40.0, 200.0)),
        ]));
        let plan = || {
            plan_report_layout(
                &rows,
                &job(),
                &lookup,
                &SpecReportLayoutOptions::default(),
                &caps(true),
                dt_fixed(),
            )
            .expect("layout")
        };

        let first = plan();
        let second = plan();
        assert_eq!(first, second);
        assert_eq!(first.images.len(), 2);
        assert_eq!(first.page_setup.header, second.page_setup.header);
    }
}
