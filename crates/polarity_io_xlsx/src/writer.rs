//! XLSX writer kernel that renders a planned report layout into a workbook.

use std::collections::BTreeMap;
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Image, Workbook, Worksheet, XlsxError};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::conf::{EnumFmtKey, N_DPI_NATIVE};
use crate::spec::{
    SpecCellFormat, SpecImageAsset, SpecImagePlacement, SpecPageSetup, SpecReportLayout,
    SpecWriterCapabilities, SpecXlsxReport, XlsxReportError,
};

/// Stateful workbook writer.
pub struct XlsxWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    dict_fmt: BTreeMap<EnumFmtKey, Format>,
    capabilities: SpecWriterCapabilities,
    report: SpecXlsxReport,
    n_sheets: usize,
    l_idx_sheets_first_blank: Vec<usize>,
    if_closed: bool,
}

impl XlsxWriter {
    /// Create writer bound to output path and format presets.
    ///
    /// The workbook is buffered in memory until [`Self::close`] is called.
    pub fn new(
        path_file_out: PathBuf,
        dict_fmt_spec: &BTreeMap<EnumFmtKey, SpecCellFormat>,
        capabilities: SpecWriterCapabilities,
    ) -> Self {
        let dict_fmt = dict_fmt_spec
            .iter()
            .map(|(key, spec)| (*key, derive_rust_xlsx_format(spec)))
            .collect();
        let report = SpecXlsxReport {
            path_file_out: path_file_out.clone(),
            ..Default::default()
        };
        Self {
            path_file_out,
            workbook: Workbook::new(),
            dict_fmt,
            capabilities,
            report,
            n_sheets: 0,
            l_idx_sheets_first_blank: Vec::new(),
            if_closed: false,
        }
    }

    /// Return snapshot of the write report.
    pub fn report(&self) -> SpecXlsxReport {
        self.report.clone()
    }

    /// Flush workbook to disk. Idempotent.
    ///
    /// Sheets asking for a blank first-page header are patched in the
    /// serialized package before it is written.
    pub fn close(&mut self) -> Result<(), XlsxReportError> {
        if self.if_closed {
            return Ok(());
        }
        if !self.capabilities.if_workbook {
            return Err(XlsxReportError::MissingDependency);
        }
        let mut v_xlsx = self
            .workbook
            .save_to_buffer()
            .map_err(|err| XlsxReportError::Write(derive_xlsx_error_text(err)))?;
        if !self.l_idx_sheets_first_blank.is_empty() {
            v_xlsx = apply_first_page_blank_header(&v_xlsx, &self.l_idx_sheets_first_blank)
                .map_err(XlsxReportError::Write)?;
        }
        fs::write(&self.path_file_out, v_xlsx).map_err(|err| {
            XlsxReportError::Write(format!(
                "xlsx write error: {}: {err}",
                self.path_file_out.display()
            ))
        })?;
        self.if_closed = true;
        info!("Saved workbook {}", self.path_file_out.display());
        Ok(())
    }

    /// Render `layout` as a new worksheet.
    pub fn write_report(&mut self, layout: &SpecReportLayout) -> Result<(), XlsxReportError> {
        if !self.capabilities.if_workbook {
            return Err(XlsxReportError::MissingDependency);
        }
        if !layout.images.is_empty() && !self.capabilities.if_images {
            return Err(XlsxReportError::MissingImageSupport(layout.images.len()));
        }

        let n_idx_sheet = self.n_sheets;
        self.n_sheets += 1;
        let worksheet = self.workbook.add_worksheet();
        worksheet
            .set_name(&layout.sheet_name)
            .map_err(|err| XlsxReportError::Write(derive_xlsx_error_text(err)))?;

        write_cells(worksheet, layout, &self.dict_fmt).map_err(XlsxReportError::Write)?;
        write_dimensions(worksheet, layout).map_err(XlsxReportError::Write)?;
        for placement in &layout.images {
            write_image(worksheet, placement, &mut self.report)?;
        }
        write_page_setup(worksheet, &layout.page_setup).map_err(XlsxReportError::Write)?;

        if layout.page_setup.if_header_first_page_blank {
            if self.capabilities.if_header_first_page {
                self.l_idx_sheets_first_blank.push(n_idx_sheet);
            } else {
                self.report.warn(
                    "First-page header suppression is not supported; the header prints on every page.",
                );
            }
        }

        self.report.n_rows_written += layout.n_rows_data;
        debug!(
            "Rendered sheet {:?}: {} rows, {} images",
            layout.sheet_name, layout.n_rows_data, self.report.n_images_embedded
        );
        Ok(())
    }
}

/// Load an image and read its pixel size.
pub fn read_image_asset<P>(file_image: P) -> Result<SpecImageAsset, XlsxReportError>
where
    P: AsRef<Path>,
{
    let path_file = file_image.as_ref();
    let image = Image::new(path_file).map_err(|err| XlsxReportError::ImageLoad {
        path: path_file.to_path_buf(),
        message: err.to_string(),
    })?;
    Ok(SpecImageAsset {
        path_file: path_file.to_path_buf(),
        width_px: image.width(),
        height_px: image.height(),
    })
}

fn write_cells(
    worksheet: &mut Worksheet,
    layout: &SpecReportLayout,
    dict_fmt: &BTreeMap<EnumFmtKey, Format>,
) -> Result<(), String> {
    for cell in &layout.cells {
        let format = derive_format(dict_fmt, cell.fmt_key)?;
        let n_row = cast_row_num(cell.row_idx)?;
        let n_col = cast_col_num(cell.col_idx)?;
        if cell.text.is_empty() {
            worksheet
                .write_blank(n_row, n_col, format)
                .map_err(derive_xlsx_error_text)?;
        } else {
            worksheet
                .write_string_with_format(n_row, n_col, cell.text.as_str(), format)
                .map_err(derive_xlsx_error_text)?;
        }
    }

    for merge in &layout.merges {
        let format = derive_format(dict_fmt, merge.fmt_key)?;
        worksheet
            .merge_range(
                cast_row_num(merge.row_idx_start)?,
                cast_col_num(merge.col_idx_start)?,
                cast_row_num(merge.row_idx_start)?,
                cast_col_num(merge.col_idx_end)?,
                &merge.text,
                format,
            )
            .map_err(derive_xlsx_error_text)?;
    }
    Ok(())
}

fn write_dimensions(worksheet: &mut Worksheet, layout: &SpecReportLayout) -> Result<(), String> {
    for (col_idx, width) in layout.widths_col.iter().enumerate() {
        worksheet
            .set_column_width(cast_col_num(col_idx)?, *width)
            .map_err(derive_xlsx_error_text)?;
    }
    for (row_idx, height) in &layout.heights_row {
        worksheet
            .set_row_height(cast_row_num(*row_idx)?, *height)
            .map_err(derive_xlsx_error_text)?;
    }
    Ok(())
}

/// Insert one image centered in its cell; fall back to the cell corner.
///
/// The image is drawn at its native pixel size whatever DPI it declares, so
/// the planned centering offsets hold.
fn write_image(
    worksheet: &mut Worksheet,
    placement: &SpecImagePlacement,
    report: &mut SpecXlsxReport,
) -> Result<(), XlsxReportError> {
    let image = Image::new(&placement.path_file).map_err(|err| XlsxReportError::ImageLoad {
        path: placement.path_file.clone(),
        message: err.to_string(),
    })?;
    let n_scale_width = calculate_native_scale(image.width_dpi());
    let n_scale_height = calculate_native_scale(image.height_dpi());
    let image = image
        .set_scale_width(n_scale_width)
        .set_scale_height(n_scale_height);
    let n_row = cast_row_num(placement.row_idx).map_err(XlsxReportError::Write)?;
    let n_col = cast_col_num(placement.col_idx).map_err(XlsxReportError::Write)?;

    if let Err(err) = worksheet.insert_image_with_offset(
        n_row,
        n_col,
        &image,
        placement.x_offset_px,
        placement.y_offset_px,
    ) {
        warn!(
            "Centered anchor failed for {}: {err}; using cell corner",
            placement.path_file.display()
        );
        report.warn(format!(
            "Image {} anchored at the cell corner: {err}",
            placement.path_file.display()
        ));
        worksheet
            .insert_image(n_row, n_col, &image)
            .map_err(|err| XlsxReportError::Write(derive_xlsx_error_text(err)))?;
    }
    report.n_images_embedded += 1;
    Ok(())
}

/// Scale that cancels the backend's `96 / dpi` sizing.
fn calculate_native_scale(n_dpi: f64) -> f64 {
    if n_dpi > 0.0 { n_dpi / N_DPI_NATIVE } else { 1.0 }
}

fn write_page_setup(worksheet: &mut Worksheet, page_setup: &SpecPageSetup) -> Result<(), String> {
    let area = &page_setup.print_area;
    worksheet
        .set_print_area(
            cast_row_num(area.row_first)?,
            cast_col_num(area.col_first)?,
            cast_row_num(area.row_last)?,
            cast_col_num(area.col_last)?,
        )
        .map_err(derive_xlsx_error_text)?;
    worksheet.set_print_fit_to_pages(page_setup.fit_width_pages, page_setup.fit_height_pages);
    if page_setup.if_portrait {
        worksheet.set_portrait();
    } else {
        worksheet.set_landscape();
    }

    let n_row_repeat = cast_row_num(page_setup.row_idx_repeat)?;
    worksheet
        .set_repeat_rows(n_row_repeat, n_row_repeat)
        .map_err(derive_xlsx_error_text)?;

    worksheet.set_header(&page_setup.header.to_excel_code());
    worksheet.set_footer(&page_setup.footer.to_excel_code());
    Ok(())
}

fn derive_format(
    dict_fmt: &BTreeMap<EnumFmtKey, Format>,
    fmt_key: EnumFmtKey,
) -> Result<&Format, String> {
    dict_fmt
        .get(&fmt_key)
        .ok_or_else(|| format!("missing format preset: {fmt_key:?}"))
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }
    if spec.text_wrap.unwrap_or(false) {
        format = format.set_text_wrap();
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        7 => FormatBorder::Hair,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

////////////////////////////////////////////////////////////////////////////////
// #region FirstPageHeader

/// Rewrite the package so the listed sheets get a blank first-page header.
///
/// Sheet `n` (0-based) is stored as `xl/worksheets/sheet{n+1}.xml`. Every
/// other entry is copied unchanged.
fn apply_first_page_blank_header(v_xlsx: &[u8], l_idx_sheets: &[usize]) -> Result<Vec<u8>, String> {
    let l_names_sheet: Vec<String> = l_idx_sheets
        .iter()
        .map(|n_idx| format!("xl/worksheets/sheet{}.xml", n_idx + 1))
        .collect();

    let mut archive = ZipArchive::new(Cursor::new(v_xlsx)).map_err(derive_zip_error_text)?;
    let mut zip_out = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for n_idx in 0..archive.len() {
        let mut entry = archive.by_index(n_idx).map_err(derive_zip_error_text)?;
        let c_name = entry.name().to_string();
        if entry.is_dir() {
            zip_out
                .add_directory(c_name, options)
                .map_err(derive_zip_error_text)?;
            continue;
        }

        let mut v_data = Vec::new();
        entry
            .read_to_end(&mut v_data)
            .map_err(|err| format!("xlsx package read error: {err}"))?;
        if l_names_sheet.contains(&c_name) {
            let c_xml = String::from_utf8(v_data)
                .map_err(|err| format!("xlsx package read error: {c_name}: {err}"))?;
            v_data = derive_first_page_blank_header_xml(&c_xml)?.into_bytes();
            debug!("Blank first-page header set in {c_name}");
        }

        zip_out
            .start_file(c_name, options)
            .map_err(derive_zip_error_text)?;
        zip_out
            .write_all(&v_data)
            .map_err(|err| format!("xlsx package write error: {err}"))?;
    }

    let cursor = zip_out.finish().map_err(derive_zip_error_text)?;
    Ok(cursor.into_inner())
}

/// Mark `<headerFooter>` as `differentFirst` and repeat the odd footer on the
/// first page. No `<firstHeader>` is written, which leaves it blank.
fn derive_first_page_blank_header_xml(c_xml: &str) -> Result<String, String> {
    let n_idx_open = c_xml
        .find("<headerFooter")
        .ok_or_else(|| "headerFooter element not found".to_string())?;
    let n_idx_attrs = n_idx_open + "<headerFooter".len();
    let n_idx_tag_end = c_xml[n_idx_open..]
        .find('>')
        .map(|n_idx| n_idx_open + n_idx)
        .ok_or_else(|| "headerFooter element is not closed".to_string())?;

    let mut c_out = String::with_capacity(c_xml.len() + 64);
    c_out.push_str(&c_xml[..n_idx_attrs]);
    c_out.push_str(" differentFirst=\"1\"");

    // <headerFooter .../> carries no footer to repeat.
    if c_xml[..n_idx_tag_end].ends_with('/') {
        c_out.push_str(&c_xml[n_idx_attrs..]);
        return Ok(c_out);
    }

    let n_idx_close = c_xml[n_idx_tag_end..]
        .find("</headerFooter>")
        .map(|n_idx| n_idx_tag_end + n_idx)
        .ok_or_else(|| "headerFooter end tag not found".to_string())?;
    let c_inner = &c_xml[n_idx_tag_end + 1..n_idx_close];

    c_out.push_str(&c_xml[n_idx_attrs..n_idx_close]);
    if let Some(c_footer) = extract_element_text(c_inner, "oddFooter") {
        c_out.push_str("<firstFooter>");
        c_out.push_str(c_footer);
        c_out.push_str("</firstFooter>");
    }
    c_out.push_str(&c_xml[n_idx_close..]);
    Ok(c_out)
}

fn extract_element_text<'a>(c_xml: &'a str, c_tag: &str) -> Option<&'a str> {
    let c_open = format!("<{c_tag}>");
    let c_close = format!("</{c_tag}>");
    let n_idx_start = c_xml.find(&c_open)? + c_open.len();
    let n_len = c_xml[n_idx_start..].find(&c_close)?;
    Some(&c_xml[n_idx_start..n_idx_start + n_len])
}

fn derive_zip_error_text(err: zip::result::ZipError) -> String {
    format!("xlsx package error: {err}")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

fn cast_row_num(value: usize) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("row index overflow: {value}"))
}

fn cast_col_num(value: usize) -> Result<u16, String> {
    u16::try_from(value).map_err(|_| format!("column index overflow: {value}"))
}

fn derive_xlsx_error_text(err: XlsxError) -> String {
    format!("xlsx write error: {err}")
}
