//! Caller-facing operations: folder bootstrap and the report run.

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use log::{info, warn};
use polarity_feeder::{
    C_FEEDER_FILE_NAME, SpecJobMetadata, build_report_rows, derive_job_from_folder_name,
};
use polarity_io_csv::read_feeder_table;
use polarity_io_fs::{SpecWorkingFolders, collect_image_stems, resolve_working_folders};
use polarity_io_xlsx::{
    XlsxWriter, derive_default_output_file_name, derive_default_xlsx_formats, plan_report_layout,
};

use crate::lookup::FolderImageLookup;
use crate::spec::{PolarityAppError, SpecProcessResult, SpecRunOptions};

/// Create the DATA and IMAGES folders under `dir_root` when missing.
pub fn ensure_structure<P>(dir_root: P) -> Result<SpecWorkingFolders, PolarityAppError>
where
    P: AsRef<Path>,
{
    let folders = resolve_working_folders(dir_root)?;
    polarity_io_fs::ensure_structure(&folders)?;
    Ok(folders)
}

/// Generate the polarity report for `dir_root` with default options.
pub fn run<P>(
    dir_root: P,
    output_path: Option<PathBuf>,
) -> Result<SpecProcessResult, PolarityAppError>
where
    P: AsRef<Path>,
{
    let options = SpecRunOptions {
        path_file_out: output_path,
        ..Default::default()
    };
    run_with_options(dir_root, &options)
}

/// Generate the polarity report for `dir_root`.
///
/// Nothing is written unless every stage succeeds; the workbook is saved in
/// one step at the end.
pub fn run_with_options<P>(
    dir_root: P,
    options: &SpecRunOptions,
) -> Result<SpecProcessResult, PolarityAppError>
where
    P: AsRef<Path>,
{
    let dt_now = Local::now().naive_local();
    run_at(dir_root.as_ref(), options, dt_now)
}

/// [`run`] with panics turned into [`PolarityAppError::Unexpected`].
pub fn run_guarded<P>(
    dir_root: P,
    output_path: Option<PathBuf>,
) -> Result<SpecProcessResult, PolarityAppError>
where
    P: AsRef<Path>,
{
    let path_dir_root = dir_root.as_ref();
    panic::catch_unwind(AssertUnwindSafe(|| run(path_dir_root, output_path)))
        .unwrap_or_else(|payload| Err(PolarityAppError::Unexpected(derive_panic_text(payload))))
}

fn run_at(
    path_dir_root: &Path,
    options: &SpecRunOptions,
    dt_now: NaiveDateTime,
) -> Result<SpecProcessResult, PolarityAppError> {
    let folders = ensure_structure(path_dir_root)?;
    let mut job = derive_job_metadata(&folders.path_dir_root);

    let table = read_feeder_table(
        folders.path_dir_data.join(C_FEEDER_FILE_NAME),
        &options.read_options,
    )?;
    if let Some(line_name) = table.line_name {
        job.line_name = line_name;
    }

    let l_rows = build_report_rows(&table.records)?;

    let lookup = FolderImageLookup::new(folders.path_dir_images.clone());
    let layout = plan_report_layout(
        &l_rows,
        &job,
        &lookup,
        &options.layout_options,
        &options.capabilities,
        dt_now,
    )?;

    let path_file_out = options.path_file_out.clone().unwrap_or_else(|| {
        folders
            .path_dir_root
            .join(derive_default_output_file_name(dt_now))
    });
    let mut writer = XlsxWriter::new(
        path_file_out.clone(),
        &derive_default_xlsx_formats(),
        options.capabilities,
    );
    writer.write_report(&layout)?;
    writer.close()?;

    let report = writer.report();
    for c_warning in &report.warnings {
        warn!("{c_warning}");
    }
    let result = SpecProcessResult {
        output_path: path_file_out,
        rows_written: report.n_rows_written,
        images_found: collect_image_stems(&folders.path_dir_images).len(),
        images_embedded: report.n_images_embedded,
        warnings: report.warnings,
    };
    info!(
        "Report written to {}: {} rows, {} images embedded",
        result.output_path.display(),
        result.rows_written,
        result.images_embedded
    );
    Ok(result)
}

/// Job/revision/side from a `Job;Revision;Side` root folder name.
fn derive_job_metadata(path_dir_root: &Path) -> SpecJobMetadata {
    path_dir_root
        .file_name()
        .map(|name| derive_job_from_folder_name(&name.to_string_lossy()))
        .unwrap_or_default()
}

fn derive_panic_text(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(c_text) = payload.downcast_ref::<&str>() {
        return c_text.to_string();
    }
    if let Some(c_text) = payload.downcast_ref::<String>() {
        return c_text.clone();
    }
    "unknown failure".to_string()
}
