//! Normalization rules turning feeder records into report rows.

use log::debug;

use crate::conf::C_JOB_FOLDER_SEPARATOR;
use crate::spec::{FeederError, SpecFeederRecord, SpecJobMetadata, SpecReportRow};

////////////////////////////////////////////////////////////////////////////////
// #region QuantityFilter

/// Keep records whose quantity is non-zero, preserving source order.
///
/// Returns [`FeederError::EmptyDataset`] when nothing survives.
pub fn filter_by_quantity(
    l_records: &[SpecFeederRecord],
) -> Result<Vec<SpecFeederRecord>, FeederError> {
    let l_records_kept: Vec<SpecFeederRecord> = l_records
        .iter()
        .filter(|record| record.qty != 0)
        .cloned()
        .collect();

    debug!(
        "Quantity filter kept {} of {} records",
        l_records_kept.len(),
        l_records.len()
    );

    if l_records_kept.is_empty() {
        return Err(FeederError::EmptyDataset);
    }
    Ok(l_records_kept)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SideRemapping

/// Remap a raw side indicator: `"1"` -> `"2"`, `"0"` -> `"1"`, else unchanged.
pub fn convert_side_no(side_no: &str) -> String {
    match side_no.trim() {
        "1" => "2".to_string(),
        "0" => "1".to_string(),
        other => other.to_string(),
    }
}

/// Classify the dataset as the alternate machine family.
///
/// True when any remapped side indicator equals `"2"`.
pub fn is_alternate_machine(l_records: &[SpecFeederRecord]) -> bool {
    l_records
        .iter()
        .any(|record| convert_side_no(&record.side_no) == "2")
}

/// Build the `module[-side]-location` code for one record.
///
/// The side part is only used for alternate-machine datasets. Quotes are
/// removed from the location and hyphens left by empty parts are stripped.
pub fn build_slot_string(record: &SpecFeederRecord, if_alternate_machine: bool) -> String {
    let c_module = record.module_number.trim();
    let c_side_mapped = convert_side_no(&record.side_no);
    let c_location = record.location.replace('\'', "");
    let c_location = c_location.trim();

    let c_slot = if if_alternate_machine && !c_side_mapped.is_empty() {
        format!("{c_module}-{c_side_mapped}-{c_location}")
    } else {
        format!("{c_module}-{c_location}")
    };
    c_slot.trim_matches('-').to_string()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportRows

/// Turn raw records into report rows.
///
/// Applies the quantity filter, classifies the machine family once for the
/// whole filtered set, then maps each surviving record in source order.
pub fn build_report_rows(
    l_records: &[SpecFeederRecord],
) -> Result<Vec<SpecReportRow>, FeederError> {
    if l_records.is_empty() {
        return Err(FeederError::NoData);
    }

    let l_records_kept = filter_by_quantity(l_records)?;
    let if_alternate_machine = is_alternate_machine(&l_records_kept);
    debug!("Alternate machine family: {if_alternate_machine}");

    let l_rows = l_records_kept
        .iter()
        .map(|record| SpecReportRow {
            module: record.module_number.trim().to_string(),
            slot: record.location.trim().to_string(),
            slot_code: build_slot_string(record, if_alternate_machine),
            part_number: record.part_number.trim().to_string(),
            package: record.package_name.trim().to_string(),
            program_polarity: String::new(),
            package_polarity: String::new(),
            shape_name: record.part_shape_name.trim().to_string(),
            comment: record.part_comment.trim().to_string(),
        })
        .collect();

    Ok(l_rows)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region JobFolderName

/// Seed job metadata from a root folder named `Job;Revision;Side`.
///
/// Fewer than three segments leaves every field empty. Extra segments are
/// ignored. `line_name` is never set here.
pub fn derive_job_from_folder_name(folder_name: &str) -> SpecJobMetadata {
    let l_parts: Vec<&str> = folder_name
        .split(C_JOB_FOLDER_SEPARATOR)
        .map(str::trim)
        .collect();
    if l_parts.len() < 3 {
        return SpecJobMetadata::default();
    }

    SpecJobMetadata {
        job_name: l_parts[0].to_string(),
        revision: l_parts[1].to_string(),
        side: l_parts[2].to_string(),
        line_name: String::new(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
