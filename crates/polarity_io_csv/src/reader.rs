//! File-level reading of the feeder export.

use std::fs;
use std::io;
use std::path::Path;

use csv::ReaderBuilder;
use log::{debug, info};
use polarity_feeder::{FeederError, SpecFeederRecord};

use crate::conf::{
    N_DELIMITER_DEFAULT, N_IDX_ROW_JOB_LABELS, N_IDX_ROW_JOB_VALUES, N_IDX_ROW_TABLE_HEADER,
};
use crate::spec::{SpecFeederReadOptions, SpecFeederTable};
use crate::util::{
    decode_text, derive_line_name, derive_row_mapping, derive_sample, is_blank_row,
    sniff_delimiter, validate_headers,
};

/// Read and shape `FeederSetup.csv`.
///
/// Row 0 holds job-info labels, row 1 job-info values, row 2 the table
/// header; everything after that is data. The line name is optional and a
/// failure to find it never aborts the read.
pub fn read_feeder_table<P>(
    file_feeder: P,
    options: &SpecFeederReadOptions,
) -> Result<SpecFeederTable, FeederError>
where
    P: AsRef<Path>,
{
    let path_file = file_feeder.as_ref();
    if !path_file.is_file() {
        return Err(FeederError::NotFound(path_file.to_path_buf()));
    }

    let v_bytes = fs::read(path_file).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => FeederError::NotFound(path_file.to_path_buf()),
        _ => FeederError::Io {
            path: path_file.to_path_buf(),
            message: e.to_string(),
        },
    })?;

    let table = read_feeder_table_from_bytes(&v_bytes, options)?;
    info!(
        "Read {} feeder records from {} ({}, delimiter {:?})",
        table.records.len(),
        path_file.display(),
        table.encoding,
        char::from(table.delimiter)
    );
    Ok(table)
}

/// Shape an in-memory export. See [`read_feeder_table`].
pub fn read_feeder_table_from_bytes(
    v_bytes: &[u8],
    options: &SpecFeederReadOptions,
) -> Result<SpecFeederTable, FeederError> {
    let (c_text, encoding) = decode_text(v_bytes, &options.encodings)?;

    let delimiter = sniff_delimiter(
        derive_sample(&c_text, options.size_sniff_sample),
        &options.delimiters_candidate,
    )
    .unwrap_or_else(|| {
        debug!("Delimiter sniffing failed, using comma");
        N_DELIMITER_DEFAULT
    });

    let l_rows_raw = parse_raw_rows(&c_text, delimiter)?;
    if l_rows_raw.len() < options.n_rows_raw_min {
        return Err(FeederError::Format(
            "FeederSetup.csv does not have the expected format (too few rows).".to_string(),
        ));
    }

    let line_name = derive_line_name(
        &l_rows_raw[N_IDX_ROW_JOB_LABELS],
        &l_rows_raw[N_IDX_ROW_JOB_VALUES],
    );
    match &line_name {
        Some(val) => debug!("Line name from job-info rows: {val:?}"),
        None => debug!("No line name found in job-info rows"),
    }

    let headers: Vec<String> = l_rows_raw[N_IDX_ROW_TABLE_HEADER]
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    validate_headers(&headers)?;

    let records = l_rows_raw[N_IDX_ROW_TABLE_HEADER + 1..]
        .iter()
        .filter(|row| !is_blank_row(row))
        .map(|row| SpecFeederRecord::from_columns(&derive_row_mapping(&headers, row)))
        .collect();

    Ok(SpecFeederTable {
        records,
        line_name,
        headers,
        encoding,
        delimiter,
    })
}

/// Parse every physical line into a row; empty lines become empty rows.
///
/// The `csv` reader skips empty lines, which would shift the fixed
/// job-info/header row positions, so each logical line is parsed on its own.
fn parse_raw_rows(c_text: &str, delimiter: u8) -> Result<Vec<Vec<String>>, FeederError> {
    let mut l_rows = Vec::new();
    for (n_idx_row, c_line) in split_logical_lines(c_text).into_iter().enumerate() {
        if c_line.is_empty() {
            l_rows.push(Vec::new());
            continue;
        }

        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(c_line.as_bytes());
        let row = match rdr.records().next() {
            Some(result) => result
                .map_err(|e| {
                    FeederError::Format(format!(
                        "FeederSetup.csv could not be parsed at row {}: {e}",
                        n_idx_row + 1
                    ))
                })?
                .iter()
                .map(ToString::to_string)
                .collect(),
            None => Vec::new(),
        };
        l_rows.push(row);
    }
    Ok(l_rows)
}

/// Split on line breaks outside double quotes, dropping `\r` terminators.
///
/// A final line break does not open an extra empty line.
fn split_logical_lines(c_text: &str) -> Vec<&str> {
    let mut l_lines = Vec::new();
    let mut if_in_quotes = false;
    let mut n_start = 0;
    for (n_idx, b) in c_text.bytes().enumerate() {
        match b {
            b'"' => if_in_quotes = !if_in_quotes,
            b'\n' if !if_in_quotes => {
                l_lines.push(c_text[n_start..n_idx].trim_end_matches('\r'));
                n_start = n_idx + 1;
            }
            _ => {}
        }
    }
    if n_start < c_text.len() {
        l_lines.push(c_text[n_start..].trim_end_matches('\r'));
    }
    l_lines
}
