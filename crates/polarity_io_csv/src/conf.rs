//! Export-shape constants.

/// Bytes inspected when sniffing the delimiter.
pub const N_SIZE_SNIFF_SAMPLE: usize = 4096;
/// Raw rows required: job labels, job values, table header.
pub const N_NROWS_RAW_MIN: usize = 3;
/// Index of the job-info label row.
pub const N_IDX_ROW_JOB_LABELS: usize = 0;
/// Index of the job-info value row.
pub const N_IDX_ROW_JOB_VALUES: usize = 1;
/// Index of the table-header row.
pub const N_IDX_ROW_TABLE_HEADER: usize = 2;
/// Column used for the line name when no "Line" label exists (column H).
pub const N_IDX_COL_LINE_FALLBACK: usize = 7;
/// Label searched (case-insensitively) in the job-info label row.
pub const C_LABEL_LINE: &str = "line";
/// Delimiters tried by the sniffer, in tie-break order.
pub const TUP_DELIMITERS_CANDIDATE: [u8; 4] = [b',', b';', b'\t', b'|'];
/// Delimiter used when sniffing finds nothing.
pub const N_DELIMITER_DEFAULT: u8 = b',';
/// UTF-8 byte-order mark.
pub const TUP_UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
