//! Read options and read result models.

use std::fmt;

use polarity_feeder::SpecFeederRecord;

use crate::conf::{N_NROWS_RAW_MIN, N_SIZE_SNIFF_SAMPLE, TUP_DELIMITERS_CANDIDATE};

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Text encodings the reader can try.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumTextEncoding {
    /// UTF-8, with an optional leading byte-order mark.
    Utf8Sig,
    /// ISO-8859-1; every byte maps to one code point.
    Latin1,
}

impl fmt::Display for EnumTextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utf8Sig => write!(f, "UTF-8"),
            Self::Latin1 => write!(f, "Latin-1"),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Options for [`crate::reader::read_feeder_table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFeederReadOptions {
    /// Encodings tried in order; the first that decodes wins.
    pub encodings: Vec<EnumTextEncoding>,
    /// Bytes of text inspected by the delimiter sniffer.
    pub size_sniff_sample: usize,
    /// Candidate delimiters for the sniffer.
    pub delimiters_candidate: Vec<u8>,
    /// Minimum raw row count.
    pub n_rows_raw_min: usize,
}

impl Default for SpecFeederReadOptions {
    fn default() -> Self {
        Self {
            encodings: vec![EnumTextEncoding::Utf8Sig, EnumTextEncoding::Latin1],
            size_sniff_sample: N_SIZE_SNIFF_SAMPLE,
            delimiters_candidate: TUP_DELIMITERS_CANDIDATE.to_vec(),
            n_rows_raw_min: N_NROWS_RAW_MIN,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Result

/// Parsed feeder export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFeederTable {
    /// Data records in source order, blank rows removed.
    pub records: Vec<SpecFeederRecord>,
    /// Line name from the job-info rows, when one could be found.
    pub line_name: Option<String>,
    /// Trimmed table-header row.
    pub headers: Vec<String>,
    /// Encoding that decoded the file.
    pub encoding: EnumTextEncoding,
    /// Delimiter used to split rows.
    pub delimiter: u8,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
