//! Stateless helpers for decoding and shaping the feeder export.

use std::collections::BTreeMap;

use log::debug;
use polarity_feeder::{FeederError, L_REQUIRED_FEEDER_COLUMNS};

use crate::conf::{C_LABEL_LINE, N_IDX_COL_LINE_FALLBACK, TUP_UTF8_BOM};
use crate::spec::EnumTextEncoding;

////////////////////////////////////////////////////////////////////////////////
// #region Decoding

/// Decode `bytes` with the first encoding in `encodings` that succeeds.
pub fn decode_text(
    bytes: &[u8],
    encodings: &[EnumTextEncoding],
) -> Result<(String, EnumTextEncoding), FeederError> {
    for encoding in encodings {
        match decode_with(bytes, *encoding) {
            Some(text) => return Ok((text, *encoding)),
            None => debug!("Decoding as {encoding} failed, trying next encoding"),
        }
    }

    let c_tried = encodings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("/");
    Err(FeederError::Encoding(c_tried))
}

fn decode_with(bytes: &[u8], encoding: EnumTextEncoding) -> Option<String> {
    match encoding {
        EnumTextEncoding::Utf8Sig => {
            let v_body = bytes.strip_prefix(&TUP_UTF8_BOM[..]).unwrap_or(bytes);
            String::from_utf8(v_body.to_vec()).ok()
        }
        EnumTextEncoding::Latin1 => Some(bytes.iter().map(|b| char::from(*b)).collect()),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DelimiterSniffing

/// Cut `text` to at most `n_bytes`, on a char boundary.
pub fn derive_sample(text: &str, n_bytes: usize) -> &str {
    if text.len() <= n_bytes {
        return text;
    }
    let mut n_end = n_bytes;
    while !text.is_char_boundary(n_end) {
        n_end -= 1;
    }
    &text[..n_end]
}

/// Guess the delimiter of `sample` among `candidates`.
///
/// For each candidate, count its occurrences outside double quotes on every
/// complete non-blank line, take the most frequent non-zero count, and score
/// by how many lines share it. The best score wins; ties go to the earlier
/// candidate. Returns `None` when no candidate occurs at all.
pub fn sniff_delimiter(sample: &str, candidates: &[u8]) -> Option<u8> {
    let mut l_lines: Vec<&str> = sample.lines().collect();
    if !sample.ends_with('\n') && l_lines.len() > 1 {
        l_lines.pop();
    }
    let l_lines: Vec<&str> = l_lines
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .collect();
    if l_lines.is_empty() {
        return None;
    }

    let mut best: Option<(u8, usize)> = None;
    for delimiter in candidates {
        let mut dict_freq: BTreeMap<usize, usize> = BTreeMap::new();
        for line in &l_lines {
            let n_count = count_unquoted(line, *delimiter);
            if n_count > 0 {
                *dict_freq.entry(n_count).or_default() += 1;
            }
        }
        let Some(n_score) = dict_freq.values().copied().max() else {
            continue;
        };
        if best.is_none_or(|(_, n_best)| n_score > n_best) {
            best = Some((*delimiter, n_score));
        }
    }

    best.map(|(delimiter, _)| delimiter)
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut if_in_quotes = false;
    let mut n_count = 0;
    for b in line.bytes() {
        if b == b'"' {
            if_in_quotes = !if_in_quotes;
        } else if b == delimiter && !if_in_quotes {
            n_count += 1;
        }
    }
    n_count
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region HeaderRows

/// Best-effort line name lookup in the job-info rows.
///
/// Searches `labels` for "line" (case-insensitive, trailing colons
/// ignored) and returns the value in the same column. Without such a label,
/// or when the value row is too short for it, column H is used if present.
pub fn derive_line_name(labels: &[String], values: &[String]) -> Option<String> {
    let n_idx_label = labels.iter().position(|label| {
        label.trim().to_lowercase().trim_end_matches(':') == C_LABEL_LINE
    });

    match n_idx_label {
        Some(n_idx) if n_idx < values.len() => Some(values[n_idx].trim().to_string()),
        _ if values.len() > N_IDX_COL_LINE_FALLBACK => {
            Some(values[N_IDX_COL_LINE_FALLBACK].trim().to_string())
        }
        _ => None,
    }
}

/// Check that every required column name is in `headers`.
pub fn validate_headers(headers: &[String]) -> Result<(), FeederError> {
    let l_missing: Vec<String> = L_REQUIRED_FEEDER_COLUMNS
        .iter()
        .filter(|c_name| !headers.iter().any(|h| h == *c_name))
        .map(|c_name| c_name.to_string())
        .collect();

    if l_missing.is_empty() {
        return Ok(());
    }
    Err(FeederError::MissingColumns(l_missing))
}

/// True when every cell is empty or whitespace.
pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// Map header names to trimmed cells; short rows yield empty strings.
pub fn derive_row_mapping(headers: &[String], row: &[String]) -> BTreeMap<String, String> {
    headers
        .iter()
        .enumerate()
        .map(|(n_idx, c_name)| {
            let c_value = row.get(n_idx).map(|val| val.trim()).unwrap_or("");
            (c_name.clone(), c_value.to_string())
        })
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_decode_text_prefers_utf8_and_strips_bom() {
        let bytes = b"\xEF\xBB\xBFModule,Caf\xC3\xA9";
        let (text, encoding) =
            decode_text(bytes, &[EnumTextEncoding::Utf8Sig, EnumTextEncoding::Latin1])
                .expect("decode");
        assert_eq!(text, "Module,Café");
        assert_eq!(encoding, EnumTextEncoding::Utf8Sig);
    }

    #[test]
    fn test_decode_text_falls_back_to_latin1() {
        let bytes = b"Caf\xE9";
        let (text, encoding) =
            decode_text(bytes, &[EnumTextEncoding::Utf8Sig, EnumTextEncoding::Latin1])
                .expect("decode");
        assert_eq!(text, "Café");
        assert_eq!(encoding, EnumTextEncoding::Latin1);
    }

    #[test]
    fn test_decode_text_reports_encoding_error() {
        let err = decode_text(b"Caf\xE9", &[EnumTextEncoding::Utf8Sig]).expect_err("must fail");
        assert!(matches!(err, FeederError::Encoding(_)));
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_derive_sample_respects_char_boundary() {
        let text = "aé";
        assert_eq!(derive_sample(text, 2), "a");
        assert_eq!(derive_sample(text, 10), "aé");
    }

    #[test]
    fn test_sniff_delimiter() {
        let candidates = [b',', b';', b'\t', b'|'];
        assert_eq!(sniff_delimiter("a;b;c\n1;2;3\n", &candidates), Some(b';'));
        assert_eq!(sniff_delimiter("a,b,c\n1,2,3\n", &candidates), Some(b','));
        assert_eq!(
            sniff_delimiter("a\tb\n\"x,y\"\tz\n", &candidates),
            Some(b'\t')
        );
        assert_eq!(sniff_delimiter("abc\ndef\n", &candidates), None);
        assert_eq!(sniff_delimiter("", &candidates), None);
    }

    #[test]
    fn test_derive_line_name_by_label() {
        let labels = strings(&["Job", "LINE:", "Side"]);
        let values = strings(&["J1", " SMT-04 ", "TOP"]);
        assert_eq!(derive_line_name(&labels, &values), Some("SMT-04".to_string()));
    }

    #[test]
    fn test_derive_line_name_falls_back_to_column_h() {
        let labels = strings(&["Job"]);
        let values = strings(&["J1", "", "", "", "", "", "", "L-H"]);
        assert_eq!(derive_line_name(&labels, &values), Some("L-H".to_string()));

        let values = strings(&["J1", "x"]);
        assert_eq!(derive_line_name(&labels, &values), None);
    }

    #[test]
    fn test_validate_headers_lists_missing() {
        let mut headers: Vec<String> = L_REQUIRED_FEEDER_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert!(validate_headers(&headers).is_ok());

        headers.retain(|h| h != "QTY");
        match validate_headers(&headers) {
            Err(FeederError::MissingColumns(l_missing)) => {
                assert_eq!(l_missing, vec!["QTY".to_string()])
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_derive_row_mapping_pads_short_rows() {
        let headers = strings(&["A", "B", "C"]);
        let dict_row = derive_row_mapping(&headers, &strings(&[" 1 ", "2"]));
        assert_eq!(dict_row["A"], "1");
        assert_eq!(dict_row["B"], "2");
        assert_eq!(dict_row["C"], "");
    }

    #[test]
    fn test_is_blank_row() {
        assert!(is_blank_row(&strings(&["", "  ", "\t"])));
        assert!(is_blank_row(&[]));
        assert!(!is_blank_row(&strings(&["", "x"])));
    }
}
