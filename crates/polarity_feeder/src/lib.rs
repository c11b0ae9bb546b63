//! `polarity_feeder` v1:
//! Feeder-setup data model and normalization rules.
//!
//! Module map:
//! - `conf`      : required columns and fixed domain constants
//! - `spec`      : records, job metadata, report rows, errors
//! - `normalize` : quantity filter, side remapping, report-row construction
pub mod conf;
pub mod normalize;
pub mod spec;

pub use conf::{C_FEEDER_FILE_NAME, L_REQUIRED_FEEDER_COLUMNS};
pub use normalize::{
    build_report_rows, build_slot_string, convert_side_no, derive_job_from_folder_name,
    filter_by_quantity, is_alternate_machine,
};
pub use spec::{FeederError, SpecFeederRecord, SpecJobMetadata, SpecReportRow};
