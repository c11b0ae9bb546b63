//! `polarity_io_csv` v1:
//! Reader for the machine-exported `FeederSetup.csv`.
//!
//! Module map:
//! - `conf`   : sniffing and shape constants
//! - `spec`   : read options and read result
//! - `util`   : decoding, delimiter sniffing, header-row helpers
//! - `reader` : file-level orchestration
pub mod conf;
pub mod reader;
pub mod spec;
pub mod util;

pub use reader::{read_feeder_table, read_feeder_table_from_bytes};
pub use spec::{EnumTextEncoding, SpecFeederReadOptions, SpecFeederTable};
pub use util::{decode_text, derive_line_name, sniff_delimiter, validate_headers};
