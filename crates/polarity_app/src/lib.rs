//! `polarity_app` v1:
//! Polarity-check report generation for one root folder.
//!
//! Module map:
//! - `spec`     : run options, run result, caller-facing error
//! - `lookup`   : images-folder backed image lookup
//! - `pipeline` : `ensure_structure` and `run`
pub mod lookup;
pub mod pipeline;
pub mod spec;

pub use lookup::FolderImageLookup;
pub use pipeline::{ensure_structure, run, run_guarded, run_with_options};
pub use spec::{PolarityAppError, SpecProcessResult, SpecRunOptions};
