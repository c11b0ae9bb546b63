use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use polarity_app::{PolarityAppError, ensure_structure, run_guarded};
use polarity_log::{EnumLogLevel, init_logger};

#[derive(Parser, Debug, Clone)]
#[command(name = "polarity-check")]
#[command(about = "Build the polarity-check workbook from a job root folder")]
#[command(version)]
struct CliArgs {
    /// Root folder holding DATA/FeederSetup.csv and IMAGES/
    #[arg(value_name = "ROOT")]
    root: PathBuf,

    /// Output workbook path (default: ROOT/polarity_report_<timestamp>.xlsx)
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,

    /// Only create the DATA and IMAGES folders, then exit
    #[arg(long)]
    init_only: bool,

    /// Log verbosity (off, error, warn, info, debug, trace); RUST_LOG overrides
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: EnumLogLevel,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logger(args.log_level);

    if args.init_only {
        return match ensure_structure(&args.root) {
            Ok(folders) => {
                println!("Folders ready:");
                println!("  {}", folders.path_dir_data.display());
                println!("  {}", folders.path_dir_images.display());
                ExitCode::SUCCESS
            }
            Err(err) => print_error(&err),
        };
    }

    match run_guarded(&args.root, args.output) {
        Ok(result) => {
            println!("File generated successfully:");
            println!("{}", result.output_path.display());
            println!();
            println!("Rows written: {}", result.rows_written);
            println!("Images detected in IMAGES: {}", result.images_found);
            for c_warning in &result.warnings {
                println!("Warning: {c_warning}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => print_error(&err),
    }
}

fn print_error(err: &PolarityAppError) -> ExitCode {
    let c_title = match err {
        PolarityAppError::Unexpected(_) => "Unexpected error",
        _ => "Processing error",
    };
    eprintln!("{c_title}: {err}");
    ExitCode::FAILURE
}
