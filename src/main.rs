use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use img2bin::convert;
use log::{error, info};

/// Convert a "v2.0 raw" hex memory image into <INPUT>.bin
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Memory image to convert
    input: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    match convert(&args.input) {
        Ok(report) => {
            if let Ok(json) = serde_json::to_string(&report) {
                info!("{}", json);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
