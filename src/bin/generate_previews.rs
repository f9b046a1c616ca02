//! Generates first-page PNG previews for bibliography entries lacking one.

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error, info};

use sitebib::cli::{PreviewArgs, init_logging};
use sitebib::preview::{Pdftoppm, generate_previews};

fn main() -> ExitCode {
    let args = PreviewArgs::parse();
    init_logging("warn", args.verbose, args.quiet);
    debug!(?args, "CLI arguments parsed");

    let config = args.to_config();
    let rasterizer = Pdftoppm::new().with_poppler_path(config.poppler_path());

    match generate_previews(&config, &rasterizer) {
        Ok(report) => {
            info!(
                updated = report.modified_count(),
                generated = report.generated_count(),
                failed = report.failed_count(),
                "Done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Fatal error: {e}");
            ExitCode::FAILURE
        }
    }
}
