//! Regenerates `publications` in the resume JSON from the site bibliography.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use sitebib::cli::{PublicationsArgs, init_logging};
use sitebib::update_resume;

fn main() -> Result<()> {
    let args = PublicationsArgs::parse();
    init_logging("info", args.verbose, args.quiet);
    debug!(?args, "CLI arguments parsed");

    let count = update_resume(&args.bib, &args.output).with_context(|| {
        format!(
            "failed to update {} from {}",
            args.output.display(),
            args.bib.display()
        )
    })?;

    if !args.quiet {
        println!("Wrote {count} publication(s) to {}", args.output.display());
    }
    Ok(())
}
