//! Command-line arguments shared by the binaries, and logging setup.

use std::path::PathBuf;

use clap::Parser;

use crate::preview::{DEFAULT_BIB_PATH, DEFAULT_DPI, DEFAULT_PREVIEW_DIR, PreviewConfig};

/// Default location of the resume document.
pub const DEFAULT_RESUME_PATH: &str = "assets/json/resume.json";

/// Levels from quietest to loudest.
const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Regenerate the publications section of the resume from the bibliography.
#[derive(Parser, Debug)]
#[command(name = "generate-resume-publications")]
#[command(author, version, about)]
pub struct PublicationsArgs {
    /// Path to the BibTeX file
    #[arg(short, long, default_value = DEFAULT_BIB_PATH)]
    pub bib: PathBuf,

    /// Path to the resume JSON file to update
    #[arg(short, long, default_value = DEFAULT_RESUME_PATH)]
    pub output: PathBuf,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Generate first-page preview images for bibliography entries without one.
#[derive(Parser, Debug)]
#[command(name = "generate-previews")]
#[command(author, version, about)]
pub struct PreviewArgs {
    /// Path to the BibTeX file to process
    #[arg(short, long, default_value = DEFAULT_BIB_PATH)]
    pub bib: PathBuf,

    /// Directories to search for PDFs (first match wins)
    #[arg(short, long, num_args = 0.., default_values = ["assets/pdf", "."])]
    pub pdf_dirs: Vec<PathBuf>,

    /// Output directory for generated PNG previews
    #[arg(short = 'o', long, default_value = DEFAULT_PREVIEW_DIR)]
    pub preview_dir: PathBuf,

    /// Resolution used when rasterizing PDFs
    #[arg(long, default_value_t = DEFAULT_DPI, value_parser = clap::value_parser!(u32).range(1..))]
    pub dpi: u32,

    /// Directory holding the Poppler binaries, if not on PATH
    #[arg(long)]
    pub poppler_path: Option<PathBuf>,

    /// Re-create preview images even if they already exist
    #[arg(long)]
    pub overwrite: bool,

    /// Increase output verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl PreviewArgs {
    pub fn to_config(&self) -> PreviewConfig {
        let mut config = PreviewConfig::new();
        config
            .set_bib_path(&self.bib)
            .set_pdf_dirs(self.pdf_dirs.clone())
            .set_preview_dir(&self.preview_dir)
            .set_dpi(self.dpi)
            .set_poppler_path(self.poppler_path.clone())
            .set_overwrite(self.overwrite);
        config
    }
}

/// Picks the log level: `--quiet` wins, otherwise each `-v` raises
/// `default_level` one step.
pub fn log_level(default_level: &'static str, verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return LEVELS[0];
    }
    let start = LEVELS
        .iter()
        .position(|level| *level == default_level)
        .unwrap_or(2);
    LEVELS[(start + usize::from(verbose)).min(LEVELS.len() - 1)]
}

/// Installs the global subscriber. `RUST_LOG` takes priority over the flags.
pub fn init_logging(default_level: &'static str, verbose: u8, quiet: bool) {
    let level = log_level(default_level, verbose, quiet);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_publications_defaults() {
        let args = PublicationsArgs::try_parse_from(["generate-resume-publications"]).unwrap();
        assert_eq!(args.bib, PathBuf::from("_bibliography/papers.bib"));
        assert_eq!(args.output, PathBuf::from("assets/json/resume.json"));
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_publications_paths() {
        let args = PublicationsArgs::try_parse_from([
            "generate-resume-publications",
            "--bib",
            "refs.bib",
            "-o",
            "out/resume.json",
        ])
        .unwrap();
        assert_eq!(args.bib, PathBuf::from("refs.bib"));
        assert_eq!(args.output, PathBuf::from("out/resume.json"));
    }

    #[test]
    fn test_preview_defaults() {
        let args = PreviewArgs::try_parse_from(["generate-previews"]).unwrap();
        assert_eq!(args.pdf_dirs, vec![PathBuf::from("assets/pdf"), PathBuf::from(".")]);
        assert_eq!(args.dpi, 150);
        assert_eq!(args.poppler_path, None);
        assert!(!args.overwrite);

        let config = args.to_config();
        assert_eq!(config.bib_path(), Path::new("_bibliography/papers.bib"));
        assert_eq!(config.preview_dir(), Path::new("assets/img/publication_preview"));
    }

    #[test]
    fn test_preview_all_flags() {
        let args = PreviewArgs::try_parse_from([
            "generate-previews",
            "-b",
            "papers.bib",
            "-p",
            "pdfs",
            "more/pdfs",
            "-o",
            "img",
            "--dpi",
            "300",
            "--poppler-path",
            "/opt/poppler/bin",
            "--overwrite",
            "-vv",
        ])
        .unwrap();

        let config = args.to_config();
        assert_eq!(config.bib_path(), Path::new("papers.bib"));
        assert_eq!(config.pdf_dirs(), &[PathBuf::from("pdfs"), PathBuf::from("more/pdfs")]);
        assert_eq!(config.preview_dir(), Path::new("img"));
        assert_eq!(config.dpi(), 300);
        assert_eq!(config.poppler_path(), Some(Path::new("/opt/poppler/bin")));
        assert!(config.overwrite());
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_preview_zero_dpi_rejected() {
        let err = PreviewArgs::try_parse_from(["generate-previews", "--dpi", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_invalid_flag_returns_error() {
        let err = PreviewArgs::try_parse_from(["generate-previews", "--invalid-flag"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_help_flag_shows_usage() {
        let err = PublicationsArgs::try_parse_from(["generate-resume-publications", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level("warn", 0, false), "warn");
        assert_eq!(log_level("warn", 1, false), "info");
        assert_eq!(log_level("warn", 2, false), "debug");
        assert_eq!(log_level("info", 5, false), "trace");
        assert_eq!(log_level("info", 2, true), "error");
    }
}
