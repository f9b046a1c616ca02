//! Keep an academic website in sync with its BibTeX bibliography.
//!
//! `sitebib` drives two maintenance jobs that both start from the site's
//! `papers.bib`:
//!
//! - **Resume publications**: every entry is normalized into a JSON-Resume
//!   style [`Publication`] (plain-text title, venue, ISO-like release date,
//!   best-effort URL, abstract), sorted newest-first and merged into the
//!   `publications` key of an existing resume document.
//! - **Paper previews**: entries without a `preview` field get a thumbnail of
//!   the first page of their PDF, and the bibliography is rewritten with the
//!   new `preview` fields.
//!
//! Both jobs are idempotent: running them again on unchanged input changes
//! nothing.
//!
//! # Basic Usage
//!
//! ```rust
//! use sitebib::{BibtexParser, Publication};
//!
//! let input = r#"@article{smith2023,
//!     title = {A {B}rief Study of {\"O}dometers},
//!     journal = {Journal of Examples},
//!     year = 2023,
//!     month = mar,
//! }"#;
//!
//! let bibliography = BibtexParser::new().parse(input).unwrap();
//! let publication = Publication::from(bibliography.entries().next().unwrap());
//! assert_eq!(publication.name, "A Brief Study of Ödometers");
//! assert_eq!(publication.release_date, "2023-03-01");
//! ```
//!
//! # Generating Previews
//!
//! ```rust,no_run
//! use sitebib::preview::{Pdftoppm, PreviewConfig, generate_previews};
//!
//! let mut config = PreviewConfig::new();
//! config.set_dpi(200).set_overwrite(false);
//!
//! let report = generate_previews(&config, &Pdftoppm::new()).unwrap();
//! println!("{} preview(s) added", report.modified_count());
//! ```
//!
//! # Error Handling
//!
//! The library uses a custom [`Result`] type that wraps [`BibError`]. Only
//! top-level problems (a missing bibliography, a file that cannot be parsed,
//! I/O failures) are reported as errors; a single entry that cannot be
//! converted never aborts a run.

use std::path::PathBuf;
use thiserror::Error;

pub mod bibtex;
pub mod cli;
pub mod latex;
pub mod preview;
pub mod publication;
mod regex;
pub mod resume;
mod utils;

// Reexports
pub use bibtex::{BibEntry, BibItem, Bibliography, BibtexParser, BibtexWriter};
pub use latex::latex_to_text;
pub use publication::{Publication, publications_from, sort_newest_first};
pub use resume::{ResumeDocument, update_resume};

/// A specialized Result type for bibliography operations.
pub type Result<T> = std::result::Result<T, BibError>;

/// Represents errors that can occur while reading, converting or writing a bibliography.
#[derive(Error, Debug)]
pub enum BibError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("BibTeX file not found: {}", .0.display())]
    BibliographyNotFound(PathBuf),

    #[error("Parse error: {0}")]
    InvalidFormat(String),

    #[error("Malformed input: {message} at line {line}")]
    MalformedInput { message: String, line: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
