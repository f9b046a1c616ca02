//! BibTeX reading and writing.
//!
//! Provides a lenient-but-safe parser for the BibTeX files a personal website
//! keeps, and a writer that rewrites them with minimal changes.
//!
//! # Example
//!
//! ```
//! use sitebib::{BibtexParser, BibtexWriter};
//!
//! let input = r#"@article{smith2023,
//!   title = {Example Title},
//!   year = 2023
//! }"#;
//!
//! let mut bibliography = BibtexParser::new().parse(input).unwrap();
//! for entry in bibliography.entries_mut() {
//!     entry.set("preview", "smith2023_preview.png");
//! }
//!
//! let output = BibtexWriter::new().write(&bibliography);
//! assert!(output.contains("    preview = {smith2023_preview.png}"));
//! ```

mod parse;
mod structure;
mod write;

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::bibtex::parse::bibtex_parse;
use crate::bibtex::write::format_bibliography;
use crate::{BibError, Result};

pub use structure::{BibEntry, BibItem, Bibliography};

/// Parser for BibTeX files.
///
/// Unbalanced braces and unterminated entries are reported as
/// [`BibError::MalformedInput`] instead of being skipped, so a file is never
/// rewritten from a partial read.
#[derive(Debug, Clone)]
pub struct BibtexParser {
    common_strings: bool,
}

impl Default for BibtexParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BibtexParser {
    /// Creates a new BibTeX parser that expands the standard month macros.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitebib::BibtexParser;
    /// let parser = BibtexParser::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            common_strings: true,
        }
    }

    /// Whether bare `jan`..`dec` macros expand to month names.
    #[must_use]
    pub fn with_common_strings(mut self, common_strings: bool) -> Self {
        self.common_strings = common_strings;
        self
    }

    /// Parses a string containing zero or more BibTeX blocks.
    ///
    /// # Errors
    ///
    /// Returns `BibError::MalformedInput` if a block is not properly closed
    /// or a field assignment is broken.
    pub fn parse(&self, input: &str) -> Result<Bibliography> {
        let items = bibtex_parse(input, self.common_strings)?;
        Ok(Bibliography::from_items(items))
    }

    /// Reads and parses a BibTeX file.
    ///
    /// # Errors
    ///
    /// Returns `BibError::BibliographyNotFound` when `path` is not a file, or
    /// any read or parse error.
    pub fn parse_file(&self, path: &Path) -> Result<Bibliography> {
        if !path.is_file() {
            return Err(BibError::BibliographyNotFound(path.to_path_buf()));
        }
        debug!(path = %path.display(), "Loading bibliography");
        let text = fs::read_to_string(path)?;
        let bibliography = self.parse(&text)?;
        debug!(entries = bibliography.len(), "Parsed bibliography");
        Ok(bibliography)
    }
}

/// Writer for BibTeX files.
#[derive(Debug, Clone)]
pub struct BibtexWriter {
    indent: String,
}

impl Default for BibtexWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BibtexWriter {
    /// Creates a writer that indents fields with four spaces.
    #[must_use]
    pub fn new() -> Self {
        Self {
            indent: "    ".to_string(),
        }
    }

    /// Sets the indentation placed before each field.
    #[must_use]
    pub fn with_indent(mut self, indent: &str) -> Self {
        self.indent = indent.to_string();
        self
    }

    /// Formats the whole bibliography, preserving item order.
    pub fn write(&self, bibliography: &Bibliography) -> String {
        format_bibliography(bibliography, &self.indent)
    }

    /// Formats the bibliography and replaces the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `BibError::Io` if the file cannot be written.
    pub fn write_file(&self, bibliography: &Bibliography, path: &Path) -> Result<()> {
        fs::write(path, self.write(bibliography))?;
        Ok(())
    }
}
