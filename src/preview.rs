//! First-page preview images for bibliography entries.
//!
//! Every entry with a key, no `preview` field and a locatable PDF gets a
//! `{key}_preview.png` image in the preview directory, and its `preview` field
//! is set to that file name. The bibliography is only rewritten when at least
//! one entry changed.
//!
//! # Example
//!
//! ```no_run
//! use sitebib::preview::{Pdftoppm, PreviewConfig, generate_previews};
//!
//! let mut config = PreviewConfig::new();
//! config.set_dpi(200).set_overwrite(true);
//!
//! let report = generate_previews(&config, &Pdftoppm::new()).unwrap();
//! println!("{} entries updated", report.modified_count());
//! ```

mod locate;
mod raster;

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::Result;
use crate::bibtex::{BibEntry, Bibliography, BibtexParser, BibtexWriter};
use crate::preview::locate::find_document;

pub use locate::locate_document;
pub use raster::{Pdftoppm, RasterError, Rasterizer};

/// Default location of the bibliography.
pub const DEFAULT_BIB_PATH: &str = "_bibliography/papers.bib";
/// Default directories searched for documents, in order.
pub const DEFAULT_PDF_DIRS: [&str; 2] = ["assets/pdf", "."];
/// Default directory receiving preview images.
pub const DEFAULT_PREVIEW_DIR: &str = "assets/img/publication_preview";
/// Default rendering resolution.
pub const DEFAULT_DPI: u32 = 150;

/// Name of the field linking an entry to its preview image.
pub const PREVIEW_FIELD: &str = "preview";

/// Settings for a preview run.
///
/// # Examples
///
/// ```
/// use sitebib::preview::PreviewConfig;
///
/// let mut config = PreviewConfig::new();
/// config
///     .set_pdf_dirs(vec!["papers".into()])
///     .set_preview_dir("img/previews")
///     .set_dpi(300);
/// assert_eq!(config.dpi(), 300);
/// ```
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Bibliography read and, when changed, rewritten
    bib_path: PathBuf,
    /// Directories searched by document file name
    pdf_dirs: Vec<PathBuf>,
    /// Where images are written
    preview_dir: PathBuf,
    /// Rendering resolution
    dpi: u32,
    /// Directory holding the Poppler tools, if not on `PATH`
    poppler_path: Option<PathBuf>,
    /// Regenerate images that already exist
    overwrite: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewConfig {
    /// Creates a configuration with the default site layout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bib_path: PathBuf::from(DEFAULT_BIB_PATH),
            pdf_dirs: DEFAULT_PDF_DIRS.iter().map(PathBuf::from).collect(),
            preview_dir: PathBuf::from(DEFAULT_PREVIEW_DIR),
            dpi: DEFAULT_DPI,
            poppler_path: None,
            overwrite: false,
        }
    }

    pub fn set_bib_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.bib_path = path.into();
        self
    }

    pub fn set_pdf_dirs(&mut self, dirs: Vec<PathBuf>) -> &mut Self {
        self.pdf_dirs = dirs;
        self
    }

    pub fn set_preview_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.preview_dir = dir.into();
        self
    }

    pub fn set_dpi(&mut self, dpi: u32) -> &mut Self {
        self.dpi = dpi;
        self
    }

    pub fn set_poppler_path(&mut self, path: Option<PathBuf>) -> &mut Self {
        self.poppler_path = path;
        self
    }

    pub fn set_overwrite(&mut self, overwrite: bool) -> &mut Self {
        self.overwrite = overwrite;
        self
    }

    pub fn bib_path(&self) -> &Path {
        &self.bib_path
    }

    pub fn pdf_dirs(&self) -> &[PathBuf] {
        &self.pdf_dirs
    }

    pub fn preview_dir(&self) -> &Path {
        &self.preview_dir
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn poppler_path(&self) -> Option<&Path> {
        self.poppler_path.as_deref()
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }
}

/// The file name of an entry's preview image.
pub fn preview_file_name(key: &str) -> String {
    format!("{key}_preview.png")
}

/// What happened to a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// A new image was rendered and linked.
    Generated { file_name: String },
    /// An existing image was linked without rendering.
    Linked { file_name: String },
    /// The entry already had a `preview` field.
    AlreadyPresent,
    /// The entry has no key to name an image after.
    MissingKey,
    /// Neither `pdf` nor `file` resolved to a document.
    NoDocument,
    /// Rendering failed; the entry was left unchanged.
    Failed { reason: String },
}

impl EntryOutcome {
    /// Whether the entry gained a `preview` field.
    pub fn is_modified(&self) -> bool {
        matches!(self, Self::Generated { .. } | Self::Linked { .. })
    }
}

/// Outcome of one entry, with its key when it has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    pub key: Option<String>,
    pub outcome: EntryOutcome,
}

/// Per-entry outcomes of a run, in bibliography order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewReport {
    pub entries: Vec<EntryReport>,
}

impl PreviewReport {
    /// Whether any entry changed, meaning the bibliography must be rewritten.
    pub fn modified(&self) -> bool {
        self.entries.iter().any(|entry| entry.outcome.is_modified())
    }

    pub fn modified_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.outcome.is_modified())
            .count()
    }

    /// Number of images actually rendered.
    pub fn generated_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.outcome, EntryOutcome::Generated { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.outcome, EntryOutcome::Failed { .. }))
            .count()
    }
}

/// Walks a bibliography and links or renders missing previews.
pub struct PreviewResolver<'a> {
    config: &'a PreviewConfig,
    rasterizer: &'a dyn Rasterizer,
}

impl<'a> PreviewResolver<'a> {
    #[must_use]
    pub fn new(config: &'a PreviewConfig, rasterizer: &'a dyn Rasterizer) -> Self {
        Self { config, rasterizer }
    }

    /// Processes every entry in order. A failure on one entry never stops the
    /// others; it is logged and recorded in the report.
    pub fn process(&self, bibliography: &mut Bibliography) -> PreviewReport {
        let entries = bibliography
            .entries_mut()
            .map(|entry| {
                let outcome = self.process_entry(entry);
                EntryReport {
                    key: entry.key().map(String::from),
                    outcome,
                }
            })
            .collect();
        PreviewReport { entries }
    }

    fn process_entry(&self, entry: &mut BibEntry) -> EntryOutcome {
        let Some(key) = entry.key().map(String::from) else {
            warn!(
                entry_type = entry.entry_type(),
                title = entry.get("title").unwrap_or_default(),
                "Encountered BibTeX entry with no key; skipping"
            );
            return EntryOutcome::MissingKey;
        };

        if entry.contains(PREVIEW_FIELD) {
            debug!(key = %key, "Preview already set; skipping");
            return EntryOutcome::AlreadyPresent;
        }

        let pdf_field = entry.get("pdf");
        let file_field = entry.get("file");
        let Some(document) = find_document(pdf_field, file_field, self.config.pdf_dirs()) else {
            warn!(
                key = %key,
                pdf = pdf_field.unwrap_or_default(),
                file = file_field.unwrap_or_default(),
                "No PDF found for entry"
            );
            return EntryOutcome::NoDocument;
        };

        let file_name = preview_file_name(&key);
        let image = self.config.preview_dir().join(&file_name);

        let outcome = if image.exists() && !self.config.overwrite() {
            debug!(key = %key, image = %image.display(), "Preview image exists; linking without regenerating");
            EntryOutcome::Linked {
                file_name: file_name.clone(),
            }
        } else {
            info!(key = %key, document = %document.display(), "Generating preview");
            match self
                .rasterizer
                .render_first_page(&document, &image, self.config.dpi())
            {
                Ok(()) => EntryOutcome::Generated {
                    file_name: file_name.clone(),
                },
                Err(e) => {
                    error!(key = %key, document = %document.display(), "Failed to generate preview: {e}");
                    return EntryOutcome::Failed {
                        reason: e.to_string(),
                    };
                }
            }
        };

        entry.set(PREVIEW_FIELD, file_name);
        outcome
    }
}

/// Loads the configured bibliography, fills in missing previews and rewrites
/// the file if anything changed.
///
/// # Errors
///
/// Returns an error if the bibliography is missing, malformed or cannot be
/// written back. Per-entry failures are reported, not returned.
pub fn generate_previews(config: &PreviewConfig, rasterizer: &dyn Rasterizer) -> Result<PreviewReport> {
    info!(path = %config.bib_path().display(), "Loading bibliography");
    let mut bibliography = BibtexParser::new()
        .with_common_strings(false)
        .parse_file(config.bib_path())?;

    let report = PreviewResolver::new(config, rasterizer).process(&mut bibliography);

    if report.modified() {
        info!(
            path = %config.bib_path().display(),
            updated = report.modified_count(),
            "Writing updated bibliography"
        );
        BibtexWriter::new().write_file(&bibliography, config.bib_path())?;
    } else {
        info!("No changes made; every entry already has a preview or no PDF");
    }
    Ok(report)
}
