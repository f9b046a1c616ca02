//! First-page rasterization of PDF documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use thiserror::Error;
use tracing::debug;

/// Errors raised while rendering a preview image.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to launch {}: {source}", .program.display())]
    Launch {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("{} exited with {status}: {stderr}", .program.display())]
    Failed {
        program: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("no image was produced for {}", .0.display())]
    NoImage(PathBuf),
}

/// Renders the first page of a document to a PNG file.
pub trait Rasterizer {
    /// Writes the first page of `document` to `output` at `dpi` dots per inch.
    ///
    /// # Errors
    ///
    /// Returns a `RasterError` if the page could not be rendered; `output` is
    /// then not guaranteed to exist.
    fn render_first_page(&self, document: &Path, output: &Path, dpi: u32) -> Result<(), RasterError>;
}

/// Rasterizer backed by Poppler's `pdftoppm`.
#[derive(Debug, Clone, Default)]
pub struct Pdftoppm {
    poppler_path: Option<PathBuf>,
}

impl Pdftoppm {
    /// Uses `pdftoppm` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `pdftoppm` from the given Poppler directory instead of `PATH`.
    #[must_use]
    pub fn with_poppler_path(mut self, poppler_path: Option<&Path>) -> Self {
        self.poppler_path = poppler_path.map(Path::to_path_buf);
        self
    }

    /// The program that will be run.
    pub fn program(&self) -> PathBuf {
        match &self.poppler_path {
            Some(dir) => dir.join("pdftoppm"),
            None => PathBuf::from("pdftoppm"),
        }
    }
}

impl Rasterizer for Pdftoppm {
    fn render_first_page(&self, document: &Path, output: &Path, dpi: u32) -> Result<(), RasterError> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // pdftoppm appends ".png" to the output root it is given.
        let root = output.with_extension("");
        let produced = root.with_extension("png");
        let program = self.program();
        debug!(
            program = %program.display(),
            document = %document.display(),
            output = %output.display(),
            dpi,
            "Converting first page"
        );

        let result = Command::new(&program)
            .arg("-png")
            .arg("-r")
            .arg(dpi.to_string())
            .args(["-f", "1", "-l", "1", "-singlefile"])
            .arg(document)
            .arg(&root)
            .output()
            .map_err(|source| RasterError::Launch {
                program: program.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(RasterError::Failed {
                program,
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        if !produced.is_file() {
            return Err(RasterError::NoImage(document.to_path_buf()));
        }
        if produced != output {
            fs::rename(&produced, output)?;
        }
        Ok(())
    }
}
