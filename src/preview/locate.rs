use std::fs;
use std::iter;
use std::path::{Path, PathBuf};

use crate::utils::non_empty;

/// Paths to try for a document reference: the reference itself, then its file
/// name inside each search directory.
pub(crate) fn document_candidates(reference: &str, search_dirs: &[PathBuf]) -> Vec<PathBuf> {
    let file_name = Path::new(reference).file_name();
    iter::once(PathBuf::from(reference))
        .chain(
            file_name
                .into_iter()
                .flat_map(|name| search_dirs.iter().map(move |dir| dir.join(name))),
        )
        .collect()
}

/// Resolves a document reference to the first existing file among its
/// candidates. The result is canonicalized when possible.
pub fn locate_document(reference: &str, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    document_candidates(reference, search_dirs)
        .into_iter()
        .find(|candidate| candidate.is_file())
        .map(|found| fs::canonicalize(&found).unwrap_or(found))
}

/// Tries the `pdf` field, then the `file` field.
pub(crate) fn find_document(
    pdf_field: Option<&str>,
    file_field: Option<&str>,
    search_dirs: &[PathBuf],
) -> Option<PathBuf> {
    [pdf_field, file_field]
        .into_iter()
        .filter_map(non_empty)
        .find_map(|reference| locate_document(reference, search_dirs))
}
