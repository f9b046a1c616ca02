//! JSON-Resume publication records derived from BibTeX entries.
//!
//! # Field Mapping
//!
//! - `name`: the `title`, converted to plain text
//! - `publisher`: the first present of `journal`, `booktitle`, `publisher`
//! - `releaseDate`: `YYYY-MM-DD` when a month is known (day defaults to `01`),
//!   else `YYYY`, else empty
//! - `url`: explicit `url`, else `https://doi.org/{doi}`, else
//!   `https://arxiv.org/abs/{eprint}`, else empty
//! - `summary`: the `abstract`, converted to plain text
//!
//! A missing field never fails a conversion; the output field is left empty.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::bibtex::BibEntry;
use crate::latex::latex_to_text;
use crate::utils::{bare_doi, day_to_number, month_to_number, non_empty, parse_year};

/// Fields tried, in order, for the venue.
const PUBLISHER_FIELDS: [&str; 3] = ["journal", "booktitle", "publisher"];

/// A publication as listed in a JSON-Resume document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    /// Title of the work
    pub name: String,
    /// Journal, proceedings or publisher
    pub publisher: String,
    /// `YYYY-MM-DD`, `YYYY` or empty
    #[serde(rename = "releaseDate")]
    pub release_date: String,
    /// Best link to the work
    pub url: String,
    /// Abstract
    pub summary: String,
}

impl From<&BibEntry> for Publication {
    fn from(entry: &BibEntry) -> Self {
        let publisher = PUBLISHER_FIELDS
            .iter()
            .find_map(|field| non_empty(entry.get(field)))
            .map(latex_to_text)
            .unwrap_or_default();

        Self {
            name: entry.get("title").map(latex_to_text).unwrap_or_default(),
            publisher,
            release_date: release_date(entry),
            url: best_url(entry).unwrap_or_default(),
            summary: entry.get("abstract").map(latex_to_text).unwrap_or_default(),
        }
    }
}

impl Publication {
    /// The date used for ordering: a full date, else January 1st of the year,
    /// else the earliest representable date.
    pub fn sort_key(&self) -> NaiveDate {
        NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d")
            .ok()
            .or_else(|| parse_bare_year(&self.release_date))
            .unwrap_or(NaiveDate::MIN)
    }
}

fn parse_bare_year(date: &str) -> Option<NaiveDate> {
    if date.len() != 4 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(date.parse().ok()?, 1, 1)
}

/// Builds the release date from `year`, `month` and `day`.
fn release_date(entry: &BibEntry) -> String {
    let Some(year) = parse_year(entry.get("year")) else {
        return String::new();
    };
    match month_to_number(entry.get("month")) {
        Some(month) => {
            let day = day_to_number(entry.get("day")).unwrap_or_else(|| "01".to_string());
            format!("{year}-{month}-{day}")
        }
        None => year.to_string(),
    }
}

/// Candidate URLs in priority order; the first one present wins.
fn url_candidates(entry: &BibEntry) -> [Option<String>; 3] {
    [
        non_empty(entry.get("url")).map(String::from),
        non_empty(entry.get("doi"))
            .and_then(bare_doi)
            .map(|doi| format!("https://doi.org/{doi}")),
        non_empty(entry.get("eprint")).map(|eprint| format!("https://arxiv.org/abs/{eprint}")),
    ]
}

fn best_url(entry: &BibEntry) -> Option<String> {
    url_candidates(entry).into_iter().flatten().next()
}

/// Sorts newest first. The sort is stable: publications with equal dates,
/// including all undated ones, keep their relative order.
pub fn sort_newest_first(publications: &mut [Publication]) {
    publications.sort_by_key(|publication| std::cmp::Reverse(publication.sort_key()));
}

/// Converts every entry and sorts the result newest first.
pub fn publications_from<'a>(entries: impl IntoIterator<Item = &'a BibEntry>) -> Vec<Publication> {
    let mut publications: Vec<Publication> = entries.into_iter().map(Publication::from).collect();
    sort_newest_first(&mut publications);
    publications
}
