//! Integration tests for regenerating resume publications from a bibliography.

use std::fs;

use serde_json::{Value, json};
use sitebib::{BibError, update_resume};

const BIBLIOGRAPHY: &str = r#"@string{lab = {Example Lab}}

@inproceedings{doe2021,
  title = {Learning to {R}ank},
  booktitle = {Proceedings of ICML},
  year = {2021},
  url = {https://example.org/rank}
}

@article{smith2023,
  title = {Caf\'{e} Networks},
  journal = {Journal of Examples},
  year = 2023,
  month = may,
  doi = {https://doi.org/10.1000/XYZ},
  abstract = {We study caf\'es.}
}

@misc{draft,
  title = {Untitled Draft}
}
"#;

const RESUME: &str = r#"{
  "basics": {"name": "Ada"},
  "publications": [{"name": "stale"}],
  "work": [{"company": "X"}]
}"#;

#[test]
fn test_update_resume_replaces_publications() {
    let dir = tempfile::tempdir().unwrap();
    let bib = dir.path().join("papers.bib");
    let resume = dir.path().join("resume.json");
    fs::write(&bib, BIBLIOGRAPHY).unwrap();
    fs::write(&resume, RESUME).unwrap();

    let count = update_resume(&bib, &resume).unwrap();
    assert_eq!(count, 3);

    let written: Value = serde_json::from_str(&fs::read_to_string(&resume).unwrap()).unwrap();
    let keys: Vec<_> = written.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["basics", "publications", "work"]);
    assert_eq!(written["work"], json!([{"company": "X"}]));
    assert_eq!(
        written["publications"],
        json!([
            {
                "name": "Café Networks",
                "publisher": "Journal of Examples",
                "releaseDate": "2023-05-01",
                "url": "https://doi.org/10.1000/XYZ",
                "summary": "We study cafés."
            },
            {
                "name": "Learning to Rank",
                "publisher": "Proceedings of ICML",
                "releaseDate": "2021",
                "url": "https://example.org/rank",
                "summary": ""
            },
            {
                "name": "Untitled Draft",
                "publisher": "",
                "releaseDate": "",
                "url": "",
                "summary": ""
            }
        ])
    );
}

#[test]
fn test_update_resume_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let bib = dir.path().join("papers.bib");
    let resume = dir.path().join("resume.json");
    fs::write(&bib, BIBLIOGRAPHY).unwrap();
    fs::write(&resume, RESUME).unwrap();

    update_resume(&bib, &resume).unwrap();
    let first = fs::read(&resume).unwrap();
    update_resume(&bib, &resume).unwrap();
    let second = fs::read(&resume).unwrap();

    assert_eq!(first, second);
    assert!(first.ends_with(b"}\n"));
    // The bibliography is only read.
    assert_eq!(fs::read_to_string(&bib).unwrap(), BIBLIOGRAPHY);
}

#[test]
fn test_update_resume_creates_missing_resume() {
    let dir = tempfile::tempdir().unwrap();
    let bib = dir.path().join("papers.bib");
    let resume = dir.path().join("assets/json/resume.json");
    fs::write(&bib, "@misc{only, title = {Only}, year = 2020}").unwrap();

    assert_eq!(update_resume(&bib, &resume).unwrap(), 1);
    let written: Value = serde_json::from_str(&fs::read_to_string(&resume).unwrap()).unwrap();
    assert_eq!(written["publications"][0]["releaseDate"], "2020");
}

#[test]
fn test_missing_bibliography_leaves_resume_alone() {
    let dir = tempfile::tempdir().unwrap();
    let resume = dir.path().join("resume.json");
    fs::write(&resume, RESUME).unwrap();

    let result = update_resume(&dir.path().join("missing.bib"), &resume);

    assert!(matches!(result, Err(BibError::BibliographyNotFound(_))));
    assert_eq!(fs::read_to_string(&resume).unwrap(), RESUME);
}

#[test]
fn test_malformed_bibliography_leaves_resume_alone() {
    let dir = tempfile::tempdir().unwrap();
    let bib = dir.path().join("papers.bib");
    let resume = dir.path().join("resume.json");
    fs::write(&bib, "@article{broken,\n  title = {Unclosed\n").unwrap();
    fs::write(&resume, RESUME).unwrap();

    let result = update_resume(&bib, &resume);

    assert!(matches!(result, Err(BibError::MalformedInput { .. })));
    assert_eq!(fs::read_to_string(&resume).unwrap(), RESUME);
}
