//! The resume document that receives the generated publication list.
//!
//! Only the `publications` key is owned here; every other key is carried
//! through untouched and in its original order.
//!
//! # Example
//!
//! ```
//! use sitebib::{Publication, ResumeDocument};
//!
//! let mut resume = ResumeDocument::from_json_str(r#"{"basics": {"name": "Ada"}}"#).unwrap();
//! resume.set_publications(&[Publication::default()]).unwrap();
//!
//! let json = resume.to_json_string().unwrap();
//! assert!(json.starts_with("{\n  \"basics\""));
//! assert!(json.ends_with("}\n"));
//! ```

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::bibtex::BibtexParser;
use crate::publication::{Publication, publications_from};
use crate::{BibError, Result};

/// Key of the resume document holding the publication list.
pub const PUBLICATIONS_KEY: &str = "publications";

/// A JSON object with arbitrary top-level keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumeDocument {
    data: Map<String, Value>,
}

impl ResumeDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a document, which must be a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `BibError::Json` for invalid JSON and `BibError::InvalidFormat`
    /// when the top-level value is not an object.
    pub fn from_json_str(input: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(input)? {
            Value::Object(data) => Ok(Self { data }),
            other => Err(BibError::InvalidFormat(format!(
                "resume document must be a JSON object, found {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Loads the document at `path`, or an empty one when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No existing resume; starting from an empty document");
            return Ok(Self::new());
        }
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Replaces the `publications` key, leaving every other key as it was.
    ///
    /// # Errors
    ///
    /// Returns `BibError::Json` if the publications cannot be serialized.
    pub fn set_publications(&mut self, publications: &[Publication]) -> Result<()> {
        self.data
            .insert(PUBLICATIONS_KEY.to_string(), serde_json::to_value(publications)?);
        Ok(())
    }

    /// Returns a top-level value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Serializes with two-space indentation and a trailing newline. Non-ASCII
    /// characters are written as-is.
    ///
    /// # Errors
    ///
    /// Returns `BibError::Json` if serialization fails.
    pub fn to_json_string(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(&self.data)?;
        json.push('\n');
        Ok(json)
    }

    /// Writes the document to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Regenerates the `publications` section of the resume at `resume_path` from
/// the bibliography at `bib_path`. Returns the number of publications written.
///
/// # Errors
///
/// Returns `BibError::BibliographyNotFound` if the bibliography is missing,
/// or any parse, read or write error.
pub fn update_resume(bib_path: &Path, resume_path: &Path) -> Result<usize> {
    let bibliography = BibtexParser::new().parse_file(bib_path)?;
    let publications = publications_from(bibliography.entries());

    let mut resume = ResumeDocument::load(resume_path)?;
    resume.set_publications(&publications)?;
    resume.save(resume_path)?;

    info!(
        count = publications.len(),
        path = %resume_path.display(),
        "Updated resume publications"
    );
    Ok(publications.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_other_keys_are_preserved_in_order() {
        let input = r#"{"basics": {"name": "Ada"}, "publications": [{"name": "old"}], "work": []}"#;
        let mut resume = ResumeDocument::from_json_str(input).unwrap();
        resume
            .set_publications(&[Publication {
                name: "New".to_string(),
                ..Publication::default()
            }])
            .unwrap();

        let json = resume.to_json_string().unwrap();
        assert_eq!(
            json,
            r#"{
  "basics": {
    "name": "Ada"
  },
  "publications": [
    {
      "name": "New",
      "publisher": "",
      "releaseDate": "",
      "url": "",
      "summary": ""
    }
  ],
  "work": []
}
"#
        );
    }

    #[test]
    fn test_publications_key_appended_when_absent() {
        let mut resume = ResumeDocument::from_json_str(r#"{"basics": {}}"#).unwrap();
        resume.set_publications(&[]).unwrap();
        assert_eq!(
            resume.to_json_string().unwrap(),
            "{\n  \"basics\": {},\n  \"publications\": []\n}\n"
        );
    }

    #[test]
    fn test_non_ascii_is_not_escaped() {
        let mut resume = ResumeDocument::new();
        resume
            .set_publications(&[Publication {
                name: "Über Größe".to_string(),
                ..Publication::default()
            }])
            .unwrap();
        let json = resume.to_json_string().unwrap();
        assert!(json.contains("\"name\": \"Über Größe\""));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn test_rejects_non_object_documents() {
        let result = ResumeDocument::from_json_str("[1, 2]");
        assert!(matches!(result, Err(BibError::InvalidFormat(msg)) if msg.contains("an array")));
    }

    #[test]
    fn test_rejects_invalid_json() {
        assert!(matches!(
            ResumeDocument::from_json_str("{not json"),
            Err(BibError::Json(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let resume = ResumeDocument::load(Path::new("no/such/resume.json")).unwrap();
        assert_eq!(resume, ResumeDocument::new());
        assert!(resume.get(PUBLICATIONS_KEY).is_none());
    }
}
