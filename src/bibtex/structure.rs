//! BibTeX data structures.
//!
//! A [`Bibliography`] is an ordered list of [`BibItem`]s. Entries keep their
//! fields in source order, and every parsed field remembers the raw text it
//! was read from so that an unchanged field is written back exactly as it was.

/// A single `name = value` pair of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Field {
    /// Field name as written in the source.
    pub(crate) name: String,
    /// Value with delimiters removed, macros expanded and concatenations joined.
    pub(crate) value: String,
    /// Source text of the value expression, `None` for fields set in memory.
    pub(crate) raw: Option<String>,
}

impl Field {
    fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// One citation record: an entry type, an optional citation key and named text fields.
///
/// Field lookups are case-insensitive. A field that is absent is reported as
/// `None`, which callers keep distinct from a field that is present but empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BibEntry {
    entry_type: String,
    key: Option<String>,
    fields: Vec<Field>,
}

impl BibEntry {
    /// Creates an empty entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitebib::BibEntry;
    ///
    /// let mut entry = BibEntry::new("article", Some("smith2023"));
    /// entry.set("title", "On Examples");
    /// assert_eq!(entry.get("TITLE"), Some("On Examples"));
    /// ```
    #[must_use]
    pub fn new(entry_type: &str, key: Option<&str>) -> Self {
        Self {
            entry_type: entry_type.to_string(),
            key: key.map(str::trim).filter(|k| !k.is_empty()).map(String::from),
            fields: Vec::new(),
        }
    }

    /// The entry type as written, e.g. `article` or `InProceedings`.
    pub fn entry_type(&self) -> &str {
        &self.entry_type
    }

    /// The citation key, `None` when the entry has none.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Returns the value of a field, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.is_named(name))
            .map(|field| field.value.as_str())
    }

    /// Checks whether the entry has a field, regardless of its value.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.is_named(name))
    }

    /// Sets a field, replacing the value in place or appending a new field.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|field| field.is_named(name)) {
            Some(field) => {
                field.value = value;
                field.raw = None;
            }
            None => self.fields.push(Field {
                name: name.to_string(),
                value,
                raw: None,
            }),
        }
    }

    /// Iterates over `(name, value)` pairs in order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|field| (field.name.as_str(), field.value.as_str()))
    }

    /// Adds a field read from source; a repeated name keeps its first position
    /// and takes the later value.
    pub(crate) fn push_parsed(&mut self, name: String, value: String, raw: String) {
        match self.fields.iter_mut().find(|field| field.is_named(&name)) {
            Some(field) => {
                field.value = value;
                field.raw = Some(raw);
            }
            None => self.fields.push(Field {
                name,
                value,
                raw: Some(raw),
            }),
        }
    }

    pub(crate) fn raw_fields(&self) -> &[Field] {
        &self.fields
    }
}

/// A top-level block of a BibTeX file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BibItem {
    /// A citation entry.
    Entry(BibEntry),
    /// An `@string{name = value}` definition.
    StringDef {
        name: String,
        value: String,
        raw: String,
    },
    /// An `@preamble{...}` block, body kept verbatim.
    Preamble(String),
    /// An `@comment{...}` block, body kept verbatim.
    Comment(String),
}

/// An ordered BibTeX database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bibliography {
    items: Vec<BibItem>,
}

impl Bibliography {
    /// Creates an empty bibliography.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_items(items: Vec<BibItem>) -> Self {
        Self { items }
    }

    /// All blocks in file order.
    pub fn items(&self) -> &[BibItem] {
        &self.items
    }

    /// Citation entries in file order.
    pub fn entries(&self) -> impl Iterator<Item = &BibEntry> {
        self.items.iter().filter_map(|item| match item {
            BibItem::Entry(entry) => Some(entry),
            _ => None,
        })
    }

    /// Mutable citation entries in file order.
    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut BibEntry> {
        self.items.iter_mut().filter_map(|item| match item {
            BibItem::Entry(entry) => Some(entry),
            _ => None,
        })
    }

    /// Appends an entry.
    pub fn push_entry(&mut self, entry: BibEntry) {
        self.items.push(BibItem::Entry(entry));
    }

    /// Number of citation entries.
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    /// Whether the bibliography holds no citation entries.
    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_new() {
        let entry = BibEntry::new("article", Some("  "));
        assert_eq!(entry.entry_type(), "article");
        assert_eq!(entry.key(), None);
        assert_eq!(entry.fields().count(), 0);
    }

    #[test]
    fn test_absent_and_empty_fields_differ() {
        let mut entry = BibEntry::new("misc", Some("x"));
        entry.set("note", "");
        assert_eq!(entry.get("note"), Some(""));
        assert!(entry.contains("note"));
        assert_eq!(entry.get("title"), None);
        assert!(!entry.contains("title"));
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut entry = BibEntry::new("article", Some("a"));
        entry.push_parsed("Title".into(), "Old".into(), "{Old}".into());
        entry.push_parsed("year".into(), "2020".into(), "2020".into());
        entry.set("title", "New");

        let fields: Vec<_> = entry.fields().collect();
        assert_eq!(fields, vec![("Title", "New"), ("year", "2020")]);
        assert_eq!(entry.raw_fields()[0].raw, None);
    }

    #[test]
    fn test_repeated_field_keeps_position_takes_last_value() {
        let mut entry = BibEntry::new("article", Some("a"));
        entry.push_parsed("title".into(), "First".into(), "{First}".into());
        entry.push_parsed("year".into(), "2020".into(), "2020".into());
        entry.push_parsed("TITLE".into(), "Second".into(), "{Second}".into());

        let fields: Vec<_> = entry.fields().collect();
        assert_eq!(fields, vec![("title", "Second"), ("year", "2020")]);
    }

    #[test]
    fn test_bibliography_entries_skip_other_items() {
        let mut bibliography = Bibliography::from_items(vec![
            BibItem::Comment("generated".into()),
            BibItem::Entry(BibEntry::new("article", Some("a"))),
            BibItem::Preamble("{\\newcommand{\\x}{y}}".into()),
        ]);
        bibliography.push_entry(BibEntry::new("book", Some("b")));

        let keys: Vec<_> = bibliography.entries().filter_map(BibEntry::key).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(bibliography.len(), 2);
        assert_eq!(bibliography.items().len(), 4);
        assert!(!bibliography.is_empty());
    }
}
