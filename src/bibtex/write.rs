//! BibTeX formatting.
//!
//! Converts a [`Bibliography`] back to BibTeX text. Fields read from source are
//! written with their original value text; fields set in memory are braced.

use crate::bibtex::structure::{BibEntry, BibItem, Bibliography, Field};

/// Format every item, separated by blank lines, with a trailing newline.
pub(crate) fn format_bibliography(bibliography: &Bibliography, indent: &str) -> String {
    let mut result = bibliography
        .items()
        .iter()
        .map(|item| format_item(item, indent))
        .collect::<Vec<_>>()
        .join("\n\n");
    if !result.is_empty() {
        result.push('\n');
    }
    result
}

fn format_item(item: &BibItem, indent: &str) -> String {
    match item {
        BibItem::Entry(entry) => format_entry(entry, indent),
        BibItem::StringDef { name, raw, .. } => format!("@string{{{name} = {raw}}}"),
        BibItem::Preamble(body) => format!("@preamble{{{body}}}"),
        BibItem::Comment(body) => format!("@comment{{{body}}}"),
    }
}

fn format_entry(entry: &BibEntry, indent: &str) -> String {
    let mut result = String::new();

    result.push('@');
    result.push_str(entry.entry_type());
    result.push('{');
    result.push_str(entry.key().unwrap_or_default());

    let fields = entry.raw_fields();
    for (index, field) in fields.iter().enumerate() {
        if index > 0 || entry.key().is_some() {
            result.push(',');
        }
        result.push('\n');
        result.push_str(indent);
        result.push_str(&field.name);
        result.push_str(" = ");
        result.push_str(&format_field_value(field));
    }

    if !fields.is_empty() {
        result.push('\n');
    }
    result.push('}');
    result
}

/// Format a field value, reusing the source text when the field is unchanged.
fn format_field_value(field: &Field) -> String {
    if let Some(raw) = &field.raw {
        return raw.clone();
    }

    let value = &field.value;
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        return value.clone();
    }

    let mut result = String::with_capacity(value.len() + 2);
    result.push('{');
    result.push_str(value);
    result.push('}');
    result
}
