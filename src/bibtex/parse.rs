//! BibTeX parsing implementation.
//!
//! This module handles the low-level scanning of BibTeX text into [`BibItem`]s.

use std::collections::HashMap;

use crate::BibError;
use crate::bibtex::structure::{BibEntry, BibItem};

/// The standard month macros every BibTeX style defines.
const MONTH_STRINGS: &[(&str, &str)] = &[
    ("jan", "January"),
    ("feb", "February"),
    ("mar", "March"),
    ("apr", "April"),
    ("may", "May"),
    ("jun", "June"),
    ("jul", "July"),
    ("aug", "August"),
    ("sep", "September"),
    ("oct", "October"),
    ("nov", "November"),
    ("dec", "December"),
];

/// Parse the content of a BibTeX file into its top-level blocks.
pub(crate) fn bibtex_parse(text: &str, common_strings: bool) -> Result<Vec<BibItem>, BibError> {
    let mut macros: HashMap<String, String> = HashMap::new();
    if common_strings {
        for (name, value) in MONTH_STRINGS {
            macros.insert((*name).to_string(), (*value).to_string());
        }
    }

    let mut items = Vec::new();
    let mut cursor = Cursor::new(text);

    while cursor.skip_to('@') {
        let block_start = cursor.pos;
        cursor.bump();
        cursor.skip_whitespace();
        let block_type = cursor.take_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        cursor.skip_whitespace();

        let close = match cursor.peek() {
            Some('{') if !block_type.is_empty() => '}',
            Some('(') if !block_type.is_empty() => ')',
            // A stray '@' in free text between blocks.
            _ => continue,
        };
        cursor.bump();

        match block_type.to_ascii_lowercase().as_str() {
            "comment" => {
                let body = cursor.take_body(close, block_start)?;
                items.push(BibItem::Comment(body.trim().to_string()));
            }
            "preamble" => {
                let body = cursor.take_body(close, block_start)?;
                items.push(BibItem::Preamble(body.trim().to_string()));
            }
            "string" => {
                let (name, value, raw) = parse_assignment(&mut cursor, close, &macros, block_start)?;
                cursor.skip_whitespace();
                cursor.expect(close, "@string definition")?;
                macros.insert(name.to_ascii_lowercase(), value.clone());
                items.push(BibItem::StringDef { name, value, raw });
            }
            _ => {
                let entry = parse_entry(&mut cursor, &block_type, close, &macros, block_start)?;
                items.push(BibItem::Entry(entry));
            }
        }
    }

    Ok(items)
}

/// Parse the body of a citation entry, after its opening delimiter.
fn parse_entry(
    cursor: &mut Cursor<'_>,
    entry_type: &str,
    close: char,
    macros: &HashMap<String, String>,
    block_start: usize,
) -> Result<BibEntry, BibError> {
    cursor.skip_whitespace();
    let key_start = cursor.pos;
    let key = cursor.take_while(|c| c != ',' && c != close && c != '\n' && c != '=');

    let key = if cursor.peek() == Some('=') {
        // No citation key: the first token was a field name.
        cursor.pos = key_start;
        None
    } else {
        Some(key.trim().to_string())
    };

    let mut entry = BibEntry::new(entry_type, key.as_deref());

    loop {
        cursor.skip_whitespace();
        match cursor.peek() {
            Some(',') => {
                cursor.bump();
            }
            Some(c) if c == close => {
                cursor.bump();
                return Ok(entry);
            }
            Some(_) => {
                let (name, value, raw) = parse_assignment(cursor, close, macros, block_start)?;
                entry.push_parsed(name, value, raw);
            }
            None => {
                return Err(cursor.malformed(
                    block_start,
                    format!("unterminated entry '{}'", entry.key().unwrap_or(entry_type)),
                ));
            }
        }
    }
}

/// Parse `name = value [# value ...]`, returning the name, resolved value and raw value text.
fn parse_assignment(
    cursor: &mut Cursor<'_>,
    close: char,
    macros: &HashMap<String, String>,
    block_start: usize,
) -> Result<(String, String, String), BibError> {
    cursor.skip_whitespace();
    let name = cursor
        .take_while(|c| !c.is_whitespace() && !matches!(c, '=' | ',' | '{' | '}' | '(' | ')'))
        .to_string();
    if name.is_empty() {
        return Err(cursor.malformed(cursor.pos, "expected a field name".to_string()));
    }
    cursor.skip_whitespace();
    cursor.expect('=', &format!("field '{name}'"))?;
    cursor.skip_whitespace();

    let raw_start = cursor.pos;
    let mut value = String::new();
    loop {
        cursor.skip_whitespace();
        match cursor.peek() {
            Some('{') => {
                cursor.bump();
                value.push_str(cursor.take_body('}', block_start)?);
            }
            Some('"') => {
                cursor.bump();
                value.push_str(cursor.take_quoted(block_start)?);
            }
            Some(c) if c.is_ascii_digit() => {
                value.push_str(cursor.take_while(|c| c.is_ascii_digit()));
            }
            Some(c) if c.is_alphabetic() => {
                let macro_name = cursor.take_while(|c| {
                    !c.is_whitespace() && !matches!(c, '#' | ',' | '{' | '}' | '(' | ')' | '"' | '=')
                });
                match macros.get(&macro_name.to_ascii_lowercase()) {
                    Some(expanded) => value.push_str(expanded),
                    None => value.push_str(macro_name),
                }
            }
            _ => {
                return Err(cursor.malformed(
                    cursor.pos,
                    format!("expected a value for field '{name}'"),
                ));
            }
        }

        let raw_end = cursor.pos;
        cursor.skip_whitespace();
        if cursor.peek() == Some('#') {
            cursor.bump();
            continue;
        }

        match cursor.peek() {
            Some(c) if c == ',' || c == close => {}
            Some(_) => {
                return Err(cursor.malformed(
                    cursor.pos,
                    format!("expected ',' or '{close}' after field '{name}'"),
                ));
            }
            None => return Err(cursor.malformed(block_start, "unterminated entry".to_string())),
        }
        let raw = cursor.slice(raw_start, raw_end).to_string();
        return Ok((name, value, raw));
    }
}

/// A byte-offset cursor over the source text.
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[start..end]
    }

    /// Moves to the next occurrence of `target`, returning false at end of input.
    fn skip_to(&mut self, target: char) -> bool {
        match self.text[self.pos..].find(target) {
            Some(offset) => {
                self.pos += offset;
                true
            }
            None => {
                self.pos = self.text.len();
                false
            }
        }
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn take_while(&mut self, mut predicate: impl FnMut(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.text[start..self.pos]
    }

    fn expect(&mut self, expected: char, context: &str) -> Result<(), BibError> {
        if self.peek() == Some(expected) {
            self.bump();
            Ok(())
        } else {
            Err(self.malformed(self.pos, format!("expected '{expected}' in {context}")))
        }
    }

    /// Consumes text up to the delimiter closing an already-opened block,
    /// balancing nested braces. Returns the text between the delimiters.
    fn take_body(&mut self, close: char, block_start: usize) -> Result<&'a str, BibError> {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    self.bump();
                }
                '{' => depth += 1,
                '}' if depth > 0 => depth -= 1,
                c if c == close && depth == 0 => {
                    return Ok(&self.text[start..self.pos - c.len_utf8()]);
                }
                _ => {}
            }
        }
        Err(self.malformed(block_start, "unbalanced braces".to_string()))
    }

    /// Consumes a quoted value after its opening quote; quotes nested in braces do not close it.
    fn take_quoted(&mut self, block_start: usize) -> Result<&'a str, BibError> {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    self.bump();
                }
                '{' => depth += 1,
                '}' if depth > 0 => depth -= 1,
                '"' if depth == 0 => return Ok(&self.text[start..self.pos - 1]),
                _ => {}
            }
        }
        Err(self.malformed(block_start, "unterminated quoted value".to_string()))
    }

    fn malformed(&self, at: usize, message: String) -> BibError {
        let line = self.text[..at.min(self.text.len())].matches('\n').count() + 1;
        BibError::MalformedInput { message, line }
    }
}
