//! Extraction of tuple rows from legacy SQL dumps.
//!
//! The legacy dumps are INSERT blocks with one parenthesized tuple per
//! row. Candidate tuples are found with a regex that keeps quoted strings
//! intact; each candidate is then lexed into fields and shape-checked.
//!
//! A candidate that leads with a number but fails the shape check is a
//! malformed row: skipped and counted under [`RowPolicy::Lenient`], fatal
//! under [`RowPolicy::Strict`]. Candidates that do not lead with a number
//! (column lists and other statement structure) are not rows and are
//! ignored outright. Valid rows come back in source order.

use crate::core::error;
use crate::core::report;
use regex::Regex;
use serde::Serialize;

/// What to do with a tuple that looks like a data row but has the wrong
/// shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPolicy {
    /// Skip it and count it. Matches the legacy extraction's tolerance.
    Lenient,
    /// Fail the parse on the first malformed row.
    Strict,
}

#[derive(Debug, Clone)]
pub struct LegacyCardType {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct LegacyCard {
    pub id: String,
    pub name: String,
    pub card_type_id: String,
    pub image: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedRow {
    pub line: usize,
    pub snippet: String,
}

#[derive(Debug)]
pub struct ParseOutcome<T> {
    /// Valid rows, in source order.
    pub rows: Vec<T>,
    /// Malformed rows that were tolerated (always empty under Strict).
    pub skipped: Vec<SkippedRow>,
}

/// One lexed tuple field.
#[derive(Debug)]
struct Field {
    value: String,
    quoted: bool,
}

impl Field {
    fn is_numeric(&self) -> bool {
        !self.value.is_empty() && self.value.bytes().all(|b| b.is_ascii_digit())
    }
}

/// Parse `(legacy_id, 'name')` rows from a card-type dump.
pub fn parse_card_types(
    text: &str,
    policy: RowPolicy,
) -> Result<ParseOutcome<LegacyCardType>, error::CardshiftError> {
    parse_rows(text, policy, "cardtypes", |fields| match fields {
        [id, name] if id.is_numeric() && name.quoted => Some(LegacyCardType {
            id: id.value.clone(),
            name: name.value.clone(),
        }),
        _ => None,
    })
}

/// Parse `(legacy_id, 'name', legacy_ctid, 'image')` rows from a card dump.
pub fn parse_cards(
    text: &str,
    policy: RowPolicy,
) -> Result<ParseOutcome<LegacyCard>, error::CardshiftError> {
    parse_rows(text, policy, "cards", |fields| match fields {
        [id, name, type_id, image]
            if id.is_numeric() && name.quoted && type_id.is_numeric() && image.quoted =>
        {
            Some(LegacyCard {
                id: id.value.clone(),
                name: name.value.clone(),
                card_type_id: type_id.value.clone(),
                image: image.value.clone(),
            })
        }
        _ => None,
    })
}

fn parse_rows<T>(
    text: &str,
    policy: RowPolicy,
    table: &str,
    shape: impl Fn(&[Field]) -> Option<T>,
) -> Result<ParseOutcome<T>, error::CardshiftError> {
    // Parens inside quoted strings must not end a candidate.
    let candidates = Regex::new(r#"\(((?:[^()'"]|'[^']*'|"[^"]*")*)\)"#).expect("static regex");

    let mut rows = Vec::new();
    let mut skipped = Vec::new();
    for caps in candidates.captures_iter(text) {
        let whole = caps.get(0).expect("whole match");
        let interior = caps.get(1).expect("tuple interior").as_str();

        if let Some(row) = lex_fields(interior).as_deref().and_then(&shape) {
            rows.push(row);
            continue;
        }
        if !leads_with_number(interior) {
            continue;
        }

        let line = 1 + text[..whole.start()].matches('\n').count();
        let snippet = report::condense(whole.as_str(), 80);
        match policy {
            RowPolicy::Strict => {
                return Err(error::CardshiftError::MalformedRow {
                    table: table.to_string(),
                    line,
                    snippet,
                });
            }
            RowPolicy::Lenient => skipped.push(SkippedRow { line, snippet }),
        }
    }
    Ok(ParseOutcome { rows, skipped })
}

/// Data rows lead with a (possibly quoted) integer; anything else is
/// statement structure.
fn leads_with_number(interior: &str) -> bool {
    let trimmed = interior.trim_start();
    let unquoted = trimmed
        .strip_prefix('\'')
        .or_else(|| trimmed.strip_prefix('"'))
        .unwrap_or(trimmed);
    unquoted.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Split a tuple interior into fields. Quoted fields may contain commas
/// and newlines; there is no escape handling, so a quote ends its field.
/// Returns None when the interior is not a clean comma-separated tuple.
fn lex_fields(interior: &str) -> Option<Vec<Field>> {
    fn skip_ws(chars: &[char], mut i: usize) -> usize {
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        i
    }

    let chars: Vec<char> = interior.chars().collect();
    let len = chars.len();
    let mut fields = Vec::new();

    let mut i = skip_ws(&chars, 0);
    if i >= len {
        return Some(fields);
    }
    loop {
        let field = if chars[i] == '\'' || chars[i] == '"' {
            let quote = chars[i];
            i += 1;
            let start = i;
            while i < len && chars[i] != quote {
                i += 1;
            }
            if i >= len {
                return None; // unterminated quote
            }
            let value: String = chars[start..i].iter().collect();
            i += 1;
            Field {
                value,
                quoted: true,
            }
        } else {
            let start = i;
            while i < len && chars[i] != ',' {
                i += 1;
            }
            let value: String = chars[start..i].iter().collect::<String>().trim().to_string();
            if value.is_empty() {
                return None; // bare comma
            }
            Field {
                value,
                quoted: false,
            }
        };
        fields.push(field);

        i = skip_ws(&chars, i);
        if i >= len {
            break;
        }
        if chars[i] != ',' {
            return None; // junk between a field and the next separator
        }
        i = skip_ws(&chars, i + 1);
        if i >= len {
            return None; // trailing comma
        }
    }
    Some(fields)
}
