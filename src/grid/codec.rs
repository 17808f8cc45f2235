//! A1 notation helpers shared by [`Address`](super::Address) and [`GridRange`](super::GridRange).
//!
//! Column letters use bijective base-26: there is no zero digit, so `Z` is 26
//! and the next column is `AA` (27), not `BA`.

use regex::Regex;
use std::sync::LazyLock;

const RADIX: u32 = 26;

static CELL_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]*)(\d*)$").expect("cell label pattern is valid"));

/// Encode a 1-based column number as letters. Zero encodes as an empty string.
pub fn column_to_letters(col: u32) -> String {
    let mut letters = Vec::new();
    let mut div = col;
    while div > 0 {
        let mut rem = div % RADIX;
        div /= RADIX;
        if rem == 0 {
            rem = RADIX;
            div -= 1;
        }
        letters.push(char::from(b'A' + (rem - 1) as u8));
    }
    letters.iter().rev().collect()
}

/// Decode column letters (case-insensitive) into a 1-based column number.
///
/// Returns `None` for an empty string, a non-letter, or a value that overflows `u32`.
pub fn letters_to_column(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    letters.bytes().try_fold(0u32, |acc, b| {
        let digit = match b {
            b'A'..=b'Z' => b - b'A' + 1,
            b'a'..=b'z' => b - b'a' + 1,
            _ => return None,
        };
        acc.checked_mul(RADIX)?.checked_add(u32::from(digit))
    })
}

/// Components of a single cell label such as `B3`, `B` or `3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CellLabelParts {
    pub row: Option<u32>,
    pub col: Option<u32>,
}

/// Split a cell label into its row and column parts. Either part may be absent.
///
/// Returns `None` when the label does not have the letters-then-digits shape or a
/// component does not fit in `u32`.
pub(crate) fn parse_cell_label(label: &str) -> Option<CellLabelParts> {
    let caps = CELL_LABEL_RE.captures(label)?;
    let letters = caps.get(1).map_or("", |m| m.as_str());
    let digits = caps.get(2).map_or("", |m| m.as_str());

    let col = match letters {
        "" => None,
        letters => Some(letters_to_column(letters)?),
    };
    let row = match digits {
        "" => None,
        digits => Some(digits.parse::<u32>().ok()?),
    };

    Some(CellLabelParts { row, col })
}

/// Split an optional `'Sheet title'!` prefix off a range label.
///
/// The title is returned unquoted, with doubled quotes collapsed.
pub(crate) fn split_sheet_prefix(label: &str) -> (Option<String>, &str) {
    match label.rsplit_once('!') {
        Some((title, rest)) => (Some(unquote_sheet_title(title)), rest),
        None => (None, label),
    }
}

fn unquote_sheet_title(title: &str) -> String {
    let inner = title
        .strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .unwrap_or(title);
    inner.replace("''", "'")
}

/// Quote a sheet title for use as a range prefix: `Bob's` becomes `'Bob''s'`.
pub(crate) fn quote_sheet_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}
