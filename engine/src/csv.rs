//! CSV import and export.
//!
//! Export writes `name,email,major` followed by one fully quoted line per
//! record. Import is permissive: unknown columns are ignored, missing cells
//! become empty strings, and rows are never rejected for missing fields.
//! Every imported cell is trimmed, quoted or not, so leading and trailing
//! spaces inside a value do not survive an export and re-import.

use crate::{Student, StudentDraft};

/// Export header. The id column is never exported.
pub const HEADER: [&str; 3] = ["name", "email", "major"];

const NAME_ALIASES: [&str; 4] = ["name", "FullName", "fullname", "Name"];
const EMAIL_ALIASES: [&str; 2] = ["email", "Email"];
const MAJOR_ALIASES: [&str; 2] = ["major", "Major"];

/// Serialize records (without ids). Returns an empty string for no records.
pub fn export<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a Student>,
{
    let rows: Vec<String> = records
        .into_iter()
        .map(|s| {
            [&s.name, &s.email, &s.major]
                .iter()
                .map(|field| quote(field))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();

    if rows.is_empty() {
        return String::new();
    }
    format!("{}\n{}", HEADER.join(","), rows.join("\n"))
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Parse CSV text into create payloads.
///
/// The first non-blank row is the header. Drafts are not validated.
pub fn import(text: &str) -> Vec<StudentDraft> {
    let mut rows = parse_rows(text)
        .into_iter()
        .filter(|row| !row.iter().all(|cell| cell.trim().is_empty()));

    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let header: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

    let name_col = column(&header, &NAME_ALIASES);
    let email_col = column(&header, &EMAIL_ALIASES);
    let major_col = column(&header, &MAJOR_ALIASES);

    let cell = |row: &[String], col: Option<usize>| -> String {
        col.and_then(|i| row.get(i))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    rows.map(|row| StudentDraft {
        name: cell(&row, name_col),
        email: cell(&row, email_col),
        major: cell(&row, major_col),
    })
    .collect()
}

/// Index of the first alias present in the header.
fn column(header: &[String], aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| header.iter().position(|h| h == alias))
}

/// Split text into rows of cells, honoring quotes, doubled quotes and line
/// breaks inside quoted cells.
fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    cell.push('"');
                }
                '"' => in_quotes = false,
                _ => cell.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut cell)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                row.push(std::mem::take(&mut cell));
                rows.push(std::mem::take(&mut row));
            }
            _ => cell.push(c),
        }
    }

    if !cell.is_empty() || !row.is_empty() {
        row.push(cell);
        rows.push(row);
    }
    rows
}
