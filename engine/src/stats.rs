//! Aggregates over the record set: filter choices and per-major counts.

use crate::Student;

/// Label used for records with an empty major.
pub const UNDECLARED: &str = "Undeclared";

/// Distinct non-empty majors, in first-seen order.
pub fn majors<'a, I>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Student>,
{
    let mut out: Vec<String> = Vec::new();
    for s in records {
        if !s.major.is_empty() && !out.iter().any(|m| m == &s.major) {
            out.push(s.major.clone());
        }
    }
    out
}

/// Number of students per major, in first-seen order. Empty majors are
/// counted under [`UNDECLARED`].
pub fn major_counts<'a, I>(records: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a Student>,
{
    let mut out: Vec<(String, usize)> = Vec::new();
    for s in records {
        let label = if s.major.is_empty() {
            UNDECLARED
        } else {
            s.major.as_str()
        };
        match out.iter_mut().find(|(m, _)| m == label) {
            Some((_, count)) => *count += 1,
            None => out.push((label.to_string(), 1)),
        }
    }
    out
}
