//! Plain-text rendering of frames and charts.

use roster_engine::Frame;
use std::fmt::Write;

pub const HELP: &str = "\
Commands:
  list                            show the current page
  add name|email|major            add a student
  edit <id> name=..|email=..|..   edit fields of a student
  del <id>                        delete a student
  clone <id>                      duplicate a student
  check <id>                      toggle selection of a student
  all on|off                      select or clear every row on this page
  bulk                            delete the selection
  undo                            undo the last delete
  search <text>                   search name, email and major (empty clears)
  filter <major> | filter -       filter by major / clear the filter
  sort <key>_<asc|desc>           sort by name, email or major
  page <n> | next | prev          move between pages
  size <n>                        rows per page
  import <path> | export <path>   read or write CSV
  majors | chart                  list majors / students per major
  quit";

const MAX_BAR: usize = 40;

/// Render a frame as a table followed by the page indicator.
pub fn frame(frame: &Frame) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<3} {:>4}  {:<34} {:<24} {:<28} {:<20}",
        "", "#", "id", "name", "email", "major"
    );

    if frame.page_slice.is_empty() {
        let _ = writeln!(out, "  (no students)");
    }
    for (i, s) in frame.page_slice.iter().enumerate() {
        let mark = if frame.is_selected(&s.id) { "[x]" } else { "[ ]" };
        let _ = writeln!(
            out,
            "{:<3} {:>4}  {:<34} {:<24} {:<28} {:<20}",
            mark,
            frame.first_row_number() + i,
            s.id,
            s.name,
            s.email,
            s.major
        );
    }

    let _ = write!(
        out,
        "Page {} / {}  ({} shown of {}, {} selected)",
        frame.current_page,
        frame.total_pages,
        frame.page_slice.len(),
        frame.total_filtered,
        frame.selected_ids.len()
    );
    out
}

/// Render per-major counts as a horizontal bar chart.
pub fn chart(counts: &[(String, usize)]) -> String {
    let Some(max) = counts.iter().map(|(_, n)| *n).max() else {
        return "Students by Major: (none)".to_string();
    };
    let width = counts.iter().map(|(m, _)| m.chars().count()).max().unwrap_or(0);

    let mut out = String::from("Students by Major:");
    for (major, count) in counts {
        let bar = (count * MAX_BAR).div_ceil(max.max(1));
        let _ = write!(out, "\n  {:<width$}  {} {}", major, "#".repeat(bar), count);
    }
    out
}

/// Render the filter choices.
pub fn majors(majors: &[String]) -> String {
    if majors.is_empty() {
        return "All majors".to_string();
    }
    format!("All majors, {}", majors.join(", "))
}
