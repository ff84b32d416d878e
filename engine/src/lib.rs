//! # Roster Engine
//!
//! A deterministic view and mutation-state engine for a student roster.
//!
//! This crate holds the in-memory side of a roster manager: the record set,
//! the derived filtered/sorted/paginated view, the selection used for bulk
//! operations, and the undo log of compensating actions. Persistence lives
//! elsewhere; callers persist a change first and then apply it here.
//!
//! ## Design Principles
//!
//! - **No IO**: Engine has no knowledge of files, network, or platform
//! - **Deterministic**: Same records and parameters always derive the same view
//! - **Testable**: Pure logic, no mocks needed
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! A [`Student`] has an immutable id plus `name`, `email` and `major`.
//! [`StudentDraft`] is the create payload and [`StudentPatch`] the edit
//! payload.
//!
//! ### Views
//!
//! [`derive`] turns records plus [`ViewParams`] into a [`View`]. A non-empty
//! search query matches over all three text fields and replaces the
//! major-filter + sort pipeline rather than composing with it. The page is
//! always clamped to `[1, total_pages]`.
//!
//! ### Selection and Undo
//!
//! [`Selection`] tracks checked ids and never holds ids of removed records.
//! [`UndoLog`] is a LIFO stack of [`UndoEntry`] values, one per committed
//! delete or bulk delete.
//!
//! ## Quick Start
//!
//! ```rust
//! use roster_engine::{Roster, Student, SortSpec, SortKey};
//!
//! let mut roster = Roster::new();
//! roster.insert(Student::new("s_1", "Sok Dara", "dara@example.com", "Business")).unwrap();
//! roster.insert(Student::new("s_2", "Alice Tran", "alice@example.com", "CS")).unwrap();
//!
//! roster.set_sort(SortSpec::asc(SortKey::Name));
//! let frame = roster.frame();
//! assert_eq!(frame.page_slice[0].name, "Alice Tran");
//! assert_eq!(frame.total_pages, 1);
//! ```

pub mod csv;
pub mod error;
pub mod record;
pub mod roster;
pub mod selection;
pub mod stats;
pub mod undo;
pub mod view;

// Re-export main types at crate root
pub use error::Error;
pub use record::{SortKey, Student, StudentDraft, StudentPatch, COPY_SUFFIX};
pub use roster::{Frame, Roster};
pub use selection::Selection;
pub use undo::{UndoEntry, UndoLog};
pub use view::{derive, SortDirection, SortSpec, View, ViewParams, DEFAULT_PAGE_SIZE};

/// Type aliases for clarity
pub type RecordId = String;
