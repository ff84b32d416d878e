//! # Roster Client
//!
//! Binds the roster engine to a persistence backend.
//!
//! The [`Session`] is the mutation coordinator: it validates a change, awaits
//! the [`RecordStore`], and only then applies the change to its in-memory
//! [`roster_engine::Roster`]. Outcomes are reported as [`Notice`]s over a
//! non-blocking channel. The store is chosen by [`Config`]: a local JSON file
//! by default, or a REST service when `ROSTER_API_MODE` is set.
//!
//! ```rust,no_run
//! use roster_client::{notice, store::MemoryStore, Session};
//! use roster_engine::StudentDraft;
//!
//! # async fn example() -> roster_client::Result<()> {
//! let (tx, mut rx) = notice::channel();
//! let mut session = Session::new(MemoryStore::new(), tx);
//! session.load().await?;
//!
//! let created = session
//!     .create(StudentDraft::new("Sok Dara", "dara@example.com", "Business"))
//!     .await?;
//! session.delete(&created.id).await?;
//! session.undo().await?;
//!
//! assert_eq!(session.frame().page_slice.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod notice;
pub mod render;
pub mod session;
pub mod shell;
pub mod store;

pub use config::{Config, ConfigError};
pub use error::{AppError, Result, StoreError};
pub use notice::{Notice, NoticeLevel};
pub use session::Session;
pub use store::{open_store, LocalStore, MemoryStore, RecordStore, RemoteStore};
