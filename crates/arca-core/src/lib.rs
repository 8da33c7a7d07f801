//! Arca core library — UI-agnostic file management logic.
//!
//! `arca-core` is the engine behind the Arca file browser: directory
//! enumeration and sorting, collision-safe copy/move, best-effort
//! recursive delete, cancellable filename search, breadcrumb path
//! decomposition, and a persistent recent/favorites store. It is
//! intentionally decoupled from any UI framework so that different
//! frontends can share the same underlying logic: they send [`Command`]s
//! to a [`Navigator`] and render the [`NavSnapshot`]s it publishes.
//!
//! # Modules
//!
//! - [`fs`] — File system abstractions: [`FileEntry`], directory reading, file operations.
//! - [`nav`] — Navigation: breadcrumbs, sorting, search, and the [`Navigator`] state machine.
//! - [`store`] — Persistent recent-files and favorites store with reactive subscriptions.
//! - [`config`] — User-facing configuration (TOML-based settings).
//! - [`command`] — Command types for UI → Core communication.
//! - [`error`] — Unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod command;
pub mod config;
pub mod error;
pub mod fs;
pub mod nav;
pub mod store;

pub use command::Command;
pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use fs::entry::{FileEntry, FileKind};
pub use fs::ops::{
    copy_entry, create_entry, delete_entry, move_entry, read_directory, rename_entry,
};
pub use nav::breadcrumb::{segments, Segment};
pub use nav::search::{search, CancelFlag};
pub use nav::sort::{filter_hidden, sort_entries, SortKey};
pub use nav::state::{NavSnapshot, Navigator, OpenedFile, ViewState};
pub use store::{RecentRecord, RecentStore};
