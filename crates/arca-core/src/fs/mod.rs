//! File system abstractions for Arca.
//!
//! This module provides the core types for representing file entries
//! ([`entry::FileEntry`], [`entry::FileKind`]) and performing directory
//! reads and structural operations ([`ops`]): create, rename, delete,
//! collision-safe copy and move.

pub mod entry;
pub mod ops;
