//! Navigation logic for Arca.
//!
//! This module contains breadcrumb path decomposition ([`breadcrumb`]),
//! entry [`sort`]ing and hidden-file filtering, recursive cancellable
//! [`search`], and the [`state::Navigator`] session coordinator.

pub mod breadcrumb;
pub mod search;
pub mod sort;
pub mod state;
