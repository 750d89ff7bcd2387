//! Path helpers shared by the manifest normaliser and the glob builder.
//!
//! Matching dependency files against type patterns, selecting them by owning package, and
//! joining first-party entries onto the source root are kept apart so each can be tested on
//! its own.

mod filters;
mod join;
mod matching;

pub(crate) use filters::contains_segment;
pub use filters::{filter_by_package, filter_by_type, reject_by_package};
pub use join::{join_path, join_source_path};
pub use matching::{TypePattern, is_directory_name, matches};
