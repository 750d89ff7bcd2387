//! Glob resolution: the package exclusion scan and the per-output glob builder.

mod builder;
mod scanning;

pub use builder::GlobBuilder;
pub use scanning::excluded_packages;
