//! Manifest reading, normalisation, and the resolved [`Manifest`] facade.

mod facade;
mod merge;
mod normalize;
mod reading;

pub use facade::Manifest;
pub use merge::deep_merge;
pub use normalize::normalize_manifest;
pub use reading::{read_manifest, strip_json_comments};
