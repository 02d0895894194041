//! Resolved target types and their package dependencies.

mod imports;
mod target;

pub use imports::{Import, ImportSet};
pub use target::{namespace_for_path, TargetType, UNTYPED};
