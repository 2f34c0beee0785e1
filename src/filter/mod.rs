//! Filtering primitives for protein tables.

pub mod flags;
pub mod valid;

pub use flags::{filter_contaminants, filter_reverse};
pub use valid::{filter_all_missing, filter_min_valid};
