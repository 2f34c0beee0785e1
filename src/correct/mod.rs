//! Multiple testing correction.

pub mod bh;

pub use bh::adjust_bh;
