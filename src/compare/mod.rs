//! Differential abundance between conditions of an experiment design.

pub mod engine;

pub use engine::{compare, compare_conditions};
