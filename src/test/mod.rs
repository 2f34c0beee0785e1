//! Hypothesis testing primitives.


pub use welch::{welch_t_test, WelchResult};
