//! Intensity transformations.
//!
//! - **log2**: log transformation of raw LFQ intensities (zero becomes missing)
//! - **median**: scaling of sample medians to a common level

pub mod log2;
pub mod median;

pub use log2::log2_transform;
pub use median::{normalize_median, sample_medians};
