//! Log2 transformation of raw LFQ intensities.

use crate::data::ProteinTable;
use crate::error::Result;

/// Transform intensities to log2.
///
/// MaxQuant reports undetected proteins as zero intensity, so every value
/// that is not strictly positive becomes missing.
pub fn log2_transform(table: &ProteinTable) -> Result<ProteinTable> {
    let transformed = table
        .intensities()
        .map(|v| if v > 0.0 { v.log2() } else { f64::NAN });
    table.with_intensities(transformed)
}
