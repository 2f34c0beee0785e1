//! Data profiling primitives for understanding protein table characteristics.

mod intensity;
mod missingness;

pub use intensity::{profile_intensity, IntensityProfile, SampleIntensity};
pub use missingness::{profile_missingness, MissingnessProfile};

use crate::data::ProteinTable;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Missingness and intensity profiles of one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataProfile {
    pub missingness: MissingnessProfile,
    pub intensity: IntensityProfile,
}

impl DataProfile {
    /// Render as YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for DataProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.missingness)?;
        writeln!(f)?;
        write!(f, "{}", self.intensity)
    }
}

/// Profile a table.
pub fn profile(table: &ProteinTable) -> DataProfile {
    DataProfile {
        missingness: profile_missingness(table),
        intensity: profile_intensity(table),
    }
}
