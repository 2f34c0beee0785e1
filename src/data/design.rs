//! Experiment design: named conditions and the comparisons between them.

use crate::data::columns::samples_from_value;
use crate::data::ProteinTable;
use crate::error::{LfqError, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// A pairwise comparison between two conditions.
///
/// Log fold-changes are reported as `mean(target) - mean(base)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Comparison {
    /// Reference condition.
    pub base: String,
    /// Condition compared against the reference.
    pub target: String,
}

impl Comparison {
    pub fn new(base: &str, target: &str) -> Self {
        Self {
            base: base.to_string(),
            target: target.to_string(),
        }
    }

    /// File-friendly label, e.g. `control_vs_treated`.
    pub fn label(&self) -> String {
        format!("{}_vs_{}", self.base, self.target)
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} vs {}", self.base, self.target)
    }
}

/// On-disk form of a design, with condition members left untyped so that
/// wrong-typed sample entries produce a precise error.
#[derive(Debug, Serialize, Deserialize)]
struct DesignFile {
    conditions: BTreeMap<String, Value>,
    #[serde(default)]
    comparisons: Vec<(String, String)>,
}

/// Conditions (named sample groups) and the comparisons to run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperimentDesign {
    conditions: BTreeMap<String, Vec<String>>,
    comparisons: Vec<Comparison>,
}

impl ExperimentDesign {
    /// Create an empty design.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition with its replicate samples.
    pub fn add_condition<S: AsRef<str>>(&mut self, name: &str, samples: &[S]) -> Result<()> {
        if samples.is_empty() {
            return Err(LfqError::InvalidParameter(format!(
                "Condition '{}' has no samples",
                name
            )));
        }
        if self.conditions.contains_key(name) {
            return Err(LfqError::InvalidParameter(format!(
                "Condition '{}' defined twice",
                name
            )));
        }
        let samples: Vec<String> = samples.iter().map(|s| s.as_ref().to_string()).collect();
        self.conditions.insert(name.to_string(), samples);
        Ok(())
    }

    /// Builder-style [`add_condition`](Self::add_condition).
    pub fn with_condition<S: AsRef<str>>(mut self, name: &str, samples: &[S]) -> Result<Self> {
        self.add_condition(name, samples)?;
        Ok(self)
    }

    /// Add a comparison between two known conditions.
    pub fn add_comparison(&mut self, base: &str, target: &str) -> Result<()> {
        for name in [base, target] {
            if !self.conditions.contains_key(name) {
                return Err(LfqError::UnknownCondition(name.to_string()));
            }
        }
        if base == target {
            return Err(LfqError::InvalidParameter(format!(
                "Cannot compare condition '{}' with itself",
                base
            )));
        }
        self.comparisons.push(Comparison::new(base, target));
        Ok(())
    }

    /// Builder-style [`add_comparison`](Self::add_comparison).
    pub fn with_comparison(mut self, base: &str, target: &str) -> Result<Self> {
        self.add_comparison(base, target)?;
        Ok(self)
    }

    /// Samples of a condition.
    pub fn samples(&self, condition: &str) -> Result<&[String]> {
        self.conditions
            .get(condition)
            .map(Vec::as_slice)
            .ok_or_else(|| LfqError::UnknownCondition(condition.to_string()))
    }

    /// Condition names (sorted).
    pub fn condition_names(&self) -> impl Iterator<Item = &str> {
        self.conditions.keys().map(String::as_str)
    }

    /// Comparisons in declaration order.
    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    /// Check that every sample of every condition exists in the table.
    pub fn validate_against(&self, table: &ProteinTable) -> Result<()> {
        if self.comparisons.is_empty() {
            return Err(LfqError::InvalidParameter(
                "Design has no comparisons".to_string(),
            ));
        }
        for samples in self.conditions.values() {
            table.sample_indices(samples)?;
        }
        Ok(())
    }

    /// Load from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: DesignFile = serde_yaml::from_str(yaml)?;
        let mut design = Self::new();
        for (name, value) in &file.conditions {
            let samples = samples_from_value(value)?;
            design.add_condition(name, &samples)?;
        }
        for (base, target) in &file.comparisons {
            design.add_comparison(base, target)?;
        }
        Ok(design)
    }

    /// Load from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Save to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        let file = DesignFile {
            conditions: self
                .conditions
                .iter()
                .map(|(name, samples)| {
                    let seq = samples.iter().cloned().map(Value::String).collect();
                    (name.clone(), Value::Sequence(seq))
                })
                .collect(),
            comparisons: self
                .comparisons
                .iter()
                .map(|c| (c.base.clone(), c.target.clone()))
                .collect(),
        };
        serde_yaml::to_string(&file).map_err(LfqError::from)
    }
}
