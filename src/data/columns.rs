//! Column naming conventions of MaxQuant protein group tables.

use crate::error::{LfqError, Result};
use serde_yaml::Value;

/// Prefix of per-sample LFQ intensity columns.
pub const LFQ_PREFIX: &str = "LFQ intensity ";

/// Column holding the numeric protein group id.
pub const ID_COLUMN: &str = "id";
/// Column holding the `;`-separated protein accessions.
pub const PROTEIN_IDS_COLUMN: &str = "Protein IDs";
/// Column holding the `;`-separated gene names.
pub const GENE_NAMES_COLUMN: &str = "Gene names";
/// Contaminant flag column (`+` when flagged).
pub const CONTAMINANT_COLUMN: &str = "Potential contaminant";
/// Reverse (decoy) flag column (`+` when flagged).
pub const REVERSE_COLUMN: &str = "Reverse";

/// Metadata columns carried next to the intensities in written tables.
pub const COMMON_COLUMNS: [&str; 4] = ["uniprotID", "gene", CONTAMINANT_COLUMN, REVERSE_COLUMN];

/// Column name of the LFQ intensity for a sample.
pub fn lfq_col(sample: &str) -> String {
    format!("{}{}", LFQ_PREFIX, sample)
}

/// Column names of the LFQ intensities for several samples.
pub fn lfq_cols<S: AsRef<str>>(samples: &[S]) -> Vec<String> {
    samples.iter().map(|s| lfq_col(s.as_ref())).collect()
}

/// Sample name of an LFQ intensity column, if the column is one.
pub fn sample_from_lfq_col(column: &str) -> Option<&str> {
    column.strip_prefix(LFQ_PREFIX)
}

/// Interpret a configuration value as one or more sample names.
///
/// A string names a single sample and a sequence of strings names a group.
/// Any other value is rejected with [`LfqError::InvalidSampleType`].
pub fn samples_from_value(value: &Value) -> Result<Vec<String>> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Sequence(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(LfqError::InvalidSampleType(describe(other))),
            })
            .collect(),
        other => Err(LfqError::InvalidSampleType(describe(other))),
    }
}

fn describe(value: &Value) -> String {
    let kind = match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    };
    let rendered = serde_yaml::to_string(value).unwrap_or_default();
    format!("{} ({})", kind, rendered.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lfq_col() {
        assert_eq!(lfq_col("ctrl_1"), "LFQ intensity ctrl_1");
        assert_eq!(
            lfq_cols(&["a", "b"]),
            vec!["LFQ intensity a".to_string(), "LFQ intensity b".to_string()]
        );
    }

    #[test]
    fn test_sample_from_lfq_col() {
        assert_eq!(sample_from_lfq_col("LFQ intensity WT_2"), Some("WT_2"));
        assert_eq!(sample_from_lfq_col("Intensity WT_2"), None);
    }

    #[test]
    fn test_samples_from_value() {
        let single: Value = serde_yaml::from_str("ctrl_1").unwrap();
        assert_eq!(samples_from_value(&single).unwrap(), vec!["ctrl_1"]);

        let many: Value = serde_yaml::from_str("[ctrl_1, ctrl_2]").unwrap();
        assert_eq!(samples_from_value(&many).unwrap(), vec!["ctrl_1", "ctrl_2"]);
    }

    #[test]
    fn test_samples_from_value_wrong_type() {
        let number: Value = serde_yaml::from_str("42").unwrap();
        assert!(matches!(
            samples_from_value(&number),
            Err(LfqError::InvalidSampleType(_))
        ));

        let nested: Value = serde_yaml::from_str("[a, [b, c]]").unwrap();
        assert!(matches!(
            samples_from_value(&nested),
            Err(LfqError::InvalidSampleType(_))
        ));

        let mapping: Value = serde_yaml::from_str("{a: b}").unwrap();
        assert!(samples_from_value(&mapping).is_err());
    }
}
