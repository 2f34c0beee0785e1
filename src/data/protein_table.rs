//! Protein group table holding per-sample LFQ intensities.

use crate::data::columns::{
    lfq_col, sample_from_lfq_col, COMMON_COLUMNS, CONTAMINANT_COLUMN, GENE_NAMES_COLUMN, ID_COLUMN,
    PROTEIN_IDS_COLUMN, REVERSE_COLUMN,
};
use crate::error::{LfqError, Result};
use nalgebra::DMatrix;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// Per-protein metadata carried alongside the intensities.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProteinAnnotation {
    /// Leading UniProt accession of the protein group.
    pub uniprot_id: String,
    /// Leading gene name, if MaxQuant reported one.
    pub gene: Option<String>,
    /// Flagged as a potential contaminant.
    pub contaminant: bool,
    /// Flagged as a reverse (decoy) hit.
    pub reverse: bool,
}

/// A dense table of LFQ intensities.
///
/// Rows represent protein groups keyed by their MaxQuant id, columns represent
/// samples. Missing measurements are stored as `NaN`.
#[derive(Debug, Clone)]
pub struct ProteinTable {
    /// Intensities (proteins × samples).
    intensities: DMatrix<f64>,
    /// Protein group ids (row keys).
    protein_ids: Vec<u64>,
    /// Row annotations, same order as `protein_ids`.
    annotations: Vec<ProteinAnnotation>,
    /// Sample names (column names without the LFQ prefix).
    sample_names: Vec<String>,
}

impl ProteinTable {
    /// Create a new table from intensities and identifiers.
    pub fn new(
        intensities: DMatrix<f64>,
        protein_ids: Vec<u64>,
        annotations: Vec<ProteinAnnotation>,
        sample_names: Vec<String>,
    ) -> Result<Self> {
        let (nrows, ncols) = intensities.shape();
        if nrows != protein_ids.len() {
            return Err(LfqError::DimensionMismatch {
                expected: nrows,
                actual: protein_ids.len(),
            });
        }
        if nrows != annotations.len() {
            return Err(LfqError::DimensionMismatch {
                expected: nrows,
                actual: annotations.len(),
            });
        }
        if ncols != sample_names.len() {
            return Err(LfqError::DimensionMismatch {
                expected: ncols,
                actual: sample_names.len(),
            });
        }
        Ok(Self {
            intensities,
            protein_ids,
            annotations,
            sample_names,
        })
    }

    /// Create a table with default annotations (UniProt id = protein id).
    pub fn from_intensities(
        intensities: DMatrix<f64>,
        protein_ids: Vec<u64>,
        sample_names: Vec<String>,
    ) -> Result<Self> {
        let annotations = protein_ids
            .iter()
            .map(|id| ProteinAnnotation {
                uniprot_id: id.to_string(),
                ..Default::default()
            })
            .collect();
        Self::new(intensities, protein_ids, annotations, sample_names)
    }

    /// Load a MaxQuant `proteinGroups.txt` table.
    ///
    /// Intensities are kept as reported (linear scale, zero for undetected);
    /// cleaning and log transformation are separate steps.
    pub fn from_maxquant<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_maxquant_reader(file)
    }

    /// Load a MaxQuant protein groups table from any reader.
    ///
    /// Tolerated deviations:
    /// - no `id` column: rows are numbered from zero
    /// - no `Protein IDs` / `Gene names`: empty accession / no gene
    /// - no flag columns: flags default to false
    ///
    /// Only the first `;`-separated entry of accessions and gene names is kept.
    pub fn from_maxquant_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let find = |name: &str| headers.iter().position(|h| h == name);

        let id_col = find(ID_COLUMN);
        // Tables written by `to_tsv` carry the short column names
        let protein_col = find(PROTEIN_IDS_COLUMN).or_else(|| find(COMMON_COLUMNS[0]));
        let gene_col = find(GENE_NAMES_COLUMN).or_else(|| find(COMMON_COLUMNS[1]));
        let contaminant_col = find(CONTAMINANT_COLUMN);
        let reverse_col = find(REVERSE_COLUMN);

        let lfq_columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter_map(|(i, h)| sample_from_lfq_col(h).map(|s| (i, s.to_string())))
            .collect();
        if lfq_columns.is_empty() {
            return Err(LfqError::MissingColumn(lfq_col("<sample>")));
        }
        if id_col.is_none() {
            log::warn!("No '{}' column found; numbering proteins by row", ID_COLUMN);
        }
        for (col, name) in [
            (contaminant_col, CONTAMINANT_COLUMN),
            (reverse_col, REVERSE_COLUMN),
        ] {
            if col.is_none() {
                log::debug!("No '{}' column found; flag defaults to false", name);
            }
        }

        let mut protein_ids = Vec::new();
        let mut annotations = Vec::new();
        let mut values: Vec<f64> = Vec::new();

        for (row_idx, record) in rdr.records().enumerate() {
            let record = record?;
            if record.iter().all(|f| f.trim().is_empty()) {
                continue;
            }
            let field = |col: Option<usize>| col.and_then(|c| record.get(c)).map(str::trim);

            let id = match field(id_col) {
                Some(raw) => raw.parse::<u64>().map_err(|_| LfqError::InvalidValue {
                    value: raw.to_string(),
                    row: row_idx,
                    column: ID_COLUMN.to_string(),
                })?,
                None => row_idx as u64,
            };

            annotations.push(ProteinAnnotation {
                uniprot_id: field(protein_col).map(first_entry).unwrap_or_default(),
                gene: field(gene_col)
                    .map(first_entry)
                    .filter(|g| !g.is_empty()),
                contaminant: field(contaminant_col) == Some("+"),
                reverse: field(reverse_col) == Some("+"),
            });
            protein_ids.push(id);

            for (col, sample) in &lfq_columns {
                let raw = record.get(*col).unwrap_or("").trim();
                values.push(parse_intensity(raw).ok_or_else(|| LfqError::InvalidValue {
                    value: raw.to_string(),
                    row: row_idx,
                    column: lfq_col(sample),
                })?);
            }
        }

        if protein_ids.is_empty() {
            return Err(LfqError::EmptyData("No protein groups in table".to_string()));
        }

        let n_samples = lfq_columns.len();
        let intensities = DMatrix::from_row_slice(protein_ids.len(), n_samples, &values);
        let sample_names = lfq_columns.into_iter().map(|(_, s)| s).collect();

        Self::new(intensities, protein_ids, annotations, sample_names)
    }

    /// Write the table as TSV: id, annotations, then one LFQ column per sample.
    ///
    /// Missing cells are written as empty fields.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        write!(
            writer,
            "{}\t{}\t{}",
            ID_COLUMN, COMMON_COLUMNS[0], COMMON_COLUMNS[1]
        )?;
        for sample in &self.sample_names {
            write!(writer, "\t{}", lfq_col(sample))?;
        }
        writeln!(writer)?;

        for (row, id) in self.protein_ids.iter().enumerate() {
            let ann = &self.annotations[row];
            write!(
                writer,
                "{}\t{}\t{}",
                id,
                ann.uniprot_id,
                ann.gene.as_deref().unwrap_or("")
            )?;
            for col in 0..self.n_samples() {
                match self.get(row, col) {
                    Some(v) => write!(writer, "\t{}", v)?,
                    None => write!(writer, "\t")?,
                }
            }
            writeln!(writer)?;
        }

        Ok(())
    }

    /// Get the value at (row, col), `None` when missing.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        let v = self.intensities[(row, col)];
        if v.is_nan() {
            None
        } else {
            Some(v)
        }
    }

    /// Check whether the cell at (row, col) is missing.
    #[inline]
    pub fn is_missing(&self, row: usize, col: usize) -> bool {
        self.intensities[(row, col)].is_nan()
    }

    /// Number of proteins (rows).
    #[inline]
    pub fn n_proteins(&self) -> usize {
        self.intensities.nrows()
    }

    /// Number of samples (columns).
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.intensities.ncols()
    }

    /// Protein group ids.
    #[inline]
    pub fn protein_ids(&self) -> &[u64] {
        &self.protein_ids
    }

    /// Row annotations.
    #[inline]
    pub fn annotations(&self) -> &[ProteinAnnotation] {
        &self.annotations
    }

    /// Annotation of one row.
    #[inline]
    pub fn annotation(&self, row: usize) -> &ProteinAnnotation {
        &self.annotations[row]
    }

    /// Sample names.
    #[inline]
    pub fn sample_names(&self) -> &[String] {
        &self.sample_names
    }

    /// Underlying intensity matrix (`NaN` = missing).
    #[inline]
    pub fn intensities(&self) -> &DMatrix<f64> {
        &self.intensities
    }

    /// Row index of a protein id.
    pub fn row_of(&self, protein_id: u64) -> Option<usize> {
        self.protein_ids.iter().position(|&id| id == protein_id)
    }

    /// Column index of a sample.
    pub fn sample_index(&self, sample: &str) -> Option<usize> {
        self.sample_names.iter().position(|s| s == sample)
    }

    /// Column indices of several samples, failing on the first unknown one.
    pub fn sample_indices<S: AsRef<str>>(&self, samples: &[S]) -> Result<Vec<usize>> {
        samples
            .iter()
            .map(|s| {
                self.sample_index(s.as_ref())
                    .ok_or_else(|| LfqError::UnknownSample(s.as_ref().to_string()))
            })
            .collect()
    }

    /// A row as raw values (`NaN` = missing).
    pub fn row(&self, row: usize) -> Vec<f64> {
        self.intensities.row(row).iter().copied().collect()
    }

    /// A column as raw values (`NaN` = missing).
    pub fn column(&self, col: usize) -> Vec<f64> {
        self.intensities.column(col).iter().copied().collect()
    }

    /// Observed values of a column.
    pub fn column_observed(&self, col: usize) -> Vec<f64> {
        self.intensities
            .column(col)
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .collect()
    }

    /// Number of observed values in a row.
    pub fn observed_in_row(&self, row: usize) -> usize {
        self.intensities
            .row(row)
            .iter()
            .filter(|v| !v.is_nan())
            .count()
    }

    /// Number of observed values in a row restricted to some columns.
    pub fn observed_in(&self, row: usize, cols: &[usize]) -> usize {
        cols.iter().filter(|&&c| !self.is_missing(row, c)).count()
    }

    /// Check whether a row has at least one missing value.
    pub fn row_has_missing(&self, row: usize) -> bool {
        self.intensities.row(row).iter().any(|v| v.is_nan())
    }

    /// Indices of rows with at least one missing value.
    pub fn rows_with_missing(&self) -> Vec<usize> {
        (0..self.n_proteins())
            .filter(|&r| self.row_has_missing(r))
            .collect()
    }

    /// Total number of missing cells.
    pub fn n_missing(&self) -> usize {
        self.intensities.iter().filter(|v| v.is_nan()).count()
    }

    /// Subset the table to the specified rows (by index).
    pub fn subset_proteins(&self, indices: &[usize]) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.n_proteins()) {
            return Err(LfqError::InvalidParameter(format!(
                "Protein index {} out of bounds",
                bad
            )));
        }
        let intensities = self.intensities.select_rows(indices.iter());
        let protein_ids = indices.iter().map(|&i| self.protein_ids[i]).collect();
        let annotations = indices.iter().map(|&i| self.annotations[i].clone()).collect();
        Self::new(
            intensities,
            protein_ids,
            annotations,
            self.sample_names.clone(),
        )
    }

    /// Same proteins and samples with new intensities.
    pub fn with_intensities(&self, intensities: DMatrix<f64>) -> Result<Self> {
        if intensities.shape() != self.intensities.shape() {
            return Err(LfqError::DimensionMismatch {
                expected: self.n_proteins() * self.n_samples(),
                actual: intensities.nrows() * intensities.ncols(),
            });
        }
        Self::new(
            intensities,
            self.protein_ids.clone(),
            self.annotations.clone(),
            self.sample_names.clone(),
        )
    }

    /// Check that another table has the same proteins and samples in the same order.
    pub fn ensure_same_layout(&self, other: &ProteinTable) -> Result<()> {
        if self.protein_ids != other.protein_ids {
            return Err(LfqError::ProteinMismatch(format!(
                "tables cover different proteins ({} vs {} rows)",
                self.n_proteins(),
                other.n_proteins()
            )));
        }
        if self.sample_names != other.sample_names {
            return Err(LfqError::ProteinMismatch(format!(
                "tables cover different samples: {:?} vs {:?}",
                self.sample_names, other.sample_names
            )));
        }
        Ok(())
    }
}

/// First entry of a `;`-separated MaxQuant list.
fn first_entry(raw: &str) -> String {
    raw.split(';').next().unwrap_or("").trim().to_string()
}

/// Parse an intensity field; empty and NA-like fields are missing.
fn parse_intensity(raw: &str) -> Option<f64> {
    match raw {
        "" | "NA" | "na" | "NaN" | "nan" => Some(f64::NAN),
        _ => raw.parse::<f64>().ok().filter(|v| !v.is_infinite()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MAXQUANT: &str = "\
id\tProtein IDs\tGene names\tLFQ intensity A_1\tLFQ intensity A_2\tLFQ intensity B_1\tPotential contaminant\tReverse
0\tP12345;P12346\tGAPDH;GAPDH2\t1000\t2000\t0\t\t
1\tQ99999\t\t500\t0\t0\t+\t
2\tREV__P11111\tFOO\t10\t20\t30\t\t+
3\tP22222\tACTB\t4000\t\t8000\t\t
";

    fn create_test_table() -> ProteinTable {
        let intensities = DMatrix::from_row_slice(
            3,
            4,
            &[
                20.0, 21.0, f64::NAN, 22.0, //
                18.0, 18.5, 19.0, 19.5, //
                f64::NAN, f64::NAN, 25.0, f64::NAN,
            ],
        );
        ProteinTable::from_intensities(
            intensities,
            vec![10, 11, 12],
            vec!["S1".into(), "S2".into(), "S3".into(), "S4".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_dimensions() {
        let table = create_test_table();
        assert_eq!(table.n_proteins(), 3);
        assert_eq!(table.n_samples(), 4);
        assert_eq!(table.n_missing(), 4);
    }

    #[test]
    fn test_dimension_mismatch() {
        let result = ProteinTable::from_intensities(
            DMatrix::zeros(2, 2),
            vec![1, 2, 3],
            vec!["a".into(), "b".into()],
        );
        assert!(matches!(result, Err(LfqError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_get_and_missing() {
        let table = create_test_table();
        assert_eq!(table.get(0, 0), Some(20.0));
        assert_eq!(table.get(0, 2), None);
        assert!(table.is_missing(2, 0));
        assert_eq!(table.observed_in_row(2), 1);
        assert_eq!(table.rows_with_missing(), vec![0, 2]);
        assert_eq!(table.observed_in(0, &[0, 2]), 1);
    }

    #[test]
    fn test_sample_indices() {
        let table = create_test_table();
        assert_eq!(table.sample_indices(&["S3", "S1"]).unwrap(), vec![2, 0]);
        assert!(matches!(
            table.sample_indices(&["S9"]),
            Err(LfqError::UnknownSample(_))
        ));
    }

    #[test]
    fn test_subset_proteins() {
        let table = create_test_table();
        let subset = table.subset_proteins(&[2, 0]).unwrap();
        assert_eq!(subset.protein_ids(), &[12, 10]);
        assert_eq!(subset.get(0, 2), Some(25.0));
        assert_eq!(subset.get(1, 1), Some(21.0));
        assert!(table.subset_proteins(&[5]).is_err());
    }

    #[test]
    fn test_from_maxquant_reader() {
        let table = ProteinTable::from_maxquant_reader(MAXQUANT.as_bytes()).unwrap();

        assert_eq!(table.n_proteins(), 4);
        assert_eq!(table.sample_names(), &["A_1", "A_2", "B_1"]);
        assert_eq!(table.protein_ids(), &[0, 1, 2, 3]);

        let first = table.annotation(0);
        assert_eq!(first.uniprot_id, "P12345");
        assert_eq!(first.gene.as_deref(), Some("GAPDH"));
        assert!(!first.contaminant && !first.reverse);

        assert!(table.annotation(1).contaminant);
        assert_eq!(table.annotation(1).gene, None);
        assert!(table.annotation(2).reverse);

        // Raw values are untouched; the empty field is missing
        assert_eq!(table.get(0, 2), Some(0.0));
        assert_eq!(table.get(3, 1), None);
    }

    #[test]
    fn test_from_maxquant_without_flags() {
        let text = "id\tProtein IDs\tLFQ intensity X\n7\tP1\t100\n";
        let table = ProteinTable::from_maxquant_reader(text.as_bytes()).unwrap();
        assert_eq!(table.protein_ids(), &[7]);
        assert!(!table.annotation(0).contaminant);
        assert!(!table.annotation(0).reverse);
    }

    #[test]
    fn test_from_maxquant_without_lfq_columns() {
        let text = "id\tProtein IDs\n0\tP1\n";
        assert!(matches!(
            ProteinTable::from_maxquant_reader(text.as_bytes()),
            Err(LfqError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_from_maxquant_invalid_value() {
        let text = "id\tLFQ intensity X\n0\tabc\n";
        assert!(matches!(
            ProteinTable::from_maxquant_reader(text.as_bytes()),
            Err(LfqError::InvalidValue { .. })
        ));

        for value in ["inf", "-inf", "Infinity"] {
            let text = format!("id\tLFQ intensity X\n0\t{}\n", value);
            assert!(matches!(
                ProteinTable::from_maxquant_reader(text.as_bytes()),
                Err(LfqError::InvalidValue { .. })
            ));
        }
    }

    #[test]
    fn test_tsv_roundtrip() {
        let table = create_test_table();
        let out = NamedTempFile::new().unwrap();
        table.to_tsv(out.path()).unwrap();

        let loaded = ProteinTable::from_maxquant(out.path()).unwrap();
        assert_eq!(loaded.protein_ids(), table.protein_ids());
        assert_eq!(loaded.annotation(0).uniprot_id, "10");
        assert_eq!(loaded.sample_names(), table.sample_names());
        for row in 0..table.n_proteins() {
            for col in 0..table.n_samples() {
                assert_eq!(loaded.get(row, col), table.get(row, col));
            }
        }
    }

    #[test]
    fn test_from_maxquant_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(MAXQUANT.as_bytes()).unwrap();
        file.flush().unwrap();
        let table = ProteinTable::from_maxquant(file.path()).unwrap();
        assert_eq!(table.n_proteins(), 4);
    }
}
