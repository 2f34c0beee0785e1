//! Protein table whose missing cells have been filled by an imputation strategy.

use crate::data::ProteinTable;
use crate::error::{LfqError, Result};
use nalgebra::DMatrix;

/// A [`ProteinTable`] together with a mask of the cells that were imputed.
#[derive(Debug, Clone)]
pub struct ImputedTable {
    table: ProteinTable,
    imputed: DMatrix<bool>,
    method: String,
}

impl ImputedTable {
    /// Wrap an imputed table; the mask must have the table's shape.
    pub fn new(table: ProteinTable, imputed: DMatrix<bool>, method: &str) -> Result<Self> {
        if imputed.shape() != table.intensities().shape() {
            return Err(LfqError::DimensionMismatch {
                expected: table.n_proteins() * table.n_samples(),
                actual: imputed.nrows() * imputed.ncols(),
            });
        }
        Ok(Self {
            table,
            imputed,
            method: method.to_string(),
        })
    }

    /// A table taken as-is, with nothing imputed.
    pub fn unchanged(table: &ProteinTable) -> Self {
        let imputed = DMatrix::from_element(table.n_proteins(), table.n_samples(), false);
        Self {
            table: table.clone(),
            imputed,
            method: "none".to_string(),
        }
    }

    /// The filled table.
    #[inline]
    pub fn table(&self) -> &ProteinTable {
        &self.table
    }

    /// Consume into the filled table.
    pub fn into_table(self) -> ProteinTable {
        self.table
    }

    /// Name of the strategy that produced this table.
    #[inline]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Mask of imputed cells.
    #[inline]
    pub fn imputed_mask(&self) -> &DMatrix<bool> {
        &self.imputed
    }

    /// Check whether the cell at (row, col) was imputed.
    #[inline]
    pub fn is_imputed(&self, row: usize, col: usize) -> bool {
        self.imputed[(row, col)]
    }

    /// Number of imputed cells.
    pub fn n_imputed(&self) -> usize {
        self.imputed.iter().filter(|&&m| m).count()
    }

    /// Number of cells still missing after imputation.
    pub fn n_missing(&self) -> usize {
        self.table.n_missing()
    }

    /// Imputed values of a sample column (for comparing against observed values).
    pub fn imputed_values(&self, col: usize) -> Vec<f64> {
        (0..self.table.n_proteins())
            .filter(|&row| self.imputed[(row, col)])
            .filter_map(|row| self.table.get(row, col))
            .collect()
    }
}
