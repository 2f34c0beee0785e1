//! Two-step imputation: keep complete rows, take incomplete rows from a
//! fully imputed table.

use crate::data::{ImputedTable, ProteinTable};
use crate::error::Result;

/// Combine a table that may still contain missing values with a fully imputed one.
///
/// Rows of `data` without any missing value are kept as they are. Rows with at
/// least one missing value are replaced entirely by the corresponding row of
/// `secondary`, including its measured cells.
pub fn impute_two_step(data: &ProteinTable, secondary: &ImputedTable) -> Result<ImputedTable> {
    merge_incomplete_rows(&ImputedTable::unchanged(data), secondary, "two-step")
}

/// Two-step merge that keeps the imputation mask of an already imputed primary table.
pub(crate) fn merge_incomplete_rows(
    primary: &ImputedTable,
    secondary: &ImputedTable,
    method: &str,
) -> Result<ImputedTable> {
    let data = primary.table();
    data.ensure_same_layout(secondary.table())?;

    let mut values = data.intensities().clone();
    let mut mask = primary.imputed_mask().clone();
    let incomplete = data.rows_with_missing();

    for &row in &incomplete {
        values.set_row(row, &secondary.table().intensities().row(row));
        mask.set_row(row, &secondary.imputed_mask().row(row));
    }

    log::debug!(
        "Two-step imputation replaced {} incomplete rows",
        incomplete.len()
    );
    ImputedTable::new(data.with_intensities(values)?, mask, method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impute::impute_low_value;
    use nalgebra::DMatrix;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_test_table() -> ProteinTable {
        let nan = f64::NAN;
        ProteinTable::from_intensities(
            DMatrix::from_row_slice(
                4,
                3,
                &[
                    20.0, 21.0, 22.0, //
                    22.0, nan, 24.0, //
                    24.0, 25.0, 23.0, //
                    nan, nan, 25.0,
                ],
            ),
            (0..4).collect(),
            vec!["a".into(), "b".into(), "c".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_two_step_rows() {
        let table = create_test_table();
        let secondary = impute_low_value(&table, &mut StdRng::seed_from_u64(2)).unwrap();
        let combined = impute_two_step(&table, &secondary).unwrap();

        for row in 0..table.n_proteins() {
            let expected = if table.row_has_missing(row) {
                secondary.table().row(row)
            } else {
                table.row(row)
            };
            assert_eq!(combined.table().row(row), expected);
        }
        assert_eq!(combined.n_missing(), 0);
        assert_eq!(combined.n_imputed(), secondary.n_imputed());
    }

    #[test]
    fn test_replaces_whole_row() {
        let table = create_test_table();
        // A secondary table that disagrees with the observed cells too
        let shifted = table
            .intensities()
            .map(|v| if v.is_nan() { 1.0 } else { v + 100.0 });
        let mut mask = DMatrix::from_element(4, 3, false);
        mask[(1, 1)] = true;
        mask[(3, 0)] = true;
        mask[(3, 1)] = true;
        let secondary =
            ImputedTable::new(table.with_intensities(shifted).unwrap(), mask, "test").unwrap();

        let combined = impute_two_step(&table, &secondary).unwrap();
        assert_eq!(combined.table().get(0, 0), Some(20.0));
        assert_eq!(combined.table().get(1, 0), Some(122.0));
        assert_eq!(combined.table().get(1, 1), Some(1.0));
        assert_eq!(combined.table().get(3, 2), Some(125.0));
    }

    #[test]
    fn test_layout_mismatch() {
        let table = create_test_table();
        let other = table.subset_proteins(&[0, 1]).unwrap();
        let secondary = ImputedTable::unchanged(&other);
        assert!(impute_two_step(&table, &secondary).is_err());
    }
}
