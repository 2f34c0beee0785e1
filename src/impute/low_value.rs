//! Column-wise low-value imputation.
//!
//! Missing LFQ values mostly stem from proteins below the detection limit, so
//! both strategies here replace them with draws from the low tail of the
//! sample's observed intensity distribution:
//!
//! - [`impute_low_value`]: uniform on `[mean - 3·std, mean - 2·std]`
//! - [`impute_gaussian`]: normal with centre `mean - 1.8·std` and width `0.3·std`
//!   (the Perseus default)

use crate::data::{ImputedTable, ProteinTable};
use crate::error::{LfqError, Result};
use crate::impute::sample_normal;
use crate::stats::nan_mean_std;
use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// Downshift of the Gaussian centre, in standard deviations.
pub const GAUSSIAN_DOWNSHIFT: f64 = 1.8;
/// Width of the Gaussian, as a fraction of the standard deviation.
pub const GAUSSIAN_WIDTH: f64 = 0.3;

/// Fill missing cells with uniform draws from `[mean - 3·std, mean - 2·std]`
/// of the observed values in the same sample.
pub fn impute_low_value<R: Rng + ?Sized>(table: &ProteinTable, rng: &mut R) -> Result<ImputedTable> {
    impute_columns(table, rng, "low-value", |mean, std, rng| {
        let low = mean - 3.0 * std;
        let high = mean - 2.0 * std;
        if std == 0.0 {
            Ok(low)
        } else {
            Ok(Uniform::new(low, high).sample(rng))
        }
    })
}

/// Fill missing cells with draws from `Normal(mean - 1.8·std, 0.3·std)` of the
/// observed values in the same sample.
pub fn impute_gaussian<R: Rng + ?Sized>(table: &ProteinTable, rng: &mut R) -> Result<ImputedTable> {
    impute_columns(table, rng, "gaussian", |mean, std, rng| {
        sample_normal(rng, mean - GAUSSIAN_DOWNSHIFT * std, GAUSSIAN_WIDTH * std)
    })
}

fn impute_columns<R, F>(
    table: &ProteinTable,
    rng: &mut R,
    method: &str,
    mut draw: F,
) -> Result<ImputedTable>
where
    R: Rng + ?Sized,
    F: FnMut(f64, f64, &mut R) -> Result<f64>,
{
    let mut values = table.intensities().clone();
    let mut mask = DMatrix::from_element(table.n_proteins(), table.n_samples(), false);

    for col in 0..table.n_samples() {
        let column = table.column(col);
        let missing: Vec<usize> = (0..column.len()).filter(|&r| column[r].is_nan()).collect();
        if missing.is_empty() {
            continue;
        }

        let (mean, std) = nan_mean_std(&column);
        if !std.is_finite() {
            return Err(LfqError::Numerical(format!(
                "Sample '{}' needs at least two measured values for {} imputation",
                table.sample_names()[col],
                method
            )));
        }

        for row in missing {
            values[(row, col)] = draw(mean, std, rng)?;
            mask[(row, col)] = true;
        }
    }

    log::debug!(
        "{} imputation filled {} cells",
        method,
        mask.iter().filter(|&&m| m).count()
    );
    ImputedTable::new(table.with_intensities(values)?, mask, method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_test_table() -> ProteinTable {
        let nan = f64::NAN;
        ProteinTable::from_intensities(
            DMatrix::from_row_slice(
                6,
                3,
                &[
                    20.0, 21.0, 22.0, //
                    22.0, nan, 24.0, //
                    24.0, 25.0, nan, //
                    26.0, 27.0, 26.0, //
                    nan, 23.0, 25.0, //
                    28.0, nan, 27.0,
                ],
            ),
            (0..6).collect(),
            vec!["a".into(), "b".into(), "c".into()],
        )
        .unwrap()
    }

    fn assert_only_missing_filled(original: &ProteinTable, imputed: &ImputedTable) {
        assert_eq!(imputed.n_missing(), 0);
        for row in 0..original.n_proteins() {
            for col in 0..original.n_samples() {
                match original.get(row, col) {
                    Some(v) => {
                        assert_eq!(imputed.table().get(row, col), Some(v));
                        assert!(!imputed.is_imputed(row, col));
                    }
                    None => assert!(imputed.is_imputed(row, col)),
                }
            }
        }
    }

    #[test]
    fn test_low_value_fills_only_missing() {
        let table = create_test_table();
        let mut rng = StdRng::seed_from_u64(7);
        let imputed = impute_low_value(&table, &mut rng).unwrap();

        assert_only_missing_filled(&table, &imputed);
        assert_eq!(imputed.n_imputed(), 4);
        assert_eq!(imputed.method(), "low-value");
    }

    #[test]
    fn test_low_value_range() {
        let table = create_test_table();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let imputed = impute_low_value(&table, &mut rng).unwrap();
            for col in 0..table.n_samples() {
                let (mean, std) = nan_mean_std(&table.column(col));
                for v in imputed.imputed_values(col) {
                    assert!(v >= mean - 3.0 * std && v <= mean - 2.0 * std);
                }
            }
        }
    }

    #[test]
    fn test_gaussian_fills_only_missing() {
        let table = create_test_table();
        let mut rng = StdRng::seed_from_u64(11);
        let imputed = impute_gaussian(&table, &mut rng).unwrap();

        assert_only_missing_filled(&table, &imputed);
        // Draws sit well below the observed mean
        for col in 0..table.n_samples() {
            let (mean, _) = nan_mean_std(&table.column(col));
            for v in imputed.imputed_values(col) {
                assert!(v < mean);
            }
        }
    }

    #[test]
    fn test_reproducible_with_seed() {
        let table = create_test_table();
        let a = impute_gaussian(&table, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = impute_gaussian(&table, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a.table().intensities(), b.table().intensities());
    }

    #[test]
    fn test_constant_column() {
        let table = ProteinTable::from_intensities(
            DMatrix::from_row_slice(3, 1, &[5.0, 5.0, f64::NAN]),
            vec![0, 1, 2],
            vec!["a".into()],
        )
        .unwrap();
        let imputed = impute_low_value(&table, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(imputed.table().get(2, 0), Some(5.0));
    }

    #[test]
    fn test_too_few_observations() {
        let table = ProteinTable::from_intensities(
            DMatrix::from_row_slice(2, 1, &[5.0, f64::NAN]),
            vec![0, 1],
            vec!["a".into()],
        )
        .unwrap();
        assert!(matches!(
            impute_low_value(&table, &mut StdRng::seed_from_u64(0)),
            Err(LfqError::Numerical(_))
        ));
    }
}
