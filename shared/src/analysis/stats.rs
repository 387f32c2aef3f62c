//! Numeric helpers shared by the analyzers

use thiserror::Error;

/// Internal numerical failure inside one detection pass
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Empty input")]
    EmptyInput,

    #[error("Non-finite value in column {column}")]
    NonFiniteValue { column: usize },

    #[error("Row {row} has {found} columns, expected {expected}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator)
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Population standard deviation (n denominator)
pub fn population_std(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / values.len() as f64).sqrt())
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

/// Differences between consecutive samples
pub fn deltas(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Ordinary least-squares slope of `values` against their index
pub fn linear_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = values.iter().sum::<f64>() / n as f64;

    let (num, den) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, y)| {
            let dx = i as f64 - x_mean;
            (num + dx * (y - y_mean), den + dx * dx)
        });

    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Column-wise z-score scaler fitted on a reference set
///
/// Constant columns get a unit scale so they map to zero instead of NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct Standardizer {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl Standardizer {
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self, StatsError> {
        let width = check_matrix(rows)?;
        let mut means = Vec::with_capacity(width);
        let mut scales = Vec::with_capacity(width);

        for col in 0..width {
            let column: Vec<f64> = rows.iter().map(|r| r[col]).collect();
            let m = mean(&column).ok_or(StatsError::EmptyInput)?;
            let s = population_std(&column).ok_or(StatsError::EmptyInput)?;
            means.push(m);
            scales.push(if s > 0.0 { s } else { 1.0 });
        }

        Ok(Self { means, scales })
    }

    pub fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, StatsError> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                if row.len() != self.means.len() {
                    return Err(StatsError::DimensionMismatch {
                        row: i,
                        expected: self.means.len(),
                        found: row.len(),
                    });
                }
                Ok(row
                    .iter()
                    .zip(self.means.iter().zip(&self.scales))
                    .map(|(v, (m, s))| (v - m) / s)
                    .collect())
            })
            .collect()
    }
}

/// Density-based noise labelling (the noise set of DBSCAN)
///
/// A point is a core point when at least `min_samples` points, itself
/// included, lie within `eps`. Points that are neither core points nor
/// within `eps` of a core point are noise. Returns one flag per row.
pub fn density_noise(
    rows: &[Vec<f64>],
    eps: f64,
    min_samples: usize,
) -> Result<Vec<bool>, StatsError> {
    check_matrix(rows)?;
    let n = rows.len();
    let eps_sq = eps * eps;

    let neighbours: Vec<Vec<usize>> = (0..n)
        .map(|i| {
            (0..n)
                .filter(|&j| squared_distance(&rows[i], &rows[j]) <= eps_sq)
                .collect()
        })
        .collect();

    let core: Vec<bool> = neighbours.iter().map(|nb| nb.len() >= min_samples).collect();

    Ok((0..n)
        .map(|i| !core[i] && !neighbours[i].iter().any(|&j| core[j]))
        .collect())
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

fn check_matrix(rows: &[Vec<f64>]) -> Result<usize, StatsError> {
    let width = rows.first().map(Vec::len).ok_or(StatsError::EmptyInput)?;
    for (i, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(StatsError::DimensionMismatch {
                row: i,
                expected: width,
                found: row.len(),
            });
        }
        if let Some(column) = row.iter().position(|v| !v.is_finite()) {
            return Err(StatsError::NonFiniteValue { column });
        }
    }
    Ok(width)
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_mean_lies_between_extremes(values in prop::collection::vec(-1000.0f64..1000.0, 1..40)) {
            let m = mean(&values).unwrap();
            prop_assert!(m >= min(&values).unwrap() - 1e-9);
            prop_assert!(m <= max(&values).unwrap() + 1e-9);
        }

        /// A straight line has its own gradient as OLS slope
        #[test]
        fn prop_slope_of_line_is_exact(
            intercept in -100.0f64..100.0,
            gradient in -10.0f64..10.0,
            n in 2usize..30,
        ) {
            let values: Vec<f64> = (0..n).map(|i| intercept + gradient * i as f64).collect();
            prop_assert!((linear_slope(&values) - gradient).abs() < 1e-6);
        }

        /// Fitted columns are centred after transformation
        #[test]
        fn prop_standardized_columns_are_centred(
            rows in prop::collection::vec(prop::collection::vec(-50.0f64..50.0, 3), 2..20),
        ) {
            let scaler = Standardizer::fit(&rows).unwrap();
            let scaled = scaler.transform(&rows).unwrap();
            for col in 0..3 {
                let column: Vec<f64> = scaled.iter().map(|r| r[col]).collect();
                prop_assert!(mean(&column).unwrap().abs() < 1e-6);
            }
        }

        #[test]
        fn prop_noise_flags_match_rows(
            rows in prop::collection::vec(prop::collection::vec(-5.0f64..5.0, 2), 1..25),
        ) {
            let noise = density_noise(&rows, 0.5, 3).unwrap();
            prop_assert_eq!(noise.len(), rows.len());
            if rows.len() < 3 {
                prop_assert!(noise.iter().all(|n| *n));
            }
        }
    }
}
