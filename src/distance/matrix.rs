//! Dense cost matrix.

use serde::Serialize;

use crate::error::{Result, RoutingError};

/// Anything that prices a directed arc between two location indices.
///
/// Implemented by [`DistanceMatrix`] for true travel cost and by the guided
/// local search for penalty-augmented cost, so neighborhood operators can be
/// evaluated against either.
pub trait ArcCost {
    /// Cost of traveling from `from` to `to`.
    fn arc_cost(&self, from: usize, to: usize) -> f64;
}

/// A dense n×n matrix stored in row-major order.
///
/// Used for both distances (km) and travel times (minutes). Entries need not
/// be symmetric.
///
/// # Examples
///
/// ```
/// use lpg_routing::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 10.0],
///     vec![12.0, 0.0],
/// ]).unwrap();
/// assert_eq!(dm.get(0, 1), 10.0);
/// assert_eq!(dm.get(1, 0), 12.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

/// Travel time matrix in minutes; same layout as [`DistanceMatrix`].
pub type TimeMatrix = DistanceMatrix;

impl DistanceMatrix {
    /// Creates a matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Creates a matrix from an explicit row-major n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Creates a matrix from nested rows.
    ///
    /// Returns `None` if the rows do not form a square.
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Self::from_data(size, rows.concat())
    }

    /// Returns the entry from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the entry from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, value: f64) {
        self.data[from * self.size + to] = value;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Iterates `(from, to, value)` over every off-diagonal entry.
    pub fn off_diagonal(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let n = self.size;
        (0..n)
            .flat_map(move |i| (0..n).map(move |j| (i, j)))
            .filter(|&(i, j)| i != j)
            .map(|(i, j)| (i, j, self.get(i, j)))
    }

    /// Checks that the matrix is `expected`×`expected`, has a zero diagonal,
    /// and holds only finite non-negative entries.
    pub fn validate(&self, name: &'static str, expected: usize) -> Result<()> {
        if self.size != expected {
            return Err(RoutingError::MatrixSizeMismatch {
                name,
                expected,
                actual: self.size,
            });
        }
        for i in 0..self.size {
            for j in 0..self.size {
                let value = self.get(i, j);
                let bad = !value.is_finite() || value < 0.0 || (i == j && value != 0.0);
                if bad {
                    return Err(RoutingError::InvalidMatrixEntry {
                        name,
                        from: i,
                        to: j,
                        value,
                    });
                }
            }
        }
        Ok(())
    }

    /// Summary statistics over off-diagonal entries.
    pub fn summary(&self) -> SummaryStats {
        let values: Vec<f64> = self.off_diagonal().map(|(_, _, v)| v).collect();
        SummaryStats::from_values(&values)
    }
}

impl ArcCost for DistanceMatrix {
    fn arc_cost(&self, from: usize, to: usize) -> f64 {
        self.get(from, to)
    }
}

/// Min/max/mean/population standard deviation and total of a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SummaryStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
    pub total: f64,
}

impl SummaryStats {
    /// Computes statistics in two passes. An empty input yields all zeros.
    pub fn from_values(values: &[f64]) -> Self {
        let mut count = 0usize;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut total = 0.0;
        for &v in values {
            count += 1;
            min = min.min(v);
            max = max.max(v);
            total += v;
        }
        if count == 0 {
            return Self::default();
        }
        let mean = total / count as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
        Self {
            count,
            min,
            max,
            mean,
            std: variance.sqrt(),
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DistanceMatrix {
        DistanceMatrix::from_rows(&[
            vec![0.0, 5.0, 8.0],
            vec![6.0, 0.0, 3.0],
            vec![8.0, 4.0, 0.0],
        ])
        .expect("square")
    }

    #[test]
    fn test_from_data() {
        let dm = DistanceMatrix::from_data(2, vec![0.0, 5.0, 5.0, 0.0]).expect("valid");
        assert_eq!(dm.get(0, 1), 5.0);
        assert_eq!(dm.get(1, 0), 5.0);
    }

    #[test]
    fn test_from_data_invalid_size() {
        assert!(DistanceMatrix::from_data(2, vec![0.0, 1.0, 2.0]).is_none());
    }

    #[test]
    fn test_from_rows_ragged() {
        assert!(DistanceMatrix::from_rows(&[vec![0.0, 1.0], vec![1.0]]).is_none());
    }

    #[test]
    fn test_set_get() {
        let mut dm = DistanceMatrix::new(3);
        dm.set(0, 1, 42.0);
        assert_eq!(dm.get(0, 1), 42.0);
        assert_eq!(dm.get(1, 0), 0.0);
    }

    #[test]
    fn test_validate() {
        let dm = sample();
        assert!(dm.validate("distance", 3).is_ok());
        assert!(matches!(
            dm.validate("distance", 4),
            Err(RoutingError::MatrixSizeMismatch { expected: 4, actual: 3, .. })
        ));

        let mut bad = sample();
        bad.set(1, 2, -1.0);
        assert!(matches!(
            bad.validate("time", 3),
            Err(RoutingError::InvalidMatrixEntry { from: 1, to: 2, .. })
        ));

        let mut diag = sample();
        diag.set(2, 2, 1.0);
        assert!(diag.validate("time", 3).is_err());

        let mut nan = sample();
        nan.set(0, 2, f64::NAN);
        assert!(nan.validate("distance", 3).is_err());
    }

    #[test]
    fn test_summary_excludes_diagonal() {
        let stats = sample().summary();
        assert_eq!(stats.count, 6);
        assert_eq!(stats.min, 3.0);
        assert_eq!(stats.max, 8.0);
        assert!((stats.total - 34.0).abs() < 1e-10);
        assert!((stats.mean - 34.0 / 6.0).abs() < 1e-10);
        let var = [5.0, 8.0, 6.0, 3.0, 8.0, 4.0]
            .iter()
            .map(|v| (v - 34.0 / 6.0_f64).powi(2))
            .sum::<f64>()
            / 6.0;
        assert!((stats.std - var.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_summary_empty() {
        let stats = DistanceMatrix::new(1).summary();
        assert_eq!(stats, SummaryStats::default());
    }
}
