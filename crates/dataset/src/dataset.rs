//! Aligned Feature Dataset

use crate::DatasetError;
use feature_engine::FeatureError;
use ndarray::{Array2, ArrayView1, ArrayView2};

/// Features, relative arrival times, and identifiers, index-aligned
///
/// Row `i` of the feature matrix, `arrival_times[i]`, and `identifiers[i]`
/// always describe the same record. Arrival times are relative to each
/// recording's start.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Array2<f64>,
    arrival_times: Vec<f64>,
    identifiers: Vec<String>,
}

impl Dataset {
    /// Create an empty dataset with rows of `width` features
    pub fn new(width: usize) -> Self {
        Self {
            features: Array2::zeros((0, width)),
            arrival_times: Vec::new(),
            identifiers: Vec::new(),
        }
    }

    /// Rebuild a dataset from a row-major feature buffer
    pub fn from_parts(
        width: usize,
        flat_features: Vec<f64>,
        arrival_times: Vec<f64>,
        identifiers: Vec<String>,
    ) -> Result<Self, DatasetError> {
        let len = flat_features.len();
        let rows = match width {
            0 if len == 0 => arrival_times.len(),
            0 => return Err(DatasetError::BadShape { len, width }),
            _ if len % width != 0 => return Err(DatasetError::BadShape { len, width }),
            _ => len / width,
        };

        if rows != arrival_times.len() || rows != identifiers.len() {
            return Err(DatasetError::Misaligned {
                features: rows,
                arrival_times: arrival_times.len(),
                identifiers: identifiers.len(),
            });
        }

        let features = Array2::from_shape_vec((rows, width), flat_features)
            .map_err(|_| DatasetError::BadShape { len, width })?;

        Ok(Self {
            features,
            arrival_times,
            identifiers,
        })
    }

    /// Append one record
    pub fn push(
        &mut self,
        identifier: impl Into<String>,
        features: &[f64],
        arrival_time: f64,
    ) -> Result<(), FeatureError> {
        let mismatch = FeatureError::FeatureLengthMismatch {
            expected: self.width(),
            actual: features.len(),
        };
        if features.len() != self.width() {
            return Err(mismatch);
        }
        self.features
            .push_row(ArrayView1::from(features))
            .map_err(|_| mismatch)?;
        self.arrival_times.push(arrival_time);
        self.identifiers.push(identifier.into());
        Ok(())
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    /// Check if the dataset holds no records
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Features per record
    pub fn width(&self) -> usize {
        self.features.ncols()
    }

    /// Feature matrix, shape `(len, width)`
    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    /// Relative arrival times (seconds from recording start)
    pub fn arrival_times(&self) -> &[f64] {
        &self.arrival_times
    }

    /// Record identifiers
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    /// Iterate `(identifier, features, arrival_time)` in record order
    pub fn rows(&self) -> impl Iterator<Item = (&str, ArrayView1<'_, f64>, f64)> {
        self.identifiers
            .iter()
            .zip(self.features.rows())
            .zip(self.arrival_times.iter())
            .map(|((id, row), &t)| (id.as_str(), row, t))
    }

    /// Row-major copy of the feature matrix
    pub fn to_flat_features(&self) -> Vec<f64> {
        self.features.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_alignment() {
        let mut dataset = Dataset::new(3);
        dataset.push("a", &[1.0, 2.0, 3.0], 0.5).unwrap();
        dataset.push("b", &[4.0, 5.0, 6.0], 1.5).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.features().shape(), &[2, 3]);
        assert_eq!(dataset.identifiers(), &["a".to_string(), "b".to_string()]);
        assert_eq!(dataset.arrival_times(), &[0.5, 1.5]);

        let rows: Vec<_> = dataset.rows().collect();
        assert_eq!(rows[1].0, "b");
        assert_eq!(rows[1].1[2], 6.0);
        assert_eq!(rows[1].2, 1.5);
    }

    #[test]
    fn test_push_rejects_wrong_width() {
        let mut dataset = Dataset::new(3);
        let err = dataset.push("a", &[1.0, 2.0], 0.5).unwrap_err();
        assert_eq!(
            err,
            FeatureError::FeatureLengthMismatch {
                expected: 3,
                actual: 2
            }
        );
        assert!(dataset.is_empty());
        assert!(dataset.arrival_times().is_empty());
    }

    #[test]
    fn test_empty_dataset_keeps_width() {
        let dataset = Dataset::new(60);
        assert_eq!(dataset.features().shape(), &[0, 60]);
        assert_eq!(dataset.width(), 60);
    }

    #[test]
    fn test_from_parts_round_trip() {
        let mut dataset = Dataset::new(2);
        dataset.push("x", &[1.0, 2.0], 3.0).unwrap();
        dataset.push("y", &[4.0, 5.0], 6.0).unwrap();

        let rebuilt = Dataset::from_parts(
            2,
            dataset.to_flat_features(),
            dataset.arrival_times().to_vec(),
            dataset.identifiers().to_vec(),
        )
        .unwrap();
        assert_eq!(rebuilt, dataset);
    }

    #[test]
    fn test_from_parts_rejects_misalignment() {
        let err = Dataset::from_parts(2, vec![1.0, 2.0], vec![0.1, 0.2], vec!["a".into()])
            .unwrap_err();
        assert!(matches!(err, DatasetError::Misaligned { features: 1, .. }));

        let err = Dataset::from_parts(2, vec![1.0, 2.0, 3.0], vec![0.1], vec!["a".into()])
            .unwrap_err();
        assert_eq!(err, DatasetError::BadShape { len: 3, width: 2 });
    }
}
