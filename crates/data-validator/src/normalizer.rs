//! Standard Scaling (z-score with fitted statistics)

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Column-wise standard scaler fitted once on historical training data.
///
/// Each column is transformed as `(x - mean) / scale`, where `scale` is the
/// population standard deviation of the column. Constant columns get a scale
/// of 1 so they map to zero instead of dividing by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Per-column mean
    mean: Vec<f64>,
    /// Per-column scale (population std dev, 1.0 for constant columns)
    scale: Vec<f64>,
    /// Number of rows seen during fitting
    samples_seen: usize,
}

impl StandardScaler {
    /// Fit the scaler on a set of equally sized rows
    pub fn fit<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, ValidationError> {
        let first = rows.first().ok_or(ValidationError::EmptyDataSet)?;
        let width = first.as_ref().len();
        let n = rows.len() as f64;

        let mut mean = vec![0.0; width];
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(ValidationError::DimensionMismatch {
                    expected: width,
                    actual: row.len(),
                });
            }
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut m2 = vec![0.0; width];
        for row in rows {
            for ((acc, v), m) in m2.iter_mut().zip(row.as_ref()).zip(&mean) {
                let d = v - m;
                *acc += d * d;
            }
        }

        let scale = m2
            .into_iter()
            .map(|sum| {
                let std_dev = (sum / n).sqrt();
                if std_dev == 0.0 || !std_dev.is_finite() {
                    1.0
                } else {
                    std_dev
                }
            })
            .collect();

        debug!("Fitted standard scaler on {} rows x {} columns", rows.len(), width);

        Ok(Self {
            mean,
            scale,
            samples_seen: rows.len(),
        })
    }

    /// Build a scaler from previously fitted parameters
    pub fn from_parameters(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ValidationError> {
        if mean.len() != scale.len() {
            return Err(ValidationError::DimensionMismatch {
                expected: mean.len(),
                actual: scale.len(),
            });
        }
        if let Some(bad) = scale.iter().find(|s| **s == 0.0 || !s.is_finite()) {
            return Err(ValidationError::InvalidFormat(format!(
                "scale must be finite and non-zero, got {}",
                bad
            )));
        }
        Ok(Self {
            mean,
            scale,
            samples_seen: 0,
        })
    }

    /// Apply the fitted transform to one row
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, ValidationError> {
        if row.len() != self.mean.len() {
            return Err(ValidationError::DimensionMismatch {
                expected: self.mean.len(),
                actual: row.len(),
            });
        }

        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| (x - m) / s)
            .collect())
    }

    /// Number of columns the scaler was fitted on
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Per-column means
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Per-column scales
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    pub fn samples_seen(&self) -> usize {
        self.samples_seen
    }
}
