//! Training Data Loading

use crate::error::ValidationError;
use crate::normalizer::StandardScaler;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Target column present in the training file and excluded from the features
pub const TARGET_COLUMN: &str = "Loan_Status";

/// Feature rows loaded from the processed training CSV
#[derive(Debug, Clone)]
pub struct TrainingData {
    /// Selected column names, in the requested order
    columns: Vec<String>,
    /// One row per training sample
    rows: Vec<Vec<f64>>,
}

impl TrainingData {
    /// Load the feature columns from a CSV file on disk
    pub fn from_csv_path(
        path: impl AsRef<Path>,
        feature_columns: &[&str],
    ) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let reader = csv::Reader::from_path(path).map_err(|e| {
            ValidationError::InvalidFormat(format!("{}: {}", path.display(), e))
        })?;
        let data = Self::from_csv(reader, feature_columns)?;
        info!(
            "Loaded {} training rows from {}",
            data.rows.len(),
            path.display()
        );
        Ok(data)
    }

    /// Load the feature columns from any CSV source with a header row.
    ///
    /// Columns are selected by name so the file may order them freely; the
    /// target column must be present and is dropped.
    pub fn from_reader<R: Read>(
        reader: R,
        feature_columns: &[&str],
    ) -> Result<Self, ValidationError> {
        Self::from_csv(csv::Reader::from_reader(reader), feature_columns)
    }

    fn from_csv<R: Read>(
        mut reader: csv::Reader<R>,
        feature_columns: &[&str],
    ) -> Result<Self, ValidationError> {
        let headers = reader
            .headers()
            .map_err(|e| ValidationError::InvalidFormat(e.to_string()))?
            .clone();

        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        if position(TARGET_COLUMN).is_none() {
            return Err(ValidationError::MissingField(TARGET_COLUMN.to_string()));
        }

        let indices = feature_columns
            .iter()
            .map(|name| position(name).ok_or_else(|| ValidationError::MissingField(name.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| ValidationError::InvalidFormat(e.to_string()))?;
            let row = indices
                .iter()
                .zip(feature_columns)
                .map(|(&idx, name)| {
                    let cell = record.get(idx).unwrap_or("").trim();
                    cell.parse::<f64>().map_err(|_| {
                        ValidationError::InvalidFormat(format!(
                            "row {}: column {} has non-numeric value {:?}",
                            line + 1,
                            name,
                            cell
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }

        Ok(Self {
            columns: feature_columns.iter().map(|c| c.to_string()).collect(),
            rows,
        })
    }

    /// Fit a standard scaler on the loaded rows
    pub fn fit_scaler(&self) -> Result<StandardScaler, ValidationError> {
        StandardScaler::fit(&self.rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "\
Loan_Status,Income,Dependents
1,100,0
0,300,2
1,200,1
";

    #[test]
    fn test_selects_columns_by_name_and_drops_target() {
        let data = TrainingData::from_reader(CSV.as_bytes(), &["Dependents", "Income"]).unwrap();

        assert_eq!(data.columns(), &["Dependents".to_string(), "Income".to_string()]);
        assert_eq!(data.len(), 3);
        assert_eq!(data.rows()[1], vec![2.0, 300.0]);
    }

    #[test]
    fn test_missing_feature_column() {
        let err = TrainingData::from_reader(CSV.as_bytes(), &["LoanAmount"]).unwrap_err();
        assert!(matches!(err, ValidationError::MissingField(ref c) if c == "LoanAmount"));
    }

    #[test]
    fn test_missing_target_column() {
        let csv = "Income\n100\n";
        let err = TrainingData::from_reader(csv.as_bytes(), &["Income"]).unwrap_err();
        assert!(matches!(err, ValidationError::MissingField(ref c) if c == TARGET_COLUMN));
    }

    #[test]
    fn test_non_numeric_cell() {
        let csv = "Loan_Status,Income\n1,abc\n";
        let err = TrainingData::from_reader(csv.as_bytes(), &["Income"]).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat(_)));
    }

    #[test]
    fn test_fit_scaler_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let data = TrainingData::from_csv_path(file.path(), &["Income"]).unwrap();
        let scaler = data.fit_scaler().unwrap();

        assert_eq!(scaler.mean(), &[200.0]);
        assert_eq!(scaler.transform(&[200.0]).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_missing_file() {
        assert!(TrainingData::from_csv_path("/nonexistent/training.csv", &["Income"]).is_err());
    }
}
