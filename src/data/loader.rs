//! Dataset loading and saving.
//!
//! Thin wrappers over the `csv` crate for reading and writing customer
//! rows.

use super::types::CustomerRecord;
use anyhow::{Context, Result};
use csv::{Reader, Writer};
use std::fs::File;
use std::path::Path;

/// Loader for the telco customer CSV.
pub struct DataLoader;

impl DataLoader {
    /// Load customer rows from a CSV file.
    pub fn load_customers<P: AsRef<Path>>(path: P) -> Result<Vec<CustomerRecord>> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open file: {:?}", path.as_ref()))?;

        let mut reader = Reader::from_reader(file);
        let mut records = Vec::new();

        for result in reader.deserialize() {
            let record: CustomerRecord = result.context("Failed to parse customer row")?;
            records.push(record);
        }

        Ok(records)
    }

    /// Save customer rows to a CSV file.
    pub fn save_customers<P: AsRef<Path>>(records: &[CustomerRecord], path: P) -> Result<()> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create file: {:?}", path.as_ref()))?;

        let mut writer = Writer::from_writer(file);

        for record in records {
            writer.serialize(record)?;
        }

        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::customer;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_customers() {
        let records = vec![
            customer("0001-AAAAA", 12.0, 70.5, "840.6", "Yes", "No"),
            customer("0002-BBBBB", 2.0, 25.0, " ", "No", "Yes"),
        ];

        let dir = tempdir().unwrap();
        let path = dir.path().join("customers.csv");

        DataLoader::save_customers(&records, &path).unwrap();
        let loaded = DataLoader::load_customers(&path).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].customer_id, "0001-AAAAA");
        assert_eq!(loaded[1].total_charges, " ");
        assert_eq!(loaded[1].churn, "Yes");
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let result = DataLoader::load_customers("does/not/exist.csv");
        assert!(result.is_err());
    }
}
