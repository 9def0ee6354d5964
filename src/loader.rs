// Statement loading: the first three columns become label / prior / current,
// whatever the file called them.
use crate::model::{LoadError, StatementRow};
use crate::normalizer::coerce_value;
use std::path::Path;

pub trait Loader {
    fn load(&self, path: &Path) -> Result<Vec<StatementRow>, LoadError>;
}

pub struct CsvLoader;

impl CsvLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Loader for CsvLoader {
    fn load(&self, path: &Path) -> Result<Vec<StatementRow>, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let headers = reader.headers()?;
        if headers.len() < 3 {
            return Err(LoadError::ColumnCount(headers.len()));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.len() < 3 {
                return Err(LoadError::ColumnCount(record.len()));
            }
            rows.push(StatementRow {
                label: record.get(0).unwrap_or("").to_string(),
                prior: coerce_value(record.get(1).unwrap_or("")),
                current: coerce_value(record.get(2).unwrap_or("")),
            });
        }

        if rows.is_empty() {
            return Err(LoadError::Empty);
        }
        Ok(rows)
    }
}
