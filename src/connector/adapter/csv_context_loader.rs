use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::application::ContextSource;
use crate::domain::{ContextDocument, DomainError};

/// [`ContextSource`] reading a CSV knowledge base on every call.
///
/// The first row holds the column names. Each data row becomes one text unit
/// of `column: value` lines, and units are joined with newlines. Rows whose
/// field count differs from the header fail the load.
pub struct CsvContextLoader {
    path: PathBuf,
}

impl CsvContextLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self, bytes: &[u8]) -> Result<ContextDocument, DomainError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers = reader
            .headers()
            .map_err(|e| self.malformed(e))?
            .clone();

        let mut units = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| self.malformed(e))?;
            let unit = headers
                .iter()
                .zip(record.iter())
                .map(|(column, value)| format!("{}: {}", column, value))
                .collect::<Vec<_>>()
                .join("\n");
            units.push(unit);
        }

        Ok(ContextDocument::from_units(units))
    }

    fn malformed(&self, err: csv::Error) -> DomainError {
        DomainError::context(format!(
            "Malformed context file {}: {}",
            self.path.display(),
            err
        ))
    }
}

#[async_trait]
impl ContextSource for CsvContextLoader {
    async fn load(&self) -> Result<ContextDocument, DomainError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            DomainError::context(format!(
                "Failed to read context file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let document = self.parse(&bytes)?;
        debug!(
            "Loaded {} context rows from {}",
            document.unit_count(),
            self.path.display()
        );
        Ok(document)
    }
}
