use std::io::Read;
use std::path::Path;

use super::domain::{ApplicantInput, InputError};

/// Failure while reading an applicant CSV file.
#[derive(Debug, thiserror::Error)]
pub enum BatchImportError {
    #[error("failed to read applicant file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid applicant CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("applicant on line {line} is invalid: {source}")]
    Row { line: u64, source: InputError },
}

/// Reads applicants from CSV whose headers are the [`ApplicantInput`] field names.
pub struct ApplicantCsvImporter;

impl ApplicantCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ApplicantInput>, BatchImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse and validate every row; the first invalid row stops the import.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ApplicantInput>, BatchImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut applicants = Vec::new();

        for record in csv_reader.records() {
            let record = record?;
            let applicant: ApplicantInput = record.deserialize(Some(&headers))?;
            if let Err(source) = applicant.validate() {
                let line = record.position().map(csv::Position::line).unwrap_or_default();
                return Err(BatchImportError::Row { line, source });
            }
            applicants.push(applicant);
        }

        Ok(applicants)
    }
}
