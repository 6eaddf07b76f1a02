use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Could not read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Row {row}: invalid {field} value '{value}'")]
    InvalidField {
        row: u64,
        field: &'static str,
        value: String,
    },

    #[error("Dataset contains no records")]
    EmptyDataset,
}
