use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    #[error("Unknown company: {0}")]
    UnknownCompany(String),

    #[error("Duplicate company name: {0}")]
    DuplicateCompany(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Config error: {0}")]
    Config(String),
}
