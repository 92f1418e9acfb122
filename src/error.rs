//! Process-level error type.
//!
//! Exit codes: 2 for configuration/usage problems, 4 for data/runtime failures.

use crate::data::DataError;

#[derive(Debug, Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        let exit_code = match err {
            DataError::ConfigFetch(_) | DataError::ConfigMalformed => 2,
            DataError::CatalogLoad(_) | DataError::SeriesLoad => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}
