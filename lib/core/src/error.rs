use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Not fitted: call fit() before transform/encode/find_matches")]
    NotFitted,

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid value for column {column}: {message}")]
    InvalidValue { column: String, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Population is empty")]
    EmptyPopulation,
}
