use thiserror::Error;

/// Error type for invalid operations.
///
/// Every variant is fatal to a model run: there are no partial results.
#[derive(Error, Debug)]
pub enum JSCMError {
    #[error("Value outside of the valid domain for {quantity} at index {index}: {value}")]
    Domain {
        quantity: String,
        index: usize,
        value: f64,
    },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Input has the wrong shape. Expected {expected} values, found {found}")]
    InputShape { expected: usize, found: usize },
    #[error("Emissions of {species} for {year} are not finite")]
    InvalidEmissions { year: i32, species: String },
    #[error("Could not parse line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl JSCMError {
    /// Build a domain error for a named quantity
    pub fn domain(quantity: impl Into<String>, index: usize, value: f64) -> Self {
        Self::Domain {
            quantity: quantity.into(),
            index,
            value,
        }
    }
}

/// Convenience type for `Result<T, JSCMError>`.
pub type JSCMResult<T> = Result<T, JSCMError>;
