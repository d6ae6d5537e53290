use thiserror::Error;

/// Unified error type for the pricing engine.
///
/// Validation failures are detected synchronously and returned as values;
/// none of these are used for normal control flow. Callers (the wizard UI)
/// are responsible for rendering a user-visible message.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Base and destination units must both be selected")]
    MissingUnit,

    #[error("A unit cannot be converted to itself (unit {unit_id})")]
    SelfConversion { unit_id: i64 },

    #[error("Conversion factor must be a positive number, got {factor}")]
    InvalidFactor { factor: f64 },

    #[error("A conversion from unit {base_unit_id} to unit {destination_unit_id} already exists")]
    DuplicateConversion {
        base_unit_id: i64,
        destination_unit_id: i64,
    },

    #[error("Another conversion is already marked as principal")]
    DuplicatePrincipal,

    #[error("Cost cannot be negative, got {cost}")]
    NegativeCost { cost: f64 },

    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: f64 },

    #[error("No conversion at index {index}")]
    IndexOutOfRange { index: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Server rejected the request ({status}): {message}")]
    Api { status: u16, message: String },
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
