use thiserror::Error;

// ---------------------------------------------------------------------------
// Domain errors for the data layer and the lunar page
// ---------------------------------------------------------------------------

/// Everything that can go wrong between the HTTP response and a derived
/// [`NeoDataset`](crate::data::model::NeoDataset).
#[derive(Debug, Error)]
pub enum NeoError {
    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid API endpoint '{0}'")]
    Endpoint(String),

    #[error("malformed CAD response")]
    Json(#[from] serde_json::Error),

    #[error("row {row} has {got} values but the response declares {expected} fields")]
    RowWidth {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("response is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("row {row}: '{field}' is null")]
    NullValue { row: usize, field: &'static str },

    #[error("row {row}: '{field}' value '{value}' is not numeric")]
    Coercion {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("row {row}: cannot parse close-approach date '{value}'")]
    Timestamp { row: usize, value: String },

    #[error("environment variable {0} is not set")]
    MissingCredential(String),
}

pub type NeoResult<T> = std::result::Result<T, NeoError>;
