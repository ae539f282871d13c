use shared::{domain::Identifier, error::ParseError};
use thiserror::Error;

/// The request itself could not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {message}")]
    Unreachable { url: String, message: String },
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("{url} returned a body that is not valid JSON: {message}")]
    InvalidJson { url: String, message: String },
}

impl TransportError {
    pub fn url(&self) -> &str {
        match self {
            TransportError::Unreachable { url, .. }
            | TransportError::Status { url, .. }
            | TransportError::InvalidJson { url, .. } => url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetailError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("unexpected detail response: {0}")]
    Parse(#[from] ParseError),
    #[error("identifier `{0}` cannot be addressed as a path segment")]
    Unaddressable(Identifier),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFailure {
    pub id: Identifier,
    pub error: DetailError,
}

/// One or more detail requests of a fan-in failed; no partial list is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "{count} of {requested} detail requests failed (first: {first})",
    count = .failures.len(),
    first = first_failure(.failures)
)]
pub struct AggregationError {
    pub requested: usize,
    pub failures: Vec<DetailFailure>,
}

impl AggregationError {
    pub fn failed_ids(&self) -> Vec<&Identifier> {
        self.failures.iter().map(|f| &f.id).collect()
    }
}

fn first_failure(failures: &[DetailFailure]) -> String {
    failures
        .first()
        .map(|f| format!("{}: {}", f.id, f.error))
        .unwrap_or_else(|| "none".to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("index request failed: {0}")]
    Index(#[from] TransportError),
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}
