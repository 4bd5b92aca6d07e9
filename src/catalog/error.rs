use thiserror::Error;

/// Failures surfaced by a [`CatalogSource`](super::source::CatalogSource).
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("not found: {what}")]
    NotFound { what: String },
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unexpected payload: {0}")]
    Payload(String),
    #[error("fixture: {0}")]
    Fixture(String),
}

impl CatalogError {
    pub fn not_found(what: impl Into<String>) -> Self {
        CatalogError::NotFound { what: what.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
