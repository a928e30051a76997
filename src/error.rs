use polars::prelude::PolarsError;
use thiserror::Error;

/// Failure to establish or verify the database connection.
///
/// Connection problems are not retryable from inside this crate; the
/// embedding application decides whether they are fatal.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("invalid mongodb connection string: {0}")]
    InvalidUri(#[source] mongodb::error::Error),

    #[error("mongodb server unreachable: {0}")]
    Unreachable(#[source] mongodb::error::Error),
}

/// Failure while reading a collection over an established connection.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("query against collection '{collection}' failed: {source}")]
    Query {
        collection: String,
        source: mongodb::error::Error,
    },

    #[error("could not build a frame for collection '{collection}': {source}")]
    Frame {
        collection: String,
        source: PolarsError,
    },
}

impl FetchError {
    pub(crate) fn query(collection: &str, source: mongodb::error::Error) -> Self {
        FetchError::Query {
            collection: collection.to_string(),
            source,
        }
    }

    pub(crate) fn frame(collection: &str, source: PolarsError) -> Self {
        FetchError::Frame {
            collection: collection.to_string(),
            source,
        }
    }
}
