#![deny(clippy::all)]

mod buffer;
mod config;
mod conversion;
mod error;
mod frame;
pub mod prelude;

pub use crate::config::MongoConfig;
pub use crate::error::{ConnectionError, FetchError};
pub use crate::frame::documents_to_frame;

use std::time::Duration;

use log::info;
use mongodb::{
    bson::{doc, Document},
    options::ClientOptions,
    sync::{Client, Collection, Database},
};
use polars::prelude::DataFrame;

/// One record per district, year and demographic group.
pub const POPULATION_COLLECTION: &str = "population";
/// Raw birth records.
pub const BIRTHS_COLLECTION: &str = "births";
/// Pre-joined dataset, the one meant for analysis work.
pub const MERGED_COLLECTION: &str = "merged_analysis";

/// Synchronous reader for the Wien demographic datasets stored in MongoDB.
///
/// The server is pinged at construction so that an unreachable database
/// surfaces here rather than on the first fetch. Every collection comes back
/// as a polars [`DataFrame`] with the `_id` column removed.
pub struct DemografieReader {
    db: Database,
}

impl DemografieReader {
    /// Establish a connection to the database named in `config` and verify
    /// the server is reachable.
    pub fn connect(config: MongoConfig) -> Result<Self, ConnectionError> {
        let mut client_options =
            ClientOptions::parse(&config.uri).map_err(ConnectionError::InvalidUri)?;
        client_options.server_selection_timeout =
            Some(Duration::from_millis(config.server_selection_timeout_ms));
        if let Some(auth_source) = &config.auth_source {
            if let Some(credential) = client_options.credential.as_mut() {
                credential.source = Some(auth_source.clone());
            }
        }

        let client = Client::with_options(client_options).map_err(ConnectionError::Unreachable)?;
        let db = client.database(&config.database);

        // Fail fast instead of erroring lazily on the first fetch.
        db.run_command(doc! { "ping": 1 }, None)
            .map_err(ConnectionError::Unreachable)?;

        info!("connected to mongodb database '{}'", config.database);
        Ok(DemografieReader { db })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }

    /// Fetch every document of the named collection and normalize the result
    /// into a frame.
    ///
    /// An unknown or empty collection yields an empty frame rather than an
    /// error; check `height()` if the distinction matters.
    pub fn fetch_collection(&self, name: &str) -> Result<DataFrame, FetchError> {
        let cursor = self
            .collection(name)
            .find(None, None)
            .map_err(|source| FetchError::query(name, source))?;

        let docs = cursor
            .collect::<mongodb::error::Result<Vec<Document>>>()
            .map_err(|source| FetchError::query(name, source))?;

        let df = documents_to_frame(&docs).map_err(|source| FetchError::frame(name, source))?;

        info!("loaded {} records from '{}'", df.height(), name);
        Ok(df)
    }

    /// Complete population dataset.
    pub fn population(&self) -> Result<DataFrame, FetchError> {
        self.fetch_collection(POPULATION_COLLECTION)
    }

    /// Complete birth dataset.
    pub fn births(&self) -> Result<DataFrame, FetchError> {
        self.fetch_collection(BIRTHS_COLLECTION)
    }

    /// Complete merged dataset.
    pub fn merged(&self) -> Result<DataFrame, FetchError> {
        self.fetch_collection(MERGED_COLLECTION)
    }

    /// Release the underlying client handle.
    ///
    /// Takes the reader by value, so further fetches (or a second close) are
    /// ruled out at compile time.
    pub fn close(self) {
        drop(self);
        info!("mongodb connection closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_uri_is_a_connection_error() {
        let config = MongoConfig {
            uri: "definitely-not-a-connection-string".to_string(),
            ..MongoConfig::default()
        };

        assert!(matches!(
            DemografieReader::connect(config),
            Err(ConnectionError::InvalidUri(_))
        ));
    }

    #[test]
    fn unreachable_server_fails_fast() {
        // Nothing listens on the discard port; server selection gives up
        // after the configured timeout.
        let config = MongoConfig {
            uri: "mongodb://127.0.0.1:9/".to_string(),
            auth_source: None,
            database: "wien_demografie_db".to_string(),
            server_selection_timeout_ms: 250,
        };

        assert!(matches!(
            DemografieReader::connect(config),
            Err(ConnectionError::Unreachable(_))
        ));
    }
}
