pub use crate::config::MongoConfig;
pub use crate::error::{ConnectionError, FetchError};
pub use crate::frame::documents_to_frame;
pub use crate::{
    DemografieReader, BIRTHS_COLLECTION, MERGED_COLLECTION, POPULATION_COLLECTION,
};
