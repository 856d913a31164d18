//! Realtime document store seam.
//!
//! The ledger only needs three things from its backend: ordered live
//! snapshots of a collection, inserting a document (the store assigns the id
//! and, optionally, a server timestamp) and deleting a document by id.

mod in_memory;
mod subscription;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::configuration::StoreSettings;

pub use in_memory::InMemoryStore;
pub use subscription::{snapshot_channel, SnapshotSender, Subscription};

pub type Fields = serde_json::Map<String, Value>;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Document `{1}` does not exist in `{0}`")]
    InexistentDocument(Collection, String),
    #[error("Document fields must serialize to an object")]
    NotAnObject,
    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Members,
    Transactions,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Members => "members",
            Collection::Transactions => "transactions",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub field: &'static str,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Ascending,
        }
    }

    pub fn desc(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Descending,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    /// Deserializes the document with its id merged in as the `id` field.
    pub fn decode<T>(&self) -> Result<T, serde_json::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut fields = self.fields.clone();
        fields.insert("id".to_string(), Value::String(self.id.clone()));
        serde_json::from_value(Value::Object(fields))
    }
}

/// The complete, ordered contents of a collection at one point in time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub documents: Vec<Document>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Decodes every document, skipping (and logging) the ones that don't fit `T`.
    pub fn decode_all<T>(&self, collection: Collection) -> Vec<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.documents
            .iter()
            .filter_map(|document| match document.decode() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!(%collection, id = %document.id, "Skipping malformed document: {e}");
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub fields: Fields,
    /// Field the store fills with its own clock on insert.
    pub server_timestamp: Option<&'static str>,
}

impl NewDocument {
    pub fn from_serialize<T>(value: &T) -> Result<Self, StoreError>
    where
        T: serde::Serialize,
    {
        match serde_json::to_value(value)? {
            Value::Object(fields) => Ok(Self {
                fields,
                server_timestamp: None,
            }),
            _ => Err(StoreError::NotAnObject),
        }
    }

    pub fn with_server_timestamp(mut self, field: &'static str) -> Self {
        self.server_timestamp = Some(field);
        self
    }
}

#[async_trait::async_trait]
pub trait RemoteStore: Send + Sync {
    /// Returns the anonymous user id.
    async fn sign_in_anonymously(&self) -> Result<String, StoreError>;

    /// Opens a live query. The current snapshot is pushed right away and a new
    /// one after every change. Dropping the returned handle stops the listener.
    fn subscribe(&self, collection: Collection, order_by: OrderBy) -> Subscription;

    /// Returns the id assigned to the new document.
    async fn insert(&self, collection: Collection, document: NewDocument)
        -> Result<String, StoreError>;

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;
}

/// Builds the store handle from settings. `None` means the ledger runs disabled.
pub fn connect(settings: &StoreSettings) -> Option<Arc<dyn RemoteStore>> {
    InMemoryStore::from_settings(settings).map(|store| Arc::new(store) as Arc<dyn RemoteStore>)
}
