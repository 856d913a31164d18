use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{
    snapshot_channel, Collection, Direction, Document, NewDocument, OrderBy, RemoteStore,
    Snapshot, SnapshotSender, StoreError, Subscription,
};
use crate::configuration::StoreSettings;

struct Listener {
    id: u64,
    collection: Collection,
    order_by: OrderBy,
    sender: SnapshotSender,
}

#[derive(Default)]
struct State {
    collections: HashMap<Collection, Vec<Document>>,
    listeners: Vec<Listener>,
    next_listener_id: u64,
    last_timestamp: Option<DateTime<Utc>>,
}

impl State {
    fn snapshot(&self, collection: Collection, order_by: OrderBy) -> Snapshot {
        // Documents without the ordering field are left out of ordered queries.
        let mut documents: Vec<Document> = self
            .collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| d.fields.get(order_by.field).is_some_and(|v| !v.is_null()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        documents.sort_by(|a, b| {
            let ordering = compare_values(&a.fields[order_by.field], &b.fields[order_by.field]);
            match order_by.direction {
                Direction::Ascending => ordering,
                Direction::Descending => ordering.reverse(),
            }
        });
        Snapshot { documents }
    }

    /// Pushes a fresh snapshot to every listener on `collection`, dropping dead ones.
    /// A listener that hasn't read its previous snapshot only keeps the new one.
    fn notify(&mut self, collection: Collection) {
        let snapshots: Vec<(u64, Snapshot)> = self
            .listeners
            .iter()
            .filter(|l| l.collection == collection)
            .map(|l| (l.id, self.snapshot(collection, l.order_by)))
            .collect();

        for (id, snapshot) in snapshots {
            if let Some(listener) = self.listeners.iter().find(|l| l.id == id) {
                if listener.sender.send(snapshot).is_err() {
                    debug!(listener = id, "Listener receiver gone");
                }
            }
        }
        self.listeners.retain(|l| !l.sender.is_closed());
    }

    /// Server clock, strictly increasing so that inserts never tie.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now().trunc_subsecs(6);
        let timestamp = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(timestamp);
        timestamp
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// In-process realtime store. Every write pushes a full snapshot to the
/// listeners of the written collection before the write returns.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> InMemoryStore {
        InMemoryStore::default()
    }

    /// Returns `None` when no API key is configured.
    pub fn from_settings(settings: &StoreSettings) -> Option<InMemoryStore> {
        if settings.get_api_key().is_none() {
            warn!("Store API key missing, ledger storage disabled");
            return None;
        }
        info!(project = ?settings.project_id, "Store initialized");
        Some(InMemoryStore::new())
    }

    pub fn listener_count(&self) -> usize {
        self.state.lock().listeners.len()
    }

    pub fn document_count(&self, collection: Collection) -> usize {
        self.state
            .lock()
            .collections
            .get(&collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait::async_trait]
impl RemoteStore for InMemoryStore {
    async fn sign_in_anonymously(&self) -> Result<String, StoreError> {
        let uid = uuid::Uuid::new_v4().simple().to_string();
        info!(%uid, "Signed in anonymously");
        Ok(uid)
    }

    fn subscribe(&self, collection: Collection, order_by: OrderBy) -> Subscription {
        let mut state = self.state.lock();
        let id = state.next_listener_id;
        state.next_listener_id += 1;

        let weak: Weak<Mutex<State>> = Arc::downgrade(&self.state);
        let (sender, subscription) = snapshot_channel(move || {
            if let Some(state) = weak.upgrade() {
                state.lock().listeners.retain(|l| l.id != id);
                debug!(%collection, listener = id, "Listener released");
            }
        });

        // Subscription is alive, this can't fail.
        let _ = sender.send(state.snapshot(collection, order_by));
        state.listeners.push(Listener {
            id,
            collection,
            order_by,
            sender,
        });
        debug!(%collection, listener = id, "Listener registered");

        subscription
    }

    async fn insert(
        &self,
        collection: Collection,
        document: NewDocument,
    ) -> Result<String, StoreError> {
        let mut state = self.state.lock();
        let id = uuid::Uuid::new_v4().simple().to_string();
        let mut fields = document.fields;
        if let Some(field) = document.server_timestamp {
            let timestamp = state.next_timestamp();
            fields.insert(
                field.to_string(),
                Value::String(timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)),
            );
        }
        state
            .collections
            .entry(collection)
            .or_default()
            .push(Document {
                id: id.clone(),
                fields,
            });
        debug!(%collection, %id, "Document inserted");
        state.notify(collection);
        Ok(id)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let documents = state.collections.entry(collection).or_default();
        let position = documents
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| StoreError::InexistentDocument(collection, id.to_string()))?;
        documents.remove(position);
        debug!(%collection, %id, "Document deleted");
        state.notify(collection);
        Ok(())
    }
}
