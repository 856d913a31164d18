use std::sync::Arc;

use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::domain::{
    FormError, Member, MemberId, NewMember, Totals, Transaction, TransactionForm, TransactionId,
};
use crate::store::{
    Collection, NewDocument, OrderBy, RemoteStore, Snapshot, StoreError, Subscription,
};

pub const TRANSACTION_ADDED_NOTICE: &str = "Transaction added.";
pub const STORE_UNAVAILABLE_BANNER: &str =
    "Ledger storage is not configured. Members and transactions can't be recorded.";

const MEMBERS_ORDER: &str = "createdAt";
const TRANSACTIONS_ORDER: &str = "timestamp";

#[derive(thiserror::Error, Debug)]
pub enum LedgerError {
    #[error("Ledger storage is unavailable")]
    StoreUnavailable,
    #[error("Form error: {0}")]
    FormError(#[from] FormError),
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),
}

/// Which collection a pushed snapshot replaced.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Change {
    Members,
    Transactions,
}

struct LiveCollections {
    members: Subscription,
    transactions: Subscription,
}

/// State behind the ledger page: the last snapshot of each collection and the
/// totals derived from the transactions.
pub struct LedgerViewModel {
    store: Option<Arc<dyn RemoteStore>>,
    live: Option<LiveCollections>,
    members: Vec<Member>,
    transactions: Vec<Transaction>,
    totals: Totals,
    notice: Option<&'static str>,
}

impl LedgerViewModel {
    pub fn new(store: Option<Arc<dyn RemoteStore>>) -> LedgerViewModel {
        if store.is_none() {
            warn!("Ledger started without storage, controls disabled");
        }
        LedgerViewModel {
            store,
            live: None,
            members: Vec::new(),
            transactions: Vec::new(),
            totals: Totals::default(),
            notice: None,
        }
    }

    /// Write controls are only usable with a store.
    pub fn controls_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub fn banner(&self) -> Option<&'static str> {
        match self.store {
            Some(_) => None,
            None => Some(STORE_UNAVAILABLE_BANNER),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.live.is_some()
    }

    /// Opens both live queries. No-op when already mounted or without a store.
    pub fn mount(&mut self) {
        if self.live.is_some() {
            return;
        }
        let Some(store) = &self.store else {
            warn!("Can't mount ledger without storage");
            return;
        };
        self.live = Some(LiveCollections {
            members: store.subscribe(Collection::Members, OrderBy::asc(MEMBERS_ORDER)),
            transactions: store.subscribe(
                Collection::Transactions,
                OrderBy::desc(TRANSACTIONS_ORDER),
            ),
        });
        info!("Ledger mounted");
    }

    /// Releases both live queries. The last received state stays visible.
    pub fn unmount(&mut self) {
        if self.live.take().is_some() {
            info!("Ledger unmounted");
        }
    }

    /// Applies every snapshot already pushed, without waiting.
    /// Returns whether anything was replaced.
    pub fn apply_pending(&mut self) -> bool {
        let Some(live) = self.live.as_mut() else {
            return false;
        };
        let members = live.members.latest();
        let transactions = live.transactions.latest();

        let changed = members.is_some() || transactions.is_some();
        if let Some(snapshot) = members {
            self.replace_members(snapshot);
        }
        if let Some(snapshot) = transactions {
            self.replace_transactions(snapshot);
        }
        changed
    }

    /// Waits for the next snapshot on either collection and applies it.
    /// Returns `None` when not mounted or when both streams have ended.
    pub async fn next_change(&mut self) -> Option<Change> {
        let live = self.live.as_mut()?;
        let (change, snapshot) = tokio::select! {
            Some(snapshot) = live.members.next() => (Change::Members, snapshot),
            Some(snapshot) = live.transactions.next() => (Change::Transactions, snapshot),
            else => return None,
        };
        match change {
            Change::Members => self.replace_members(snapshot),
            Change::Transactions => self.replace_transactions(snapshot),
        }
        Some(change)
    }

    fn replace_members(&mut self, snapshot: Snapshot) {
        self.members = snapshot.decode_all(Collection::Members);
        debug!(count = self.members.len(), "Members replaced");
    }

    fn replace_transactions(&mut self, snapshot: Snapshot) {
        self.transactions = snapshot.decode_all(Collection::Transactions);
        self.totals = Totals::from_transactions(&self.transactions);
        debug!(count = self.transactions.len(), totals = ?self.totals, "Transactions replaced");
    }

    fn get_store(&self) -> Result<&Arc<dyn RemoteStore>, LedgerError> {
        self.store.as_ref().ok_or(LedgerError::StoreUnavailable)
    }

    pub async fn add_member(&self, name: &str) -> Result<MemberId, LedgerError> {
        let member = NewMember::parse(name)?;
        let store = self.get_store()?;
        let document = NewDocument::from_serialize(&member)?.with_server_timestamp(MEMBERS_ORDER);
        let id = store.insert(Collection::Members, document).await?;
        info!(%id, name = member.get_name(), "Member added");
        Ok(id)
    }

    /// Member existence is not checked, any non-empty id is accepted.
    pub async fn record_transaction(
        &mut self,
        form: &TransactionForm,
    ) -> Result<TransactionId, LedgerError> {
        let transaction = form.validate()?;
        let store = self.get_store()?;
        let document =
            NewDocument::from_serialize(&transaction)?.with_server_timestamp(TRANSACTIONS_ORDER);
        let id = store.insert(Collection::Transactions, document).await?;
        info!(
            %id,
            member = transaction.get_member_id(),
            kind = %transaction.get_kind(),
            amount = %transaction.get_amount(),
            "Transaction recorded"
        );
        self.notice = Some(TRANSACTION_ADDED_NOTICE);
        Ok(id)
    }

    pub async fn delete_transaction(&self, id: &str) -> Result<(), LedgerError> {
        let store = self.get_store()?;
        store.delete(Collection::Transactions, id).await?;
        info!(%id, "Transaction deleted");
        Ok(())
    }

    /// Ordered by creation time, oldest first.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Ordered by timestamp, newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    pub fn member_name(&self, id: &str) -> Option<&str> {
        self.members
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.name.as_str())
    }

    /// First member with that exact name, as picked from the member list.
    pub fn member_id_by_name(&self, name: &str) -> Option<&str> {
        self.members
            .iter()
            .find(|m| m.name == name.trim())
            .map(|m| m.id.as_str())
    }
}
