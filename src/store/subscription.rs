use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;

use super::Snapshot;

/// Holds at most one snapshot: a push replaces whatever the reader hasn't taken yet.
#[derive(Default)]
struct Slot {
    latest: Option<Snapshot>,
    waker: Option<Waker>,
    sender_dropped: bool,
    receiver_dropped: bool,
}

/// Creates a connected sender/subscription pair. `release` runs when the
/// subscription is dropped.
pub fn snapshot_channel<F>(release: F) -> (SnapshotSender, Subscription)
where
    F: FnOnce() + Send + 'static,
{
    let slot = Arc::new(Mutex::new(Slot::default()));
    let sender = SnapshotSender { slot: slot.clone() };
    let subscription = Subscription {
        slot,
        release: Some(Box::new(release)),
    };
    (sender, subscription)
}

/// Store side of a live query.
pub struct SnapshotSender {
    slot: Arc<Mutex<Slot>>,
}

impl SnapshotSender {
    /// Replaces the pending snapshot. Fails with the snapshot when the
    /// subscription is gone.
    pub fn send(&self, snapshot: Snapshot) -> Result<(), Snapshot> {
        let waker = {
            let mut slot = self.slot.lock();
            if slot.receiver_dropped {
                return Err(snapshot);
            }
            slot.latest = Some(snapshot);
            slot.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.slot.lock().receiver_dropped
    }
}

impl Drop for SnapshotSender {
    fn drop(&mut self) {
        let waker = {
            let mut slot = self.slot.lock();
            slot.sender_dropped = true;
            slot.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

/// Live query handle. Yields the newest snapshot as a stream, older
/// unread ones are skipped. The listener is unregistered when the handle
/// is dropped.
pub struct Subscription {
    slot: Arc<Mutex<Slot>>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Takes the snapshot pushed since the last read, if any.
    pub fn latest(&mut self) -> Option<Snapshot> {
        self.slot.lock().latest.take()
    }
}

impl futures::Stream for Subscription {
    type Item = Snapshot;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut slot = self.slot.lock();
        if let Some(snapshot) = slot.latest.take() {
            return Poll::Ready(Some(snapshot));
        }
        if slot.sender_dropped {
            return Poll::Ready(None);
        }
        slot.waker = Some(cx.waker().clone());
        Poll::Pending
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        {
            let mut slot = self.slot.lock();
            slot.receiver_dropped = true;
            slot.latest = None;
        }
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("pending", &self.slot.lock().latest.is_some())
            .field("released", &self.release.is_none())
            .finish()
    }
}
