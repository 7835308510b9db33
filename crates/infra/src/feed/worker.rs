//! Live item feed worker
//!
//! Keeps the local item collection in lockstep with the external push
//! feed: exactly one active subscription per authenticated session, full
//! snapshot replacement on every event, explicit start/stop lifecycle.
//! Cancellation is explicit and the join is bounded by a timeout.
//!
//! The current collection is published through a `tokio::sync::watch`
//! cell; a watch change is the re-render signal. Feed errors are logged
//! and leave the last published snapshot in place.

use std::sync::Arc;
use std::time::Duration;

use inventaire_core::{ItemFeed, ItemSubscription};
use inventaire_domain::{FeedConfig, FeedEvent, FeedScope, InventaireError, Item, Result};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Shared, fully-replaceable view of the item collection
pub type ItemCollection = Arc<Vec<Item>>;

/// Feed worker with explicit lifecycle management
pub struct ItemFeedWorker {
    feed: Arc<dyn ItemFeed>,
    snapshot: watch::Sender<ItemCollection>,
    cancellation: CancellationToken,
    task_handle: Option<JoinHandle<()>>,
    join_timeout: Duration,
}

impl ItemFeedWorker {
    /// Create a stopped worker plus the receiver for its snapshot cell.
    pub fn new(feed: Arc<dyn ItemFeed>, config: &FeedConfig) -> (Self, watch::Receiver<ItemCollection>) {
        let (snapshot, receiver) = watch::channel(Arc::new(Vec::new()));
        let worker = Self {
            feed,
            snapshot,
            cancellation: CancellationToken::new(),
            task_handle: None,
            join_timeout: Duration::from_secs(config.join_timeout_secs),
        };
        (worker, receiver)
    }

    /// Additional receiver for the same snapshot cell
    pub fn subscribe_snapshot(&self) -> watch::Receiver<ItemCollection> {
        self.snapshot.subscribe()
    }

    /// Establish the subscription and start pumping snapshots.
    ///
    /// Rejected while already running: callers must `stop()` first, which
    /// is what keeps at most one live subscription per session. A failed
    /// subscribe is logged and leaves the collection empty, but is not an
    /// error; the UI renders the empty state and a later start can retry.
    pub async fn start(&mut self, scope: FeedScope) -> Result<()> {
        if self.is_running() {
            return Err(InventaireError::Feed("feed worker already running".to_string()));
        }

        info!(?scope, "starting item feed worker");

        let subscription = match self.feed.subscribe(scope).await {
            Ok(subscription) => subscription,
            Err(err) => {
                error!(error = %err, "item feed subscription failed, collection stays empty");
                return Ok(());
            }
        };

        // Fresh cancellation token per run
        self.cancellation = CancellationToken::new();
        let cancel = self.cancellation.clone();
        let snapshot = self.snapshot.clone();

        let handle = tokio::spawn(async move {
            Self::pump(subscription, snapshot, cancel).await;
        });
        self.task_handle = Some(handle);

        info!("item feed worker started");
        Ok(())
    }

    /// Cancel the subscription and wait for the pump to finish.
    ///
    /// Idempotent: stopping a worker that is not running is a no-op.
    pub async fn stop(&mut self) {
        let Some(handle) = self.task_handle.take() else {
            debug!("stop called with no active subscription");
            return;
        };

        info!("stopping item feed worker");
        self.cancellation.cancel();

        match tokio::time::timeout(self.join_timeout, handle).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(error = %err, "feed task panicked"),
            Err(_) => warn!("feed task did not stop within timeout"),
        }

        self.cancellation = CancellationToken::new();
        info!("item feed worker stopped");
    }

    /// Returns true while a subscription pump is active.
    pub fn is_running(&self) -> bool {
        self.task_handle.is_some()
    }

    async fn pump(
        mut subscription: ItemSubscription,
        snapshot: watch::Sender<ItemCollection>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("feed pump cancelled");
                    break;
                }
                event = subscription.next() => match event {
                    Some(FeedEvent::Snapshot(items)) => {
                        debug!(count = items.len(), "feed snapshot applied");
                        // Full replacement; the last event wins.
                        let _ = snapshot.send(Arc::new(items));
                    }
                    Some(FeedEvent::Error(message)) => {
                        // Last known collection stays in place.
                        warn!(message, "feed error, keeping last known collection");
                    }
                    None => {
                        warn!("feed closed, keeping last known collection");
                        break;
                    }
                }
            }
        }
    }
}

impl Drop for ItemFeedWorker {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("ItemFeedWorker dropped while running, cancelling task");
            self.cancellation.cancel();
        }
    }
}
