use std::time::{Duration, Instant};

use parking_lot::RwLock;
use prometheus_client::registry::Registry;
use thiserror::Error;
use tracing::{debug, trace_span};

use crate::config::MempoolConfig;
use crate::item::{Item, ItemId, Payer};
use crate::mempool_metrics::MempoolMetrics;
use crate::mempool_state::MempoolState;

/// Error codes for mempool construction
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MempoolError {
    #[error("max_size must be greater than zero")]
    InvalidMaxSize,
}

/// Per-item verdict returned by the [`Mempool::build`] callback.
#[derive(Debug, Clone)]
pub struct BuildVerdict<E> {
    /// Keep iterating after this item.
    pub cont: bool,
    /// Return the item to the mempool at the end of the pass. When false
    /// the item is considered consumed by the builder.
    pub restore: bool,
    /// Evict every remaining item of this item's payer, applied after the
    /// restore/consume decision.
    pub remove_account: bool,
    /// Abort the pass and propagate this error to the caller.
    pub error: Option<E>,
}

/// Struct defining the Mempool
///
/// The mempool keeps pending items in two priority queues, one keyed by
/// unit price and one keyed by expiry, plus a payer index, and keeps the
/// three in agreement at every observable moment. A single readers/writer
/// lock serializes all mutations; `has`, `get`, `peek_*`, `len` and
/// `is_empty` only take the read lock.
pub struct Mempool<T: Item> {
    /// The mempool state: the data structure where the items are stored
    state: RwLock<MempoolState<T>>,

    /// The mempool metrics
    metrics: MempoolMetrics,
}

impl<T: Item> Mempool<T> {
    /// Creates a new `Mempool` together with the registry carrying its
    /// metrics, for composition into the process-wide registry.
    pub fn new(config: MempoolConfig) -> Result<(Self, Registry), MempoolError> {
        if config.max_size == 0 {
            return Err(MempoolError::InvalidMaxSize);
        }

        let (metrics, registry) = MempoolMetrics::new();
        let mempool = Mempool {
            state: RwLock::new(MempoolState::new(
                config.max_size,
                config.max_payer_size,
                config.exempt_payers,
            )),
            metrics,
        };
        Ok((mempool, registry))
    }

    /// Pushes all new items from `items` into the mempool, in order.
    ///
    /// An item is skipped silently when its id is leased to a builder,
    /// already resident (duplicates never displace), or its payer is at the
    /// per-payer cap. When an insertion overflows `max_size` the
    /// lowest-paying item is evicted, which may be the item just admitted.
    pub fn add(&self, items: Vec<T>) {
        let _span = trace_span!("Mempool::add").entered();
        let start = Instant::now();

        let mut state = self.state.write();
        state.add(items);
        self.metrics.size.set(state.len() as i64);
        drop(state);

        self.metrics.add.observe(start.elapsed().as_nanos() as f64);
    }

    /// Returns whether an item with `id` is currently in the mempool.
    pub fn has(&self, id: &ItemId) -> bool {
        let _span = trace_span!("Mempool::has").entered();

        self.state.read().contains(id)
    }

    /// Returns a copy of the item with `id`, if resident.
    pub fn get(&self, id: &ItemId) -> Option<T> {
        let _span = trace_span!("Mempool::get").entered();

        self.state.read().get(id).cloned()
    }

    /// Returns the highest-priced item without removing it.
    pub fn peek_max(&self) -> Option<T> {
        let _span = trace_span!("Mempool::peek_max").entered();

        self.state.read().price_queue.peek_max().cloned()
    }

    /// Returns the lowest-priced item without removing it.
    pub fn peek_min(&self) -> Option<T> {
        let _span = trace_span!("Mempool::peek_min").entered();

        self.state.read().price_queue.peek_min().cloned()
    }

    /// Removes and returns the highest-priced item.
    pub fn pop_max(&self) -> Option<T> {
        let _span = trace_span!("Mempool::pop_max").entered();

        let mut state = self.state.write();
        let item = state.pop_max();
        self.metrics.size.set(state.len() as i64);
        item
    }

    /// Removes and returns the lowest-priced item.
    pub fn pop_min(&self) -> Option<T> {
        let _span = trace_span!("Mempool::pop_min").entered();

        let mut state = self.state.write();
        let item = state.pop_min();
        self.metrics.size.set(state.len() as i64);
        item
    }

    /// Removes `items` from the mempool. Ids that are not resident are
    /// ignored.
    ///
    /// Called during block verification, where the items are still
    /// considered valid, so no admission accounting is touched.
    pub fn remove(&self, items: &[T]) {
        let _span = trace_span!("Mempool::remove").entered();

        let mut state = self.state.write();
        state.remove(items);
        self.metrics.size.set(state.len() as i64);
    }

    /// Removes every item owned by `payer`, typically because the account
    /// balance no longer covers any of its pending items.
    pub fn remove_account(&self, payer: &Payer) {
        let _span = trace_span!("Mempool::remove_account").entered();

        let mut state = self.state.write();
        state.remove_account(payer);
        self.metrics.size.set(state.len() as i64);
    }

    /// Removes every item expiring before `min_timestamp` and returns them
    /// in non-decreasing expiry order, so upstream systems can notify
    /// submitters or release reserved fees.
    pub fn set_min_timestamp(&self, min_timestamp: i64) -> Vec<T> {
        let _span = trace_span!("Mempool::set_min_timestamp").entered();
        let start = Instant::now();

        let mut state = self.state.write();
        let expired = state.set_min_timestamp(min_timestamp);
        self.metrics.size.set(state.len() as i64);
        let remaining = state.len();
        drop(state);

        debug!(
            expired = expired.len(),
            remaining, "Removed expired items from mempool"
        );
        self.metrics
            .set_min_timestamp
            .observe(start.elapsed().as_nanos() as f64);
        expired
    }

    /// Returns the number of items in the mempool.
    pub fn len(&self) -> usize {
        let _span = trace_span!("Mempool::len").entered();

        self.state.read().len()
    }

    /// Returns whether the mempool is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates items in descending price order, invoking `f` on each until
    /// the callback ends the pass or the mempool is drained. The callback
    /// runs under the writer lock and must not re-enter the mempool.
    ///
    /// Items the callback restores are re-inserted into the price queue
    /// only after the pass completes, so a payer whose item was restored
    /// cannot have another item selected within the same pass. Items the
    /// callback consumes stay consumed even when the pass ends in an error;
    /// the error itself is propagated verbatim.
    pub fn build<F, E>(&self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&T) -> BuildVerdict<E>,
    {
        let _span = trace_span!("Mempool::build").entered();
        let start = Instant::now();
        let mut callback_time = Duration::ZERO;

        let mut state = self.state.write();

        let mut restorable: Vec<T> = Vec::new();
        let mut consumed = 0_usize;
        let mut result = Ok(());
        while let Some(item) = state.price_queue.pop_max() {
            let callback_start = Instant::now();
            let verdict = f(&item);
            callback_time += callback_start.elapsed();

            let remove_payer = verdict.remove_account.then(|| item.payer().clone());
            if verdict.restore {
                // Deferring restoration keeps this payer out of the rest of
                // the pass.
                restorable.push(item);
            } else {
                let id = item.id();
                state.time_queue.remove(&id);
                state.remove_from_owned(item.payer(), &id);
                consumed += 1;
            }
            if let Some(payer) = remove_payer {
                // Typically set when the next execution would leave the
                // account with an invalid balance.
                state.remove_account(&payer);
            }
            if !verdict.cont || verdict.error.is_some() {
                if let Some(error) = verdict.error {
                    result = Err(error);
                }
                break;
            }
        }

        // Restore unused items. An id whose account was removed during the
        // pass is gone from the time queue and stays out.
        let mut restored = 0_usize;
        for item in restorable {
            if state.time_queue.contains(&item.id()) {
                state.price_queue.insert(item.id(), item.unit_price(), item);
                restored += 1;
            }
        }
        self.metrics.size.set(state.len() as i64);
        drop(state);

        debug!(consumed, restored, "Finished mempool build pass");
        self.metrics
            .build_overhead
            .observe(start.elapsed().saturating_sub(callback_time).as_nanos() as f64);
        result
    }

    /// Checks out up to `count` of the highest-priced items to a builder,
    /// in descending price order.
    ///
    /// The returned items leave the mempool and their ids are blocked from
    /// re-admission until [`Mempool::clear_lease`] runs. Leasing while a
    /// lease is already outstanding is a programmer error.
    pub fn lease_items(&self, count: usize) -> Vec<T> {
        let _span = trace_span!("Mempool::lease_items").entered();

        let mut state = self.state.write();
        let items = state.lease(count);
        self.metrics.size.set(state.len() as i64);
        items
    }

    /// Releases the current lease and re-admits `restore` through the full
    /// admission policy; items that lost their spot to higher-paying
    /// newcomers in the meantime are dropped.
    pub fn clear_lease(&self, restore: Vec<T>) {
        let _span = trace_span!("Mempool::clear_lease").entered();

        let mut state = self.state.write();
        state.clear_lease(restore);
        self.metrics.size.set(state.len() as i64);
    }

    /// Returns the current metrics, e.g. for registration into a larger
    /// registry than the one returned at construction.
    pub fn metrics(&self) -> &MempoolMetrics {
        &self.metrics
    }
}
