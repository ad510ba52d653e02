use std::collections::{HashMap, HashSet};

use kestrel_collections::IndexedPriorityQueue;

use crate::item::{Item, ItemId, Payer};

// Heap backing storage is pre-allocated up to this many slots to reduce
// churn during warm-up.
const MAX_PREALLOC: usize = 4_096;

pub(crate) struct MempoolState<T: Item> {
    // Items keyed by unit price; the highest-paying item pops first.
    pub(crate) price_queue: IndexedPriorityQueue<ItemId, T>,

    // Items keyed by expiry; the soonest-expiring item pops first.
    pub(crate) time_queue: IndexedPriorityQueue<ItemId, T>,

    // Ids currently resident, grouped by payer. Used to cap non-exempt
    // payers and to evict a whole account at once.
    pub(crate) owned: HashMap<Payer, HashSet<ItemId>>,

    // Payers exempt from `max_payer_size`.
    pub(crate) exempt_payers: HashSet<Payer>,

    // Ids checked out by `lease_items` that must not be re-admitted until
    // the lease is cleared. `None` while no lease is outstanding.
    pub(crate) leased: Option<HashSet<ItemId>>,

    pub(crate) max_size: usize,
    pub(crate) max_payer_size: usize,
}

impl<T: Item> MempoolState<T> {
    pub fn new(max_size: usize, max_payer_size: usize, exempt_payers: Vec<Payer>) -> Self {
        let prealloc = max_size.min(MAX_PREALLOC);
        MempoolState {
            price_queue: IndexedPriorityQueue::with_capacity(prealloc),
            time_queue: IndexedPriorityQueue::with_capacity(prealloc),
            owned: HashMap::new(),
            exempt_payers: exempt_payers.into_iter().collect(),
            leased: None,
            max_size,
            max_payer_size,
        }
    }

    pub fn len(&self) -> usize {
        self.price_queue.len()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.price_queue.contains(id)
    }

    pub fn get(&self, id: &ItemId) -> Option<&T> {
        self.price_queue.get(id)
    }

    /// Admits `items` in order, applying the full admission policy to each.
    pub(crate) fn add(&mut self, items: Vec<T>) {
        for item in items {
            self.add_one(item);
        }
    }

    fn add_one(&mut self, item: T) {
        let id = item.id();

        // Ids checked out to a builder must not re-enter until the lease is
        // cleared.
        if let Some(leased) = &self.leased {
            if leased.contains(&id) {
                return;
            }
        }

        // Duplicates never displace the resident item.
        if self.price_queue.contains(&id) {
            return;
        }

        let payer = item.payer();
        let owned_by_payer = self.owned.get(payer).map_or(0, HashSet::len);
        if !self.exempt_payers.contains(payer) && owned_by_payer >= self.max_payer_size {
            // The payer is full; wait for its items to expire.
            return;
        }

        self.owned.entry(payer.clone()).or_default().insert(id);
        self.price_queue.insert(id, item.unit_price(), item.clone());
        self.time_queue.insert(id, item.expiry() as u64, item);

        // Remove the lowest-paying item if over the global max.
        if self.price_queue.len() > self.max_size {
            if let Some(evicted) = self.price_queue.pop_min() {
                self.time_queue.remove(&evicted.id());
                self.remove_from_owned(evicted.payer(), &evicted.id());
            }
        }
    }

    pub(crate) fn remove_from_owned(&mut self, payer: &Payer, id: &ItemId) {
        let Some(ids) = self.owned.get_mut(payer) else {
            // May no longer be populated.
            return;
        };
        ids.remove(id);
        if ids.is_empty() {
            self.owned.remove(payer);
        }
    }

    pub(crate) fn pop_max(&mut self) -> Option<T> {
        let item = self.price_queue.pop_max()?;
        self.time_queue.remove(&item.id());
        self.remove_from_owned(item.payer(), &item.id());
        Some(item)
    }

    pub(crate) fn pop_min(&mut self) -> Option<T> {
        let item = self.price_queue.pop_min()?;
        self.time_queue.remove(&item.id());
        self.remove_from_owned(item.payer(), &item.id());
        Some(item)
    }

    /// Removes `items` from both queues and the payer index. Ids that are
    /// not resident are ignored.
    pub(crate) fn remove(&mut self, items: &[T]) {
        for item in items {
            let id = item.id();
            self.price_queue.remove(&id);
            self.time_queue.remove(&id);
            self.remove_from_owned(item.payer(), &id);
        }
    }

    /// Removes every item owned by `payer`.
    pub(crate) fn remove_account(&mut self, payer: &Payer) {
        let Some(ids) = self.owned.remove(payer) else {
            return;
        };
        for id in ids {
            self.price_queue.remove(&id);
            self.time_queue.remove(&id);
        }
    }

    /// Removes every item expiring before `min_timestamp` and returns them
    /// in non-decreasing expiry order.
    pub(crate) fn set_min_timestamp(&mut self, min_timestamp: i64) -> Vec<T> {
        let expired = self.time_queue.pop_below(min_timestamp as u64);
        for item in &expired {
            self.price_queue.remove(&item.id());
            self.remove_from_owned(item.payer(), &item.id());
        }
        expired
    }

    /// Checks out up to `count` of the highest-priced items and records
    /// their ids in the lease set.
    pub(crate) fn lease(&mut self, count: usize) -> Vec<T> {
        assert!(self.leased.is_none(), "mempool lease already outstanding");
        if count == 0 {
            return Vec::new();
        }

        let mut leased = HashSet::with_capacity(count);
        let mut items = Vec::with_capacity(count);
        while items.len() < count {
            let Some(item) = self.pop_max() else {
                break;
            };
            leased.insert(item.id());
            items.push(item);
        }
        self.leased = Some(leased);
        items
    }

    /// Releases the lease and re-admits `restore` through the full
    /// admission policy.
    pub(crate) fn clear_lease(&mut self, restore: Vec<T>) {
        // Clear first so the restored items are not blocked by their own
        // lease.
        self.leased = None;
        self.add(restore);
    }
}
