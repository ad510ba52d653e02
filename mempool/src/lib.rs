//! Bounded, in-memory staging area for pending items of the Kestrel VM.
//!
//! Items are indexed by unit price, by expiry and by payer, so the
//! highest-paying item, the soonest-expiring item and all items of a given
//! payer can be looked up quickly. The mempool enforces a per-payer cap and
//! time-based eviction, and supports a lease protocol that lets a block
//! builder iterate items without another thread re-admitting them.
//!
//! The mempool is volatile: a restart discards all state.

pub use self::config::MempoolConfig;
pub use self::item::{Item, ItemId, Payer};
pub use self::mempool::{BuildVerdict, Mempool, MempoolError};
pub use self::mempool_metrics::MempoolMetrics;

pub mod config;
pub mod item;
pub mod mempool;
pub mod mempool_metrics;
mod mempool_state;
