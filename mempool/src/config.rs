use crate::item::Payer;

/// Struct defining a Mempool configuration
#[derive(Debug, Clone)]
pub struct MempoolConfig {
    /// Hard upper bound on the total number of items.
    pub max_size: usize,
    /// Upper bound on items per non-exempt payer.
    pub max_payer_size: usize,
    /// Payers exempt from `max_payer_size`.
    pub exempt_payers: Vec<Payer>,
}

impl MempoolConfig {
    /// Default hard cap on the total number of items.
    pub const DEFAULT_MAX_SIZE: usize = 10_000;

    /// Default per-payer cap.
    pub const DEFAULT_MAX_PAYER_SIZE: usize = 32;
}

impl Default for MempoolConfig {
    fn default() -> MempoolConfig {
        MempoolConfig {
            max_size: MempoolConfig::DEFAULT_MAX_SIZE,
            max_payer_size: MempoolConfig::DEFAULT_MAX_PAYER_SIZE,
            exempt_payers: Vec::new(),
        }
    }
}
