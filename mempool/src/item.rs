use std::fmt;

/// Content-addressed identifier of a mempool item, unique per item.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId([u8; 32]);

impl ItemId {
    /// Size of an item id in bytes.
    pub const SIZE: usize = 32;

    /// Creates an item id from its raw bytes.
    pub fn new(bytes: [u8; ItemId::SIZE]) -> Self {
        ItemId(bytes)
    }

    /// Returns the raw bytes of the id.
    pub fn as_bytes(&self) -> &[u8; ItemId::SIZE] {
        &self.0
    }
}

impl From<[u8; ItemId::SIZE]> for ItemId {
    fn from(bytes: [u8; ItemId::SIZE]) -> Self {
        ItemId(bytes)
    }
}

impl AsRef<[u8]> for ItemId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ItemId({})", hex::encode(self.0))
    }
}

/// Billing identity of the account that pays fees for an item.
///
/// Payers are opaque byte strings; the mempool never interprets them beyond
/// equality.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Payer(Vec<u8>);

impl Payer {
    /// Creates a payer identity from its raw bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Payer(bytes)
    }

    /// Returns the raw bytes of the payer identity.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Payer {
    fn from(bytes: Vec<u8>) -> Self {
        Payer(bytes)
    }
}

impl From<&[u8]> for Payer {
    fn from(bytes: &[u8]) -> Self {
        Payer(bytes.to_vec())
    }
}

impl From<&str> for Payer {
    fn from(s: &str) -> Self {
        Payer(s.as_bytes().to_vec())
    }
}

impl fmt::Display for Payer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for Payer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Payer({})", hex::encode(&self.0))
    }
}

/// Capability contract for mempool items.
///
/// An item exposes exactly four attributes, all stable for the item's
/// lifetime; the mempool calls nothing else on `T`. Implementations are
/// expected to be cheap to clone (small values or `Arc` handles), since
/// each of the two internal queues holds its own copy.
pub trait Item: Clone {
    /// Content-addressed identifier, unique per item.
    fn id(&self) -> ItemId;

    /// The account that pays fees for this item.
    fn payer(&self) -> &Payer;

    /// Fee-priority score; higher is better.
    fn unit_price(&self) -> u64;

    /// Expiry as a millisecond timestamp.
    fn expiry(&self) -> i64;
}
