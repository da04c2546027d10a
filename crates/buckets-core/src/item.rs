//! Key/value pairs returned by bucket reads and scans.

use serde::{Deserialize, Serialize};

/// An owned key/value pair.
///
/// Items are always copied out of the storage engine, so they remain valid
/// after the transaction that produced them has ended.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Item {
    /// The key
    pub key: Vec<u8>,
    /// The value stored under `key`
    pub value: Vec<u8>,
}

impl Item {
    /// Creates an item from anything that converts into byte vectors.
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Item {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Copies a borrowed key/value pair into a new item.
    pub fn from_slices(key: &[u8], value: &[u8]) -> Self {
        Item {
            key: key.to_vec(),
            value: value.to_vec(),
        }
    }

    /// Splits the item into its key and value.
    pub fn into_pair(self) -> (Vec<u8>, Vec<u8>) {
        (self.key, self.value)
    }
}

impl<K, V> From<(K, V)> for Item
where
    K: Into<Vec<u8>>,
    V: Into<Vec<u8>>,
{
    fn from((key, value): (K, V)) -> Self {
        Item::new(key, value)
    }
}
