//! Prefix and range scans over a bucket.
//!
//! Both scanners walk a single cursor forward: seek to the first key at or
//! after the scan's start, then visit keys until one falls outside the scan
//! or the bucket runs out. Every view below shares that walk, so `count`,
//! `keys`, `values`, `items` and `item_mapping` always agree with each other
//! for the same bucket state.

use std::collections::BTreeMap;

use buckets_core::{Error, Item, KeyRange, Result};
use redb::ReadableTable;

use crate::bucket::Bucket;
use crate::db::table_definition;

/// Walks the keys of `bucket` selected by `range` inside one read transaction.
pub(crate) fn walk<F, E>(bucket: &Bucket, range: &KeyRange, mut visit: F) -> std::result::Result<(), E>
where
    F: FnMut(&[u8], &[u8]) -> std::result::Result<(), E>,
    E: From<Error>,
{
    bucket.store().view(|tx| -> std::result::Result<(), E> {
        let table = tx
            .open_table(table_definition(bucket.name()))
            .map_err(Error::from)?;
        let entries = table.range(range.seek_key()..).map_err(Error::from)?;
        for entry in entries {
            let (key, value) = entry.map_err(Error::from)?;
            if !range.admits(key.value()) {
                break;
            }
            visit(key.value(), value.value())?;
        }
        Ok(())
    })
}

/// Read-only views over a subset of a bucket's keys.
///
/// Every method opens its own read transaction and walks the subset from
/// the start; scanners keep no state between calls.
pub trait Scanner {
    /// Calls `visit` for each matching pair in ascending key order. The first
    /// error returned by `visit` stops the walk and is returned unchanged.
    fn for_each<F, E>(&self, visit: F) -> std::result::Result<(), E>
    where
        F: FnMut(&[u8], &[u8]) -> std::result::Result<(), E>,
        E: From<Error>;

    /// Number of matching keys.
    fn count(&self) -> Result<usize> {
        let mut count = 0;
        self.for_each(|_, _| -> Result<()> {
            count += 1;
            Ok(())
        })?;
        Ok(count)
    }

    /// Matching keys in ascending order.
    fn keys(&self) -> Result<Vec<Vec<u8>>> {
        let mut keys = Vec::new();
        self.for_each(|key, _| -> Result<()> {
            keys.push(key.to_vec());
            Ok(())
        })?;
        Ok(keys)
    }

    /// Values of the matching keys, in the same order as [`keys`](Self::keys).
    fn values(&self) -> Result<Vec<Vec<u8>>> {
        let mut values = Vec::new();
        self.for_each(|_, value| -> Result<()> {
            values.push(value.to_vec());
            Ok(())
        })?;
        Ok(values)
    }

    /// Matching pairs in ascending key order.
    fn items(&self) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        self.for_each(|key, value| -> Result<()> {
            items.push(Item::from_slices(key, value));
            Ok(())
        })?;
        Ok(items)
    }

    /// Matching pairs keyed by the key as text.
    ///
    /// Only meaningful for buckets with UTF-8 keys: a key that isn't valid
    /// UTF-8 fails the whole call with `Error::InvalidInput`. Use
    /// [`items`](Self::items) for binary keys.
    fn item_mapping(&self) -> Result<BTreeMap<String, Vec<u8>>> {
        let mut mapping = BTreeMap::new();
        self.for_each(|key, value| -> Result<()> {
            let key = std::str::from_utf8(key)
                .map_err(|e| Error::InvalidInput(format!("key is not valid UTF-8: {}", e)))?;
            mapping.insert(key.to_string(), value.to_vec());
            Ok(())
        })?;
        Ok(mapping)
    }
}

/// Scans a bucket for keys with a given prefix.
///
/// # Examples
///
/// ```rust
/// use buckets::{Database, Scanner};
///
/// let db = Database::in_memory()?;
/// let paths = db.new_bucket("paths")?;
/// for key in ["f/", "foo/", "foo/bar/", "food/"] {
///     paths.put(key.as_bytes(), b"")?;
/// }
///
/// let foo = paths.prefix_scanner(b"foo/");
/// assert_eq!(foo.keys()?, vec![b"foo/".to_vec(), b"foo/bar/".to_vec()]);
/// # Ok::<(), buckets::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PrefixScanner {
    bucket: Bucket,
    range: KeyRange,
}

impl PrefixScanner {
    pub(crate) fn new(bucket: Bucket, prefix: &[u8]) -> Self {
        PrefixScanner {
            bucket,
            range: KeyRange::prefix(prefix),
        }
    }

    /// The prefix every matched key starts with.
    pub fn prefix(&self) -> &[u8] {
        self.range.seek_key()
    }

    /// The bucket being scanned.
    pub fn bucket(&self) -> &Bucket {
        &self.bucket
    }
}

impl Scanner for PrefixScanner {
    fn for_each<F, E>(&self, visit: F) -> std::result::Result<(), E>
    where
        F: FnMut(&[u8], &[u8]) -> std::result::Result<(), E>,
        E: From<Error>,
    {
        walk(&self.bucket, &self.range, visit)
    }
}

/// Scans a bucket for keys within `[min, max]`.
///
/// Bounds are compared byte by byte, so numeric keys have to be fixed width
/// (e.g. zero padded) to sort the way numbers do. A range with `min > max`
/// matches nothing.
#[derive(Debug, Clone)]
pub struct RangeScanner {
    bucket: Bucket,
    min: Vec<u8>,
    max: Vec<u8>,
}

impl RangeScanner {
    pub(crate) fn new(bucket: Bucket, min: &[u8], max: &[u8]) -> Self {
        RangeScanner {
            bucket,
            min: min.to_vec(),
            max: max.to_vec(),
        }
    }

    /// Lower bound, inclusive.
    pub fn min(&self) -> &[u8] {
        &self.min
    }

    /// Upper bound, inclusive.
    pub fn max(&self) -> &[u8] {
        &self.max
    }

    /// The bucket being scanned.
    pub fn bucket(&self) -> &Bucket {
        &self.bucket
    }
}

impl Scanner for RangeScanner {
    fn for_each<F, E>(&self, visit: F) -> std::result::Result<(), E>
    where
        F: FnMut(&[u8], &[u8]) -> std::result::Result<(), E>,
        E: From<Error>,
    {
        let range = KeyRange::inclusive(self.min.as_slice(), self.max.as_slice());
        walk(&self.bucket, &range, visit)
    }
}
