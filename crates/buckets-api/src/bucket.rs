//! Named buckets and their single-item and batch operations.

use std::fmt;
use std::sync::Arc;

use buckets_core::validate::{validate_items, validate_pair};
use buckets_core::{Error, Item, KeyRange, Result};
use redb::ReadableTable;
use tracing::debug;

use crate::db::{ensure_bucket, table_definition, Store};
use crate::scanner::{walk, PrefixScanner, RangeScanner, Scanner};

/// A named collection of key/value pairs inside a [`Database`](crate::Database).
///
/// A bucket handle holds no data and no transaction. Each method opens one
/// transaction, does its work and closes it before returning. Handles are
/// cheap to clone and can be shared across threads.
///
/// Keys are kept in byte-lexicographic order.
#[derive(Clone)]
pub struct Bucket {
    store: Arc<Store>,
    name: String,
}

impl Bucket {
    pub(crate) fn new(store: Arc<Store>, name: &str) -> Self {
        Bucket {
            store,
            name: name.to_string(),
        }
    }

    pub(crate) fn store(&self) -> &Store {
        &self.store
    }

    /// Name of the bucket.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts or updates the value for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use buckets::Database;
    ///
    /// let db = Database::in_memory()?;
    /// let things = db.new_bucket("things")?;
    /// things.put(b"A", b"alpha")?;
    /// things.put(b"A", b"aleph")?; // Updates the value
    /// assert_eq!(things.get(b"A")?, Some(b"aleph".to_vec()));
    /// # Ok::<(), buckets::Error>(())
    /// ```
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        validate_pair(key, value)?;
        self.store.update(|tx| -> Result<()> {
            ensure_bucket(tx, &self.name)?;
            let mut table = tx.open_table(table_definition(&self.name))?;
            table.insert(key, value)?;
            Ok(())
        })
    }

    /// Inserts `value` for `key` only if the key is not present yet.
    ///
    /// The lookup and the write share one read-write transaction, so a
    /// concurrent writer cannot slip in between them. Returns `true` when the
    /// value was written and `false` when the key already existed.
    pub fn put_if_absent(&self, key: &[u8], value: &[u8]) -> Result<bool> {
        validate_pair(key, value)?;
        self.store.update(|tx| -> Result<bool> {
            ensure_bucket(tx, &self.name)?;
            let mut table = tx.open_table(table_definition(&self.name))?;
            if table.get(key)?.is_some() {
                return Ok(false);
            }
            table.insert(key, value)?;
            Ok(true)
        })
    }

    /// Removes `key`. Removing a missing key is not an error.
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        self.store.update(|tx| -> Result<()> {
            ensure_bucket(tx, &self.name)?;
            let mut table = tx.open_table(table_definition(&self.name))?;
            table.remove(key)?;
            Ok(())
        })
    }

    /// Retrieves a copy of the value stored for `key`.
    ///
    /// Returns `None` if the key doesn't exist. A key stored with an empty
    /// value returns `Some(vec![])`.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.store.view(|tx| -> Result<Option<Vec<u8>>> {
            let table = tx.open_table(table_definition(&self.name))?;
            let value = table.get(key)?.map(|guard| guard.value().to_vec());
            Ok(value)
        })
    }

    /// Puts every item inside a single read-write transaction.
    ///
    /// Either all items are committed or none are. For large batches, sort
    /// the items by key first: sequential inserts into the B+tree are much
    /// cheaper than random ones.
    pub fn insert(&self, items: &[Item]) -> Result<()> {
        validate_items(items)?;
        self.store.update(|tx| -> Result<()> {
            ensure_bucket(tx, &self.name)?;
            let mut table = tx.open_table(table_definition(&self.name))?;
            for item in items {
                table.insert(item.key.as_slice(), item.value.as_slice())?;
            }
            Ok(())
        })?;

        debug!(bucket = %self.name, count = items.len(), "inserted batch");
        Ok(())
    }

    /// Like [`insert`](Self::insert), but leaves existing keys untouched.
    ///
    /// Runs in one read-write transaction. When the batch repeats a key, the
    /// first occurrence wins. Returns how many items were written.
    pub fn insert_if_absent(&self, items: &[Item]) -> Result<usize> {
        validate_items(items)?;
        let written = self.store.update(|tx| -> Result<usize> {
            ensure_bucket(tx, &self.name)?;
            let mut table = tx.open_table(table_definition(&self.name))?;
            let mut written = 0;
            for item in items {
                if table.get(item.key.as_slice())?.is_some() {
                    continue;
                }
                table.insert(item.key.as_slice(), item.value.as_slice())?;
                written += 1;
            }
            Ok(written)
        })?;

        debug!(bucket = %self.name, count = items.len(), written, "inserted batch if absent");
        Ok(written)
    }

    /// Calls `visit` for every pair in ascending key order.
    ///
    /// The slices passed to `visit` are only valid during the call. The
    /// first error returned by `visit` stops the walk and is returned as is.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use buckets::Database;
    ///
    /// let db = Database::in_memory()?;
    /// let things = db.new_bucket("things")?;
    /// things.put(b"A", b"alpha")?;
    /// things.put(b"B", b"beta")?;
    ///
    /// let mut seen = Vec::new();
    /// things.for_each(|key, _| {
    ///     seen.push(key.to_vec());
    ///     Ok::<(), buckets::Error>(())
    /// })?;
    /// assert_eq!(seen, vec![b"A".to_vec(), b"B".to_vec()]);
    /// # Ok::<(), buckets::Error>(())
    /// ```
    pub fn for_each<F, E>(&self, visit: F) -> std::result::Result<(), E>
    where
        F: FnMut(&[u8], &[u8]) -> std::result::Result<(), E>,
        E: From<Error>,
    {
        walk(self, &KeyRange::all(), visit)
    }

    /// Returns every item in the bucket, in ascending key order.
    pub fn items(&self) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        walk(self, &KeyRange::all(), |key, value| -> Result<()> {
            items.push(Item::from_slices(key, value));
            Ok(())
        })?;
        Ok(items)
    }

    /// Returns the items whose keys start with `prefix`.
    pub fn prefix_items(&self, prefix: &[u8]) -> Result<Vec<Item>> {
        self.prefix_scanner(prefix).items()
    }

    /// Returns the items whose keys fall within `[min, max]`.
    pub fn range_items(&self, min: &[u8], max: &[u8]) -> Result<Vec<Item>> {
        self.range_scanner(min, max).items()
    }

    /// Calls `visit` for every pair whose key starts with `prefix`.
    pub fn map_prefix<F, E>(&self, prefix: &[u8], visit: F) -> std::result::Result<(), E>
    where
        F: FnMut(&[u8], &[u8]) -> std::result::Result<(), E>,
        E: From<Error>,
    {
        self.prefix_scanner(prefix).for_each(visit)
    }

    /// Calls `visit` for every pair whose key falls within `[min, max]`.
    pub fn map_range<F, E>(&self, min: &[u8], max: &[u8], visit: F) -> std::result::Result<(), E>
    where
        F: FnMut(&[u8], &[u8]) -> std::result::Result<(), E>,
        E: From<Error>,
    {
        self.range_scanner(min, max).for_each(visit)
    }

    /// Creates a scanner over the keys starting with `prefix`. No I/O happens
    /// until one of its methods is called.
    pub fn prefix_scanner(&self, prefix: &[u8]) -> PrefixScanner {
        PrefixScanner::new(self.clone(), prefix)
    }

    /// Creates a scanner over the keys within `[min, max]`, both inclusive.
    /// No I/O happens until one of its methods is called.
    pub fn range_scanner(&self, min: &[u8], max: &[u8]) -> RangeScanner {
        RangeScanner::new(self.clone(), min, max)
    }
}

impl fmt::Debug for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bucket").field("name", &self.name).finish()
    }
}
