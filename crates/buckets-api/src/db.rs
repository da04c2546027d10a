//! Database handle and transaction scoping.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::Instant;

use buckets_core::validate::validate_bucket_name;
use buckets_core::{Error, Result};
use redb::{ReadTransaction, TableDefinition, WriteTransaction};
use tracing::{debug, info, warn};

use crate::bucket::Bucket;
use crate::config::Options;

/// Table definition for a bucket. Every bucket maps raw keys to raw values.
pub(crate) fn table_definition(name: &str) -> TableDefinition<'_, &'static [u8], &'static [u8]> {
    TableDefinition::new(name)
}

/// Shared engine handle behind a [`Database`] and everything derived from it.
///
/// The lock only tracks whether the engine is still open and is never held
/// while a transaction runs. Each operation works on its own clone of the
/// engine handle, so closing never waits on (or blocks) a running operation.
/// Readers and writers of data are serialized by the engine itself.
pub(crate) struct Store {
    engine: RwLock<Option<Arc<redb::Database>>>,
    path: Option<PathBuf>,
}

impl Store {
    fn new(engine: redb::Database, path: Option<PathBuf>) -> Self {
        Store {
            engine: RwLock::new(Some(Arc::new(engine))),
            path,
        }
    }

    /// Clones the engine handle, or fails with `Error::Closed`.
    fn handle(&self) -> Result<Arc<redb::Database>> {
        let guard = self.engine.read().map_err(|_| Error::LockPoisoned)?;
        guard.as_ref().map(Arc::clone).ok_or(Error::Closed)
    }

    /// Runs `f` inside a read-only transaction.
    pub(crate) fn view<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&ReadTransaction) -> std::result::Result<T, E>,
        E: From<Error>,
    {
        let engine = self.handle()?;
        let tx = engine.begin_read().map_err(Error::from)?;
        f(&tx)
    }

    /// Runs `f` inside a read-write transaction.
    ///
    /// Commits when `f` succeeds and aborts when it fails, so an error from
    /// `f` never leaves partial writes behind.
    pub(crate) fn update<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&WriteTransaction) -> std::result::Result<T, E>,
        E: From<Error>,
    {
        let engine = self.handle()?;
        let tx = engine.begin_write().map_err(Error::from)?;
        match f(&tx) {
            Ok(value) => {
                tx.commit().map_err(Error::from)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(abort_err) = tx.abort() {
                    warn!(error = %abort_err, "failed to abort write transaction");
                }
                Err(err)
            }
        }
    }
}

/// Fails with `BucketNotFound` unless `name` exists in this transaction.
///
/// Opening a table inside a write transaction creates it, so writes check
/// first to keep deleted buckets deleted.
pub(crate) fn ensure_bucket(tx: &WriteTransaction, name: &str) -> Result<()> {
    use redb::TableHandle;

    let exists = tx.list_tables()?.any(|handle| handle.name() == name);
    if !exists {
        return Err(Error::BucketNotFound(name.to_string()));
    }
    Ok(())
}

/// A database file holding named buckets.
///
/// The caller owns the handle and releases it with [`Database::close`].
/// Buckets and scanners created from it share the same engine handle and
/// stop working once it is closed.
///
/// # Examples
///
/// ```rust,no_run
/// use buckets::Database;
///
/// let db = Database::open("./things.redb")?;
/// let things = db.new_bucket("things")?;
/// things.put(b"A", b"alpha")?;
/// assert_eq!(things.get(b"A")?, Some(b"alpha".to_vec()));
/// db.close()?;
/// # Ok::<(), buckets::Error>(())
/// ```
pub struct Database {
    inner: Arc<Store>,
}

impl Database {
    /// Creates or opens a database file at `path` with default [`Options`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, Options::default())
    }

    /// Creates or opens a database file at `path`.
    ///
    /// While another handle holds the file, opening is retried every
    /// `options.lock_retry_interval` until `options.lock_timeout` has
    /// elapsed, after which `Error::LockTimeout` is returned.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: Options) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let started = Instant::now();
        let mut attempts: u32 = 0;

        let engine = loop {
            attempts += 1;
            let mut builder = redb::Database::builder();
            if let Some(bytes) = options.cache_size {
                builder.set_cache_size(bytes);
            }

            match builder.create(&path) {
                Ok(engine) => break engine,
                Err(redb::DatabaseError::DatabaseAlreadyOpen) => {
                    let waited = started.elapsed();
                    if waited >= options.lock_timeout {
                        warn!(path = %path.display(), attempts, ?waited, "database file still locked");
                        return Err(Error::LockTimeout {
                            path,
                            timeout: options.lock_timeout,
                        });
                    }
                    debug!(path = %path.display(), attempts, "database file locked, retrying");
                    thread::sleep(options.lock_retry_interval.min(options.lock_timeout - waited));
                }
                Err(source) => return Err(Error::Open { path, source }),
            }
        };

        info!(path = %path.display(), attempts, "opened database");
        Ok(Database {
            inner: Arc::new(Store::new(engine, Some(path))),
        })
    }

    /// Creates a database backed by memory only.
    ///
    /// Data is lost when the database is closed or dropped. Useful for tests.
    pub fn in_memory() -> Result<Self> {
        let engine = redb::Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|source| Error::Open {
                path: PathBuf::from(":memory:"),
                source,
            })?;

        debug!("opened in-memory database");
        Ok(Database {
            inner: Arc::new(Store::new(engine, None)),
        })
    }

    /// Creates the named bucket if it does not exist and returns a handle to it.
    pub fn new_bucket(&self, name: &str) -> Result<Bucket> {
        validate_bucket_name(name)?;
        self.inner.update(|tx| -> Result<()> {
            tx.open_table(table_definition(name))?;
            Ok(())
        })?;

        info!(bucket = name, "bucket ready");
        Ok(Bucket::new(Arc::clone(&self.inner), name))
    }

    /// Deletes the named bucket and every item in it.
    ///
    /// Fails with `Error::BucketNotFound` if there is no such bucket.
    pub fn delete_bucket(&self, name: &str) -> Result<()> {
        self.inner.update(|tx| -> Result<()> {
            if !tx.delete_table(table_definition(name))? {
                return Err(Error::BucketNotFound(name.to_string()));
            }
            Ok(())
        })?;

        info!(bucket = name, "deleted bucket");
        Ok(())
    }

    /// Path of the database file, or `None` for an in-memory database.
    pub fn path(&self) -> Option<&Path> {
        self.inner.path.as_deref()
    }

    /// Returns whether the database has been closed.
    pub fn is_closed(&self) -> bool {
        match self.inner.engine.read() {
            Ok(engine) => engine.is_none(),
            Err(_) => true,
        }
    }

    /// Closes the database.
    ///
    /// Returns without waiting for operations already in progress; those
    /// finish normally and the file is released when the last one ends. Any
    /// operation started afterwards on a bucket or scanner derived from this
    /// database fails with `Error::Closed`, including one started from inside
    /// a `for_each` visitor.
    pub fn close(self) -> Result<()> {
        let mut engine = self.inner.engine.write().map_err(|_| Error::LockPoisoned)?;
        if engine.take().is_some() {
            info!(path = ?self.inner.path, "closed database");
        }
        Ok(())
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.inner.path)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_in_memory_database() {
        let db = Database::in_memory().unwrap();
        assert!(db.path().is_none());
        assert!(!db.is_closed());

        let things = db.new_bucket("things").unwrap();
        things.put(b"key", b"value").unwrap();
        assert_eq!(things.get(b"key").unwrap(), Some(b"value".to_vec()));
    }

    #[test]
    fn test_path_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bx.redb");
        let db = Database::open(&path).unwrap();
        assert_eq!(db.path(), Some(path.as_path()));
        db.close().unwrap();
    }

    #[test]
    fn test_empty_bucket_name_rejected() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(db.new_bucket(""), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_failed_update_is_rolled_back() {
        let db = Database::in_memory().unwrap();
        let things = db.new_bucket("things").unwrap();

        let result = db.inner.update(|tx| -> Result<()> {
            let mut table = tx.open_table(table_definition("things"))?;
            table.insert(&b"A"[..], &b"alpha"[..])?;
            Err(Error::InvalidInput("abandon".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(things.get(b"A").unwrap(), None);
    }

    #[test]
    fn test_zero_timeout_fails_fast() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bx.redb");
        let _first = Database::open(&path).unwrap();

        let started = Instant::now();
        let err = Database::open_with_options(&path, Options::new().lock_timeout(Duration::ZERO))
            .unwrap_err();
        assert!(matches!(err, Error::LockTimeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
