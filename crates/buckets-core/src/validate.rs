//! Input validation for writes.
//!
//! Checks run before a transaction is opened so a rejected write never
//! touches the store.

use crate::error::{Error, Result};
use crate::item::Item;

/// Largest accepted key, in bytes.
pub const MAX_KEY_SIZE: usize = 32 * 1024;

/// Largest accepted value, in bytes.
pub const MAX_VALUE_SIZE: usize = 1024 * 1024 * 1024;

/// Validates a key about to be written.
///
/// # Errors
///
/// Returns `Error::InvalidInput` for an empty key or one longer than
/// [`MAX_KEY_SIZE`].
#[inline]
pub fn validate_key(key: &[u8]) -> Result<()> {
    if key.is_empty() {
        return Err(Error::InvalidInput("key cannot be empty".to_string()));
    }

    if key.len() > MAX_KEY_SIZE {
        return Err(Error::InvalidInput(format!(
            "key size {} exceeds maximum {}",
            key.len(),
            MAX_KEY_SIZE
        )));
    }

    Ok(())
}

/// Validates a value about to be written. Empty values are allowed.
#[inline]
pub fn validate_value(value: &[u8]) -> Result<()> {
    if value.len() > MAX_VALUE_SIZE {
        return Err(Error::InvalidInput(format!(
            "value size {} exceeds maximum {}",
            value.len(),
            MAX_VALUE_SIZE
        )));
    }

    Ok(())
}

/// Validates a key/value pair.
#[inline]
pub fn validate_pair(key: &[u8], value: &[u8]) -> Result<()> {
    validate_key(key)?;
    validate_value(value)
}

/// Validates every item of a batch; the first bad item rejects the batch.
pub fn validate_items(items: &[Item]) -> Result<()> {
    items
        .iter()
        .try_for_each(|item| validate_pair(&item.key, &item.value))
}

/// Validates a bucket name.
pub fn validate_bucket_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInput("bucket name cannot be empty".to_string()));
    }
    Ok(())
}
