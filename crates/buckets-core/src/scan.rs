//! Key selection rules shared by prefix and range scans.
//!
//! A scan is a single forward walk over a bucket: position at
//! [`KeyRange::seek_key`], then keep visiting keys for as long as
//! [`KeyRange::admits`] holds. Keys are ordered byte-lexicographically, so
//! both a prefix and an inclusive interval select one contiguous run and the
//! first rejected key ends the walk.

/// The subset of a bucket's keys visited by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRange {
    /// Every key starting with the given bytes. An empty prefix selects the
    /// whole bucket.
    Prefix(Vec<u8>),
    /// Every key `k` with `min <= k <= max`.
    Inclusive {
        /// Lower bound (inclusive)
        min: Vec<u8>,
        /// Upper bound (inclusive)
        max: Vec<u8>,
    },
}

impl KeyRange {
    /// Selects every key in a bucket.
    pub fn all() -> Self {
        KeyRange::Prefix(Vec::new())
    }

    /// Selects keys starting with `prefix`.
    pub fn prefix(prefix: impl Into<Vec<u8>>) -> Self {
        KeyRange::Prefix(prefix.into())
    }

    /// Selects keys between `min` and `max`, both inclusive.
    ///
    /// Bounds are compared as raw bytes: `"9"` sorts after `"10"`, so
    /// numeric keys must be zero padded by the caller.
    pub fn inclusive(min: impl Into<Vec<u8>>, max: impl Into<Vec<u8>>) -> Self {
        KeyRange::Inclusive {
            min: min.into(),
            max: max.into(),
        }
    }

    /// The key the cursor is positioned at (first key `>=` this) before walking.
    pub fn seek_key(&self) -> &[u8] {
        match self {
            KeyRange::Prefix(prefix) => prefix,
            KeyRange::Inclusive { min, .. } => min,
        }
    }

    /// Whether the walk continues past `key`.
    ///
    /// Only meaningful for keys at or after [`seek_key`](Self::seek_key).
    pub fn admits(&self, key: &[u8]) -> bool {
        match self {
            KeyRange::Prefix(prefix) => key.starts_with(prefix),
            KeyRange::Inclusive { max, .. } => key <= max.as_slice(),
        }
    }

    /// Full membership test, independent of cursor position.
    pub fn contains(&self, key: &[u8]) -> bool {
        match self {
            KeyRange::Prefix(prefix) => key.starts_with(prefix),
            KeyRange::Inclusive { min, max } => min.as_slice() <= key && key <= max.as_slice(),
        }
    }

    /// True when no key can ever match (`min > max`).
    pub fn is_empty(&self) -> bool {
        match self {
            KeyRange::Prefix(_) => false,
            KeyRange::Inclusive { min, max } => min > max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn walk<'a>(keys: &'a BTreeSet<Vec<u8>>, range: &KeyRange) -> Vec<&'a [u8]> {
        keys.range(range.seek_key().to_vec()..)
            .map(Vec::as_slice)
            .take_while(|k| range.admits(k))
            .collect()
    }

    fn keyset(keys: &[&str]) -> BTreeSet<Vec<u8>> {
        keys.iter().map(|k| k.as_bytes().to_vec()).collect()
    }

    #[test]
    fn test_prefix_walk_is_contiguous() {
        let keys = keyset(&[
            "f/", "fo/", "foo/", "foo/bar/", "foo/bar/baz/", "food/", "good/", "goo/",
        ]);
        let range = KeyRange::prefix("foo/");

        let walked = walk(&keys, &range);
        assert_eq!(walked, vec![&b"foo/"[..], b"foo/bar/", b"foo/bar/baz/"]);

        let filtered: Vec<&[u8]> = keys
            .iter()
            .map(Vec::as_slice)
            .filter(|k| range.contains(k))
            .collect();
        assert_eq!(walked, filtered);
    }

    #[test]
    fn test_empty_prefix_selects_everything() {
        let keys = keyset(&["a", "b", "c"]);
        assert_eq!(walk(&keys, &KeyRange::all()).len(), 3);
    }

    #[test]
    fn test_inclusive_bounds() {
        let keys = keyset(&["1970", "1985", "1990", "1995", "2000", "2005"]);
        let range = KeyRange::inclusive("1990", "2000");
        assert_eq!(walk(&keys, &range), vec![&b"1990"[..], b"1995", b"2000"]);
        assert!(range.contains(b"1990"));
        assert!(range.contains(b"2000"));
        assert!(!range.contains(b"2000\0"));
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let keys = keyset(&["a", "b", "c"]);
        let range = KeyRange::inclusive("c", "a");
        assert!(range.is_empty());
        assert!(walk(&keys, &range).is_empty());
    }

    #[test]
    fn test_byte_order_not_numeric() {
        let range = KeyRange::inclusive("1", "5");
        assert!(range.contains(b"10"));
        assert!(!range.contains(b"9"));
    }
}
