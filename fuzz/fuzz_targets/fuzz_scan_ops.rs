#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use buckets::{Database, Error, Item, KeyRange, Scanner, MAX_KEY_SIZE};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum BucketOp {
    Put { key: Vec<u8>, value: Vec<u8> },
    PutIfAbsent { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
    Get { key: Vec<u8> },
    Prefix { prefix: Vec<u8> },
    Range { min: Vec<u8>, max: Vec<u8> },
}

fn expected(model: &BTreeMap<Vec<u8>, Vec<u8>>, range: &KeyRange) -> Vec<Item> {
    model
        .iter()
        .filter(|(k, _)| range.contains(k))
        .map(|(k, v)| Item::from_slices(k, v))
        .collect()
}

fuzz_target!(|ops: Vec<BucketOp>| {
    // In-memory database for fast fuzzing
    let db = match Database::in_memory() {
        Ok(db) => db,
        Err(_) => return,
    };
    let bucket = db.new_bucket("fuzz").expect("create bucket");
    let mut model: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();
    let writable = |key: &[u8]| !key.is_empty() && key.len() <= MAX_KEY_SIZE;

    for op in ops.iter().take(100) {
        match op {
            BucketOp::Put { key, value } => {
                let result = bucket.put(key, value);
                if writable(key.as_slice()) {
                    result.expect("valid put");
                    model.insert(key.clone(), value.clone());
                } else {
                    assert!(matches!(result, Err(Error::InvalidInput(_))));
                }
            }
            BucketOp::PutIfAbsent { key, value } => {
                if writable(key.as_slice()) {
                    let written = bucket.put_if_absent(key, value).expect("valid put");
                    assert_eq!(written, !model.contains_key(key));
                    model.entry(key.clone()).or_insert_with(|| value.clone());
                } else {
                    let result = bucket.put_if_absent(key, value);
                    assert!(matches!(result, Err(Error::InvalidInput(_))));
                }
            }
            BucketOp::Delete { key } => {
                bucket.delete(key).expect("delete");
                model.remove(key);
            }
            BucketOp::Get { key } => {
                assert_eq!(bucket.get(key).expect("get"), model.get(key).cloned());
            }
            BucketOp::Prefix { prefix } => {
                let scanner = bucket.prefix_scanner(prefix);
                let items = scanner.items().expect("prefix scan");
                assert_eq!(items, expected(&model, &KeyRange::prefix(prefix.clone())));
                assert_eq!(scanner.count().expect("count"), items.len());
            }
            BucketOp::Range { min, max } => {
                let scanner = bucket.range_scanner(min, max);
                let items = scanner.items().expect("range scan");
                assert_eq!(items, expected(&model, &KeyRange::inclusive(min.clone(), max.clone())));
                assert_eq!(scanner.count().expect("count"), items.len());
            }
        }
    }
});
