#![no_main]

use std::collections::BTreeMap;

use buckets::{Database, Item, MAX_KEY_SIZE};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|batches: Vec<(bool, Vec<(Vec<u8>, Vec<u8>)>)>| {
    let db = match Database::in_memory() {
        Ok(db) => db,
        Err(_) => return,
    };
    let bucket = db.new_bucket("fuzz").expect("create bucket");
    let mut model: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();

    for (if_absent, pairs) in batches.iter().take(20) {
        let items: Vec<Item> = pairs
            .iter()
            .take(64)
            .map(|(k, v)| Item::from_slices(k, v))
            .collect();
        let valid = items
            .iter()
            .all(|item| !item.key.is_empty() && item.key.len() <= MAX_KEY_SIZE);

        if *if_absent {
            let result = bucket.insert_if_absent(&items);
            if valid {
                let mut written = 0;
                for item in &items {
                    if !model.contains_key(&item.key) {
                        model.insert(item.key.clone(), item.value.clone());
                        written += 1;
                    }
                }
                assert_eq!(result.expect("valid batch"), written);
            } else {
                assert!(result.is_err());
            }
        } else {
            let result = bucket.insert(&items);
            if valid {
                result.expect("valid batch");
                for item in &items {
                    model.insert(item.key.clone(), item.value.clone());
                }
            } else {
                assert!(result.is_err());
            }
        }

        // A rejected batch must leave the bucket untouched
        let stored: Vec<Item> = bucket.items().expect("items");
        let modeled: Vec<Item> = model.iter().map(|(k, v)| Item::from_slices(k, v)).collect();
        assert_eq!(stored, modeled);
    }
});
