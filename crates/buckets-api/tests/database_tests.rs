// Integration tests for opening, closing and managing buckets

mod common;

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use buckets::{Database, Error, Options, Scanner};
use common::TestDb;

#[test]
fn test_open_and_close() {
    let fixture = TestDb::new();
    assert!(fixture.path.exists());
    assert_eq!(fixture.db.path(), Some(fixture.path.as_path()));
    fixture.db.close().expect("Failed to close database");
}

#[test]
fn test_create_and_delete_bucket() {
    let fixture = TestDb::new();
    fixture.db.new_bucket("things").expect("Failed to create bucket");
    fixture.db.delete_bucket("things").expect("Failed to delete bucket");
}

#[test]
fn test_new_bucket_is_idempotent() {
    let fixture = TestDb::new();
    let first = fixture.db.new_bucket("things").unwrap();
    first.put(b"A", b"alpha").unwrap();

    let second = fixture.db.new_bucket("things").unwrap();
    assert_eq!(second.get(b"A").unwrap(), Some(b"alpha".to_vec()));
}

#[test]
fn test_delete_missing_bucket_fails() {
    let fixture = TestDb::new();
    let err = fixture.db.delete_bucket("nothing").unwrap_err();
    assert!(matches!(err, Error::BucketNotFound(ref name) if name == "nothing"));
}

#[test]
fn test_recreate_after_delete() {
    let fixture = TestDb::new();
    let foo = fixture.db.new_bucket("foo").unwrap();
    foo.put(b"k", b"v").unwrap();

    fixture.db.delete_bucket("foo").unwrap();
    let foo = fixture.db.new_bucket("foo").expect("Failed to re-create bucket");
    assert_eq!(foo.get(b"k").unwrap(), None);
    assert!(foo.items().unwrap().is_empty());
}

#[test]
fn test_deleted_bucket_handles_fail() {
    let fixture = TestDb::new();
    let things = fixture.bucket_with("things", &[("A", "alpha"), ("B", "beta")]);
    let scanner = things.prefix_scanner(b"A");

    fixture.db.delete_bucket("things").unwrap();

    assert!(things.get(b"A").unwrap_err().is_not_found());
    assert!(things.put(b"C", b"gamma").unwrap_err().is_not_found());
    assert!(things.delete(b"A").unwrap_err().is_not_found());
    assert!(things.items().unwrap_err().is_not_found());
    assert!(scanner.count().unwrap_err().is_not_found());

    // The failed put must not have brought the bucket back
    assert!(fixture.db.delete_bucket("things").unwrap_err().is_not_found());
}

#[test]
fn test_data_survives_reopen() {
    let fixture = TestDb::new();
    let path = fixture.path.clone();
    {
        let things = fixture.db.new_bucket("things").unwrap();
        things.put(b"key1", b"value1").unwrap();
        things.put(b"key2", b"value2").unwrap();
    }
    fixture.db.close().unwrap();

    let db = Database::open(&path).unwrap();
    let things = db.new_bucket("things").unwrap();
    assert_eq!(things.get(b"key1").unwrap(), Some(b"value1".to_vec()));
    assert_eq!(things.get(b"key2").unwrap(), Some(b"value2".to_vec()));
    db.close().unwrap();
}

#[test]
fn test_operations_after_close_fail() {
    let fixture = TestDb::new();
    let things = fixture.bucket_with("things", &[("A", "alpha")]);
    let scanner = things.range_scanner(b"A", b"Z");

    fixture.db.close().unwrap();

    assert!(matches!(things.get(b"A"), Err(Error::Closed)));
    assert!(matches!(things.put(b"B", b"beta"), Err(Error::Closed)));
    assert!(matches!(scanner.keys(), Err(Error::Closed)));
}

#[test]
fn test_open_locked_file_times_out() {
    let fixture = TestDb::new();
    let options = Options::new()
        .lock_timeout(Duration::from_millis(200))
        .lock_retry_interval(Duration::from_millis(20));

    let started = Instant::now();
    let err = Database::open_with_options(&fixture.path, options).unwrap_err();

    assert!(err.is_open_error());
    assert!(matches!(err, Error::LockTimeout { ref path, .. } if path == &fixture.path));
    assert!(started.elapsed() >= Duration::from_millis(200));
}

#[test]
fn test_open_waits_for_lock_release() {
    let fixture = TestDb::new();
    let path = fixture.path.clone();
    let (opening_tx, opening_rx) = mpsc::channel();

    let holder = thread::spawn(move || {
        opening_rx.recv().unwrap();
        thread::sleep(Duration::from_millis(100));
        fixture.db.close().unwrap();
        fixture.temp_dir
    });

    opening_tx.send(()).unwrap();
    let options = Options::new()
        .lock_timeout(Duration::from_secs(10))
        .lock_retry_interval(Duration::from_millis(10));
    let db = Database::open_with_options(&path, options).expect("open should wait for release");

    let _temp_dir = holder.join().unwrap();
    db.new_bucket("things").unwrap();
    db.close().unwrap();
}

#[test]
fn test_open_unwritable_path_fails() {
    let fixture = TestDb::new();
    let bad = fixture.path.join("not-a-dir").join("db.redb");
    let err = Database::open(&bad).unwrap_err();
    assert!(matches!(err, Error::Open { .. }));
    assert!(err.to_string().contains("not-a-dir"));
}

#[test]
fn test_close_during_scan_with_nested_read() {
    let fixture = TestDb::new();
    let things = fixture.bucket_with("things", &[("A", "alpha"), ("B", "beta"), ("C", "gamma")]);
    let (visiting_tx, visiting_rx) = mpsc::channel();
    let (closed_tx, closed_rx) = mpsc::channel();

    let visitor = thread::spawn(move || {
        let mut seen = Vec::new();
        let mut nested = None;
        let scan = things.for_each(|key, _| {
            seen.push(key.to_vec());
            if key == b"A" {
                visiting_tx.send(()).unwrap();
                closed_rx
                    .recv_timeout(Duration::from_secs(5))
                    .expect("close should not wait for the running scan");
                nested = Some(things.get(b"B"));
            }
            Ok::<(), Error>(())
        });
        (scan, seen, nested)
    });

    visiting_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    fixture.db.close().unwrap();
    closed_tx.send(()).unwrap();

    let (scan, seen, nested) = visitor.join().unwrap();
    // The running scan finishes on its own transaction
    scan.unwrap();
    assert_eq!(seen, common::byte_keys(&["A", "B", "C"]));
    // Calls started after close are refused
    assert!(matches!(nested, Some(Err(Error::Closed))));
}
