//! Multimap Facade Tests
//!
//! The map-style contract: value sets accumulate per key, removal drops a
//! whole key, previous sets come back from insert/remove, and clear resets
//! the universe.

use crate::engine_with;

/// Values accumulate into a set per key; duplicates are absorbed.
#[test]
fn test_values_accumulate_per_key() {
    let engine = engine_with(&[]);
    engine
        .execute(|map| {
            map.insert("k".to_string(), 1)?;
            map.insert("k".to_string(), 2)?;
            map.insert("k".to_string(), 1)?;
            Ok(())
        })
        .unwrap();

    let view = engine.read_view();
    let values = view.get(&"k".to_string()).unwrap();
    assert_eq!(values.len(), 2);
    assert!(values.contains(&1) && values.contains(&2));
}

/// insert returns the previous set; the returned set is fixed at read time.
#[test]
fn test_insert_previous_set_is_stable() {
    let engine = engine_with(&[("k", &[1])]);
    let mut txn = engine.begin();
    let mut map = txn.multimap();

    let previous = map.insert("k".to_string(), 2).unwrap().unwrap();
    map.insert("k".to_string(), 3).unwrap();

    // The set returned earlier does not grow with later writes.
    assert_eq!(previous.len(), 1);
    assert_eq!(map.get(&"k".to_string()).unwrap().unwrap().len(), 3);
    txn.abort();
}

/// remove drops the whole key and returns its former set.
#[test]
fn test_remove_whole_key() {
    let engine = engine_with(&[("k", &[1, 2, 3])]);
    engine
        .execute(|map| {
            let previous = map.remove("k".to_string())?.unwrap();
            assert_eq!(previous.len(), 3);
            assert!(map.remove("k".to_string())?.is_none());
            Ok(())
        })
        .unwrap();

    assert!(engine.read_view().is_empty());
}

/// extend behaves as repeated insert, across keys.
#[test]
fn test_extend_across_keys() {
    let engine = engine_with(&[("a", &[1])]);
    engine
        .execute(|map| {
            map.extend(vec![
                ("a".to_string(), 2),
                ("b".to_string(), 10),
                ("b".to_string(), 11),
            ])
        })
        .unwrap();

    let view = engine.read_view();
    assert_eq!(view.get(&"a".to_string()).unwrap().len(), 2);
    assert_eq!(view.get(&"b".to_string()).unwrap().len(), 2);
}

/// Writes after a clear land on the emptied universe.
#[test]
fn test_writes_after_clear() {
    let engine = engine_with(&[("a", &[1]), ("b", &[2])]);
    engine
        .execute(|map| {
            map.clear()?;
            map.insert("c".to_string(), 3).map(|_| ())
        })
        .unwrap();

    let view = engine.read_view();
    assert_eq!(view.len(), 1);
    assert!(view.contains_key(&"c".to_string()));
}

/// len/is_empty merge base, overlay and tombstones.
#[test]
fn test_len_merges_overlay() {
    let engine = engine_with(&[("a", &[1]), ("b", &[2])]);
    let mut txn = engine.begin();
    let mut map = txn.multimap();

    map.remove("a".to_string()).unwrap();
    map.insert("c".to_string(), 3).unwrap();
    assert_eq!(map.len().unwrap(), 2);
    assert!(!map.is_empty().unwrap());

    map.remove("b".to_string()).unwrap();
    map.remove("c".to_string()).unwrap();
    assert_eq!(map.len().unwrap(), 0);
    assert!(map.is_empty().unwrap());
    txn.abort();
}

/// An emptied-out map commits to an empty universe without clear().
#[test]
fn test_key_by_key_emptying() {
    let engine = engine_with(&[("a", &[1]), ("b", &[2])]);
    engine
        .execute(|map| {
            map.remove("a".to_string())?;
            map.remove("b".to_string())?;
            Ok(())
        })
        .unwrap();

    assert!(engine.read_view().is_empty());
    assert_eq!(engine.version(), 2);
}
