//! Multithreaded Stress Tests
//!
//! Retry loops under real contention. These tests assert exact final
//! state: conflicts may abort any individual attempt, but every logical
//! update must land exactly once.

use crate::engine_with;
use rand::Rng;
use std::thread;
use weft::prelude::*;

/// Commit one closure with a retry loop, panicking on non-retryable errors.
fn with_retry<F>(engine: &Weft<String, i64>, mut f: F)
where
    F: FnMut(&mut TransactionalMultimap<'_, String, i64>) -> Result<()>,
{
    loop {
        match engine.execute(&mut f) {
            Ok(()) => return,
            Err(e) if e.is_retryable() => continue,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}

/// N threads each append M distinct values to one shared key.
#[test]
fn test_contended_single_key_appends() {
    const THREADS: i64 = 8;
    const PER_THREAD: i64 = 50;

    let engine = engine_with(&[]);
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let engine = engine.clone();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let value = t * PER_THREAD + i;
                    with_retry(&engine, |map| {
                        map.insert("shared".to_string(), value).map(|_| ())
                    });
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let view = engine.read_view();
    let values = view.get(&"shared".to_string()).unwrap();
    assert_eq!(values.len(), (THREADS * PER_THREAD) as usize);
}

/// Threads on disjoint keys make progress without interfering.
#[test]
fn test_disjoint_keys_progress() {
    const THREADS: i64 = 8;
    const PER_THREAD: i64 = 50;

    let engine = engine_with(&[]);
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let engine = engine.clone();
            thread::spawn(move || {
                let key = format!("t{t}");
                for i in 0..PER_THREAD {
                    with_retry(&engine, |map| map.insert(key.clone(), i).map(|_| ()));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let view = engine.read_view();
    assert_eq!(view.len(), THREADS as usize);
    for t in 0..THREADS {
        assert_eq!(view.get(&format!("t{t}")).unwrap().len(), PER_THREAD as usize);
    }
    // Every commit published exactly one version.
    assert_eq!(engine.version(), (THREADS * PER_THREAD) as u64);
}

/// Read-modify-write counter: move a value out of one key into another,
/// conserving the total across random interleavings.
#[test]
fn test_transfer_conserves_values() {
    const THREADS: usize = 6;
    const TRANSFERS: usize = 40;

    let engine = engine_with(&[]);
    // Seed 200 values spread over two buckets.
    engine
        .execute(|map| {
            for v in 0..200 {
                map.insert(if v % 2 == 0 { "left" } else { "right" }.to_string(), v)?;
            }
            Ok(())
        })
        .unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let engine = engine.clone();
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                for _ in 0..TRANSFERS {
                    let (from, to) = if rng.gen_bool(0.5) {
                        ("left", "right")
                    } else {
                        ("right", "left")
                    };
                    with_retry(&engine, |map| {
                        let source = match map.get(&from.to_string())? {
                            Some(values) => values,
                            None => return Ok(()),
                        };
                        let Some(&moved) = source.iter().next() else {
                            return Ok(());
                        };
                        // Drop the whole source set and re-insert the rest.
                        map.remove(from.to_string())?;
                        for &v in source.iter().filter(|&&v| v != moved) {
                            map.insert(from.to_string(), v)?;
                        }
                        map.insert(to.to_string(), moved)?;
                        Ok(())
                    });
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let view = engine.read_view();
    let total: usize = ["left", "right"]
        .iter()
        .filter_map(|k| view.get(&k.to_string()))
        .map(|values| values.len())
        .sum();
    assert_eq!(total, 200);
}

/// A concurrent clear() storm still leaves a consistent final state.
#[test]
fn test_clear_storm_stays_consistent() {
    const WRITERS: i64 = 4;
    const ROUNDS: i64 = 25;

    let engine = engine_with(&[]);
    let mut handles: Vec<_> = (0..WRITERS)
        .map(|t| {
            let engine = engine.clone();
            thread::spawn(move || {
                for i in 0..ROUNDS {
                    with_retry(&engine, |map| {
                        map.insert(format!("w{t}"), i).map(|_| ())
                    });
                }
            })
        })
        .collect();
    handles.push({
        let engine = engine.clone();
        thread::spawn(move || {
            for _ in 0..ROUNDS {
                with_retry(&engine, |map| map.clear());
            }
        })
    });
    for handle in handles {
        handle.join().unwrap();
    }

    // Whatever survived, reading it back is internally consistent.
    let view = engine.read_view();
    for key in view.keys() {
        assert!(!view.get(key).unwrap().is_empty());
    }
    assert!(view.len() <= WRITERS as usize);
}
