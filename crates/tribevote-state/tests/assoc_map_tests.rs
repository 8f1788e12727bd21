//! Tests for the ordered associative map.
//!
//! Verifies:
//! - Put/get round-trip until the key is overwritten or removed
//! - Deep copies are independent and keep size and order
//! - The external cursor visits every key once, in insertion order
//! - Ordered serialization

use tribevote_state::{AssocMap, MapError};

fn build(keys: &[u32]) -> AssocMap<String, String> {
    let mut map = AssocMap::new();
    for key in keys {
        map.put(key.to_string(), format!("v{}", key)).unwrap();
    }
    map
}

// ═══════════════════════════════════════════════════════════════
// Put / get / remove
// ═══════════════════════════════════════════════════════════════

#[test]
fn get_returns_last_put_value() {
    let mut map = AssocMap::new();
    map.put("k".to_string(), "first".to_string()).unwrap();
    assert_eq!(map.get("k").map(String::as_str), Some("first"));

    map.put("k".to_string(), "second".to_string()).unwrap();
    assert_eq!(map.get("k").map(String::as_str), Some("second"));
    assert_eq!(map.len(), 1);

    map.remove("k").unwrap();
    assert!(map.get("k").is_none());
    assert!(!map.contains("k"));
}

#[test]
fn get_mut_updates_in_place() {
    let mut map: AssocMap<u64, u64> = AssocMap::new();
    map.put(7, 1).unwrap();
    *map.get_mut(&7).unwrap() += 41;
    assert_eq!(map.get(&7), Some(&42));
}

#[test]
fn remove_from_every_position() {
    let mut map = build(&[1, 2, 3, 4, 5]);
    map.remove("3").unwrap();
    map.remove("1").unwrap();
    map.remove("5").unwrap();
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["2", "4"]);
    assert_eq!(map.remove("3"), Err(MapError::ItemDoesNotExist));
}

#[test]
fn clear_then_reuse() {
    let mut map = build(&[1, 2, 3]);
    map.clear();
    assert_eq!(map.len(), 0);
    assert!(map.first().is_none());
    map.put("9".to_string(), "v9".to_string()).unwrap();
    assert_eq!(map.len(), 1);
}

// ═══════════════════════════════════════════════════════════════
// Copy
// ═══════════════════════════════════════════════════════════════

#[test]
fn copy_keeps_size_and_order() {
    for keys in [&[][..], &[1][..], &[3, 1, 2][..], &[10, 20, 30, 40][..]] {
        let map = build(keys);
        let copy = map.try_copy().unwrap();
        assert_eq!(copy.len(), map.len());
        assert_eq!(copy, map);
    }
}

#[test]
fn copy_is_independent() {
    let map = build(&[1, 2]);
    let mut copy = map.try_copy().unwrap();
    copy.put("1".to_string(), "changed".to_string()).unwrap();
    copy.remove("2").unwrap();
    copy.put("3".to_string(), "v3".to_string()).unwrap();

    assert_eq!(map.get("1").map(String::as_str), Some("v1"));
    assert!(map.contains("2"));
    assert!(!map.contains("3"));
    assert_eq!(map.len(), 2);
}

#[test]
fn clone_matches_try_copy() {
    let map = build(&[4, 5, 6]);
    assert_eq!(map.clone(), map.try_copy().unwrap());
}

#[test]
fn absent_source_copies_to_absent() {
    let source: Option<&AssocMap<String, String>> = None;
    let copy = source.map(AssocMap::try_copy).transpose().unwrap();
    assert!(copy.is_none());
}

// ═══════════════════════════════════════════════════════════════
// Iteration
// ═══════════════════════════════════════════════════════════════

#[test]
fn cursor_visits_each_key_once_in_insertion_order() {
    let inserted = [8, 3, 5, 1, 9, 2];
    let mut map = build(&inserted);

    let mut visited = Vec::new();
    let mut key = map.first().cloned();
    while let Some(current) = key {
        visited.push(current);
        key = map.next().cloned();
    }

    let expected: Vec<String> = inserted.iter().map(u32::to_string).collect();
    assert_eq!(visited, expected);
}

#[test]
fn cursor_is_per_map() {
    let mut left = build(&[1, 2]);
    let mut right = build(&[1, 2]);
    left.first();
    assert!(right.next().is_none());
    assert_eq!(left.next().map(String::as_str), Some("2"));
    assert_eq!(right.first().map(String::as_str), Some("1"));
}

#[test]
fn borrowing_iterator_reports_exact_len() {
    let map = build(&[1, 2, 3]);
    let iter = map.iter();
    assert_eq!(iter.len(), 3);
    let values: Vec<&String> = (&map).into_iter().map(|(_, v)| v).collect();
    assert_eq!(values, vec!["v1", "v2", "v3"]);
}

#[test]
fn serializes_in_storage_order() {
    let map = build(&[200, 100]);
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"200":"v200","100":"v100"}"#);
}
