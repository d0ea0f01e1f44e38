extern crate quickcheck;
use bst_map::{BstMap, CursorError};
use quickcheck::quickcheck;

mod common;
use common::init_tracing;

const LETTERS: [&str; 10] = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"];

// Walks the map the way a C++ range-for would.
fn walk<K: Clone, V: Clone>(m: &BstMap<K, V>) -> Vec<(K, V)> {
    let mut res = Vec::new();
    let mut it = m.begin();
    while it != m.end() {
        let (k, v) = it.current().unwrap();
        res.push((k.clone(), v.clone()));
        it.advance();
    }
    res
}

#[test]
fn insert_then_erase_scenario() {
    init_tracing();

    let mut m = BstMap::new();
    for (k, v) in [(5, "a"), (3, "b"), (8, "c"), (1, "d"), (4, "e")] {
        *m.get_or_insert(k) = v;
    }
    assert_eq!(walk(&m), [(1, "d"), (3, "b"), (4, "e"), (5, "a"), (8, "c")]);

    m.erase(&3);
    assert_eq!(walk(&m), [(1, "d"), (4, "e"), (5, "a"), (8, "c")]);
    assert!(!m.contains(&3));
}

#[test]
fn string_keys_come_out_sorted() {
    let mut b: BstMap<String, i32> = BstMap::new();

    // rotate the insertion order through every starting letter
    for start in 0..LETTERS.len() {
        let mut c: BstMap<String, i32> = BstMap::new();
        for j in 0..LETTERS.len() {
            let s = LETTERS[(start + j * 3) % LETTERS.len()].to_string();
            let val = j as i32 + 1;
            *b.get_or_insert(s.clone()) = val;
            *c.get_or_insert(s.clone()) = val;
            assert_eq!(*b.get_or_insert(s), val);
        }

        let res: String = c.begin().map(|(k, _)| k.as_str()).collect();
        assert_eq!(res, "ABCDEFGHIJ");
    }

    *b.get_or_insert("fubar".to_string()) = 43;
    *b.get_or_insert("baz".to_string()) = 62;
    assert_eq!(*b.get_or_insert("fubar".to_string()), 43);
    assert_eq!(*b.get_or_insert("baz".to_string()), 62);
}

#[test]
fn dereferencing_past_the_end_fails() {
    let m = BstMap::from([(1u8, 'x')]);
    let mut it = m.begin();
    assert_eq!(it.current(), Ok((&1, &'x')));
    it.advance();
    assert!(it == m.end());
    assert_eq!(it.current(), Err(CursorError::Exhausted));
    assert_eq!(
        CursorError::Exhausted.to_string(),
        "dereference of an exhausted cursor"
    );

    // advancing an exhausted cursor keeps it exhausted
    it.advance();
    assert!(it.is_exhausted());
}

#[test]
fn values_can_change_during_traversal() {
    let mut m: BstMap<u8, u32> = (0..16).map(|k| (k, 0)).collect();
    for (k, v) in &mut m {
        *v = *k as u32 * 10;
    }
    assert!(walk(&m).iter().all(|(k, v)| *v == *k as u32 * 10));
}

quickcheck! {
    fn qc_cursor_matches_btree(xs: Vec<(u8, u32)>) -> () {
        let mut btree = std::collections::BTreeMap::new();
        let mut m = BstMap::new();

        for (k, v) in xs.iter() {
            btree.insert(*k, *v);
            *m.get_or_insert(*k) = *v;
        }

        let expected: Vec<_> = btree.into_iter().collect();
        assert_eq!(walk(&m), expected);
    }

    fn qc_erase_preserves_order(xs: Vec<u8>, del: Vec<u8>) -> () {
        let mut m: BstMap<u8, u8> = xs.iter().map(|&k| (k, k)).collect();
        for k in del.iter() {
            m.erase(k);
        }

        let keys: Vec<u8> = walk(&m).into_iter().map(|(k, _)| k).collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        assert!(keys.iter().all(|k| xs.contains(k) && !del.contains(k)));
        m.check().unwrap();
    }
}
