//! Behavioural contracts shared by every `SearchTree` implementation.

#![allow(dead_code)]

use avl_collections::{SearchTree, TreeError};

pub const SAMPLE: [i32; 7] = [5, 3, 8, 1, 4, 7, 9];

pub fn filled<S: SearchTree<i32> + Default>(keys: &[i32]) -> S {
    let mut tree = S::default();
    for &key in keys {
        tree.insert(key).expect("sample keys are distinct");
    }
    tree
}

pub fn check_empty_contract<S: SearchTree<i32> + Default>() {
    let mut tree = S::default();
    assert!(tree.is_empty());
    assert_eq!(tree.size(), 0);
    assert_eq!(tree.height(), -1);
    assert!(!tree.contains(&1));
    assert!(!tree.remove(&1));
    tree.clear();
    assert!(tree.is_empty());
}

pub fn check_single_node_height<S: SearchTree<i32> + Default>() {
    let tree: S = filled(&[7]);
    assert_eq!(tree.height(), 0);
    assert_eq!(tree.size(), 1);
}

pub fn check_duplicate_rejection<S: SearchTree<i32> + Default>() {
    let mut tree: S = filled(&SAMPLE);
    for key in SAMPLE {
        assert_eq!(tree.insert(key), Err(TreeError::DuplicateElement));
    }
    assert_eq!(tree.size(), SAMPLE.len());
}

pub fn check_membership<S: SearchTree<i32> + Default>() {
    let tree: S = filled(&SAMPLE);
    for key in SAMPLE {
        assert!(tree.contains(&key));
    }
    for key in [0, 2, 6, 10] {
        assert!(!tree.contains(&key));
    }
}

pub fn check_remove_contract<S: SearchTree<i32> + Default>() {
    let mut tree: S = filled(&SAMPLE);
    assert!(!tree.remove(&100));
    assert_eq!(tree.size(), SAMPLE.len());
    let mut expected = SAMPLE.len();
    for key in [5, 1, 8, 3, 9, 4, 7] {
        assert!(tree.remove(&key));
        expected -= 1;
        assert_eq!(tree.size(), expected);
        assert!(!tree.contains(&key));
        assert!(!tree.remove(&key));
    }
    assert!(tree.is_empty());
    assert_eq!(tree.height(), -1);
}

pub fn check_clear_then_reuse<S: SearchTree<i32> + Default>() {
    let mut tree: S = filled(&SAMPLE);
    tree.clear();
    assert!(tree.is_empty());
    tree.insert(1).unwrap();
    assert!(tree.contains(&1));
    assert_eq!(tree.size(), 1);
}
