//! Text streaming: `"<size> <e1> <e2> ..."` with elements in level order.
//!
//! Re-inserting a level-order sequence reproduces the original shape for both
//! tree kinds (every parent precedes its children and no prefix of an AVL
//! tree's level order is out of balance), so parsing what `Display` wrote
//! yields a tree equal to the original.
//!
//! The element order is therefore not byte-compatible with a pre-order
//! stream of the same tree; a pre-order stream still parses, but an AVL tree
//! read from one may rotate into a different shape.

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::avl_tree::AvlTree;
use crate::binary_search_tree::BinarySearchTree;
use crate::error::TreeError;
use crate::search_tree::SearchTree;
use crate::traversal::LevelOrder;

fn write_elements<'a, T, I>(f: &mut fmt::Formatter<'_>, size: usize, elements: I) -> fmt::Result
where
    T: Display + 'a,
    I: Iterator<Item = &'a T>,
{
    write!(f, "{}", size)?;
    for element in elements {
        write!(f, " {}", element)?;
    }
    Ok(())
}

/// Parses `text` and inserts every element into `tree`.
pub fn read_into<T, S>(text: &str, tree: &mut S) -> Result<(), TreeError>
where
    T: Ord + FromStr,
    S: SearchTree<T>,
{
    let mut tokens = text.split_whitespace();
    let length = tokens.next().ok_or(TreeError::MissingLength)?;
    let expected: usize = length
        .parse()
        .map_err(|_| TreeError::InvalidLength(length.to_string()))?;
    let tokens: Vec<&str> = tokens.collect();
    if tokens.len() != expected {
        return Err(TreeError::LengthMismatch {
            expected,
            found: tokens.len(),
        });
    }
    for (position, token) in tokens.into_iter().enumerate() {
        let element = token.parse().map_err(|_| TreeError::InvalidElement {
            position,
            token: token.to_string(),
        })?;
        tree.insert(element)?;
    }
    Ok(())
}

impl<T: Display> Display for BinarySearchTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_elements(f, self.size(), self.iter::<LevelOrder>())
    }
}

impl<T: Display> Display for AvlTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_elements(f, self.size(), self.iter::<LevelOrder>())
    }
}

impl<T: Ord + FromStr> FromStr for BinarySearchTree<T> {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, TreeError> {
        let mut tree = BinarySearchTree::new();
        read_into(s, &mut tree)?;
        Ok(tree)
    }
}

impl<T: Ord + FromStr> FromStr for AvlTree<T> {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, TreeError> {
        let mut tree = AvlTree::new();
        read_into(s, &mut tree)?;
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_writes_size_then_level_order() {
        let tree = AvlTree::try_from(vec![1, 2, 3, 4]).unwrap();
        assert_eq!(tree.to_string(), "4 2 1 3 4");
        let empty: AvlTree<i32> = AvlTree::new();
        assert_eq!(empty.to_string(), "0");
    }

    #[test]
    fn bst_round_trip_keeps_shape() {
        let tree = BinarySearchTree::try_from(vec![1, 2, 3, 0]).unwrap();
        let parsed: BinarySearchTree<i32> = tree.to_string().parse().unwrap();
        assert_eq!(parsed, tree);
        assert_eq!(parsed.height(), 2);
    }

    #[test]
    fn avl_round_trip_keeps_shape() {
        let tree: AvlTree<i32> = [2, 5, 1, 7, 8, 6, 0, 3, 9].into_iter().collect();
        let parsed: AvlTree<i32> = tree.to_string().parse().unwrap();
        assert_eq!(parsed, tree);
        assert!(parsed.is_balanced());
    }

    #[test]
    fn parse_tolerates_extra_whitespace() {
        let tree: AvlTree<i32> = "  3\n 2\t1   3 ".parse().unwrap();
        assert_eq!(tree.pre_order(), vec![&2, &1, &3]);
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<AvlTree<i32>>(), Err(TreeError::MissingLength));
        assert_eq!(
            "x 1".parse::<AvlTree<i32>>(),
            Err(TreeError::InvalidLength("x".to_string()))
        );
        assert_eq!(
            "2 1".parse::<AvlTree<i32>>(),
            Err(TreeError::LengthMismatch { expected: 2, found: 1 })
        );
        assert_eq!(
            "1 1 2".parse::<AvlTree<i32>>(),
            Err(TreeError::LengthMismatch { expected: 1, found: 2 })
        );
        assert_eq!(
            "2 1 z".parse::<BinarySearchTree<i32>>(),
            Err(TreeError::InvalidElement {
                position: 1,
                token: "z".to_string()
            })
        );
        assert_eq!(
            "2 1 1".parse::<AvlTree<i32>>(),
            Err(TreeError::DuplicateElement)
        );
    }

    #[test]
    fn strings_round_trip() {
        let tree: AvlTree<String> = ["pear", "apple", "fig"].into_iter().map(String::from).collect();
        let parsed: AvlTree<String> = tree.to_string().parse().unwrap();
        assert_eq!(parsed, tree);
    }
}
