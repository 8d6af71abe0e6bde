//! Ordered set containers: an unbalanced binary search tree and an AVL tree
//! built on it, both walkable in pre-, in-, post- and level order.
//!
//! ```
//! use avl_collections::{AvlTree, InOrder, PreOrder};
//!
//! let mut tree = AvlTree::new();
//! for key in [1, 2, 3] {
//!     tree.insert(key).unwrap();
//! }
//! assert_eq!(tree.iter::<PreOrder>().copied().collect::<Vec<_>>(), vec![2, 1, 3]);
//! assert_eq!(tree.iter::<InOrder>().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
//! assert!(tree.insert(2).is_err());
//! ```

mod avl_tree;
mod binary_search_tree;
mod error;
pub mod node;
mod queue;
mod search_tree;
mod stack;
pub mod stream;
pub mod traversal;

pub use avl_tree::AvlTree;
pub use binary_search_tree::BinarySearchTree;
pub use error::TreeError;
pub use queue::Queue;
pub use search_tree::SearchTree;
pub use stack::Stack;
pub use traversal::{InOrder, Iter, IterMut, LevelOrder, Order, PostOrder, PreOrder};
