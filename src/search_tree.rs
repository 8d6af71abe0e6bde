use crate::error::TreeError;

/// Operations every ordered set-like tree in this crate provides.
///
/// Generic code (streaming, the conformance tests) is written against this
/// trait so it runs unchanged over the unbalanced and the AVL tree.
pub trait SearchTree<T: Ord> {
    /// Adds `element`. Fails with [`TreeError::DuplicateElement`] and leaves
    /// the tree unchanged if an equal element is already stored.
    fn insert(&mut self, element: T) -> Result<(), TreeError>;

    /// Removes the element equal to `element`. Returns whether anything was
    /// removed; an absent element is a no-op.
    fn remove(&mut self, element: &T) -> bool;

    fn contains(&self, element: &T) -> bool;

    /// Edges on the longest root-to-leaf path: `-1` when empty, `0` for a
    /// single node.
    fn height(&self) -> isize;

    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn clear(&mut self);
}
