use tracing::{debug, error, trace};

use crate::binary_search_tree::{BinarySearchTree, Step};
use crate::error::TreeError;
use crate::node::NodeId;
use crate::search_tree::SearchTree;
use crate::stack::Stack;
use crate::traversal::{InOrder, Iter, IterMut, Order};

/// Shape of an imbalance, named by the path from the pivot to the taller
/// grandchild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rotation {
    LeftLeft,
    LeftRight,
    RightLeft,
    RightRight,
}

#[cfg(test)]
thread_local! {
    static ROTATIONS: std::cell::RefCell<Vec<Rotation>> = std::cell::RefCell::new(Vec::new());
}

/// Self-balancing binary search tree.
///
/// Every node stores `height(right) - height(left)` and the tree keeps it in
/// `-1..=1` after each completed insert or remove. Rebalancing walks the
/// descent path bottom-up and repairs balance factors locally after each
/// rotation rather than recomputing heights.
#[derive(Debug, Clone)]
pub struct AvlTree<T> {
    tree: BinarySearchTree<T>,
}

impl<T> AvlTree<T> {
    pub fn new() -> Self {
        AvlTree {
            tree: BinarySearchTree::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub fn root(&self) -> Option<&T> {
        self.tree.root()
    }

    pub fn min(&self) -> Option<&T> {
        self.tree.min()
    }

    pub fn max(&self) -> Option<&T> {
        self.tree.max()
    }

    /// Follows the taller child from the root, so this is `O(log n)`.
    pub fn height(&self) -> isize {
        let nodes = &self.tree.nodes;
        let mut height = -1;
        let mut current = self.tree.root;
        while let Some(id) = current {
            height += 1;
            current = if nodes[id].balance() > 0 {
                nodes[id].right()
            } else {
                nodes[id].left()
            };
        }
        height
    }

    pub fn iter<O: Order>(&self) -> Iter<'_, T, O> {
        self.tree.iter()
    }

    pub fn iter_mut<O: Order>(&mut self) -> IterMut<'_, T, O> {
        self.tree.iter_mut()
    }

    pub fn pre_order(&self) -> Vec<&T> {
        self.tree.pre_order()
    }

    pub fn in_order(&self) -> Vec<&T> {
        self.tree.in_order()
    }

    pub fn post_order(&self) -> Vec<&T> {
        self.tree.post_order()
    }

    pub fn level_order(&self) -> Vec<&T> {
        self.tree.level_order()
    }

    fn rotate(&mut self, pivot: NodeId, case: Rotation) -> Result<NodeId, TreeError> {
        let top = match case {
            Rotation::LeftLeft => self.rotate_right(pivot)?,
            Rotation::RightRight => self.rotate_left(pivot)?,
            Rotation::LeftRight => self.rotate_left_right(pivot)?,
            Rotation::RightLeft => self.rotate_right_left(pivot)?,
        };
        trace!(?case, pivot = pivot.index(), top = top.index(), "rotated");
        #[cfg(test)]
        ROTATIONS.with(|log| log.borrow_mut().push(case));
        Ok(top)
    }

    /// Lifts the left child over `pivot`. Returns the new subtree root.
    fn rotate_right(&mut self, pivot: NodeId) -> Result<NodeId, TreeError> {
        let nodes = &mut self.tree.nodes;
        let child = nodes[pivot].left().ok_or(TreeError::EmptySubtree)?;
        nodes[pivot].left = nodes[child].right();
        nodes[child].right = Some(pivot);

        let (p, c) = (nodes[pivot].balance, nodes[child].balance);
        let pivot_balance = p + 1 - c.min(0);
        nodes[pivot].balance = pivot_balance;
        nodes[child].balance = c + 1 + pivot_balance.max(0);
        Ok(child)
    }

    /// Lifts the right child over `pivot`. Returns the new subtree root.
    fn rotate_left(&mut self, pivot: NodeId) -> Result<NodeId, TreeError> {
        let nodes = &mut self.tree.nodes;
        let child = nodes[pivot].right().ok_or(TreeError::EmptySubtree)?;
        nodes[pivot].right = nodes[child].left();
        nodes[child].left = Some(pivot);

        let (p, c) = (nodes[pivot].balance, nodes[child].balance);
        let pivot_balance = p - 1 - c.max(0);
        nodes[pivot].balance = pivot_balance;
        nodes[child].balance = c - 1 + pivot_balance.min(0);
        Ok(child)
    }

    fn rotate_left_right(&mut self, pivot: NodeId) -> Result<NodeId, TreeError> {
        let child = self.tree.nodes[pivot].left().ok_or(TreeError::EmptySubtree)?;
        let grandchild = self.tree.nodes[child].right().ok_or(TreeError::EmptySubtree)?;
        let g = self.tree.nodes[grandchild].balance;

        let lifted = self.rotate_left(child)?;
        self.tree.nodes[pivot].left = Some(lifted);
        let top = self.rotate_right(pivot)?;

        let nodes = &mut self.tree.nodes;
        nodes[pivot].balance = if g < 0 { 1 } else { 0 };
        nodes[child].balance = if g > 0 { -1 } else { 0 };
        nodes[grandchild].balance = 0;
        Ok(top)
    }

    fn rotate_right_left(&mut self, pivot: NodeId) -> Result<NodeId, TreeError> {
        let child = self.tree.nodes[pivot].right().ok_or(TreeError::EmptySubtree)?;
        let grandchild = self.tree.nodes[child].left().ok_or(TreeError::EmptySubtree)?;
        let g = self.tree.nodes[grandchild].balance;

        let lifted = self.rotate_right(child)?;
        self.tree.nodes[pivot].right = Some(lifted);
        let top = self.rotate_left(pivot)?;

        let nodes = &mut self.tree.nodes;
        nodes[pivot].balance = if g > 0 { -1 } else { 0 };
        nodes[child].balance = if g < 0 { 1 } else { 0 };
        nodes[grandchild].balance = 0;
        Ok(top)
    }

    /// After a removal: the heavier child's own balance decides between a
    /// single and a double rotation. A level child takes the single rotation.
    fn classify_remove(&self, pivot: NodeId, balance: i8) -> Result<Rotation, TreeError> {
        let nodes = &self.tree.nodes;
        if balance > 0 {
            let child = nodes[pivot].right().ok_or_else(|| unreachable_case(pivot))?;
            Ok(if nodes[child].balance() >= 0 {
                Rotation::RightRight
            } else {
                Rotation::RightLeft
            })
        } else {
            let child = nodes[pivot].left().ok_or_else(|| unreachable_case(pivot))?;
            Ok(if nodes[child].balance() <= 0 {
                Rotation::LeftLeft
            } else {
                Rotation::LeftRight
            })
        }
    }

    /// Pops the removal path. Each step names the side of its node that
    /// lost a level. Unlike insertion, a rotation here can shorten the
    /// subtree, so the walk may rotate at several ancestors.
    fn rebalance_after_remove(&mut self, mut path: Stack<Step>) -> Result<(), TreeError> {
        while let Some(step) = path.pop() {
            let balance = self.tree.nodes[step.node].balance - step.side.weight();
            self.tree.nodes[step.node].balance = balance;
            match balance {
                0 => continue,
                -1 | 1 => {
                    trace!(node = step.node.index(), "subtree height unchanged, stop");
                    return Ok(());
                }
                _ => {
                    let case = self.classify_remove(step.node, balance)?;
                    let top = self.rotate(step.node, case)?;
                    self.tree.set_link(path.top().copied(), Some(top));
                    if self.tree.nodes[top].balance() != 0 {
                        return Ok(());
                    }
                }
            }
        }
        Ok(())
    }

    /// Recomputes the height of `id`'s subtree, or `None` if any stored
    /// balance disagrees with the real heights or leaves `-1..=1`.
    fn checked_height(&self, id: Option<NodeId>) -> Option<isize> {
        let Some(id) = id else {
            return Some(-1);
        };
        let node = &self.tree.nodes[id];
        let left = self.checked_height(node.left())?;
        let right = self.checked_height(node.right())?;
        let balance = right - left;
        if balance.abs() > 1 || balance != node.balance() as isize {
            return None;
        }
        Some(1 + left.max(right))
    }
}

impl<T: Ord> AvlTree<T> {
    /// Adds `element` and restores balance with at most one rotation.
    pub fn insert(&mut self, element: T) -> Result<(), TreeError> {
        let mut path = Stack::new();
        if self.tree.descend(&element, &mut path).is_some() {
            debug!("rejected duplicate element");
            return Err(TreeError::DuplicateElement);
        }
        let inserted = self.tree.attach(path.top().copied(), element);
        if let Err(err) = self.rebalance_after_insert(inserted, path) {
            invariant_violation(err);
        }
        #[cfg(feature = "check-invariants")]
        debug_assert!(self.is_balanced(), "AVL invariant broken after insert");
        Ok(())
    }

    pub fn remove(&mut self, element: &T) -> bool {
        self.take(element).is_some()
    }

    /// Removes and returns the stored element equal to `element`.
    pub fn take(&mut self, element: &T) -> Option<T> {
        let mut path = Stack::new();
        let Some(target) = self.tree.descend(element, &mut path) else {
            debug!("remove of absent element is a no-op");
            return None;
        };
        let parent = path.top().copied();
        let removed = self.tree.splice_out(parent, target, &mut path);
        if let Err(err) = self.rebalance_after_remove(path) {
            invariant_violation(err);
        }
        #[cfg(feature = "check-invariants")]
        debug_assert!(self.is_balanced(), "AVL invariant broken after remove");
        removed
    }

    pub fn contains(&self, element: &T) -> bool {
        self.tree.contains(element)
    }

    /// Stored balance factor of the node holding `element`.
    pub fn balance_of(&self, element: &T) -> Option<i8> {
        self.tree
            .find(element)
            .map(|id| self.tree.nodes[id].balance())
    }

    /// Full structural check: ordering, size, stored balance factors equal
    /// to the real height differences, and every one within `-1..=1`.
    pub fn is_balanced(&self) -> bool {
        self.tree.is_ordered() && self.checked_height(self.tree.root).is_some()
    }

    pub fn try_from_iter<I: IntoIterator<Item = T>>(iter: I) -> Result<Self, TreeError> {
        let mut tree = AvlTree::new();
        for element in iter {
            tree.insert(element)?;
        }
        Ok(tree)
    }

    /// Picks the rotation for the first node on the insertion path that went
    /// out of balance, by where the new key sits relative to the pivot and
    /// the pivot's child on that side.
    fn classify_insert(&self, pivot: NodeId, inserted: NodeId) -> Result<Rotation, TreeError> {
        let nodes = &self.tree.nodes;
        let key = nodes[inserted].element();
        let pivot_key = nodes[pivot].element();
        let case = if key < pivot_key {
            nodes[pivot].left().and_then(|child| {
                let child_key = nodes[child].element();
                if key < child_key {
                    Some(Rotation::LeftLeft)
                } else if key > child_key {
                    Some(Rotation::LeftRight)
                } else {
                    None
                }
            })
        } else if key > pivot_key {
            nodes[pivot].right().and_then(|child| {
                let child_key = nodes[child].element();
                if key < child_key {
                    Some(Rotation::RightLeft)
                } else if key > child_key {
                    Some(Rotation::RightRight)
                } else {
                    None
                }
            })
        } else {
            None
        };
        case.ok_or_else(|| unreachable_case(pivot))
    }

    /// Pops the insertion path. A level node tilts towards the new key and
    /// passes the growth up, and a node tilted the other way levels out and
    /// absorbs it. A node already tilted the same way reaches `±2` and is
    /// rotated, which restores the subtree's previous height and ends the
    /// walk.
    fn rebalance_after_insert(
        &mut self,
        inserted: NodeId,
        mut path: Stack<Step>,
    ) -> Result<(), TreeError> {
        while let Some(step) = path.pop() {
            let grown = step.side.weight();
            let balance = self.tree.nodes[step.node].balance;
            if balance == 0 {
                self.tree.nodes[step.node].balance = grown;
                continue;
            }
            if balance != grown {
                self.tree.nodes[step.node].balance = 0;
                trace!(node = step.node.index(), "growth absorbed, stop");
                return Ok(());
            }
            self.tree.nodes[step.node].balance = balance + grown;
            let case = self.classify_insert(step.node, inserted)?;
            let top = self.rotate(step.node, case)?;
            self.tree.set_link(path.top().copied(), Some(top));
            return Ok(());
        }
        Ok(())
    }
}

fn unreachable_case(pivot: NodeId) -> TreeError {
    error!(pivot = pivot.index(), "no rotation case matches imbalance");
    TreeError::UnreachableRotationCase
}

/// Balance bookkeeping is corrupt; carrying on would silently break the
/// tree, so stop here.
fn invariant_violation(err: TreeError) -> ! {
    error!(%err, "AVL invariant violated");
    panic!("AVL invariant violated: {err}");
}

impl<T: Ord> SearchTree<T> for AvlTree<T> {
    fn insert(&mut self, element: T) -> Result<(), TreeError> {
        AvlTree::insert(self, element)
    }

    fn remove(&mut self, element: &T) -> bool {
        AvlTree::remove(self, element)
    }

    fn contains(&self, element: &T) -> bool {
        AvlTree::contains(self, element)
    }

    fn height(&self) -> isize {
        AvlTree::height(self)
    }

    fn size(&self) -> usize {
        self.tree.size()
    }

    fn clear(&mut self) {
        AvlTree::clear(self)
    }
}

impl<T> Default for AvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Same size and same pre-order sequence.
impl<T: PartialEq> PartialEq for AvlTree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T: Eq> Eq for AvlTree<T> {}

/// Duplicates are skipped.
impl<T: Ord> Extend<T> for AvlTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            let _ = self.insert(element);
        }
    }
}

/// Duplicates are skipped; use [`AvlTree::try_from_iter`] to reject them.
impl<T: Ord> FromIterator<T> for AvlTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T: Ord> TryFrom<Vec<T>> for AvlTree<T> {
    type Error = TreeError;

    fn try_from(elements: Vec<T>) -> Result<Self, TreeError> {
        Self::try_from_iter(elements)
    }
}

impl<T: Ord + Clone> TryFrom<&[T]> for AvlTree<T> {
    type Error = TreeError;

    fn try_from(elements: &[T]) -> Result<Self, TreeError> {
        Self::try_from_iter(elements.iter().cloned())
    }
}

impl<'a, T> IntoIterator for &'a AvlTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, InOrder>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter::<InOrder>()
    }
}

impl<T> IntoIterator for AvlTree<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}
