use std::cmp::Ordering;

use tracing::debug;

use crate::error::TreeError;
use crate::node::{Arena, NodeId, Side};
use crate::queue::Queue;
use crate::search_tree::SearchTree;
use crate::stack::Stack;
use crate::traversal::{InOrder, Iter, IterMut, LevelOrder, Order, PostOrder, PreOrder};

/// One step of a descent: the node visited and the side the walk left it by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Step {
    pub(crate) node: NodeId,
    pub(crate) side: Side,
}

/// Unbalanced binary search tree. Also the storage and node-surgery layer
/// the AVL tree is built on.
#[derive(Debug, Clone)]
pub struct BinarySearchTree<T> {
    pub(crate) nodes: Arena<T>,
    pub(crate) root: Option<NodeId>,
    pub(crate) size: usize,
}

impl<T> BinarySearchTree<T> {
    pub fn new() -> Self {
        BinarySearchTree {
            nodes: Arena::new(),
            root: None,
            size: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.size = 0;
    }

    pub fn root(&self) -> Option<&T> {
        self.root.map(|id| self.nodes[id].element())
    }

    pub fn min(&self) -> Option<&T> {
        self.extreme(Side::Left)
    }

    pub fn max(&self) -> Option<&T> {
        self.extreme(Side::Right)
    }

    /// Counts levels breadth first; `-1` for an empty tree.
    pub fn height(&self) -> isize {
        let mut frontier = Queue::new();
        frontier.extend(self.root);
        let mut height = -1;
        while !frontier.is_empty() {
            height += 1;
            for _ in 0..frontier.size() {
                if let Some(id) = frontier.dequeue() {
                    frontier.extend(self.nodes[id].left());
                    frontier.extend(self.nodes[id].right());
                }
            }
        }
        height
    }

    /// Walks the tree in order `O`. The visitation sequence is computed here,
    /// in one pass, before the first element is yielded.
    pub fn iter<O: Order>(&self) -> Iter<'_, T, O> {
        Iter::new(&self.nodes, self.root)
    }

    pub fn iter_mut<O: Order>(&mut self) -> IterMut<'_, T, O> {
        IterMut::new(&mut self.nodes, self.root)
    }

    pub fn pre_order(&self) -> Vec<&T> {
        self.iter::<PreOrder>().collect()
    }

    pub fn in_order(&self) -> Vec<&T> {
        self.iter::<InOrder>().collect()
    }

    pub fn post_order(&self) -> Vec<&T> {
        self.iter::<PostOrder>().collect()
    }

    pub fn level_order(&self) -> Vec<&T> {
        self.iter::<LevelOrder>().collect()
    }

    fn extreme(&self, side: Side) -> Option<&T> {
        let mut current = self.root?;
        while let Some(next) = self.nodes[current].child(side) {
            current = next;
        }
        Some(self.nodes[current].element())
    }

    /// Points the slot described by `parent` (or the root slot) at `child`.
    pub(crate) fn set_link(&mut self, parent: Option<Step>, child: Option<NodeId>) {
        match parent {
            Some(step) => *self.nodes[step.node].child_mut(step.side) = child,
            None => self.root = child,
        }
    }

    /// Allocates a node for `element` and hangs it from `parent`.
    pub(crate) fn attach(&mut self, parent: Option<Step>, element: T) -> NodeId {
        let id = self.nodes.insert(element);
        self.set_link(parent, Some(id));
        self.size += 1;
        id
    }

    /// Rightmost node of `id`'s left subtree. Every node passed on the way
    /// down, except the predecessor itself, is pushed onto `path` with
    /// `Side::Right`.
    pub(crate) fn predecessor(&self, id: NodeId, path: &mut Stack<Step>) -> Option<NodeId> {
        let mut current = self.nodes[id].left()?;
        while let Some(next) = self.nodes[current].right() {
            path.push(Step {
                node: current,
                side: Side::Right,
            });
            current = next;
        }
        Some(current)
    }

    /// Unlinks `target` (hanging from `parent`) and frees it.
    ///
    /// A leaf is replaced by nothing, a single-child node by its child. A
    /// node with two children is replaced by its in-order predecessor, which
    /// takes over the target's children and balance. In that case the
    /// predecessor is pushed onto `path` with `Side::Left`, followed by the
    /// nodes between the target's left child and the predecessor's old parent,
    /// so `path` ends up naming every node whose subtree lost a level.
    pub(crate) fn splice_out(
        &mut self,
        parent: Option<Step>,
        target: NodeId,
        path: &mut Stack<Step>,
    ) -> Option<T> {
        let (left, right) = (self.nodes[target].left(), self.nodes[target].right());
        let replacement = match (left, right) {
            (None, None) => None,
            (Some(child), None) | (None, Some(child)) => Some(child),
            (Some(left), Some(right)) => {
                let mut inner = Stack::new();
                let pred = self.predecessor(target, &mut inner)?;
                if let Some(pred_parent) = inner.top().map(|step| step.node) {
                    let orphan = self.nodes[pred].left();
                    self.nodes[pred_parent].right = orphan;
                    self.nodes[pred].left = Some(left);
                }
                let balance = self.nodes[target].balance();
                let node = &mut self.nodes[pred];
                node.right = Some(right);
                node.balance = balance;
                path.push(Step {
                    node: pred,
                    side: Side::Left,
                });
                path.append(&mut inner);
                Some(pred)
            }
        };
        self.set_link(parent, replacement);
        self.size -= 1;
        self.nodes.remove(target)
    }
}

impl<T: Ord> BinarySearchTree<T> {
    /// Walks from the root towards `element`, pushing every visited node that
    /// does not hold it. Returns the matching node, or `None` when the walk
    /// fell off the tree; `path`'s top is then where `element` would attach.
    pub(crate) fn descend(&self, element: &T, path: &mut Stack<Step>) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(id) = current {
            let side = match element.cmp(self.nodes[id].element()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return Some(id),
            };
            path.push(Step { node: id, side });
            current = self.nodes[id].child(side);
        }
        None
    }

    pub(crate) fn find(&self, element: &T) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(id) = current {
            current = match element.cmp(self.nodes[id].element()) {
                Ordering::Less => self.nodes[id].left(),
                Ordering::Greater => self.nodes[id].right(),
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// The slot `id` hangs from, found by searching for its element.
    /// `None` means `id` is the root (or not in this tree).
    pub(crate) fn parent_of(&self, id: NodeId) -> Option<Step> {
        let mut path = Stack::new();
        match self.descend(self.nodes[id].element(), &mut path) {
            Some(found) if found == id => path.pop(),
            _ => None,
        }
    }

    pub fn insert(&mut self, element: T) -> Result<(), TreeError> {
        let mut path = Stack::new();
        if self.descend(&element, &mut path).is_some() {
            debug!("rejected duplicate element");
            return Err(TreeError::DuplicateElement);
        }
        self.attach(path.pop(), element);
        #[cfg(feature = "check-invariants")]
        debug_assert!(self.is_ordered(), "ordering broken after insert");
        Ok(())
    }

    pub fn remove(&mut self, element: &T) -> bool {
        self.take(element).is_some()
    }

    /// Removes and returns the stored element equal to `element`.
    pub fn take(&mut self, element: &T) -> Option<T> {
        let Some(target) = self.find(element) else {
            debug!("remove of absent element is a no-op");
            return None;
        };
        let parent = self.parent_of(target);
        let removed = self.splice_out(parent, target, &mut Stack::new());
        #[cfg(feature = "check-invariants")]
        debug_assert!(self.is_ordered(), "ordering broken after remove");
        removed
    }

    pub fn contains(&self, element: &T) -> bool {
        self.find(element).is_some()
    }

    /// Checks the ordering invariant and that `size()` matches the number of
    /// reachable nodes.
    pub fn is_ordered(&self) -> bool {
        let values = self.in_order();
        values.len() == self.size
            && self.nodes.len() == self.size
            && values.windows(2).all(|w| w[0] < w[1])
    }

    /// Builds a tree from `iter`, failing on the first duplicate.
    pub fn try_from_iter<I: IntoIterator<Item = T>>(iter: I) -> Result<Self, TreeError> {
        let mut tree = BinarySearchTree::new();
        for element in iter {
            tree.insert(element)?;
        }
        Ok(tree)
    }
}

impl<T: Ord> SearchTree<T> for BinarySearchTree<T> {
    fn insert(&mut self, element: T) -> Result<(), TreeError> {
        BinarySearchTree::insert(self, element)
    }

    fn remove(&mut self, element: &T) -> bool {
        BinarySearchTree::remove(self, element)
    }

    fn contains(&self, element: &T) -> bool {
        BinarySearchTree::contains(self, element)
    }

    fn height(&self) -> isize {
        BinarySearchTree::height(self)
    }

    fn size(&self) -> usize {
        self.size
    }

    fn clear(&mut self) {
        BinarySearchTree::clear(self)
    }
}

impl<T> Default for BinarySearchTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Same size and same pre-order sequence.
impl<T: PartialEq> PartialEq for BinarySearchTree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.iter::<PreOrder>().eq(other.iter::<PreOrder>())
    }
}

impl<T: Eq> Eq for BinarySearchTree<T> {}

/// Duplicates are skipped.
impl<T: Ord> Extend<T> for BinarySearchTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            let _ = self.insert(element);
        }
    }
}

/// Duplicates are skipped; use [`BinarySearchTree::try_from_iter`] to reject them.
impl<T: Ord> FromIterator<T> for BinarySearchTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = BinarySearchTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T: Ord> TryFrom<Vec<T>> for BinarySearchTree<T> {
    type Error = TreeError;

    fn try_from(elements: Vec<T>) -> Result<Self, TreeError> {
        Self::try_from_iter(elements)
    }
}

impl<T: Ord + Clone> TryFrom<&[T]> for BinarySearchTree<T> {
    type Error = TreeError;

    fn try_from(elements: &[T]) -> Result<Self, TreeError> {
        Self::try_from_iter(elements.iter().cloned())
    }
}

impl<'a, T> IntoIterator for &'a BinarySearchTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, InOrder>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter::<InOrder>()
    }
}

impl<T> IntoIterator for BinarySearchTree<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        let mut order = InOrder::schedule(&self.nodes, self.root);
        let mut values = Vec::with_capacity(self.size);
        while let Some(id) = order.dequeue() {
            values.extend(self.nodes.remove(id));
        }
        values.into_iter()
    }
}
