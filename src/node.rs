use std::ops::{Index, IndexMut};

/// Handle to a node slot inside an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which child slot of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Balance delta when the subtree on this side grows by one level.
    pub(crate) fn weight(self) -> i8 {
        match self {
            Side::Left => -1,
            Side::Right => 1,
        }
    }
}

/// A binary node. `balance` is `height(right) - height(left)` and is only
/// maintained by the AVL tree; the unbalanced tree leaves it at zero.
#[derive(Debug, Clone)]
pub struct Node<T> {
    pub(crate) element: T,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) balance: i8,
}

impl<T> Node<T> {
    fn new(element: T) -> Self {
        Node {
            element,
            left: None,
            right: None,
            balance: 0,
        }
    }

    pub fn element(&self) -> &T {
        &self.element
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    pub fn balance(&self) -> i8 {
        self.balance
    }

    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Number of present children: 0, 1 or 2.
    pub fn degree(&self) -> usize {
        self.left.is_some() as usize + self.right.is_some() as usize
    }

    pub fn is_leaf(&self) -> bool {
        self.degree() == 0
    }
}

/// Slab of nodes addressed by [`NodeId`]. Freed slots are recycled.
///
/// The arena owns every node; trees hold ids only, so a node can never be
/// reachable from two owners and dropping the arena frees everything once.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, element: T) -> NodeId {
        let node = Node::new(element);
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Frees the slot and hands back its element. The caller must already
    /// have unlinked the node from its parent.
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<T> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        Some(node.element)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    /// Mutable element references indexed by slot, for handing out
    /// disjoint `&mut T` in an arbitrary visitation order.
    pub(crate) fn elements_mut(&mut self) -> Vec<Option<&mut T>> {
        self.slots
            .iter_mut()
            .map(|slot| slot.as_mut().map(|node| &mut node.element))
            .collect()
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = Node<T>;

    fn index(&self, id: NodeId) -> &Node<T> {
        match self.get(id) {
            Some(node) => node,
            None => panic!("dangling node id {}", id.0),
        }
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("dangling node id {}", id.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_leaf() {
        let mut arena = Arena::new();
        let id = arena.insert(7);
        assert!(arena[id].is_leaf());
        assert_eq!(arena[id].degree(), 0);
        assert_eq!(arena[id].balance(), 0);
        assert_eq!(*arena[id].element(), 7);
    }

    #[test]
    fn degree_counts_children() {
        let mut arena = Arena::new();
        let parent = arena.insert(5);
        let left = arena.insert(3);
        let right = arena.insert(8);
        arena[parent].left = Some(left);
        assert_eq!(arena[parent].degree(), 1);
        arena[parent].right = Some(right);
        assert_eq!(arena[parent].degree(), 2);
        assert!(!arena[parent].is_leaf());
    }

    #[test]
    fn child_by_side() {
        let mut arena = Arena::new();
        let parent = arena.insert(5);
        let right = arena.insert(8);
        *arena[parent].child_mut(Side::Right) = Some(right);
        assert_eq!(arena[parent].child(Side::Right), Some(right));
        assert_eq!(arena[parent].child(Side::Left), None);
    }

    #[test]
    fn removed_slot_is_recycled() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        let _b = arena.insert(2);
        assert_eq!(arena.remove(a), Some(1));
        assert_eq!(arena.len(), 1);
        assert!(arena.get(a).is_none());
        let c = arena.insert(3);
        assert_eq!(c, a);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn remove_twice_returns_none() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        assert_eq!(arena.remove(a), Some(1));
        assert_eq!(arena.remove(a), None);
        assert!(arena.is_empty());
    }

    #[test]
    fn clone_is_disjoint() {
        let mut arena = Arena::new();
        let a = arena.insert(String::from("x"));
        let mut copy = arena.clone();
        copy[a].element.push('y');
        assert_eq!(arena[a].element(), "x");
        assert_eq!(copy[a].element(), "xy");
    }

    #[test]
    fn elements_mut_skips_vacant_slots() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        let _b = arena.insert(2);
        arena.remove(a);
        let refs = arena.elements_mut();
        assert!(refs[0].is_none());
        assert_eq!(refs[1].as_deref(), Some(&2));
    }

    #[test]
    fn side_opposite_and_weight() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite(), Side::Left);
        assert_eq!(Side::Left.weight(), -1);
        assert_eq!(Side::Right.weight(), 1);
    }
}
