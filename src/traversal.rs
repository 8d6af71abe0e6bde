//! Traversal orders over an arena-backed binary tree.
//!
//! Every order schedules the complete visitation sequence into a [`Queue`]
//! when the iterator is created; advancing only dequeues. The iterator holds
//! a shared borrow of the tree, so the tree cannot change underneath it.

use std::fmt;
use std::marker::PhantomData;
use std::ptr;

use crate::node::{Arena, NodeId};
use crate::queue::Queue;
use crate::stack::Stack;

/// A visitation order. Implemented by the zero-sized tags [`PreOrder`],
/// [`InOrder`], [`PostOrder`] and [`LevelOrder`].
pub trait Order {
    fn schedule<T>(nodes: &Arena<T>, root: Option<NodeId>) -> Queue<NodeId>;
}

/// Node, left subtree, right subtree.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreOrder;

/// Left subtree, node, right subtree. Ascending for search trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct InOrder;

/// Left subtree, right subtree, node.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostOrder;

/// Breadth first, left to right within a level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelOrder;

impl Order for PreOrder {
    fn schedule<T>(nodes: &Arena<T>, root: Option<NodeId>) -> Queue<NodeId> {
        let mut out = Queue::with_capacity(nodes.len());
        let mut pending = Stack::new();
        pending.extend(root);
        while let Some(id) = pending.pop() {
            out.enqueue(id);
            // right first so the left child pops first
            pending.extend(nodes[id].right());
            pending.extend(nodes[id].left());
        }
        out
    }
}

impl Order for InOrder {
    fn schedule<T>(nodes: &Arena<T>, root: Option<NodeId>) -> Queue<NodeId> {
        let mut out = Queue::with_capacity(nodes.len());
        let mut pending = Stack::new();
        let mut cursor = root;
        loop {
            while let Some(id) = cursor {
                pending.push(id);
                cursor = nodes[id].left();
            }
            match pending.pop() {
                Some(id) => {
                    out.enqueue(id);
                    cursor = nodes[id].right();
                }
                None => break,
            }
        }
        out
    }
}

impl Order for PostOrder {
    fn schedule<T>(nodes: &Arena<T>, root: Option<NodeId>) -> Queue<NodeId> {
        // Node-right-left order collected on a stack pops as left-right-node.
        let mut pending = Stack::new();
        let mut finished = Stack::with_capacity(nodes.len());
        pending.extend(root);
        while let Some(id) = pending.pop() {
            finished.push(id);
            pending.extend(nodes[id].left());
            pending.extend(nodes[id].right());
        }
        let mut out = Queue::with_capacity(finished.size());
        while let Some(id) = finished.pop() {
            out.enqueue(id);
        }
        out
    }
}

impl Order for LevelOrder {
    fn schedule<T>(nodes: &Arena<T>, root: Option<NodeId>) -> Queue<NodeId> {
        let mut out = Queue::with_capacity(nodes.len());
        let mut frontier = Queue::new();
        frontier.extend(root);
        while let Some(id) = frontier.dequeue() {
            out.enqueue(id);
            frontier.extend(nodes[id].left());
            frontier.extend(nodes[id].right());
        }
        out
    }
}

/// Read-only traversal iterator.
pub struct Iter<'a, T, O> {
    nodes: &'a Arena<T>,
    queue: Queue<NodeId>,
    _order: PhantomData<fn() -> O>,
}

impl<'a, T, O: Order> Iter<'a, T, O> {
    pub(crate) fn new(nodes: &'a Arena<T>, root: Option<NodeId>) -> Self {
        Iter {
            nodes,
            queue: O::schedule(nodes, root),
            _order: PhantomData,
        }
    }
}

impl<'a, T, O> Iter<'a, T, O> {
    /// The element the next call to `next` would yield, or `None` at the end.
    pub fn current(&self) -> Option<&'a T> {
        let nodes = self.nodes;
        self.queue.front().map(|&id| nodes[id].element())
    }

    pub fn is_end(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<'a, T, O> Iterator for Iter<'a, T, O> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let id = self.queue.dequeue()?;
        Some(self.nodes[id].element())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.size(), Some(self.queue.size()))
    }
}

impl<T, O> ExactSizeIterator for Iter<'_, T, O> {}

impl<T, O> Clone for Iter<'_, T, O> {
    fn clone(&self) -> Self {
        Iter {
            nodes: self.nodes,
            queue: self.queue.clone(),
            _order: PhantomData,
        }
    }
}

/// Exhausted iterators are all equal; otherwise two iterators are equal
/// when they walk the same tree with the same remaining schedule.
impl<T, O> PartialEq for Iter<'_, T, O> {
    fn eq(&self, other: &Self) -> bool {
        if self.queue.is_empty() && other.queue.is_empty() {
            return true;
        }
        ptr::eq(self.nodes, other.nodes) && self.queue == other.queue
    }
}

impl<T, O> fmt::Debug for Iter<'_, T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("remaining", &self.queue.size()).finish()
    }
}

/// Mutable traversal iterator.
///
/// Callers may edit payload carried alongside the key but must not change
/// how an element compares to the others.
pub struct IterMut<'a, T, O> {
    elements: Vec<Option<&'a mut T>>,
    queue: Queue<NodeId>,
    _order: PhantomData<fn() -> O>,
}

impl<'a, T, O: Order> IterMut<'a, T, O> {
    pub(crate) fn new(nodes: &'a mut Arena<T>, root: Option<NodeId>) -> Self {
        let queue = O::schedule(nodes, root);
        IterMut {
            elements: nodes.elements_mut(),
            queue,
            _order: PhantomData,
        }
    }
}

impl<'a, T, O> Iterator for IterMut<'a, T, O> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        let id = self.queue.dequeue()?;
        self.elements.get_mut(id.index()).and_then(Option::take)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.size(), Some(self.queue.size()))
    }
}

impl<T, O> fmt::Debug for IterMut<'_, T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.queue.size()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    //        5
    //      /   \
    //     3     8
    //    / \   / \
    //   1   4 7   9
    fn sample() -> (Arena<i32>, NodeId) {
        let mut nodes = Arena::new();
        let ids: Vec<NodeId> = [5, 3, 8, 1, 4, 7, 9]
            .into_iter()
            .map(|v| nodes.insert(v))
            .collect();
        nodes[ids[0]].left = Some(ids[1]);
        nodes[ids[0]].right = Some(ids[2]);
        nodes[ids[1]].left = Some(ids[3]);
        nodes[ids[1]].right = Some(ids[4]);
        nodes[ids[2]].left = Some(ids[5]);
        nodes[ids[2]].right = Some(ids[6]);
        (nodes, ids[0])
    }

    fn walk<O: Order>(nodes: &Arena<i32>, root: Option<NodeId>) -> Vec<i32> {
        Iter::<i32, O>::new(nodes, root).copied().collect()
    }

    #[test]
    fn pre_order_visits_root_first() {
        let (nodes, root) = sample();
        assert_eq!(walk::<PreOrder>(&nodes, Some(root)), vec![5, 3, 1, 4, 8, 7, 9]);
    }

    #[test]
    fn in_order_is_sorted() {
        let (nodes, root) = sample();
        assert_eq!(walk::<InOrder>(&nodes, Some(root)), vec![1, 3, 4, 5, 7, 8, 9]);
    }

    #[test]
    fn post_order_visits_root_last() {
        let (nodes, root) = sample();
        assert_eq!(walk::<PostOrder>(&nodes, Some(root)), vec![1, 4, 3, 7, 9, 8, 5]);
    }

    #[test]
    fn level_order_is_breadth_first() {
        let (nodes, root) = sample();
        assert_eq!(walk::<LevelOrder>(&nodes, Some(root)), vec![5, 3, 8, 1, 4, 7, 9]);
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let nodes: Arena<i32> = Arena::new();
        assert!(walk::<PreOrder>(&nodes, None).is_empty());
        assert!(walk::<InOrder>(&nodes, None).is_empty());
        assert!(walk::<PostOrder>(&nodes, None).is_empty());
        assert!(walk::<LevelOrder>(&nodes, None).is_empty());
    }

    #[test]
    fn lopsided_chain() {
        let mut nodes = Arena::new();
        let a = nodes.insert(1);
        let b = nodes.insert(2);
        let c = nodes.insert(3);
        nodes[a].right = Some(b);
        nodes[b].right = Some(c);
        assert_eq!(walk::<PreOrder>(&nodes, Some(a)), vec![1, 2, 3]);
        assert_eq!(walk::<InOrder>(&nodes, Some(a)), vec![1, 2, 3]);
        assert_eq!(walk::<PostOrder>(&nodes, Some(a)), vec![3, 2, 1]);
        assert_eq!(walk::<LevelOrder>(&nodes, Some(a)), vec![1, 2, 3]);
    }

    #[test]
    fn current_peeks_without_advancing() {
        let (nodes, root) = sample();
        let mut it = Iter::<i32, InOrder>::new(&nodes, Some(root));
        assert_eq!(it.current(), Some(&1));
        assert_eq!(it.current(), Some(&1));
        it.next();
        assert_eq!(it.current(), Some(&3));
        assert_eq!(it.len(), 6);
    }

    #[test]
    fn exhausted_iterators_are_equal() {
        let (nodes, root) = sample();
        let other: Arena<i32> = Arena::new();
        let mut it = Iter::<i32, PreOrder>::new(&nodes, Some(root));
        it.by_ref().for_each(drop);
        assert!(it.is_end());
        assert_eq!(it, Iter::<i32, PreOrder>::new(&other, None));
    }

    #[test]
    fn iterators_equal_when_remaining_schedule_matches() {
        let (nodes, root) = sample();
        let mut a = Iter::<i32, LevelOrder>::new(&nodes, Some(root));
        let b = a.clone();
        assert_eq!(a, b);
        a.next();
        assert_ne!(a, b);
        let mut c = b.clone();
        c.next();
        assert_eq!(a, c);
    }

    #[test]
    fn iterators_over_different_trees_differ() {
        let (first, first_root) = sample();
        let (second, second_root) = sample();
        let a = Iter::<i32, PreOrder>::new(&first, Some(first_root));
        let b = Iter::<i32, PreOrder>::new(&second, Some(second_root));
        assert_ne!(a, b);
    }

    #[test]
    fn iter_mut_follows_schedule() {
        let (mut nodes, root) = sample();
        let mut seen = Vec::new();
        for value in IterMut::<i32, PostOrder>::new(&mut nodes, Some(root)) {
            seen.push(*value);
            *value *= 10;
        }
        assert_eq!(seen, vec![1, 4, 3, 7, 9, 8, 5]);
        assert_eq!(walk::<InOrder>(&nodes, Some(root)), vec![10, 30, 40, 50, 70, 80, 90]);
    }
}
