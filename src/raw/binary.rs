use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;

use super::arena::Arena;
use super::handle::Handle;

/// A node of the binary search trees.
///
/// Children are owned through the arena; `parent` is the one non-owning
/// back-reference, used only for upward walks and kept consistent by every
/// mutation before it returns.
#[derive(Clone)]
pub(crate) struct BinaryNode<K> {
    pub(crate) parent: Option<Handle>,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    pub(crate) key: K,
    /// Handle into the value arena.
    pub(crate) value: Handle,
}

/// The outcome of a successful removal.
pub(crate) struct Removal<V> {
    pub(crate) value: V,
    /// The node now occupying the removed position, if any.
    pub(crate) replacement: Option<Handle>,
    /// The deepest node whose subtree shape changed; AVL rebalancing walks
    /// upward from here.
    pub(crate) rebalance_from: Option<Handle>,
}

/// The binary-search-tree core shared by `BstMap` and `AvlMap`.
///
/// Insert, search, removal and the in-order walks are common to both maps;
/// `rebalance_from` is the AVL layer on top and is simply never called by
/// the plain map.
#[derive(Clone)]
pub(crate) struct RawBinaryTree<K, V> {
    nodes: Arena<BinaryNode<K>>,
    /// Values are stored apart from the nodes so that relocating an entry
    /// moves a handle, never a `V`.
    values: Arena<V>,
    root: Option<Handle>,
    len: usize,
}

impl<K, V> RawBinaryTree<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            values: Arena::new(),
            root: None,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            values: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.values.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.values.clear();
        self.root = None;
        self.len = 0;
    }

    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) fn key(&self, handle: Handle) -> &K {
        &self.nodes.get(handle).key
    }

    pub(crate) fn value(&self, handle: Handle) -> &V {
        self.values.get(self.nodes.get(handle).value)
    }

    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        let value = self.nodes.get(handle).value;
        self.values.get_mut(value)
    }

    pub(crate) fn key_value(&self, handle: Handle) -> (&K, &V) {
        let node = self.nodes.get(handle);
        (&node.key, self.values.get(node.value))
    }

    pub(crate) fn parent(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle).parent
    }

    pub(crate) fn left(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle).left
    }

    pub(crate) fn right(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle).right
    }

    /// Leftmost node of the subtree rooted at `handle`.
    pub(crate) fn leftmost(&self, handle: Handle) -> Handle {
        let mut current = handle;
        while let Some(left) = self.nodes.get(current).left {
            current = left;
        }
        current
    }

    /// Rightmost node of the subtree rooted at `handle`.
    pub(crate) fn rightmost(&self, handle: Handle) -> Handle {
        let mut current = handle;
        while let Some(right) = self.nodes.get(current).right {
            current = right;
        }
        current
    }

    /// In-order neighbor above `handle`: the leftmost node of the right
    /// subtree, or the first ancestor reached from a left child.
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        if let Some(right) = self.nodes.get(handle).right {
            return Some(self.leftmost(right));
        }
        let mut current = handle;
        loop {
            let parent = self.nodes.get(current).parent?;
            if self.nodes.get(parent).left == Some(current) {
                return Some(parent);
            }
            current = parent;
        }
    }

    /// In-order neighbor below `handle`; mirror image of [`Self::successor`].
    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        if let Some(left) = self.nodes.get(handle).left {
            return Some(self.rightmost(left));
        }
        let mut current = handle;
        loop {
            let parent = self.nodes.get(current).parent?;
            if self.nodes.get(parent).right == Some(current) {
                return Some(parent);
            }
            current = parent;
        }
    }

    /// Height of the subtree rooted at `handle`: a leaf counts 1, a missing
    /// child contributes 0. Always derived from the current children by a
    /// level walk, never cached.
    pub(crate) fn height_of(&self, handle: Handle) -> usize {
        let mut height = 0;
        let mut level: Vec<Handle> = alloc::vec![handle];
        let mut next: Vec<Handle> = Vec::new();
        while !level.is_empty() {
            height += 1;
            for &h in &level {
                let node = self.nodes.get(h);
                next.extend(node.left);
                next.extend(node.right);
            }
            core::mem::swap(&mut level, &mut next);
            next.clear();
        }
        height
    }

    /// AVL balance factor: right-subtree height minus left-subtree height.
    #[allow(clippy::cast_possible_wrap)]
    pub(crate) fn weight_of(&self, handle: Handle) -> isize {
        let node = self.nodes.get(handle);
        let left = node.left.map_or(0, |h| self.height_of(h));
        let right = node.right.map_or(0, |h| self.height_of(h));
        right as isize - left as isize
    }

    /// Repoints `parent`'s link that currently addresses `from` to `to`; a
    /// missing parent means `from` was the root.
    fn replace_child(&mut self, parent: Option<Handle>, from: Handle, to: Option<Handle>) {
        match parent {
            None => self.root = to,
            Some(p) => {
                let node = self.nodes.get_mut(p);
                if node.left == Some(from) {
                    node.left = to;
                } else {
                    node.right = to;
                }
            }
        }
    }

    /// Promotes `handle` into its parent's position: the parent adopts the
    /// vacated child on the side `handle` came from, `handle` adopts the old
    /// parent on the opposite side, and the grandparent (or the root link)
    /// is repointed.
    pub(crate) fn rotate_up(&mut self, handle: Handle) {
        let parent = self.nodes.get(handle).parent.expect("`RawBinaryTree::rotate_up()` - cannot rotate the root!");
        let grandparent = self.nodes.get(parent).parent;
        let from_left = self.nodes.get(parent).left == Some(handle);

        let moved = if from_left {
            let moved = self.nodes.get(handle).right;
            self.nodes.get_mut(handle).right = Some(parent);
            self.nodes.get_mut(parent).left = moved;
            moved
        } else {
            let moved = self.nodes.get(handle).left;
            self.nodes.get_mut(handle).left = Some(parent);
            self.nodes.get_mut(parent).right = moved;
            moved
        };
        if let Some(m) = moved {
            self.nodes.get_mut(m).parent = Some(parent);
        }
        self.nodes.get_mut(parent).parent = Some(handle);
        self.nodes.get_mut(handle).parent = grandparent;
        self.replace_child(grandparent, parent, Some(handle));
    }

    /// Walks from `start` to the root, restoring the AVL invariant at every
    /// ancestor whose weight has reached ±2.
    pub(crate) fn rebalance_from(&mut self, start: Option<Handle>) {
        let mut current = start;
        while let Some(handle) = current {
            // A rotation reparents `handle`; the next ancestor is captured
            // before touching anything.
            let next = self.nodes.get(handle).parent;
            match self.weight_of(handle) {
                2 => {
                    let right =
                        self.nodes.get(handle).right.expect("`RawBinaryTree::rebalance_from()` - right-heavy node without right child!");
                    if self.weight_of(right) == -1 {
                        let inner =
                            self.nodes.get(right).left.expect("`RawBinaryTree::rebalance_from()` - left-heavy child without left child!");
                        self.rotate_up(inner);
                    }
                    let child =
                        self.nodes.get(handle).right.expect("`RawBinaryTree::rebalance_from()` - right child vanished mid-rotation!");
                    self.rotate_up(child);
                }
                -2 => {
                    let left =
                        self.nodes.get(handle).left.expect("`RawBinaryTree::rebalance_from()` - left-heavy node without left child!");
                    if self.weight_of(left) == 1 {
                        let inner =
                            self.nodes.get(left).right.expect("`RawBinaryTree::rebalance_from()` - right-heavy child without right child!");
                        self.rotate_up(inner);
                    }
                    let child =
                        self.nodes.get(handle).left.expect("`RawBinaryTree::rebalance_from()` - left child vanished mid-rotation!");
                    self.rotate_up(child);
                }
                _ => {}
            }
            current = next;
        }
    }

    /// Drains the tree in key order. O(n), no rebalancing.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut handles = Vec::with_capacity(self.len);
        let mut cursor = self.root.map(|root| self.leftmost(root));
        while let Some(handle) = cursor {
            handles.push(handle);
            cursor = self.successor(handle);
        }

        let mut out = Vec::with_capacity(handles.len());
        for handle in handles {
            let node = self.nodes.take(handle);
            out.push((node.key, self.values.take(node.value)));
        }
        self.nodes.clear();
        self.values.clear();
        self.root = None;
        self.len = 0;
        out
    }
}

impl<K: Ord, V> RawBinaryTree<K, V> {
    /// Descends from the root and either returns the node already holding
    /// `key` (second element `false`) or attaches a new node at the absent
    /// child slot of the last visited node (`true`).
    pub(crate) fn insert(&mut self, key: K, value: V) -> (Handle, bool) {
        let Some(root) = self.root else {
            let value = self.values.alloc(value);
            let node = self.nodes.alloc(BinaryNode {
                parent: None,
                left: None,
                right: None,
                key,
                value,
            });
            self.root = Some(node);
            self.len = 1;
            return (node, true);
        };

        let mut current = root;
        loop {
            let node = self.nodes.get(current);
            let go_left = match key.cmp(&node.key) {
                Ordering::Equal => return (current, false),
                Ordering::Less => true,
                Ordering::Greater => false,
            };
            let slot = if go_left { node.left } else { node.right };
            match slot {
                Some(child) => current = child,
                None => {
                    let value = self.values.alloc(value);
                    let child = self.nodes.alloc(BinaryNode {
                        parent: Some(current),
                        left: None,
                        right: None,
                        key,
                        value,
                    });
                    let node = self.nodes.get_mut(current);
                    if go_left {
                        node.left = Some(child);
                    } else {
                        node.right = Some(child);
                    }
                    self.len += 1;
                    return (child, true);
                }
            }
        }
    }

    pub(crate) fn find<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root?;
        loop {
            let node = self.nodes.get(current);
            current = match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(current),
                Ordering::Less => node.left?,
                Ordering::Greater => node.right?,
            };
        }
    }

    /// Removes `key` if present. `None` reports "nothing changed".
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<Removal<V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let target = self.find(key)?;
        Some(self.detach(target))
    }

    /// Unlinks `target` using the three structural cases: leaf detach,
    /// single-child splice, or successor relocation for two children.
    fn detach(&mut self, target: Handle) -> Removal<V> {
        let node = self.nodes.get(target);
        let (left, right, parent) = (node.left, node.right, node.parent);
        match (left, right) {
            (None, None) => {
                self.replace_child(parent, target, None);
                let node = self.nodes.take(target);
                let value = self.values.take(node.value);
                self.len -= 1;
                Removal {
                    value,
                    replacement: None,
                    rebalance_from: parent,
                }
            }
            (Some(child), None) | (None, Some(child)) => {
                self.nodes.get_mut(child).parent = parent;
                self.replace_child(parent, target, Some(child));
                let node = self.nodes.take(target);
                let value = self.values.take(node.value);
                self.len -= 1;
                Removal {
                    value,
                    replacement: Some(child),
                    rebalance_from: parent,
                }
            }
            (Some(_), Some(right)) => {
                // The in-order successor sits leftmost in the right subtree
                // and has no left child. Its key and value move into the
                // target position and the successor node is unlinked
                // instead, splicing its right subtree into its slot.
                let successor = self.leftmost(right);
                let succ_node = self.nodes.get(successor);
                let succ_parent =
                    succ_node.parent.expect("`RawBinaryTree::detach()` - successor of an internal node has no parent!");
                let succ_right = succ_node.right;

                if let Some(r) = succ_right {
                    self.nodes.get_mut(r).parent = Some(succ_parent);
                }
                if succ_parent == target {
                    self.nodes.get_mut(target).right = succ_right;
                } else {
                    self.nodes.get_mut(succ_parent).left = succ_right;
                }

                let succ = self.nodes.take(successor);
                let node = self.nodes.get_mut(target);
                node.key = succ.key;
                let old_value = core::mem::replace(&mut node.value, succ.value);
                let value = self.values.take(old_value);
                self.len -= 1;
                Removal {
                    value,
                    replacement: Some(target),
                    rebalance_from: Some(succ_parent),
                }
            }
        }
    }
}

/// Lazy double-ended in-order cursor over a borrowed tree. Restartable by
/// construction: building a new one starts the walk over.
pub(crate) struct InOrder<'a, K, V> {
    tree: &'a RawBinaryTree<K, V>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<'a, K, V> InOrder<'a, K, V> {
    pub(crate) fn new(tree: &'a RawBinaryTree<K, V>) -> Self {
        Self {
            tree,
            front: tree.root().map(|root| tree.leftmost(root)),
            back: tree.root().map(|root| tree.rightmost(root)),
            remaining: tree.len(),
        }
    }
}

impl<'a, K, V> Iterator for InOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front.expect("`InOrder::next()` - cursor exhausted before its element count!");
        self.front = self.tree.successor(handle);
        self.remaining -= 1;
        Some(self.tree.key_value(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for InOrder<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back.expect("`InOrder::next_back()` - cursor exhausted before its element count!");
        self.back = self.tree.predecessor(handle);
        self.remaining -= 1;
        Some(self.tree.key_value(handle))
    }
}

impl<K, V> ExactSizeIterator for InOrder<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> core::iter::FusedIterator for InOrder<'_, K, V> {}

impl<K, V> Clone for InOrder<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}
