use crate::raw::Handle;

/// A reference to a node stored in a [`crate::BstMap`] or [`crate::AvlMap`].
///
/// A `NodeId` is a cheap copyable index into the map that produced it. It
/// stays valid until the node it names is removed; after that, using it is a
/// logic error. The map detects most stale ids and panics, but an id whose
/// slot has been reused by a later insert will silently name the new node,
/// so do not hold ids across removals. Ids from one map must never be used
/// with another.
///
/// # Examples
///
/// ```
/// use sabi_tree::BstMap;
///
/// let mut map = BstMap::new();
/// let id = map.insert("a", 1);
/// *map.value_mut(id) += 1;
/// assert_eq!(map[&"a"], 2);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NodeId(pub(crate) Handle);

/// The outcome of a successful removal from a binary map.
///
/// Produced by [`crate::BstMap::remove`] and [`crate::AvlMap::remove`].
///
/// # Examples
///
/// ```
/// use sabi_tree::BstMap;
///
/// let mut map = BstMap::from([(1, "a"), (2, "b"), (3, "c")]);
/// let removed = map.remove(&2).unwrap();
/// assert_eq!(removed.value, "b");
/// // Key 2 had a single (right) child, so that child was spliced into its
/// // position.
/// assert_eq!(map.key(removed.replacement.unwrap()), &3);
/// ```
#[derive(Debug)]
pub struct Removed<V> {
    /// The value that was stored under the removed key.
    pub value: V,
    /// The node that now occupies the removed position, when the removal
    /// spliced or relocated another node into it. `None` when a leaf was
    /// detached or the map became empty.
    pub replacement: Option<NodeId>,
}
