//! A plain linked binary tree. Nodes are heap allocated and know their children and their parent.
//! This tree doesn't order its keys - it only owns the nodes, counts them, and walks them. The
//! [`SearchTree`][crate::SearchTree] is built on top of it.
//!
//! # Examples
//!
//! ```
//! use linked_bst::BinaryTree;
//!
//! // Pairs are placed breadth first: 1 is the root, 2 and 3 are its children.
//! let tree = BinaryTree::from_level_order(vec![1, 2, 3], vec!["a", "b", "c"]).unwrap();
//!
//! assert_eq!(tree.len(), 3);
//! assert_eq!(tree.height(), 2);
//!
//! let keys: Vec<_> = tree.inorder().map(|(k, _)| *k).collect();
//! assert_eq!(keys, [2, 1, 3]);
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::ptr::NonNull;

use crate::error::{Error, Result};

/// A binary tree owning all of its nodes. The nodes are linked to their children and parent so
/// the tree can be walked in any direction.
pub struct BinaryTree<K, V> {
    // This is a `Link` instead of an `Option<Node>` so that it can be moved around with the `Tree`
    // without the children's parent pointers breaking.
    pub(crate) root: Link<K, V>,
    size: usize,
}

// SAFETY: Every node reachable from `root` is owned by the tree and only ever dereferenced through
// `&self` or `&mut self`, so the tree is exactly as thread safe as the keys and values it owns.
unsafe impl<K: Send, V: Send> Send for BinaryTree<K, V> {}
// SAFETY: See above. Shared access never mutates a node.
unsafe impl<K: Sync, V: Sync> Sync for BinaryTree<K, V> {}

impl<K, V> Default for BinaryTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for BinaryTree<K, V> {
    fn drop(&mut self) {
        // Unbalanced trees can be as deep as they are large so free the nodes with an explicit
        // stack instead of recursing.
        let mut pending: Vec<_> = self.root.take().0.into_iter().collect();
        while let Some(ptr) = pending.pop() {
            // SAFETY: Each node is reachable through exactly one owning link and we only follow
            // owning links, so every node is freed once. All nodes were allocated using
            // `Box::new` (in `Node::new_boxed`).
            let node = unsafe { Box::from_raw(ptr.as_ptr()) };
            pending.extend(node.left.0);
            pending.extend(node.right.0);
        }
    }
}

impl<K, V> Clone for BinaryTree<K, V>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        let mut cloned = Self::new();
        let mut pending: Vec<_> = self
            .root()
            .map(|root| (root, None, Side::Left))
            .into_iter()
            .collect();

        while let Some((source, parent, side)) = pending.pop() {
            let node = Node::new_boxed(source.key.clone(), source.value.clone());
            // SAFETY: `parent` is a node already attached to `cloned` (or `None` for the root),
            // and each of its slots is filled exactly once since every source child is visited
            // once.
            let node = unsafe { cloned.attach(parent, side, node) };

            pending.extend(source.left().map(|left| (left, Some(node), Side::Left)));
            pending.extend(source.right().map(|right| (right, Some(node), Side::Right)));
        }

        cloned
    }
}

impl<K, V> fmt::Debug for BinaryTree<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryTree")
            .field("len", &self.size)
            .field("level_order", &self.level_order().collect::<Vec<_>>())
            .finish()
    }
}

impl<K, V> BinaryTree<K, V> {
    /// Generate a new, empty `BinaryTree`.
    pub fn new() -> Self {
        Self {
            root: Link(None),
            size: 0,
        }
    }

    /// Generate a `BinaryTree` holding a single node.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::BinaryTree;
    ///
    /// let tree = BinaryTree::with_root(1, "one");
    ///
    /// assert_eq!(tree.len(), 1);
    /// assert!(tree.root().unwrap().is_leaf());
    /// ```
    pub fn with_root(key: K, value: V) -> Self {
        let mut tree = Self::new();
        // SAFETY: The tree is empty so the node becomes the root.
        unsafe { tree.attach(None, Side::Left, Node::new_boxed(key, value)) };
        tree
    }

    /// Builds a tree by placing the key, value pairs in level order. The first pair becomes the
    /// root, the next two become its children, and so on. The pair at index `i` is the parent of
    /// the pairs at `2i + 1` and `2i + 2`.
    ///
    /// # Errors
    ///
    /// [`Error::LengthMismatch`] if there aren't as many keys as values and [`Error::Empty`] if
    /// there are no pairs at all.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::{BinaryTree, Error};
    ///
    /// let tree = BinaryTree::from_level_order(vec![4, 2, 6, 1], vec![4, 2, 6, 1]).unwrap();
    /// let root = tree.root().unwrap();
    ///
    /// assert_eq!(root.key(), &4);
    /// assert_eq!(root.left().unwrap().left().unwrap().key(), &1);
    ///
    /// assert_eq!(
    ///     BinaryTree::from_level_order(vec![1, 2], vec![3, 2, 1]).unwrap_err(),
    ///     Error::LengthMismatch { keys: 2, values: 3 },
    /// );
    /// ```
    pub fn from_level_order(keys: Vec<K>, values: Vec<V>) -> Result<Self> {
        if keys.len() != values.len() {
            return Err(Error::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        if keys.is_empty() {
            return Err(Error::Empty);
        }

        let mut tree = Self::new();
        let mut placed: Vec<NonNull<Node<K, V>>> = Vec::with_capacity(keys.len());
        for (index, (key, value)) in keys.into_iter().zip(values).enumerate() {
            let (parent, side) = match index {
                0 => (None, Side::Left),
                i if i % 2 == 1 => (Some(placed[(i - 1) / 2]), Side::Left),
                i => (Some(placed[(i - 1) / 2]), Side::Right),
            };
            // SAFETY: The parent at `(i - 1) / 2` was placed earlier and each of its slots is
            // only targeted by one index.
            placed.push(unsafe { tree.attach(parent, side, Node::new_boxed(key, value)) });
        }

        Ok(tree)
    }

    /// How many nodes are in the tree.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// How many levels are in the tree. An empty tree has a height of 0 and a lone root has a
    /// height of 1.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut level: Vec<&Node<K, V>> = self.root().into_iter().collect();
        while !level.is_empty() {
            height += 1;
            level = level
                .into_iter()
                .flat_map(|node| node.left().into_iter().chain(node.right()))
                .collect();
        }

        height
    }

    /// The root node, if there is one.
    pub fn root(&self) -> Option<&Node<K, V>> {
        self.root.node()
    }

    /// Visits each node before its left subtree and then its right subtree.
    pub fn preorder(&self) -> Preorder<'_, K, V> {
        Preorder {
            stack: self.root().into_iter().collect(),
        }
    }

    /// Visits each node after its left subtree and before its right subtree.
    pub fn inorder(&self) -> Inorder<'_, K, V> {
        Inorder {
            stack: Vec::new(),
            next: self.root(),
        }
    }

    /// Visits each node after both of its subtrees.
    pub fn postorder(&self) -> Postorder<'_, K, V> {
        Postorder {
            stack: self.root().map(|root| (root, false)).into_iter().collect(),
        }
    }

    /// Visits the nodes breadth first, left to right within each level.
    pub fn level_order(&self) -> LevelOrder<'_, K, V> {
        LevelOrder {
            queue: self.root().into_iter().collect(),
        }
    }

    /// Hangs `node` from the `side` slot of `parent`, or makes it the root when `parent` is
    /// `None`. Returns a pointer to the now-attached node.
    ///
    /// # Safety
    ///
    /// `parent` must be a node owned by this tree whose `side` slot is empty. If `parent` is
    /// `None` the tree must be empty.
    pub(crate) unsafe fn attach(
        &mut self,
        parent: Option<NonNull<Node<K, V>>>,
        side: Side,
        mut node: Box<Node<K, V>>,
    ) -> NonNull<Node<K, V>> {
        node.parent = Link(parent);
        let node = NonNull::from(Box::leak(node));
        match parent {
            Some(parent) => *(*parent.as_ptr()).link_mut(side) = Link(Some(node)),
            None => self.root = Link(Some(node)),
        }
        self.size += 1;

        node
    }

    /// Points whichever slot referenced `node` (its parent's left or right, or the root) at
    /// `replacement` instead, and gives `replacement` the parent `node` had. `node` itself is left
    /// untouched so it still points at its old parent and children.
    ///
    /// # Safety
    ///
    /// `node` must be owned by this tree, and `replacement` must be `node`'s descendant (or
    /// empty), so that nothing becomes unreachable except `node` and what it alone owns.
    pub(crate) unsafe fn relink(&mut self, node: NonNull<Node<K, V>>, replacement: Link<K, V>) {
        let parent = node.as_ref().parent;
        if let Some(child) = replacement.0 {
            (*child.as_ptr()).parent = parent;
        }

        match parent.0 {
            None => self.root = replacement,
            Some(parent) => {
                let parent = &mut *parent.as_ptr();
                if parent.left.0 == Some(node) {
                    parent.left = replacement;
                } else {
                    parent.right = replacement;
                }
            }
        }
    }

    /// Frees a node which has been [`relink`][Self::relink]ed out of the tree, handing back its
    /// key and value.
    ///
    /// # Safety
    ///
    /// `node` must have been allocated by this tree and nothing in the tree may reference it
    /// anymore. Any children it still points at are not freed.
    pub(crate) unsafe fn free(&mut self, node: NonNull<Node<K, V>>) -> (K, V) {
        let node = Box::from_raw(node.as_ptr());
        self.size -= 1;

        (node.key, node.value)
    }

    /// Asserts every child points back at its parent and that `size` matches what's reachable.
    #[cfg(test)]
    pub(crate) fn assert_links(&self) {
        let mut count = 0;
        let mut pending = Vec::new();
        if let Some(root) = self.root() {
            assert!(root.parent().is_none());
            pending.push(root);
        }

        while let Some(node) = pending.pop() {
            count += 1;
            for child in [node.left(), node.right()].into_iter().flatten() {
                assert!(std::ptr::eq(child.parent().unwrap(), node));
                pending.push(child);
            }
        }
        assert_eq!(count, self.size);
    }
}

/// Which of a parent's two slots a child hangs from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// A possibly-empty pointer to a `Node`. Whether it owns the node depends on where it's stored:
/// `left` and `right` own their nodes, `parent` never does.
pub(crate) struct Link<K, V>(pub(crate) Option<NonNull<Node<K, V>>>);

impl<K, V> Clone for Link<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<K, V> Copy for Link<K, V> {}

impl<K, V> Link<K, V> {
    fn node(&self) -> Option<&Node<K, V>> {
        // SAFETY: If the node is not `None` then it is a valid `Node` owned by the same tree as
        // this link. Nodes are only mutated through `&mut` access to that tree, which can't
        // coexist with the `&self` borrow this reference is tied to.
        unsafe { self.0.as_ref().map(|ptr| ptr.as_ref()) }
    }

    fn take(&mut self) -> Self {
        Link(self.0.take())
    }
}

/// One position in a tree. A `Node` has a key, a value, up to two children, and a parent unless
/// it is the root.
pub struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
    pub(crate) parent: Link<K, V>,
}

// SAFETY: A `&Node` only allows reading the node and its relatives, all of which belong to the
// same tree and can't be mutated while that shared borrow is alive.
unsafe impl<K: Sync, V: Sync> Sync for Node<K, V> {}

impl<K, V> fmt::Debug for Node<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("left", &self.left().map(|n| &n.key))
            .field("right", &self.right().map(|n| &n.key))
            .finish()
    }
}

impl<K, V> Node<K, V> {
    pub(crate) fn new_boxed(key: K, value: V) -> Box<Self> {
        Box::new(Node {
            key,
            left: Link(None),
            parent: Link(None),
            right: Link(None),
            value,
        })
    }

    /// The key this node is stored under.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The value stored in this node.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// The root of the left subtree.
    pub fn left(&self) -> Option<&Self> {
        self.left.node()
    }

    /// The root of the right subtree.
    pub fn right(&self) -> Option<&Self> {
        self.right.node()
    }

    /// The node this one hangs from. Only the root has no parent.
    pub fn parent(&self) -> Option<&Self> {
        self.parent.node()
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.left.0.is_none() && self.right.0.is_none()
    }

    fn link_mut(&mut self, side: Side) -> &mut Link<K, V> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Pre-order iterator created by [`BinaryTree::preorder`].
pub struct Preorder<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
}

impl<'a, K, V> Iterator for Preorder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.right());
        self.stack.extend(node.left());

        Some((&node.key, &node.value))
    }
}

/// In-order iterator created by [`BinaryTree::inorder`].
pub struct Inorder<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    next: Option<&'a Node<K, V>>,
}

impl<'a, K, V> Iterator for Inorder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.next {
            self.stack.push(node);
            self.next = node.left();
        }
        let node = self.stack.pop()?;
        self.next = node.right();

        Some((&node.key, &node.value))
    }
}

/// Post-order iterator created by [`BinaryTree::postorder`].
pub struct Postorder<'a, K, V> {
    // The flag records whether the node's children are already on the stack above it.
    stack: Vec<(&'a Node<K, V>, bool)>,
}

impl<'a, K, V> Iterator for Postorder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, expanded) = self.stack.pop()?;
            if expanded {
                return Some((&node.key, &node.value));
            }

            self.stack.push((node, true));
            self.stack.extend(node.right().map(|n| (n, false)));
            self.stack.extend(node.left().map(|n| (n, false)));
        }
    }
}

/// Level-order iterator created by [`BinaryTree::level_order`].
pub struct LevelOrder<'a, K, V> {
    queue: VecDeque<&'a Node<K, V>>,
}

impl<'a, K, V> Iterator for LevelOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.left());
        self.queue.extend(node.right());

        Some((&node.key, &node.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Level order `1..=7` gives:
    ///
    /// ```text
    ///        1
    ///      /   \
    ///     2     3
    ///    / \   / \
    ///   4   5 6   7
    /// ```
    fn full_tree() -> BinaryTree<i32, String> {
        let keys: Vec<_> = (1..=7).collect();
        let values = keys.iter().map(ToString::to_string).collect();
        BinaryTree::from_level_order(keys, values).unwrap()
    }

    fn keys<'a>(iter: impl Iterator<Item = (&'a i32, &'a String)>) -> Vec<i32> {
        iter.map(|(k, _)| *k).collect()
    }

    /// A tree that only ever goes right, `depth` nodes deep.
    fn right_chain(depth: usize) -> BinaryTree<usize, usize> {
        let mut tree = BinaryTree::new();
        let mut parent = None;
        for i in 0..depth {
            // SAFETY: `parent` was the last node attached so its right slot is empty.
            parent = Some(unsafe { tree.attach(parent, Side::Right, Node::new_boxed(i, i)) });
        }

        tree
    }

    #[test]
    fn empty_tree() {
        let tree: BinaryTree<i32, i32> = BinaryTree::new();

        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert!(tree.root().is_none());
        assert_eq!(tree.preorder().count(), 0);
        assert_eq!(tree.inorder().count(), 0);
        assert_eq!(tree.postorder().count(), 0);
        assert_eq!(tree.level_order().count(), 0);
    }

    #[test]
    fn single_root() {
        let tree = BinaryTree::with_root(5, "five");

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.height(), 1);
        let root = tree.root().unwrap();
        assert_eq!((root.key(), root.value()), (&5, &"five"));
        assert!(root.is_leaf());
        assert!(root.parent().is_none());
        tree.assert_links();
    }

    #[test]
    fn level_order_placement() {
        let tree = full_tree();

        assert_eq!(tree.len(), 7);
        assert_eq!(tree.height(), 3);
        tree.assert_links();

        let root = tree.root().unwrap();
        let two = root.left().unwrap();
        let three = root.right().unwrap();
        assert_eq!(two.key(), &2);
        assert_eq!(three.key(), &3);
        assert_eq!(two.left().unwrap().key(), &4);
        assert_eq!(two.right().unwrap().key(), &5);
        assert_eq!(three.left().unwrap().key(), &6);
        assert_eq!(three.right().unwrap().value(), "7");
        assert!(three.right().unwrap().is_leaf());
    }

    #[test]
    fn partial_last_level() {
        let tree = BinaryTree::from_level_order(vec![1, 2, 3, 4], vec![(); 4]).unwrap();

        assert_eq!(tree.height(), 3);
        let two = tree.root().unwrap().left().unwrap();
        assert_eq!(two.left().unwrap().key(), &4);
        assert!(two.right().is_none());
        assert!(tree.root().unwrap().right().unwrap().is_leaf());
    }

    #[test]
    fn level_order_rejects_bad_input() {
        assert_eq!(
            BinaryTree::<i32, i32>::from_level_order(vec![1, 2], vec![3, 2, 1]).unwrap_err(),
            Error::LengthMismatch { keys: 2, values: 3 }
        );
        assert_eq!(
            BinaryTree::<i32, i32>::from_level_order(vec![], vec![]).unwrap_err(),
            Error::Empty
        );
    }

    #[test]
    fn traversal_orders() {
        let tree = full_tree();

        assert_eq!(keys(tree.preorder()), [1, 2, 4, 5, 3, 6, 7]);
        assert_eq!(keys(tree.inorder()), [4, 2, 5, 1, 6, 3, 7]);
        assert_eq!(keys(tree.postorder()), [4, 5, 2, 6, 7, 3, 1]);
        assert_eq!(keys(tree.level_order()), [1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn clone_fixes_parent_pointers() {
        let tree = full_tree();
        let cloned = tree.clone();

        cloned.assert_links();
        assert_eq!(keys(cloned.level_order()), keys(tree.level_order()));
        assert!(!std::ptr::eq(tree.root().unwrap(), cloned.root().unwrap()));

        let two = cloned.root().unwrap().left().unwrap();
        assert!(std::ptr::eq(two.parent().unwrap(), cloned.root().unwrap()));
    }

    #[test]
    fn relink_and_free() {
        let mut tree = full_tree();
        let two = tree.root().unwrap().left.0.unwrap();
        let five = tree.root().unwrap().left().unwrap().right.0.unwrap();

        // SAFETY: `five` is a leaf of this tree, so unhooking it orphans nothing else.
        let (key, value) = unsafe {
            tree.relink(five, Link(None));
            tree.free(five)
        };
        assert_eq!((key, value.as_str()), (5, "5"));
        assert_eq!(tree.len(), 6);
        tree.assert_links();

        // SAFETY: `four` is `two`'s only child now, so it can take `two`'s place.
        unsafe {
            let four = two.as_ref().left;
            tree.relink(two, four);
            tree.free(two);
        }
        assert_eq!(keys(tree.level_order()), [1, 4, 3, 6, 7]);
        tree.assert_links();
    }

    #[test]
    fn deep_trees_drop_and_clone() {
        let tree = right_chain(100_000);

        assert_eq!(tree.len(), 100_000);
        let cloned = tree.clone();
        drop(tree);

        assert_eq!(cloned.len(), 100_000);
        assert_eq!(cloned.inorder().last(), Some((&99_999, &99_999)));
    }

    #[test]
    fn debug_lists_levels() {
        let tree = BinaryTree::from_level_order(vec![2, 1], vec!['b', 'a']).unwrap();

        assert_eq!(
            format!("{:?}", tree),
            "BinaryTree { len: 2, level_order: [(2, 'b'), (1, 'a')] }"
        );
    }
}
