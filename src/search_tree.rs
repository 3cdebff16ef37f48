//! An unbalanced Binary Search Tree with parent pointers. Every node's left child has a smaller
//! key and its right child has a key that is greater or equal. Nothing ever rotates so the shape
//! of the tree is decided entirely by the order keys are added in.
//!
//! # Examples
//!
//! ```
//! use linked_bst::SearchTree;
//!
//! let mut tree = SearchTree::new();
//!
//! // Nothing in here yet.
//! assert_eq!(tree.get(&1), None);
//!
//! tree.add(1, 2);
//! assert_eq!(tree.get(&1), Some(&2));
//!
//! // Updating a value requires the key to already be there.
//! tree.set(&1, 3).unwrap();
//! assert_eq!(tree.get(&1), Some(&3));
//! assert!(tree.set(&42, 0).is_err());
//!
//! // Removing a node returns its value.
//! let removed_value = tree.remove(&1);
//!
//! assert_eq!(removed_value, Some(3));
//! assert_eq!(tree.get(&1), None);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::mem;
use std::ptr::NonNull;

use tracing::{debug, trace};

use crate::binary_tree::{BinaryTree, Inorder, LevelOrder, Link, Node, Postorder, Preorder, Side};
use crate::error::{Error, Result};

/// A Binary Search Tree. This can be used for adding, finding, updating and removing keys and
/// values.
pub struct SearchTree<K, V> {
    tree: BinaryTree<K, V>,
}

impl<K, V> Default for SearchTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for SearchTree<K, V>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<K, V> fmt::Debug for SearchTree<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Extend<(K, V)> for SearchTree<K, V>
where
    K: Ord,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for SearchTree<K, V>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

/// The shape of the node being removed, which decides how the tree is rewired around it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Removal {
    /// The node is the whole tree.
    SoleNode,
    /// The node has no children and is simply unhooked from its parent.
    Leaf,
    /// The node's only child takes its place.
    OneChild,
    /// The node takes its successor's key and value and the successor is removed instead.
    TwoChildren,
}

impl<K, V> SearchTree<K, V> {
    /// Generate a new, empty `SearchTree`.
    pub fn new() -> Self {
        Self {
            tree: BinaryTree::new(),
        }
    }

    /// Generate a `SearchTree` holding a single node.
    pub fn with_root(key: K, value: V) -> Self {
        Self {
            tree: BinaryTree::with_root(key, value),
        }
    }

    /// Builds a tree by placing the key, value pairs in level order (see
    /// [`BinaryTree::from_level_order`]) and then checking that the result is a valid BST.
    ///
    /// # Errors
    ///
    /// [`Error::LengthMismatch`] or [`Error::Empty`] for malformed input, and
    /// [`Error::NotSearchTree`] when the placed keys break the BST property.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::{Error, SearchTree};
    ///
    /// let tree = SearchTree::from_level_order(vec![2, 1, 3], vec!["b", "a", "c"]).unwrap();
    /// assert_eq!(tree.get(&3), Some(&"c"));
    ///
    /// // 3 can't be the root with 1 as its right child.
    /// let err = SearchTree::from_level_order(vec![3, 1, 2], vec![3, 1, 2]).unwrap_err();
    /// assert_eq!(err, Error::NotSearchTree);
    /// ```
    pub fn from_level_order(keys: Vec<K>, values: Vec<V>) -> Result<Self>
    where
        K: Ord,
    {
        let tree = Self {
            tree: BinaryTree::from_level_order(keys, values)?,
        };
        if !tree.satisfies_bst_property() {
            debug!(len = tree.len(), "level order pairs violate the BST property");
            return Err(Error::NotSearchTree);
        }

        Ok(tree)
    }

    /// How many nodes are in the tree.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// How many levels are in the tree. Without rebalancing this can be as large as
    /// [`len`][Self::len].
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// The root node, if there is one.
    pub fn root(&self) -> Option<&Node<K, V>> {
        self.tree.root()
    }

    /// Iterates over the pairs in key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::SearchTree;
    ///
    /// let tree: SearchTree<_, _> = [(3, 'c'), (1, 'a'), (2, 'b')].into_iter().collect();
    /// let keys: Vec<_> = tree.iter().map(|(k, _)| *k).collect();
    ///
    /// assert_eq!(keys, [1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Inorder<'_, K, V> {
        self.tree.inorder()
    }

    /// See [`BinaryTree::preorder`].
    pub fn preorder(&self) -> Preorder<'_, K, V> {
        self.tree.preorder()
    }

    /// See [`BinaryTree::inorder`]. For a search tree this is key order.
    pub fn inorder(&self) -> Inorder<'_, K, V> {
        self.tree.inorder()
    }

    /// See [`BinaryTree::postorder`].
    pub fn postorder(&self) -> Postorder<'_, K, V> {
        self.tree.postorder()
    }

    /// See [`BinaryTree::level_order`].
    pub fn level_order(&self) -> LevelOrder<'_, K, V> {
        self.tree.level_order()
    }

    /// Whether a node with the given key is in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::SearchTree;
    ///
    /// let tree = SearchTree::with_root(1, 2);
    ///
    /// assert!(tree.contains(&1));
    /// assert!(!tree.contains(&2));
    /// ```
    pub fn contains(&self, key: &K) -> bool
    where
        K: Ord,
    {
        self.find(key).is_some()
    }

    /// Potentially finds the value associated with the given key in this tree. If no node has the
    /// corresponding key, `None` is returned.
    pub fn get(&self, key: &K) -> Option<&V>
    where
        K: Ord,
    {
        self.find(key).map(Node::value)
    }

    /// Like [`get`][Self::get] but the value can be changed in place.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::SearchTree;
    ///
    /// let mut tree = SearchTree::with_root("apples", 1);
    /// *tree.get_mut(&"apples").unwrap() += 1;
    ///
    /// assert_eq!(tree.get(&"apples"), Some(&2));
    /// assert_eq!(tree.get_mut(&"pears"), None);
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V>
    where
        K: Ord,
    {
        // SAFETY: `find_ptr` returns a node owned by this tree and the returned reference borrows
        // `self` mutably, so nothing else can look at the node while it's alive.
        self.find_ptr(key).map(|ptr| unsafe { &mut (*ptr.as_ptr()).value })
    }

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if no node has the key. The tree is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::{Error, SearchTree};
    ///
    /// let mut tree = SearchTree::with_root(1, "one");
    ///
    /// tree.set(&1, "uno").unwrap();
    /// assert_eq!(tree.get(&1), Some(&"uno"));
    ///
    /// assert_eq!(tree.set(&2, "dos"), Err(Error::KeyNotFound));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn set(&mut self, key: &K, value: V) -> Result<()>
    where
        K: Ord,
    {
        match self.get_mut(key) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => {
                debug!(len = self.len(), "set on a missing key");
                Err(Error::KeyNotFound)
            }
        }
    }

    /// Adds a node with the given key and value. Keys that are less than a node's key go to its
    /// left, everything else goes to its right.
    ///
    /// There is no check for an existing node with an equal key: adding one again stores a second
    /// node to the right of the first. Lookups stop at the first node they reach with the key so
    /// the newer value stays hidden until the older node is removed. Use [`set`][Self::set] to
    /// overwrite a value instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::SearchTree;
    ///
    /// let mut tree = SearchTree::new();
    /// tree.add(1, "first");
    /// tree.add(1, "second");
    ///
    /// assert_eq!(tree.len(), 2);
    /// assert_eq!(tree.get(&1), Some(&"first"));
    ///
    /// assert_eq!(tree.remove(&1), Some("first"));
    /// assert_eq!(tree.get(&1), Some(&"second"));
    /// ```
    pub fn add(&mut self, key: K, value: V)
    where
        K: Ord,
    {
        let mut parent = None;
        let mut side = Side::Left;
        let mut current = self.tree.root.0;
        let mut depth = 0;
        while let Some(ptr) = current {
            // SAFETY: `ptr` came from a link of this tree and we hold `&mut self`.
            let node = unsafe { ptr.as_ref() };
            parent = Some(ptr);
            depth += 1;
            (side, current) = if key < node.key {
                (Side::Left, node.left.0)
            } else {
                (Side::Right, node.right.0)
            };
        }

        // SAFETY: The descent stopped at an empty slot, either `side` of `parent` or the root of an
        // empty tree.
        unsafe { self.tree.attach(parent, side, Node::new_boxed(key, value)) };
        trace!(depth, ?side, len = self.len(), "added node");
    }

    /// Removes the node containing the given key from the tree and returns its value. If the tree
    /// does not contain a node with the key, nothing happens.
    ///
    /// A node with two children isn't unhooked itself. Instead it takes the key and value of its
    /// successor (the leftmost node of its right subtree) and the successor is unhooked.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::SearchTree;
    ///
    /// let mut tree: SearchTree<_, _> = [(5, "5"), (3, "3"), (8, "8"), (7, "7")]
    ///     .into_iter()
    ///     .collect();
    ///
    /// assert_eq!(tree.remove(&5), Some("5"));
    /// assert_eq!(tree.root().unwrap().key(), &7);
    /// assert_eq!(tree.remove(&5), None);
    /// assert_eq!(tree.len(), 3);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V>
    where
        K: Ord,
    {
        let target = self.find_ptr(key)?;
        // SAFETY: `target` is a node of this tree and we hold `&mut self`.
        let (left, right) = unsafe {
            let node = target.as_ref();
            (node.left.0, node.right.0)
        };

        let (removal, (_, value)) = match (left, right) {
            (None, None) => {
                let removal = if self.len() == 1 {
                    Removal::SoleNode
                } else {
                    Removal::Leaf
                };
                // SAFETY: `target` has no children so unhooking it orphans nothing.
                let pair = unsafe {
                    self.tree.relink(target, Link(None));
                    self.tree.free(target)
                };
                (removal, pair)
            }
            (Some(child), None) | (None, Some(child)) => {
                // SAFETY: `child` is `target`'s only child so it takes over `target`'s slot and
                // everything below `target` stays reachable.
                let pair = unsafe {
                    self.tree.relink(target, Link(Some(child)));
                    self.tree.free(target)
                };
                (Removal::OneChild, pair)
            }
            (Some(_), Some(right)) => {
                // SAFETY: `right` is a node of this tree. The successor is in `target`'s right
                // subtree so it is a different node from `target` and the two mutable references
                // can't alias. Its right child is its only child and takes over its slot.
                let pair = unsafe {
                    let successor = leftmost(right);
                    let successor_right = successor.as_ref().right;
                    self.tree.relink(successor, successor_right);

                    let target = &mut *target.as_ptr();
                    let successor_node = &mut *successor.as_ptr();
                    mem::swap(&mut target.key, &mut successor_node.key);
                    mem::swap(&mut target.value, &mut successor_node.value);

                    self.tree.free(successor)
                };
                (Removal::TwoChildren, pair)
            }
        };

        debug!(?removal, len = self.len(), "removed node");
        Some(value)
    }

    /// Checks the BST property for every node: its left child's key is less than its key and its
    /// right child's key is greater or equal.
    ///
    /// Only parents and their immediate children are compared. A key that is out of place
    /// relative to a more distant ancestor isn't caught.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::SearchTree;
    ///
    /// let tree: SearchTree<_, _> = [(2, ()), (1, ()), (3, ())].into_iter().collect();
    ///
    /// assert!(tree.satisfies_bst_property());
    /// ```
    pub fn satisfies_bst_property(&self) -> bool
    where
        K: Ord,
    {
        let mut pending: Vec<&Node<K, V>> = self.root().into_iter().collect();
        while let Some(node) = pending.pop() {
            let left_ok = node.left().map_or(true, |left| left.key < node.key);
            let right_ok = node.right().map_or(true, |right| right.key >= node.key);
            if !(left_ok && right_ok) {
                return false;
            }

            pending.extend(node.left());
            pending.extend(node.right());
        }

        true
    }

    /// Walks down from the root comparing keys until a node with an equal key is found.
    fn find(&self, key: &K) -> Option<&Node<K, V>>
    where
        K: Ord,
    {
        let mut current = self.root();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left(),
                Ordering::Equal => return Some(node),
                Ordering::Greater => node.right(),
            };
        }

        None
    }

    /// The same descent as [`find`][Self::find] but yielding a pointer that can be used to mutate
    /// the node.
    fn find_ptr(&mut self, key: &K) -> Option<NonNull<Node<K, V>>>
    where
        K: Ord,
    {
        let mut current = self.tree.root.0;
        while let Some(ptr) = current {
            // SAFETY: `ptr` came from a link of this tree and we hold `&mut self`.
            let node = unsafe { ptr.as_ref() };
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left.0,
                Ordering::Equal => return Some(ptr),
                Ordering::Greater => node.right.0,
            };
        }

        None
    }
}

/// Follows left links from `node` until reaching a node without a left child. A node with only a
/// right child is therefore its own answer.
///
/// # Safety
///
/// `node` must be a live node and no mutable reference into its subtree may exist.
unsafe fn leftmost<K, V>(node: NonNull<Node<K, V>>) -> NonNull<Node<K, V>> {
    let mut current = node;
    while let Some(left) = current.as_ref().left.0 {
        current = left;
    }

    current
}
