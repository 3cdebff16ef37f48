//! This crate exposes a linked, unbalanced Binary Search Tree (BST) built on top of a plain
//! linked binary tree.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of value (the value that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of this BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than or equal to its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for keys in the tree takes `O(height)` (where `height` is defined as the longest
//! path from the root `Node` to a leaf `Node`). [`SearchTree`] never rebalances, so adding keys
//! in sorted order produces a tree whose height is its length. Every operation walks the tree
//! with loops rather than recursion so such trees are still safe to use.
//!
//! Each `Node` also points back at its parent. Child links own their nodes while parent links
//! never do, which is what lets [`SearchTree::remove`] rewire a node's neighbours directly.
//!
//! # Examples
//!
//! ```
//! use linked_bst::SearchTree;
//!
//! let mut tree: SearchTree<_, _> = [5, 3, 8, 1, 4, 7, 9]
//!     .into_iter()
//!     .map(|k| (k, k.to_string()))
//!     .collect();
//!
//! assert_eq!(tree.remove(&5), Some("5".to_string()));
//! assert_eq!(tree.root().unwrap().key(), &7);
//! assert_eq!(tree.len(), 6);
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod binary_tree;
mod error;
pub mod search_tree;


pub use binary_tree::{BinaryTree, Node};
pub use error::{Error, ErrorKind, Result};
pub use search_tree::SearchTree;
