//! This crate exposes two self-balancing Binary Search Trees (BSTs)
//! mostly for educational purposes.
//!
//! ## Self-balancing Binary Search Trees
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored values. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores a value and
//! sometimes has child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    value less than its own value.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    value greater than its own value.
//!
//! A plain BST degenerates into a linked list when values arrive in sorted
//! order, so every operation can degrade to `O(N)`. A *self-balancing* BST
//! restructures itself on each insert and delete so that its height stays
//! `O(lg N)`, keeping searches, insertions, and deletions logarithmic no
//! matter the input order. The two classic balancing schemes are provided
//! here as independent implementations:
//!
//! - [`avl::AvlTree`] caches a height in every node and restores the
//!   invariant `|height(left) - height(right)| <= 1` with single and double
//!   rotations. Its nodes have no parent links; ancestor relationships are
//!   recomputed by walking down from the root when needed.
//! - [`redblack::RedBlackTree`] marks every node red or black and restores
//!   the red-black invariants with recoloring and rotations. Its fix-up
//!   passes walk *upward* from the point of change, so its nodes carry
//!   non-owning parent back-references.
//!
//! Both trees behave as ordered sets: duplicates are never stored, in-order
//! traversal yields strictly ascending values, and min/max/successor/
//! predecessor queries run in `O(lg N)`.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod avl;
pub mod redblack;

#[cfg(test)]
mod test;
