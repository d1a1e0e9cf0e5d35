//! A color-balanced (Red-Black) Binary Search Tree storing an ordered set
//! of values. Every node is marked [`Red`][Color::Red] or
//! [`Black`][Color::Black] and the tree maintains three invariants: the root
//! is black, a red node never has a red child, and every path from a node
//! down to an absent (nil) child crosses the same number of black nodes.
//! Together these bound the height at `2 * lg(N + 1)`.
//!
//! Unlike the AVL tree in this crate, the fix-up passes here walk *upward*
//! from the point of change and consult siblings and uncles, so every node
//! carries a non-owning parent back-reference. Ownership still flows
//! strictly root -> leaves: a node frees its children when dropped, and only
//! its children.
//!
//! # Examples
//!
//! ```
//! use balanced_bst::redblack::RedBlackTree;
//!
//! let mut tree = RedBlackTree::new();
//!
//! assert!(tree.insert(2));
//! assert!(tree.insert(1));
//! assert!(tree.insert(3));
//!
//! // Duplicates are rejected.
//! assert!(!tree.insert(2));
//!
//! assert_eq!(tree.in_order(), vec![&1, &2, &3]);
//!
//! assert!(tree.remove(&2));
//! assert!(!tree.remove(&2)); // already gone
//! assert_eq!(tree.size(), 2);
//! ```

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;
use std::ptr::NonNull;

/// The marking that keeps a [`RedBlackTree`] balanced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    /// A freshly inserted node starts red so the black-height is untouched.
    Red,
    /// The root is always black; nil children also count as black.
    Black,
}

/// A self-balancing Binary Search Tree keeping the red-black invariants.
/// Stores each distinct value at most once.
pub struct RedBlackTree<T> {
    root: Link<T>,
    size: usize,
}

/// A possibly-absent, non-owning edge between nodes. The owning edges of the
/// tree are exactly the `left`/`right` links reachable from the root; every
/// `parent` link aliases one of them in the opposite direction.
struct Link<T>(Option<NonNull<Node<T>>>);

impl<T> Clone for Link<T> {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}
impl<T> Copy for Link<T> {}

impl<T> Link<T> {
    fn node(&self) -> Option<&Node<T>> {
        // SAFETY: a non-null link always points at a live node owned by the
        // tree this link belongs to. Because we take `&self` here, no `&mut`
        // to that node can be produced for the duration of the borrow.
        unsafe { self.0.as_ref().map(|ptr| ptr.as_ref()) }
    }

    fn node_mut(&mut self) -> Option<&mut Node<T>> {
        // SAFETY: as in `node`, plus `&mut self` rules out shared borrows.
        unsafe { self.0.as_mut().map(|ptr| ptr.as_mut()) }
    }
}

struct Node<T> {
    value: T,
    color: Color,
    left: Link<T>,
    right: Link<T>,
    parent: Link<T>,
}

impl<T> Drop for Node<T> {
    fn drop(&mut self) {
        // SAFETY: we own our children and nothing else points at them with
        // owning intent, so they are freed exactly once. They were allocated
        // with `Box::new` so the layout matches.
        unsafe {
            if let Some(mut left) = self.left.0.take() {
                drop(Box::from_raw(left.as_mut()));
            }
            if let Some(mut right) = self.right.0.take() {
                drop(Box::from_raw(right.as_mut()));
            }
        }
    }
}

impl<T> Node<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            color: Color::Red,
            left: Link(None),
            right: Link(None),
            parent: Link(None),
        }
    }

    fn is_leaf(&self) -> bool {
        self.left.0.is_none() && self.right.0.is_none()
    }

    fn child_count(&self) -> usize {
        usize::from(self.left.0.is_some()) + usize::from(self.right.0.is_some())
    }

    /// The other child of this node's parent, if both exist.
    fn sibling(&self) -> Option<&Node<T>> {
        let parent = self.parent.node()?;
        if parent.left.0 == Some(NonNull::from(self)) {
            parent.right.node()
        } else {
            parent.left.node()
        }
    }

    /// The parent's sibling, if both exist.
    fn uncle(&self) -> Option<&Node<T>> {
        self.parent.node()?.sibling()
    }

    fn fix_left_child_parent(&mut self) {
        let self_ptr = NonNull::from(&*self);
        if let Some(left) = self.left.node_mut() {
            left.parent = Link(Some(self_ptr));
        }
    }

    fn fix_right_child_parent(&mut self) {
        let self_ptr = NonNull::from(&*self);
        if let Some(right) = self.right.node_mut() {
            right.parent = Link(Some(self_ptr));
        }
    }
}

impl<T> Default for RedBlackTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RedBlackTree<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Clone for RedBlackTree<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        let root = self.root.node().map(|root| {
            let new_root = Box::leak(Box::new(root.clone()));
            new_root.fix_left_child_parent();
            new_root.fix_right_child_parent();
            NonNull::from(new_root)
        });
        Self {
            root: Link(root),
            size: self.size,
        }
    }
}

/// Manual implementation so every fresh child's parent link can be pointed
/// back into the clone once the child reaches its final heap address. The
/// node's own `parent` field is rewired by whoever boxes *it*; the root's is
/// already absent in the source.
impl<T> Clone for Node<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        let left = self.left.node().map(|left| {
            let new_left = Box::leak(Box::new(left.clone()));
            new_left.fix_left_child_parent();
            new_left.fix_right_child_parent();
            NonNull::from(new_left)
        });
        let right = self.right.node().map(|right| {
            let new_right = Box::leak(Box::new(right.clone()));
            new_right.fix_left_child_parent();
            new_right.fix_right_child_parent();
            NonNull::from(new_right)
        });
        Self {
            value: self.value.clone(),
            color: self.color,
            left: Link(left),
            right: Link(right),
            parent: self.parent,
        }
    }
}

impl<T> fmt::Debug for RedBlackTree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedBlackTree")
            .field("root", &self.root.node())
            .finish()
    }
}

impl<T> fmt::Debug for Node<T>
where
    T: fmt::Debug,
{
    // The parent link is skipped to keep the output acyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("value", &self.value)
            .field("color", &self.color)
            .field("left", &self.left.node())
            .field("right", &self.right.node())
            .finish()
    }
}

impl<T> RedBlackTree<T> {
    /// Generates a new, empty tree.
    pub fn new() -> Self {
        Self {
            root: Link(None),
            size: 0,
        }
    }

    /// Inserts the given value into the tree.
    ///
    /// Returns `false` when the value was already present; the tree is left
    /// untouched in that case. A successful insert adds the value as a red
    /// leaf and then restores the invariants walking upward.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::redblack::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    ///
    /// assert!(tree.insert(1));
    /// assert!(!tree.insert(1));
    /// assert_eq!(tree.size(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool
    where
        T: Ord,
    {
        let Some(root) = self.root.0 else {
            // The first node becomes the root and must be black.
            let mut node = Box::new(Node::new(value));
            node.color = Color::Black;
            self.root = Link(Some(NonNull::from(Box::leak(node))));
            self.size = 1;
            return true;
        };

        // Plain BST descent to the insertion parent, remembering which side
        // we fell off.
        let mut current = root;
        let (parent, went_left) = loop {
            // SAFETY: child links always point at live nodes of this tree.
            let node = unsafe { current.as_ref() };
            match value.cmp(&node.value) {
                Ordering::Less => match node.left.0 {
                    Some(left) => current = left,
                    None => break (current, true),
                },
                Ordering::Greater => match node.right.0 {
                    Some(right) => current = right,
                    None => break (current, false),
                },
                Ordering::Equal => return false,
            }
        };

        let mut node = Box::new(Node::new(value));
        node.parent = Link(Some(parent));
        let node = NonNull::from(Box::leak(node));
        // SAFETY: `parent` is a live node and `node` was just allocated; the
        // chosen child slot was observed empty during the descent above.
        unsafe {
            if went_left {
                (*parent.as_ptr()).left = Link(Some(node));
            } else {
                (*parent.as_ptr()).right = Link(Some(node));
            }
            self.size += 1;
            self.fix_insert(node);
        }
        true
    }

    /// Removes the given value from the tree.
    ///
    /// Returns `false` when the value is not present (the tree is left
    /// untouched), `true` after an actual removal.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::redblack::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1);
    ///
    /// assert!(tree.remove(&1));
    /// assert!(!tree.remove(&1));
    /// assert!(tree.is_empty());
    /// ```
    pub fn remove(&mut self, value: &T) -> bool
    where
        T: Ord,
    {
        let Some(node) = self.find_node(value) else {
            return false;
        };
        // SAFETY: `find_node` only hands out nodes of this tree.
        unsafe { self.remove_node(node) };
        self.size -= 1;
        true
    }

    /// Returns whether the given value is stored in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::redblack::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1);
    ///
    /// assert!(tree.contains(&1));
    /// assert!(!tree.contains(&42));
    /// ```
    pub fn contains(&self, value: &T) -> bool
    where
        T: Ord,
    {
        self.find_node(value).is_some()
    }

    /// The smallest value in the tree, or `None` when empty.
    pub fn min(&self) -> Option<&T> {
        let mut current = self.root.node()?;
        while let Some(left) = current.left.node() {
            current = left;
        }
        Some(&current.value)
    }

    /// The largest value in the tree, or `None` when empty.
    pub fn max(&self) -> Option<&T> {
        let mut current = self.root.node()?;
        while let Some(right) = current.right.node() {
            current = right;
        }
        Some(&current.value)
    }

    /// The next value in sorted order after `value`, or `None` when `value`
    /// is absent or already the maximum.
    pub fn successor(&self, value: &T) -> Option<&T>
    where
        T: Ord,
    {
        let node = self.search_node(value)?;
        if let Some(mut current) = node.right.node() {
            while let Some(left) = current.left.node() {
                current = left;
            }
            return Some(&current.value);
        }

        let mut successor = None;
        let mut current = self.root.node();
        while let Some(node) = current {
            match value.cmp(&node.value) {
                Ordering::Less => {
                    successor = Some(&node.value);
                    current = node.left.node();
                }
                Ordering::Greater => current = node.right.node(),
                Ordering::Equal => break,
            }
        }
        successor
    }

    /// The previous value in sorted order before `value`, or `None` when
    /// `value` is absent or already the minimum.
    pub fn predecessor(&self, value: &T) -> Option<&T>
    where
        T: Ord,
    {
        let node = self.search_node(value)?;
        if let Some(mut current) = node.left.node() {
            while let Some(right) = current.right.node() {
                current = right;
            }
            return Some(&current.value);
        }

        let mut predecessor = None;
        let mut current = self.root.node();
        while let Some(node) = current {
            match value.cmp(&node.value) {
                Ordering::Greater => {
                    predecessor = Some(&node.value);
                    current = node.right.node();
                }
                Ordering::Less => current = node.left.node(),
                Ordering::Equal => break,
            }
        }
        predecessor
    }

    /// The values in ascending order (left, root, right).
    pub fn in_order(&self) -> Vec<&T> {
        let mut result = Vec::with_capacity(self.size);
        Self::in_order_into(self.root.node(), &mut result);
        result
    }

    /// The values in root-first order (root, left, right).
    pub fn pre_order(&self) -> Vec<&T> {
        let mut result = Vec::with_capacity(self.size);
        Self::pre_order_into(self.root.node(), &mut result);
        result
    }

    /// The values in children-first order (left, right, root).
    pub fn post_order(&self) -> Vec<&T> {
        let mut result = Vec::with_capacity(self.size);
        Self::post_order_into(self.root.node(), &mut result);
        result
    }

    /// The values level by level, left to right within each level.
    pub fn level_order(&self) -> Vec<&T> {
        let mut result = Vec::with_capacity(self.size);
        let mut queue = VecDeque::new();
        if let Some(root) = self.root.node() {
            queue.push_back(root);
        }
        while let Some(node) = queue.pop_front() {
            result.push(&node.value);
            if let Some(left) = node.left.node() {
                queue.push_back(left);
            }
            if let Some(right) = node.right.node() {
                queue.push_back(right);
            }
        }
        result
    }

    /// A sorted, owned snapshot of the stored values.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.in_order().into_iter().cloned().collect()
    }

    /// The number of values stored in the tree.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns whether the tree holds no values.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Drops every value, leaving an empty tree.
    pub fn clear(&mut self) {
        if let Some(mut root) = self.root.0.take() {
            // SAFETY: we own the root and just unlinked it, so it is freed
            // exactly once; its drop glue frees the rest of the tree.
            unsafe { drop(Box::from_raw(root.as_mut())) };
        }
        self.size = 0;
    }

    /// The height of the tree counted in edges: -1 when empty, 0 for a
    /// single node.
    pub fn height(&self) -> isize {
        Self::height_below(self.root.node())
    }

    /// The number of edges between the root and the node holding `value`,
    /// or `None` when the value is absent. The root itself has depth 0.
    pub fn depth(&self, value: &T) -> Option<usize>
    where
        T: Ord,
    {
        let mut depth = 0;
        let mut current = self.root.node();
        while let Some(node) = current {
            match value.cmp(&node.value) {
                Ordering::Equal => return Some(depth),
                Ordering::Less => current = node.left.node(),
                Ordering::Greater => current = node.right.node(),
            }
            depth += 1;
        }
        None
    }

    /// The number of nodes with no children.
    pub fn leaf_count(&self) -> usize {
        Self::count_leaves(self.root.node())
    }

    /// The number of nodes with at least one child.
    pub fn internal_count(&self) -> usize {
        self.size - self.leaf_count()
    }

    /// The values of every node at the given depth, left to right.
    /// Level 0 is the root.
    pub fn nodes_at_level(&self, level: usize) -> Vec<&T> {
        let mut result = Vec::new();
        Self::collect_at_level(self.root.node(), 0, level, &mut result);
        result
    }

    /// The number of children (0, 1, or 2) of the node holding `value`, or
    /// `None` when the value is absent.
    pub fn degree(&self, value: &T) -> Option<usize>
    where
        T: Ord,
    {
        self.search_node(value).map(Node::child_count)
    }

    /// Returns whether `value` is stored in a node with no children.
    /// Absent values are not leaves.
    pub fn is_leaf(&self, value: &T) -> bool
    where
        T: Ord,
    {
        self.search_node(value).map_or(false, Node::is_leaf)
    }

    /// The values of the direct children of the node holding `value`
    /// (left first). Empty when the value is absent or stored in a leaf.
    pub fn children(&self, value: &T) -> Vec<&T>
    where
        T: Ord,
    {
        let mut children = Vec::new();
        if let Some(node) = self.search_node(value) {
            if let Some(left) = node.left.node() {
                children.push(&left.value);
            }
            if let Some(right) = node.right.node() {
                children.push(&right.value);
            }
        }
        children
    }

    /// The value of the parent of the node holding `value`, or `None` when
    /// the value is absent or stored at the root. Answered directly from
    /// the node's parent back-reference.
    pub fn parent(&self, value: &T) -> Option<&T>
    where
        T: Ord,
    {
        let node = self.search_node(value)?;
        node.parent.node().map(|parent| &parent.value)
    }

    /// The color of the node holding `value`, or `None` when the value is
    /// absent.
    pub fn color(&self, value: &T) -> Option<Color>
    where
        T: Ord,
    {
        self.search_node(value).map(|node| node.color)
    }

    /// Returns whether `value` is stored in a red node.
    /// Absent values are neither red nor black.
    pub fn is_red(&self, value: &T) -> bool
    where
        T: Ord,
    {
        self.color(value) == Some(Color::Red)
    }

    /// Returns whether `value` is stored in a black node.
    /// Absent values are neither red nor black.
    pub fn is_black(&self, value: &T) -> bool
    where
        T: Ord,
    {
        self.color(value) == Some(Color::Black)
    }

    /// The value of the sibling of the node holding `value` (the other
    /// child of its parent), or `None` when the value is absent, at the
    /// root, or the parent has a single child.
    pub fn sibling(&self, value: &T) -> Option<&T>
    where
        T: Ord,
    {
        self.search_node(value)?
            .sibling()
            .map(|sibling| &sibling.value)
    }

    /// The value of the uncle of the node holding `value` (the sibling of
    /// its parent), or `None` when the value is absent or no uncle exists.
    pub fn uncle(&self, value: &T) -> Option<&T>
    where
        T: Ord,
    {
        self.search_node(value)?.uncle().map(|uncle| &uncle.value)
    }

    /// Returns whether every node satisfies the AVL-style height-balance
    /// bound. A valid red-black tree is *not* necessarily height-balanced,
    /// so this can legitimately report `false`; it answers the stricter
    /// question.
    pub fn is_balanced(&self) -> bool {
        Self::balanced_height(self.root.node()).is_some()
    }

    /// Returns whether the tree is a valid red-black tree: BST ordering
    /// within open bounds, a black root, no red node with a red child, and
    /// a uniform black-height across all paths.
    pub fn is_valid_red_black(&self) -> bool
    where
        T: Ord,
    {
        let root = self.root.node();
        if root.map_or(false, |node| node.color == Color::Red) {
            return false;
        }
        Self::validate(root, None, None) && Self::black_height(root).is_some()
    }

    fn find_node(&self, value: &T) -> Option<NonNull<Node<T>>>
    where
        T: Ord,
    {
        let mut current = self.root.0;
        while let Some(ptr) = current {
            // SAFETY: links point at live nodes; nothing mutates the tree
            // while this shared borrow is alive.
            let node = unsafe { ptr.as_ref() };
            match value.cmp(&node.value) {
                Ordering::Less => current = node.left.0,
                Ordering::Greater => current = node.right.0,
                Ordering::Equal => return Some(ptr),
            }
        }
        None
    }

    fn search_node(&self, value: &T) -> Option<&Node<T>>
    where
        T: Ord,
    {
        // SAFETY: the pointer comes from this tree and the returned borrow
        // is tied to `&self`, so the node outlives it.
        self.find_node(value).map(|ptr| unsafe { &*ptr.as_ptr() })
    }

    /// Restores the red-black invariants after `node` was inserted red.
    ///
    /// # Safety
    ///
    /// `node` must point at a live node of this tree whose parent chain is
    /// intact.
    unsafe fn fix_insert(&mut self, node: NonNull<Node<T>>) {
        let mut current = node;
        while self.root.0 != Some(current) {
            let Some(parent) = (*current.as_ptr()).parent.0 else {
                break;
            };
            if (*parent.as_ptr()).color == Color::Black {
                break;
            }
            // A red parent is never the root, so the grandparent exists.
            let grandparent = (*parent.as_ptr())
                .parent
                .0
                .expect("red parent has a parent");
            if Some(parent) == (*grandparent.as_ptr()).left.0 {
                let uncle = (*grandparent.as_ptr()).right.0;
                match uncle {
                    Some(uncle) if (*uncle.as_ptr()).color == Color::Red => {
                        // Red uncle: push the blackness one level down from
                        // the grandparent and retry from there.
                        (*parent.as_ptr()).color = Color::Black;
                        (*uncle.as_ptr()).color = Color::Black;
                        (*grandparent.as_ptr()).color = Color::Red;
                        current = grandparent;
                    }
                    _ => {
                        if Some(current) == (*parent.as_ptr()).right.0 {
                            // Inner grandchild: rotate it outward first.
                            self.rotate_left(parent);
                            current = parent;
                        }
                        let parent = (*current.as_ptr())
                            .parent
                            .0
                            .expect("outer grandchild has a parent");
                        (*parent.as_ptr()).color = Color::Black;
                        (*grandparent.as_ptr()).color = Color::Red;
                        self.rotate_right(grandparent);
                    }
                }
            } else {
                let uncle = (*grandparent.as_ptr()).left.0;
                match uncle {
                    Some(uncle) if (*uncle.as_ptr()).color == Color::Red => {
                        (*parent.as_ptr()).color = Color::Black;
                        (*uncle.as_ptr()).color = Color::Black;
                        (*grandparent.as_ptr()).color = Color::Red;
                        current = grandparent;
                    }
                    _ => {
                        if Some(current) == (*parent.as_ptr()).left.0 {
                            self.rotate_right(parent);
                            current = parent;
                        }
                        let parent = (*current.as_ptr())
                            .parent
                            .0
                            .expect("outer grandchild has a parent");
                        (*parent.as_ptr()).color = Color::Black;
                        (*grandparent.as_ptr()).color = Color::Red;
                        self.rotate_left(grandparent);
                    }
                }
            }
        }
        if let Some(root) = self.root.0 {
            (*root.as_ptr()).color = Color::Black;
        }
    }

    /// Unlinks `node` from the tree and frees it. The in-order successor is
    /// transplanted into a two-children victim's position and takes over its
    /// color; the color that physically left the tree decides whether the
    /// delete fix-up must run.
    ///
    /// # Safety
    ///
    /// `node` must point at a live node of this tree.
    unsafe fn remove_node(&mut self, node: NonNull<Node<T>>) {
        let mut removed_color = (*node.as_ptr()).color;
        let replacement;
        let replacement_parent;

        if (*node.as_ptr()).left.0.is_none() {
            replacement = (*node.as_ptr()).right;
            replacement_parent = (*node.as_ptr()).parent;
            self.transplant(node, (*node.as_ptr()).right);
        } else if (*node.as_ptr()).right.0.is_none() {
            replacement = (*node.as_ptr()).left;
            replacement_parent = (*node.as_ptr()).parent;
            self.transplant(node, (*node.as_ptr()).left);
        } else {
            let successor = Self::min_node(
                (*node.as_ptr())
                    .right
                    .0
                    .expect("node with two children has a right child"),
            );
            removed_color = (*successor.as_ptr()).color;
            replacement = (*successor.as_ptr()).right;
            if (*successor.as_ptr()).parent.0 == Some(node) {
                replacement_parent = Link(Some(successor));
            } else {
                replacement_parent = (*successor.as_ptr()).parent;
                self.transplant(successor, (*successor.as_ptr()).right);
                (*successor.as_ptr()).right = (*node.as_ptr()).right;
                if let Some(right) = (*successor.as_ptr()).right.0 {
                    (*right.as_ptr()).parent = Link(Some(successor));
                }
            }
            self.transplant(node, Link(Some(successor)));
            (*successor.as_ptr()).left = (*node.as_ptr()).left;
            if let Some(left) = (*successor.as_ptr()).left.0 {
                (*left.as_ptr()).parent = Link(Some(successor));
            }
            (*successor.as_ptr()).color = (*node.as_ptr()).color;
        }

        // Detach the children before freeing so the node's drop glue does
        // not follow links that now belong elsewhere.
        (*node.as_ptr()).left = Link(None);
        (*node.as_ptr()).right = Link(None);
        drop(Box::from_raw(node.as_ptr()));

        if removed_color == Color::Black {
            self.fix_remove(replacement, replacement_parent);
        }
    }

    /// Restores the red-black invariants after a black position left the
    /// tree.
    ///
    /// `node` is the replacement that inherited the removed position. It may
    /// be absent - a nil child, conceptually black - which is why its parent
    /// is threaded alongside instead of being read through it.
    ///
    /// # Safety
    ///
    /// `node` and `parent` must be links of this tree, with `parent` the
    /// parent of `node`'s position.
    unsafe fn fix_remove(&mut self, mut node: Link<T>, mut parent: Link<T>) {
        while node.0 != self.root.0 && Self::is_black_link(node) {
            let Some(p) = parent.0 else {
                break;
            };
            if node.0 == (*p.as_ptr()).left.0 {
                let mut sibling = (*p.as_ptr())
                    .right
                    .0
                    .expect("black-height demands a sibling");
                if (*sibling.as_ptr()).color == Color::Red {
                    // Red sibling: rotate it above the parent so the cases
                    // below see a black one.
                    (*sibling.as_ptr()).color = Color::Black;
                    (*p.as_ptr()).color = Color::Red;
                    self.rotate_left(p);
                    sibling = (*p.as_ptr())
                        .right
                        .0
                        .expect("rotation keeps a sibling in place");
                }
                if Self::is_black_link((*sibling.as_ptr()).left)
                    && Self::is_black_link((*sibling.as_ptr()).right)
                {
                    // Both nephews black: bleach the sibling and push the
                    // deficit up to the parent.
                    (*sibling.as_ptr()).color = Color::Red;
                    node = Link(Some(p));
                    parent = (*p.as_ptr()).parent;
                } else {
                    if Self::is_black_link((*sibling.as_ptr()).right) {
                        // Far nephew black: rotate the sibling so it turns
                        // red.
                        if let Some(near) = (*sibling.as_ptr()).left.0 {
                            (*near.as_ptr()).color = Color::Black;
                        }
                        (*sibling.as_ptr()).color = Color::Red;
                        self.rotate_right(sibling);
                        sibling = (*p.as_ptr())
                            .right
                            .0
                            .expect("rotation keeps a sibling in place");
                    }
                    (*sibling.as_ptr()).color = (*p.as_ptr()).color;
                    (*p.as_ptr()).color = Color::Black;
                    if let Some(far) = (*sibling.as_ptr()).right.0 {
                        (*far.as_ptr()).color = Color::Black;
                    }
                    self.rotate_left(p);
                    node = self.root;
                    parent = Link(None);
                }
            } else {
                let mut sibling = (*p.as_ptr())
                    .left
                    .0
                    .expect("black-height demands a sibling");
                if (*sibling.as_ptr()).color == Color::Red {
                    (*sibling.as_ptr()).color = Color::Black;
                    (*p.as_ptr()).color = Color::Red;
                    self.rotate_right(p);
                    sibling = (*p.as_ptr())
                        .left
                        .0
                        .expect("rotation keeps a sibling in place");
                }
                if Self::is_black_link((*sibling.as_ptr()).right)
                    && Self::is_black_link((*sibling.as_ptr()).left)
                {
                    (*sibling.as_ptr()).color = Color::Red;
                    node = Link(Some(p));
                    parent = (*p.as_ptr()).parent;
                } else {
                    if Self::is_black_link((*sibling.as_ptr()).left) {
                        if let Some(near) = (*sibling.as_ptr()).right.0 {
                            (*near.as_ptr()).color = Color::Black;
                        }
                        (*sibling.as_ptr()).color = Color::Red;
                        self.rotate_left(sibling);
                        sibling = (*p.as_ptr())
                            .left
                            .0
                            .expect("rotation keeps a sibling in place");
                    }
                    (*sibling.as_ptr()).color = (*p.as_ptr()).color;
                    (*p.as_ptr()).color = Color::Black;
                    if let Some(far) = (*sibling.as_ptr()).left.0 {
                        (*far.as_ptr()).color = Color::Black;
                    }
                    self.rotate_right(p);
                    node = self.root;
                    parent = Link(None);
                }
            }
        }
        if let Some(node) = node.0 {
            (*node.as_ptr()).color = Color::Black;
        }
    }

    /// Replaces the subtree rooted at `old` with the (possibly absent)
    /// subtree rooted at `new` in `old`'s parent. `old`'s own links are
    /// left untouched.
    ///
    /// # Safety
    ///
    /// `old` must point at a live node of this tree; `new` must be a link
    /// of this tree or absent.
    unsafe fn transplant(&mut self, old: NonNull<Node<T>>, new: Link<T>) {
        match (*old.as_ptr()).parent.0 {
            None => self.root = new,
            Some(parent) => {
                if (*parent.as_ptr()).left.0 == Some(old) {
                    (*parent.as_ptr()).left = new;
                } else {
                    (*parent.as_ptr()).right = new;
                }
            }
        }
        if let Some(new) = new.0 {
            (*new.as_ptr()).parent = (*old.as_ptr()).parent;
        }
    }

    /// Rotates the subtree at `x` to the left: `x`'s right child takes its
    /// place, `x` becomes that child's left child, and the child's old left
    /// subtree moves under `x`. Parent links and, if needed, the tree root
    /// are updated.
    ///
    /// # Safety
    ///
    /// `x` must point at a live node of this tree with a right child.
    unsafe fn rotate_left(&mut self, x: NonNull<Node<T>>) {
        let y = (*x.as_ptr())
            .right
            .0
            .expect("cannot rotate left without a right child");
        (*x.as_ptr()).right = (*y.as_ptr()).left;
        if let Some(middle) = (*y.as_ptr()).left.0 {
            (*middle.as_ptr()).parent = Link(Some(x));
        }
        (*y.as_ptr()).parent = (*x.as_ptr()).parent;
        match (*x.as_ptr()).parent.0 {
            None => self.root = Link(Some(y)),
            Some(parent) => {
                if (*parent.as_ptr()).left.0 == Some(x) {
                    (*parent.as_ptr()).left = Link(Some(y));
                } else {
                    (*parent.as_ptr()).right = Link(Some(y));
                }
            }
        }
        (*y.as_ptr()).left = Link(Some(x));
        (*x.as_ptr()).parent = Link(Some(y));
    }

    /// Mirror of [`rotate_left`][Self::rotate_left].
    ///
    /// # Safety
    ///
    /// `y` must point at a live node of this tree with a left child.
    unsafe fn rotate_right(&mut self, y: NonNull<Node<T>>) {
        let x = (*y.as_ptr())
            .left
            .0
            .expect("cannot rotate right without a left child");
        (*y.as_ptr()).left = (*x.as_ptr()).right;
        if let Some(middle) = (*x.as_ptr()).right.0 {
            (*middle.as_ptr()).parent = Link(Some(y));
        }
        (*x.as_ptr()).parent = (*y.as_ptr()).parent;
        match (*y.as_ptr()).parent.0 {
            None => self.root = Link(Some(x)),
            Some(parent) => {
                if (*parent.as_ptr()).right.0 == Some(y) {
                    (*parent.as_ptr()).right = Link(Some(x));
                } else {
                    (*parent.as_ptr()).left = Link(Some(x));
                }
            }
        }
        (*x.as_ptr()).right = Link(Some(y));
        (*y.as_ptr()).parent = Link(Some(x));
    }

    /// Absent children count as black.
    unsafe fn is_black_link(link: Link<T>) -> bool {
        link.0.map_or(true, |node| (*node.as_ptr()).color == Color::Black)
    }

    /// # Safety
    ///
    /// `node` must point at a live node.
    unsafe fn min_node(mut node: NonNull<Node<T>>) -> NonNull<Node<T>> {
        while let Some(left) = (*node.as_ptr()).left.0 {
            node = left;
        }
        node
    }

    fn height_below(node: Option<&Node<T>>) -> isize {
        match node {
            None => -1,
            Some(node) => {
                1 + Self::height_below(node.left.node()).max(Self::height_below(node.right.node()))
            }
        }
    }

    fn count_leaves(node: Option<&Node<T>>) -> usize {
        match node {
            None => 0,
            Some(node) if node.is_leaf() => 1,
            Some(node) => {
                Self::count_leaves(node.left.node()) + Self::count_leaves(node.right.node())
            }
        }
    }

    fn collect_at_level<'a>(
        node: Option<&'a Node<T>>,
        current: usize,
        target: usize,
        result: &mut Vec<&'a T>,
    ) {
        let Some(node) = node else { return };
        if current == target {
            result.push(&node.value);
            return;
        }
        Self::collect_at_level(node.left.node(), current + 1, target, result);
        Self::collect_at_level(node.right.node(), current + 1, target, result);
    }

    /// Recomputed height of a height-balanced subtree, or `None` as soon as
    /// any subtree violates the bound. A `None` poisons all ancestors.
    fn balanced_height(node: Option<&Node<T>>) -> Option<usize> {
        let Some(node) = node else { return Some(0) };
        let left = Self::balanced_height(node.left.node())?;
        let right = Self::balanced_height(node.right.node())?;
        if left.abs_diff(right) > 1 {
            return None;
        }
        Some(1 + left.max(right))
    }

    /// Black nodes on every path below (and excluding) this position, or
    /// `None` when two paths disagree. A `None` poisons all ancestors. Nil
    /// children count one black node.
    fn black_height(node: Option<&Node<T>>) -> Option<usize> {
        let Some(node) = node else { return Some(1) };
        let left = Self::black_height(node.left.node())?;
        let right = Self::black_height(node.right.node())?;
        if left != right {
            return None;
        }
        Some(left + usize::from(node.color == Color::Black))
    }

    fn validate(node: Option<&Node<T>>, min: Option<&T>, max: Option<&T>) -> bool
    where
        T: Ord,
    {
        let Some(node) = node else { return true };
        if min.map_or(false, |min| node.value <= *min) {
            return false;
        }
        if max.map_or(false, |max| node.value >= *max) {
            return false;
        }
        if node.color == Color::Red
            && (node.left.node().map_or(false, |n| n.color == Color::Red)
                || node.right.node().map_or(false, |n| n.color == Color::Red))
        {
            return false;
        }
        Self::validate(node.left.node(), min, Some(&node.value))
            && Self::validate(node.right.node(), Some(&node.value), max)
    }

    fn in_order_into<'a>(node: Option<&'a Node<T>>, result: &mut Vec<&'a T>) {
        if let Some(node) = node {
            Self::in_order_into(node.left.node(), result);
            result.push(&node.value);
            Self::in_order_into(node.right.node(), result);
        }
    }

    fn pre_order_into<'a>(node: Option<&'a Node<T>>, result: &mut Vec<&'a T>) {
        if let Some(node) = node {
            result.push(&node.value);
            Self::pre_order_into(node.left.node(), result);
            Self::pre_order_into(node.right.node(), result);
        }
    }

    fn post_order_into<'a>(node: Option<&'a Node<T>>, result: &mut Vec<&'a T>) {
        if let Some(node) = node {
            Self::post_order_into(node.left.node(), result);
            Self::post_order_into(node.right.node(), result);
            result.push(&node.value);
        }
    }
}
