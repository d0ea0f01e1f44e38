use std::iter::FusedIterator;

use super::node::{Node, OptNode};
use crate::CursorError;

/// An in-order cursor over a [`BstMap`](crate::BstMap).
///
/// Nodes carry no parent links, so the cursor remembers the ancestors whose
/// entries are still to be visited on an explicit stack.  The cursor borrows
/// the map, which rules out structural changes while it is alive.
///
/// The protocol mirrors a C++-style iterator loop: [`current`](#method.current)
/// reads the entry under the cursor, [`advance`](#method.advance) moves to the
/// next one, and comparing against [`BstMap::end`](crate::BstMap::end) tells
/// whether anything is left.
///
/// # Examples
/// ```
/// use bst_map::BstMap;
///
/// let m = BstMap::from([(2, 'b'), (1, 'a'), (3, 'c')]);
/// let mut keys = Vec::new();
/// let mut it = m.begin();
/// while it != m.end() {
///     keys.push(*it.current().unwrap().0);
///     it.advance();
/// }
/// assert_eq!(keys, [1, 2, 3]);
/// ```
pub struct Cursor<'a, K, V> {
    current: Option<&'a Node<K, V>>,
    stack: Vec<&'a Node<K, V>>,

    // true while `current` is an unread entry rather than a subtree that
    // still has to be descended
    positioned: bool,
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(super) fn start(root: Option<&'a Node<K, V>>) -> Self {
        let mut cursor = Cursor {
            current: root,
            stack: Vec::new(),
            positioned: false,
        };
        cursor.advance();
        cursor
    }

    pub(super) fn end() -> Self {
        Cursor {
            current: None,
            stack: Vec::new(),
            positioned: false,
        }
    }

    /// Returns true once every entry has been visited.
    pub fn is_exhausted(&self) -> bool {
        self.current.is_none() && self.stack.is_empty()
    }

    /// Returns true while entries remain.
    pub fn has_next(&self) -> bool {
        !self.is_exhausted()
    }

    /// Moves to the next entry in key order.
    ///
    /// Descends the leftmost chain below the current position, stacking each
    /// node passed, then resumes at the most recently stacked node.  An entry
    /// that was never read is skipped.  Advancing an exhausted cursor does
    /// nothing.
    pub fn advance(&mut self) {
        if self.positioned {
            self.current = self.current.and_then(|n| n.right.as_deref());
        }

        while let Some(n) = self.current {
            self.stack.push(n);
            self.current = n.left.as_deref();
        }

        self.current = self.stack.pop();
        self.positioned = self.current.is_some();
    }

    /// Returns the entry under the cursor.
    ///
    /// Reading an entry also points the cursor at that node's right subtree,
    /// which is what the following [`advance`](#method.advance) explores.
    /// Each position can therefore be read once: a second call before
    /// advancing fails with [`CursorError::Unpositioned`].
    pub fn current(&mut self) -> Result<(&'a K, &'a V), CursorError> {
        match self.current {
            Some(n) if self.positioned => {
                self.current = n.right.as_deref();
                self.positioned = false;
                Ok((&n.key, &n.val))
            }

            _ if self.is_exhausted() => Err(CursorError::Exhausted),

            _ => Err(CursorError::Unpositioned),
        }
    }
}

impl<'a, K, V> Clone for Cursor<'a, K, V> {
    fn clone(&self) -> Self {
        Cursor {
            current: self.current,
            stack: self.stack.clone(),
            positioned: self.positioned,
        }
    }
}

// Two cursors compare equal only when both are exhausted.  This is not a
// positional comparison; it exists to end loops against `BstMap::end()`.
impl<'a, 'b, K, V> PartialEq<Cursor<'b, K, V>> for Cursor<'a, K, V> {
    fn eq(&self, other: &Cursor<'b, K, V>) -> bool {
        self.is_exhausted() && other.is_exhausted()
    }
}

impl<'a, K, V> Iterator for Cursor<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.positioned {
            self.advance();
        }

        let entry = self.current().ok()?;
        self.advance();
        Some(entry)
    }
}

impl<'a, K, V> FusedIterator for Cursor<'a, K, V> {}

/// An iterator over the entries of a [`BstMap`](crate::BstMap), sorted by key.
pub struct Iter<'a, K, V> {
    cursor: Cursor<'a, K, V>,
    len: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(super) fn new(root: Option<&'a Node<K, V>>, len: usize) -> Self {
        Iter {
            cursor: Cursor::start(root),
            len,
        }
    }
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Iter {
            cursor: self.cursor.clone(),
            len: self.len,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.cursor.next()?;
        self.len -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

// A node whose left subtree is being walked: its entry is split off so the
// value can be handed out mutably, and its right subtree waits its turn.
type Parked<'a, K, V> = (&'a K, &'a mut V, Option<&'a mut Node<K, V>>);

/// An iterator over the entries of a [`BstMap`](crate::BstMap), sorted by key,
/// with mutable references to the values.
///
/// Walks the tree with the same explicit stack as [`Cursor`].
pub struct IterMut<'a, K, V> {
    current: Option<&'a mut Node<K, V>>,
    stack: Vec<Parked<'a, K, V>>,
    len: usize,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(super) fn new(root: Option<&'a mut Node<K, V>>, len: usize) -> Self {
        IterMut {
            current: root,
            stack: Vec::new(),
            len,
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(n) = self.current.take() {
            let Node {
                key,
                val,
                left,
                right,
            } = n;
            self.stack.push((&*key, val, right.as_deref_mut()));
            self.current = left.as_deref_mut();
        }

        let (key, val, right) = self.stack.pop()?;
        self.current = right;
        self.len -= 1;
        Some((key, val))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<'a, K, V> FusedIterator for IterMut<'a, K, V> {}

/// A consuming iterator over the entries of a [`BstMap`](crate::BstMap),
/// sorted by key.
pub struct IntoIter<K, V> {
    current: OptNode<K, V>,

    // nodes whose left subtrees have already been detached
    stack: Vec<Box<Node<K, V>>>,
    len: usize,
}

impl<K, V> IntoIter<K, V> {
    pub(super) fn new(root: OptNode<K, V>, len: usize) -> Self {
        IntoIter {
            current: root,
            stack: Vec::new(),
            len,
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(mut n) = self.current.take() {
            self.current = n.left.take();
            self.stack.push(n);
        }

        let mut n = self.stack.pop()?;
        self.current = n.right.take();
        self.len -= 1;
        let Node { key, val, .. } = *n;
        Some((key, val))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V> Drop for IntoIter<K, V> {
    fn drop(&mut self) {
        let pending =
            self.current.take().into_iter().chain(self.stack.drain(..));
        let freed: usize = pending.map(Node::destroy_subtree).sum();
        if freed > 0 {
            tracing::trace!(freed, "released unvisited nodes");
        }
    }
}
