use std::borrow::Borrow;
use std::cmp::Ordering::*;
use std::fmt::{Debug, Formatter};

mod cursor;
mod node;

pub use cursor::{Cursor, IntoIter, Iter, IterMut};
use node::{Node, OptNode};

use crate::CheckError;

/// A map from keys to values sorted by key.
///
/// The map is a plain binary search tree: every node owns its two subtrees,
/// and no rebalancing is ever performed.  Inserting keys in sorted order
/// therefore produces a list-shaped tree with linear lookups.  Lookups,
/// insertions, and removals recurse along the search path, so their stack
/// depth is bounded by the height of the tree.  Dropping the map does not
/// recurse.
///
/// The API follows [`std::collections::BTreeMap`] where the two overlap.  In
/// addition, [`begin`](#method.begin) and [`end`](#method.end) expose a
/// [`Cursor`] for C++-style traversal loops.
///
/// # Examples
/// ```
/// use bst_map::BstMap;
///
/// let mut m = BstMap::new();
/// *m.get_or_insert("b") += 2;
/// *m.get_or_insert("a") += 1;
/// *m.get_or_insert("b") += 2;
///
/// assert_eq!(m.get("b"), Some(&4));
/// assert!(m.iter().map(|(k, _)| *k).eq(["a", "b"]));
/// ```
#[derive(Clone)]
pub struct BstMap<K, V> {
    len: usize,
    root: OptNode<K, V>,
}

impl<K: Debug, V: Debug> Debug for BstMap<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.root {
            None => f.write_str("BstMap(EMPTY)"),
            // use Node's Debug formatter
            Some(n) => {
                f.write_fmt(format_args!("BstMap(#{}, {:?})", self.len, n))
            }
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for BstMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for BstMap<K, V> {}

impl<K, Q, V> std::ops::Index<&Q> for BstMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: Ord + ?Sized,
{
    type Output = V;

    fn index(&self, index: &Q) -> &Self::Output {
        match self.get(index) {
            Some(v) => v,
            None => panic!("Key not found in BstMap"),
        }
    }
}

impl<K, V> BstMap<K, V> {
    /// Creates a new, empty map.
    /// # Examples
    /// ```
    /// use bst_map::BstMap;
    /// let m: BstMap<usize, usize> = BstMap::new();
    /// assert!(m.is_empty());
    /// ```
    pub fn new() -> Self {
        BstMap { len: 0, root: None }
    }

    /// Drops all elements from the map.
    pub fn clear(&mut self) {
        self.len = 0;
        if let Some(root) = self.root.take() {
            let freed = root.destroy_subtree();
            tracing::trace!(freed, "cleared map");
        }
    }

    /// Returns true if self contains no entries, false otherwise.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of entries in self.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns a cursor positioned at the entry with the smallest key.
    ///
    /// The cursor of an empty map starts out exhausted.
    pub fn begin(&self) -> Cursor<'_, K, V> {
        Cursor::start(self.root.as_deref())
    }

    /// Returns an exhausted cursor that marks the end of a traversal.
    ///
    /// A cursor compares equal to `end()` exactly when it is exhausted itself.
    pub fn end(&self) -> Cursor<'_, K, V> {
        Cursor::end()
    }

    /// Creates an iterator over the map entries, sorted by key.
    ///
    /// # Examples
    /// ```
    /// use bst_map::BstMap;
    ///
    /// let m = BstMap::from([(0,1), (1,2), (2, 3)]);
    /// for (i, (k, v)) in m.iter().enumerate() {
    ///     assert_eq!(&i, k);
    ///     assert_eq!(&(i+1), v);
    /// }
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root.as_deref(), self.len)
    }

    /// Returns an iterator of the map's entries, sorted by key, with a mutable
    /// reference to each value.
    ///
    /// # Examples
    /// ```
    /// use bst_map::BstMap;
    ///
    /// let mut m = BstMap::from([(0,0), (1,1), (2,2)]);
    /// for (k, v) in m.iter_mut() {
    ///     *v += k;
    /// }
    /// assert_eq!(m.get(&0), Some(&0));
    /// assert_eq!(m.get(&1), Some(&2));
    /// assert_eq!(m.get(&2), Some(&4));
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self.root.as_deref_mut(), self.len)
    }

    /// Produces an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|p| p.0)
    }

    /// Produces an iterator over the values of the map, ordered by their
    /// associated keys.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|p| p.1)
    }

    /// Returns an iterator of mutable references to the map's values, ordered
    /// by their associated keys.
    ///
    /// # Examples
    /// ```
    /// use bst_map::BstMap;
    ///
    /// let mut m = BstMap::from([(0,0), (1,1), (2,2)]);
    /// for v in m.values_mut() {
    ///     *v *= 17;
    /// };
    /// assert_eq!(m.get(&2), Some(&34));
    /// ```
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.iter_mut().map(|p| p.1)
    }

    /// Returns the entry with the smallest key, if the map is not empty.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.root.as_ref().map(|n| {
            let n = n.first();
            (&n.key, &n.val)
        })
    }

    /// Returns the entry with the largest key, if the map is not empty.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.root.as_ref().map(|n| {
            let n = n.last();
            (&n.key, &n.val)
        })
    }
}

impl<K: Ord, V> BstMap<K, V> {
    /// Returns a mutable reference to the value stored under `key`, first
    /// adding an entry with the default value if the key is absent.
    ///
    /// This plays the part of C++'s `map[key]`.
    ///
    /// # Examples
    /// ```
    /// use bst_map::BstMap;
    ///
    /// let mut m: BstMap<char, u32> = BstMap::new();
    /// *m.get_or_insert('x') = 7;
    /// assert_eq!(*m.get_or_insert('x'), 7);
    /// assert_eq!(*m.get_or_insert('y'), 0);
    /// assert_eq!(m.len(), 2);
    /// ```
    pub fn get_or_insert(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Returns a mutable reference to the value stored under `key`, first
    /// adding an entry with the value returned by `make` if the key is absent.
    pub fn get_or_insert_with<F>(&mut self, key: K, make: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        match self.root {
            None => {
                tracing::trace!("creating root node");
                self.len = 1;
                &mut self.root.insert(Node::leaf(key, make())).val
            }

            Some(ref mut root) => {
                let (val, inserted) = root.find_or_create(key, make);
                self.len += inserted.0 as usize;
                val
            }
        }
    }

    /// Inserts a key-value pair in the map and returns the value previously
    /// stored under the key, if any.
    ///
    /// # Examples
    /// ```
    /// use bst_map::BstMap;
    ///
    /// let mut m = BstMap::new();
    /// assert_eq!(m.insert(0, "a"), None);
    /// assert_eq!(m.insert(0, "b"), Some("a"));
    /// assert_eq!(m.get(&0), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, val: V) -> Option<V> {
        let ret = match self.root.as_mut() {
            None => {
                self.root = Some(Node::leaf(key, val));
                None
            }

            Some(root) => root.insert(key, val),
        };

        self.len += ret.is_none() as usize;
        ret
    }

    /// Tests if self contains an entry for the given key.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.root.as_ref().is_some_and(|n| n.contains(key))
    }

    /// Alias of [`contains`](#method.contains) matching the std maps.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.contains(key)
    }

    /// Returns a reference to the value associated with k.
    pub fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut curr = &self.root;
        while let Some(n) = curr {
            match k.cmp(n.key.borrow()) {
                Less => curr = &n.left,
                Equal => return Some(&n.val),
                Greater => curr = &n.right,
            }
        }

        None
    }

    /// Returns a mutable reference to the value associated with k.
    ///
    /// # Example
    /// ```
    /// use bst_map::BstMap;
    ///
    /// let mut m = BstMap::new();
    /// m.insert(1, 7);
    ///
    /// *m.get_mut(&1).unwrap() = 2;
    /// assert_eq!(m.get(&1), Some(&2));
    /// ```
    pub fn get_mut<Q>(&mut self, k: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut curr = self.root.as_deref_mut();
        while let Some(n) = curr {
            match k.cmp(n.key.borrow()) {
                Less => curr = n.left.as_deref_mut(),
                Equal => return Some(&mut n.val),
                Greater => curr = n.right.as_deref_mut(),
            }
        }

        None
    }

    /// Removes the entry for `key`, if there is one.
    ///
    /// Erasing a key that is not in the map leaves the map unchanged.
    pub fn erase<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key);
    }

    /// Removes a key from a map and returns the unmapped value.
    ///
    /// # Examples
    /// ```
    /// use bst_map::BstMap;
    ///
    /// let mut m = BstMap::new();
    /// m.insert(1, 2);
    /// m.insert(2, 3);
    /// assert_eq!(m.remove(&2), Some(3));
    /// assert_eq!(m.remove(&2), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from a map and returns the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (root, removed) = self.root.take()?.erase(key);
        self.root = root;
        self.len -= removed.is_some() as usize;
        removed
    }

    /// Verifies that the keys are strictly ascending in key order and that
    /// the cached length matches the number of nodes.
    ///
    /// A map built only through this crate's API always passes; the check is
    /// meant for tests and debugging.
    pub fn check(&self) -> Result<(), CheckError> {
        let mut counted = 0;
        let mut prev: Option<&K> = None;

        for (k, _) in self.begin() {
            if prev.is_some_and(|p| p >= k) {
                return Err(CheckError::OrderViolation { position: counted });
            }
            prev = Some(k);
            counted += 1;
        }

        if counted != self.len {
            return Err(CheckError::LenMismatch {
                recorded: self.len,
                counted,
            });
        }

        Ok(())
    }

    #[cfg(test)]
    fn chk(&self) {
        assert_eq!(self.check(), Ok(()));
    }
}

impl<K, V> Drop for BstMap<K, V> {
    fn drop(&mut self) {
        if let Some(root) = self.root.take() {
            let freed = root.destroy_subtree();
            tracing::trace!(freed, "released map nodes");
        }
    }
}

impl<K, V> Default for BstMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> Extend<(K, V)> for BstMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for BstMap<K, V> {
    fn from(vs: [(K, V); N]) -> Self {
        BstMap::from_iter(vs)
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for BstMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut m = BstMap::new();
        m.extend(iter);
        m
    }
}

impl<'a, K, V> IntoIterator for &'a BstMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut BstMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V> IntoIterator for BstMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        let len = std::mem::take(&mut self.len);
        IntoIter::new(self.root.take(), len)
    }
}
