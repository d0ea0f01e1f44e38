use std::borrow::Borrow;
use std::cmp::Ordering::*;
use std::fmt::{Debug, Formatter};
use std::mem::replace;

pub(crate) type OptNode<K, V> = Option<Box<Node<K, V>>>;

// Reports whether a call added a node to the tree.
pub(crate) struct Inserted(pub(crate) bool);

#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) val: V,
    pub(crate) left: OptNode<K, V>,
    pub(crate) right: OptNode<K, V>,
}

impl<K, V> Node<K, V> {
    // Nodes are only ever created as leaves.
    pub(crate) fn new(key: K, val: V) -> Self {
        Node {
            key,
            val,
            left: None,
            right: None,
        }
    }

    pub(crate) fn leaf(key: K, val: V) -> Box<Self> {
        Box::new(Self::new(key, val))
    }

    /// Releases every node reachable from `self` in post-order (left subtree,
    /// right subtree, then the node) and returns how many were released.
    ///
    /// The walk keeps its own stack so that a degenerate, list-shaped tree
    /// cannot overflow the call stack.
    pub(crate) fn destroy_subtree(self: Box<Self>) -> usize {
        let mut work = vec![self];
        let mut freed = 0;

        while let Some(mut n) = work.pop() {
            let left = n.left.take();
            let right = n.right.take();

            if left.is_none() && right.is_none() {
                // a leaf with no pending children; its drop does not recurse
                drop(n);
                freed += 1;
                continue;
            }

            // revisit n once both of its subtrees are gone
            work.push(n);
            work.extend(right);
            work.extend(left);
        }

        freed
    }

    // Unlinks the rightmost (greatest) node of this subtree.  Returns the
    // remaining subtree and the detached node, which has no children.
    fn detach_max(mut self: Box<Self>) -> (OptNode<K, V>, Box<Self>) {
        match self.right.take() {
            Some(right) => {
                let (rest, max) = right.detach_max();
                self.right = rest;
                (Some(self), max)
            }

            None => (self.left.take(), self),
        }
    }

    pub(crate) fn first(&self) -> &Self {
        let mut n = self;
        while let Some(lf) = n.left.as_deref() {
            n = lf;
        }
        n
    }

    pub(crate) fn last(&self) -> &Self {
        let mut n = self;
        while let Some(rt) = n.right.as_deref() {
            n = rt;
        }
        n
    }
}

impl<K: Ord, V> Node<K, V> {
    /// Returns the value stored under `k`, growing a new leaf for it when the
    /// key is absent.  At most one node is added per call.
    pub(crate) fn find_or_create<F>(
        &mut self,
        k: K,
        make: F,
    ) -> (&mut V, Inserted)
    where
        F: FnOnce() -> V,
    {
        let child = match k.cmp(&self.key) {
            // *** EARLY RETURN ***
            Equal => return (&mut self.val, Inserted(false)),
            Less => &mut self.left,
            Greater => &mut self.right,
        };

        match child {
            Some(n) => n.find_or_create(k, make),
            None => {
                let n = child.insert(Node::leaf(k, make()));
                (&mut n.val, Inserted(true))
            }
        }
    }

    // Stores v under k and hands back the value it displaced, if any.
    pub(crate) fn insert(&mut self, k: K, v: V) -> Option<V> {
        let child = match k.cmp(&self.key) {
            Equal => return Some(replace(&mut self.val, v)),
            Less => &mut self.left,
            Greater => &mut self.right,
        };

        match child {
            Some(n) => n.insert(k, v),
            None => {
                *child = Some(Node::leaf(k, v));
                None
            }
        }
    }

    pub(crate) fn contains<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match k.cmp(self.key.borrow()) {
            Equal => true,
            Less => self.left.as_ref().is_some_and(|n| n.contains(k)),
            Greater => self.right.as_ref().is_some_and(|n| n.contains(k)),
        }
    }

    /// Removes `k` from the subtree rooted at `self`.
    ///
    /// Returns the new root of the subtree together with the removed entry.
    /// A node that has two children takes over its in-order predecessor's
    /// entry, and the predecessor's node is the one released.  When `k` is
    /// absent the subtree comes back untouched.
    pub(crate) fn erase<Q>(
        mut self: Box<Self>,
        k: &Q,
    ) -> (OptNode<K, V>, Option<(K, V)>)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match k.cmp(self.key.borrow()) {
            Less => {
                let Some(left) = self.left.take() else {
                    return (Some(self), None);
                };
                let (left, removed) = left.erase(k);
                self.left = left;
                (Some(self), removed)
            }

            Greater => {
                let Some(right) = self.right.take() else {
                    return (Some(self), None);
                };
                let (right, removed) = right.erase(k);
                self.right = right;
                (Some(self), removed)
            }

            Equal => match (self.left.take(), self.right.take()) {
                (None, right) => {
                    tracing::trace!(
                        has_right = right.is_some(),
                        "splicing out node"
                    );
                    let Node { key, val, .. } = *self;
                    (right, Some((key, val)))
                }

                (left, None) => {
                    tracing::trace!("splicing out node with a left child");
                    let Node { key, val, .. } = *self;
                    (left, Some((key, val)))
                }

                (Some(left), Some(right)) => {
                    tracing::trace!("promoting in-order predecessor");
                    let (left, pred) = left.detach_max();
                    let Node { key, val, .. } = *pred;
                    let old_key = replace(&mut self.key, key);
                    let old_val = replace(&mut self.val, val);
                    self.left = left;
                    self.right = Some(right);
                    (Some(self), Some((old_key, old_val)))
                }
            },
        }
    }
}

impl<K: Debug, V: Debug> Debug for Node<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("({{{:?}: {:?}}} ", self.key, self.val))?;

        match &self.left {
            None => f.write_str(".")?,
            Some(lf) => lf.fmt(f)?,
        }

        f.write_str(" ")?;

        match &self.right {
            None => f.write_str(".")?,
            Some(rt) => rt.fmt(f)?,
        }

        f.write_str(")")
    }
}
