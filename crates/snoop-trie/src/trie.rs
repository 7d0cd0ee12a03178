//! Component trie with hash-bucketed sibling chains.
//!
//! Every node lives in one arena and refers to others by [`NodeId`]. A node's
//! children sit in a [`Nodeset`] of [`NODESET_BUCKETS`] chain heads; names that
//! land in the same bucket are linked through `next`. Dropping the arena frees
//! the whole structure without recursion.

use crate::path::{self, Anchor, Component};
use std::collections::TryReserveError;
use thiserror::Error;

/// Buckets per nodeset.
pub const NODESET_BUCKETS: usize = 128;

#[derive(Error, Debug)]
pub enum TrieError {
    #[error("trie node index space exhausted at {0} nodes")]
    CapacityExhausted(usize),

    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
}

pub type Result<T> = std::result::Result<T, TrieError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Chain heads for the immediate children of one node.
#[derive(Debug)]
pub struct Nodeset {
    heads: [Option<NodeId>; NODESET_BUCKETS],
}

impl Nodeset {
    fn new() -> Box<Self> {
        Box::new(Self {
            heads: [None; NODESET_BUCKETS],
        })
    }

    #[inline]
    fn bucket(hash: u64) -> usize {
        (hash % NODESET_BUCKETS as u64) as usize
    }
}

#[derive(Debug)]
pub struct Node {
    name: Box<[u8]>,
    hash: u64,
    next: Option<NodeId>,
    children: Option<Box<Nodeset>>,
}

impl Node {
    fn root() -> Self {
        Self {
            name: Box::default(),
            hash: 0,
            next: None,
            children: None,
        }
    }

    pub fn name(&self) -> &[u8] {
        &self.name
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// True once any longer path through this node has been recorded.
    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }

    #[inline]
    fn matches(&self, component: &Component<'_>) -> bool {
        self.hash == component.hash && *self.name == *component.name
    }
}

const ABSOLUTE_ROOT: NodeId = NodeId(0);
const RELATIVE_ROOT: NodeId = NodeId(1);
const ROOT_COUNT: usize = 2;

/// Prefix-closed set of recorded paths.
#[derive(Debug)]
pub struct Trie {
    nodes: Vec<Node>,
    inserts: u64,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::root(), Node::root()],
            inserts: 0,
        }
    }

    pub fn root(&self, anchor: Anchor) -> NodeId {
        match anchor {
            Anchor::Absolute => ABSOLUTE_ROOT,
            Anchor::Relative => RELATIVE_ROOT,
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Number of component nodes, roots excluded.
    pub fn len(&self) -> usize {
        self.nodes.len() - ROOT_COUNT
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total `insert` calls, duplicates included.
    pub fn inserts(&self) -> u64 {
        self.inserts
    }

    /// Record `path`, creating any missing components. Returns the terminal node.
    pub fn insert(&mut self, path: &[u8]) -> Result<NodeId> {
        let (anchor, components) = path::split(path);
        self.insert_components(anchor, components)
    }

    pub(crate) fn insert_components<'a>(
        &mut self,
        anchor: Anchor,
        components: impl IntoIterator<Item = Component<'a>>,
    ) -> Result<NodeId> {
        let mut current = self.root(anchor);
        for component in components {
            current = self.child_or_insert(current, &component)?;
        }
        self.inserts += 1;
        Ok(current)
    }

    /// Look up `path` without modifying the trie.
    pub fn find(&self, path: &[u8]) -> Option<NodeId> {
        let (anchor, components) = path::split(path);
        let mut current = self.root(anchor);
        for component in components {
            current = self.find_child(current, &component)?;
        }
        Some(current)
    }

    /// Children of `id` in bucket order, then chain order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let heads: &[Option<NodeId>] = match &self.node(id).children {
            Some(set) => &set.heads,
            None => &[],
        };
        Children {
            trie: self,
            heads: heads.iter(),
            cursor: None,
        }
    }

    fn find_child(&self, parent: NodeId, component: &Component<'_>) -> Option<NodeId> {
        let set = self.node(parent).children.as_ref()?;
        let mut cursor = set.heads[Nodeset::bucket(component.hash)];
        while let Some(id) = cursor {
            let node = self.node(id);
            if node.matches(component) {
                return Some(id);
            }
            cursor = node.next;
        }
        None
    }

    fn child_or_insert(&mut self, parent: NodeId, component: &Component<'_>) -> Result<NodeId> {
        let bucket = Nodeset::bucket(component.hash);

        let mut tail = None;
        let mut cursor = self
            .node(parent)
            .children
            .as_ref()
            .and_then(|set| set.heads[bucket]);
        while let Some(id) = cursor {
            let node = self.node(id);
            if node.matches(component) {
                return Ok(id);
            }
            tail = Some(id);
            cursor = node.next;
        }

        // Allocate before linking so a failure leaves the chain untouched.
        let id = self.alloc(component)?;
        match tail {
            Some(tail) => self.nodes[tail.index()].next = Some(id),
            None => {
                self.nodes[parent.index()]
                    .children
                    .get_or_insert_with(Nodeset::new)
                    .heads[bucket] = Some(id);
            }
        }
        Ok(id)
    }

    fn alloc(&mut self, component: &Component<'_>) -> Result<NodeId> {
        let index = u32::try_from(self.nodes.len())
            .map_err(|_| TrieError::CapacityExhausted(self.nodes.len()))?;
        self.nodes.try_reserve(1)?;

        let mut name = Vec::new();
        name.try_reserve_exact(component.name.len())?;
        name.extend_from_slice(component.name);

        self.nodes.push(Node {
            name: name.into_boxed_slice(),
            hash: component.hash,
            next: None,
            children: None,
        });
        Ok(NodeId(index))
    }
}

pub struct Children<'a> {
    trie: &'a Trie,
    heads: std::slice::Iter<'a, Option<NodeId>>,
    cursor: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        loop {
            if let Some(id) = self.cursor {
                self.cursor = self.trie.node(id).next;
                return Some(id);
            }
            self.cursor = *self.heads.next()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child_names(trie: &Trie, id: NodeId) -> Vec<Vec<u8>> {
        trie.children(id)
            .map(|c| trie.node(c).name().to_vec())
            .collect()
    }

    #[test]
    fn test_new_trie_is_empty() {
        let trie = Trie::new();
        assert!(trie.is_empty());
        assert!(!trie.node(trie.root(Anchor::Absolute)).has_children());
        assert!(!trie.node(trie.root(Anchor::Relative)).has_children());
    }

    #[test]
    fn test_insert_builds_prefix_closure() {
        let mut trie = Trie::new();
        let leaf = trie.insert(b"/usr/bin/ls").unwrap();
        assert_eq!(trie.len(), 3);
        assert_eq!(trie.find(b"/usr/bin/ls"), Some(leaf));
        assert!(trie.node(trie.find(b"/usr").unwrap()).has_children());
        assert!(trie.node(trie.find(b"/usr/bin").unwrap()).has_children());
        assert!(!trie.node(leaf).has_children());
    }

    #[test]
    fn test_reinsert_reuses_nodes() {
        let mut trie = Trie::new();
        let first = trie.insert(b"/x/y").unwrap();
        let second = trie.insert(b"/x/y").unwrap();
        assert_eq!(first, second);
        assert_eq!(trie.len(), 2);
        assert_eq!(trie.inserts(), 2);
    }

    #[test]
    fn test_absolute_and_relative_are_separate() {
        let mut trie = Trie::new();
        let abs = trie.insert(b"/a").unwrap();
        let rel = trie.insert(b"a").unwrap();
        assert_ne!(abs, rel);
        assert_eq!(trie.find(b"a"), Some(rel));
        assert_eq!(trie.find(b"/a"), Some(abs));
    }

    #[test]
    fn test_find_missing_path() {
        let mut trie = Trie::new();
        trie.insert(b"/a/b").unwrap();
        assert_eq!(trie.find(b"/a/c"), None);
        assert_eq!(trie.find(b"/a/b/c"), None);
    }

    #[test]
    fn test_bucket_collision_chains_both_names() {
        // Single bytes hash to themselves: 0x61 and 0xe1 share bucket 97.
        assert_eq!(
            Nodeset::bucket(crate::hash::sdbm(b"a")),
            Nodeset::bucket(crate::hash::sdbm(b"\xe1"))
        );
        let mut trie = Trie::new();
        let a = trie.insert(b"/a").unwrap();
        let e1 = trie.insert(b"/\xe1").unwrap();
        assert_ne!(a, e1);
        assert_eq!(trie.node(a).next, Some(e1));
        assert_eq!(
            child_names(&trie, trie.root(Anchor::Absolute)),
            vec![b"a".to_vec(), b"\xe1".to_vec()]
        );
    }

    #[test]
    fn test_full_hash_collision_compares_names() {
        let mut trie = Trie::new();
        let forced = |name: &'static [u8]| Component { name, hash: 42 };
        let left = trie
            .insert_components(Anchor::Absolute, [forced(b"left")])
            .unwrap();
        let right = trie
            .insert_components(Anchor::Absolute, [forced(b"right")])
            .unwrap();
        let again = trie
            .insert_components(Anchor::Absolute, [forced(b"left")])
            .unwrap();
        assert_ne!(left, right);
        assert_eq!(left, again);
        assert_eq!(trie.len(), 2);
    }

    #[test]
    fn test_chain_order_is_stable_on_reinsert() {
        let mut trie = Trie::new();
        trie.insert(b"/a").unwrap();
        trie.insert(b"/\xe1").unwrap();
        trie.insert(b"/a").unwrap();
        assert_eq!(
            child_names(&trie, trie.root(Anchor::Absolute)),
            vec![b"a".to_vec(), b"\xe1".to_vec()]
        );
    }

    #[test]
    fn test_deep_path_does_not_recurse() {
        let mut trie = Trie::new();
        let deep = "/d".repeat(20_000);
        trie.insert(deep.as_bytes()).unwrap();
        assert_eq!(trie.len(), 20_000);
        drop(trie);
    }
}
