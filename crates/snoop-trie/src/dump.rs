//! Trie serialization.
//!
//! Only nodes without children are reported: a recorded path that some other
//! recorded path extends is not printed, whichever was recorded first.
//! Walking uses an explicit stack so depth is bounded by memory, not by the
//! thread's stack.

use crate::path::Anchor;
use crate::trie::{NodeId, Trie};
use std::io::{self, Write};

pub const HINT_LINE: &str = "snooplib hint: set SNOOPLIB_OUTPUT_PATH";
pub const BEGIN_MARKER: &str = "---SNOOPLIB BEGIN---";
pub const END_MARKER: &str = "---SNOOPLIB END---";

#[derive(Clone, Copy)]
struct Frame {
    id: NodeId,
    depth: usize,
    prefix_len: usize,
    anchor: Anchor,
}

/// One node as seen by the walker, with its full path rebuilt.
pub(crate) struct Visit<'w> {
    pub anchor: Anchor,
    pub depth: usize,
    pub name: &'w [u8],
    pub path: &'w [u8],
    pub is_leaf: bool,
}

/// Pre-order walk over both roots: absolute first, then relative.
pub(crate) struct Walker<'a> {
    trie: &'a Trie,
    stack: Vec<Frame>,
    path: Vec<u8>,
    scratch: Vec<NodeId>,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(trie: &'a Trie) -> Self {
        let mut walker = Self {
            trie,
            stack: Vec::new(),
            path: Vec::new(),
            scratch: Vec::new(),
        };
        walker.push_children(trie.root(Anchor::Relative), 0, 0, Anchor::Relative);
        walker.push_children(trie.root(Anchor::Absolute), 0, 0, Anchor::Absolute);
        walker
    }

    fn push_children(&mut self, parent: NodeId, depth: usize, prefix_len: usize, anchor: Anchor) {
        self.scratch.clear();
        self.scratch.extend(self.trie.children(parent));
        for &id in self.scratch.iter().rev() {
            self.stack.push(Frame {
                id,
                depth: depth + 1,
                prefix_len,
                anchor,
            });
        }
    }

    pub(crate) fn next_visit(&mut self) -> Option<Visit<'_>> {
        let frame = self.stack.pop()?;
        let trie = self.trie;
        let node = trie.node(frame.id);

        self.path.truncate(frame.prefix_len);
        if frame.anchor == Anchor::Absolute || frame.depth > 1 {
            self.path.push(b'/');
        }
        self.path.extend_from_slice(node.name());

        let is_leaf = !node.has_children();
        if !is_leaf {
            let len = self.path.len();
            self.push_children(frame.id, frame.depth, len, frame.anchor);
        }

        Some(Visit {
            anchor: frame.anchor,
            depth: frame.depth,
            name: node.name(),
            path: &self.path,
            is_leaf,
        })
    }
}

/// Iterator over the full paths of every leaf.
pub struct Leaves<'a> {
    walker: Walker<'a>,
}

impl Iterator for Leaves<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        loop {
            let visit = self.walker.next_visit()?;
            if visit.is_leaf {
                return Some(visit.path.to_vec());
            }
        }
    }
}

impl Trie {
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            walker: Walker::new(self),
        }
    }
}

/// Write one leaf path per line. Returns the number of lines written.
pub fn write_paths<W: Write + ?Sized>(trie: &Trie, out: &mut W) -> io::Result<usize> {
    let mut walker = Walker::new(trie);
    let mut lines = 0;
    while let Some(visit) = walker.next_visit() {
        if visit.is_leaf {
            out.write_all(visit.path)?;
            out.write_all(b"\n")?;
            lines += 1;
        }
    }
    Ok(lines)
}

/// [`write_paths`] wrapped in the hint line and begin/end markers, for
/// output that shares a stream with the host program.
pub fn write_framed<W: Write + ?Sized>(trie: &Trie, out: &mut W) -> io::Result<usize> {
    writeln!(out, "{}", HINT_LINE)?;
    writeln!(out, "{}", BEGIN_MARKER)?;
    let lines = write_paths(trie, out)?;
    writeln!(out, "{}", END_MARKER)?;
    Ok(lines)
}

/// Indented listing of every node. Directories (internal nodes) end in `/`;
/// relative paths are grouped under a `./` heading.
pub fn write_tree<W: Write + ?Sized>(trie: &Trie, out: &mut W) -> io::Result<usize> {
    let mut walker = Walker::new(trie);
    let mut heading = None;
    let mut leaves = 0;
    while let Some(visit) = walker.next_visit() {
        if heading != Some(visit.anchor) {
            heading = Some(visit.anchor);
            match visit.anchor {
                Anchor::Absolute => writeln!(out, "/")?,
                Anchor::Relative => writeln!(out, "./")?,
            }
        }
        for _ in 0..visit.depth {
            out.write_all(b"  ")?;
        }
        out.write_all(visit.name)?;
        if visit.is_leaf {
            leaves += 1;
            out.write_all(b"\n")?;
        } else {
            out.write_all(b"/\n")?;
        }
    }
    Ok(leaves)
}
