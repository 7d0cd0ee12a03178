//! # snoop-trie
//!
//! Deduplicates the paths a process opens. Paths are split into components,
//! stored in a trie with hash-bucketed sibling chains, and dumped as the set
//! of maximal paths: a recorded path is only reported if no other recorded
//! path extends it.
//!
//! ```
//! use snoop_trie::{dump, Recorder};
//!
//! let recorder = Recorder::new();
//! recorder.insert(b"/usr/bin");
//! recorder.insert(b"/usr/bin/ls");
//!
//! let trie = recorder.finalize().unwrap();
//! let mut out = Vec::new();
//! dump::write_paths(&trie, &mut out).unwrap();
//! assert_eq!(out, b"/usr/bin/ls\n");
//! ```

pub mod dump;
pub mod hash;
pub mod path;
pub mod recorder;
pub mod trie;

pub use dump::{write_framed, write_paths, write_tree, Leaves};
pub use path::{Anchor, Component, Components};
pub use recorder::{Phase, Recorder, RecorderStats};
pub use trie::{NodeId, Trie, TrieError, NODESET_BUCKETS};
