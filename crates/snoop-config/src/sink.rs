//! Writing the dump to its destination.
//!
//! A destination file gets the plain dump. Stdout, and stderr when the
//! destination is unusable, get the framed dump so it can be picked out of
//! the host's own output. Every failure is reported on stderr.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Stderr, Stdout, Write};
use std::path::{Path, PathBuf};

use snoop_trie::{write_framed, write_paths, Recorder, Trie};

use crate::Destination;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("cannot open dump destination {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Open the destination file, truncating unless `append` is set.
pub fn open_file(path: &Path, append: bool) -> Result<BufWriter<File>, SinkError> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .map_err(|source| SinkError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(BufWriter::new(file))
}

/// The standard streams a dump may fall back to.
pub struct Streams<O, E> {
    /// `None` when the host has already closed stdout.
    pub stdout: Option<O>,
    pub stderr: E,
}

impl Streams<Stdout, Stderr> {
    /// The process's own streams. Stdout counts as closed once fd 1 is, since
    /// `std::io::Stdout` silently discards writes to a closed descriptor.
    pub fn process() -> Self {
        Self {
            stdout: fd_is_open(libc::STDOUT_FILENO).then(io::stdout),
            stderr: io::stderr(),
        }
    }
}

fn fd_is_open(fd: libc::c_int) -> bool {
    // SAFETY: F_GETFD only inspects the descriptor table.
    unsafe { libc::fcntl(fd, libc::F_GETFD) != -1 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpTarget {
    File,
    Stdout,
    /// Destination unopenable or stdout closed.
    Stderr,
}

#[derive(Debug)]
pub struct DumpReport {
    pub target: DumpTarget,
    /// Component nodes in the dumped trie.
    pub nodes: usize,
    /// Lines written, or the error that cut the dump short.
    pub result: io::Result<usize>,
}

/// Write `trie` to `destination`.
pub fn write_dump<O: Write, E: Write>(
    trie: &Trie,
    destination: &Destination,
    streams: Streams<O, E>,
) -> DumpReport {
    let Streams { stdout, mut stderr } = streams;

    let (target, result) = match destination {
        Destination::File { path, append } => match open_file(path, *append) {
            Ok(mut file) => (
                DumpTarget::File,
                write_paths(trie, &mut file).and_then(|lines| file.flush().map(|()| lines)),
            ),
            Err(e) => {
                let _ = writeln!(stderr, "snooplib: {}; writing to stderr", e);
                (DumpTarget::Stderr, framed(trie, &mut stderr))
            }
        },
        Destination::Stdout => match stdout {
            Some(out) => (DumpTarget::Stdout, framed(trie, out)),
            None => {
                let _ = writeln!(stderr, "snooplib: stdout is closed; writing to stderr");
                (DumpTarget::Stderr, framed(trie, &mut stderr))
            }
        },
    };

    if let Err(e) = &result {
        let _ = writeln!(stderr, "snooplib: dump write failed: {}", e);
        let _ = stderr.flush();
    }

    DumpReport {
        target,
        nodes: trie.len(),
        result,
    }
}

fn framed<W: Write>(trie: &Trie, out: W) -> io::Result<usize> {
    let mut out = BufWriter::new(out);
    let lines = write_framed(trie, &mut out)?;
    out.flush()?;
    Ok(lines)
}

/// Finalize `recorder` and write what it holds. If nothing was recorded this
/// returns `None` without resolving the destination or touching any stream.
pub fn dump_recorder<D, O, E>(
    recorder: &Recorder,
    destination: D,
    streams: Streams<O, E>,
) -> Option<DumpReport>
where
    D: FnOnce() -> Destination,
    O: Write,
    E: Write,
{
    let trie = recorder.finalize()?;
    Some(write_dump(&trie, &destination(), streams))
}
