//! Reading a dump back into a trie.

use anyhow::{Context, Result};
use snoop_trie::dump::{BEGIN_MARKER, END_MARKER};
use snoop_trie::Trie;

/// Rebuild a trie from dump output: either one path per line, or stdout
/// output where the paths sit between the begin/end markers.
///
/// Every line is a path, empty ones included.
pub fn parse_dump(bytes: &[u8]) -> Result<Trie> {
    let mut lines: Vec<&[u8]> = bytes.split(|&b| b == b'\n').collect();
    // A trailing newline leaves one empty piece that is not a line.
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    let begin = lines.iter().position(|l| *l == BEGIN_MARKER.as_bytes());
    let lines = match begin {
        Some(begin) => {
            let body = &lines[begin + 1..];
            let end = body
                .iter()
                .position(|l| *l == END_MARKER.as_bytes())
                .context("dump has a begin marker but no end marker")?;
            &body[..end]
        }
        None => &lines[..],
    };

    let mut trie = Trie::new();
    for (n, line) in lines.iter().enumerate() {
        trie.insert(line)
            .with_context(|| format!("failed to insert line {}", n + 1))?;
    }
    Ok(trie)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snoop_trie::dump::HINT_LINE;
    use snoop_trie::write_paths;

    fn paths(trie: &Trie) -> String {
        let mut out = Vec::new();
        write_paths(trie, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_plain_dump() {
        let trie = parse_dump(b"/usr/bin/ls\nsrc/main.rs\n").unwrap();
        assert_eq!(paths(&trie), "/usr/bin/ls\nsrc/main.rs\n");
    }

    #[test]
    fn test_framed_dump_ignores_host_output() {
        let input = format!(
            "hello from the host\n{}\n{}\n/etc/hosts\n{}\nmore output\n",
            HINT_LINE, BEGIN_MARKER, END_MARKER
        );
        let trie = parse_dump(input.as_bytes()).unwrap();
        assert_eq!(paths(&trie), "/etc/hosts\n");
    }

    #[test]
    fn test_unterminated_frame_is_an_error() {
        let input = format!("{}\n/etc/hosts\n", BEGIN_MARKER);
        assert!(parse_dump(input.as_bytes()).is_err());
    }

    #[test]
    fn test_empty_line_is_a_path() {
        let trie = parse_dump(b"/a\n\n").unwrap();
        assert_eq!(paths(&trie), "/a\n\n");
    }

    #[test]
    fn test_missing_final_newline() {
        let trie = parse_dump(b"/a/b").unwrap();
        assert_eq!(paths(&trie), "/a/b\n");
    }
}
