//! Path decomposition.
//!
//! A path is split on `/` and `\` into raw byte components. Nothing is
//! normalized: `.`, `..` and repeated separators come out as literal
//! (possibly empty) components, so every input yields at least one component.

use crate::hash::sdbm;
use std::iter::FusedIterator;

#[inline]
pub fn is_separator(b: u8) -> bool {
    b == b'/' || b == b'\\'
}

/// Which root a path hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Path began with a separator.
    Absolute,
    Relative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component<'a> {
    pub name: &'a [u8],
    pub hash: u64,
}

impl<'a> Component<'a> {
    pub fn new(name: &'a [u8]) -> Self {
        Self {
            name,
            hash: sdbm(name),
        }
    }
}

/// Iterator over the components of one path.
#[derive(Debug, Clone)]
pub struct Components<'a> {
    rest: Option<&'a [u8]>,
}

impl<'a> Iterator for Components<'a> {
    type Item = Component<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;
        match rest.iter().position(|&b| is_separator(b)) {
            Some(i) => {
                self.rest = Some(&rest[i + 1..]);
                Some(Component::new(&rest[..i]))
            }
            None => {
                self.rest = None;
                Some(Component::new(rest))
            }
        }
    }
}

impl FusedIterator for Components<'_> {}

/// Split `path` into its anchor and components.
///
/// Exactly one leading separator is consumed for absolute paths. `""` is a
/// single empty relative component and `"/"` a single empty absolute one.
pub fn split(path: &[u8]) -> (Anchor, Components<'_>) {
    match path.first() {
        Some(&b) if is_separator(b) => (
            Anchor::Absolute,
            Components {
                rest: Some(&path[1..]),
            },
        ),
        _ => (Anchor::Relative, Components { rest: Some(path) }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(path: &str) -> (Anchor, Vec<String>) {
        let (anchor, comps) = split(path.as_bytes());
        let names = comps
            .map(|c| String::from_utf8(c.name.to_vec()).unwrap())
            .collect();
        (anchor, names)
    }

    #[test]
    fn test_absolute_path() {
        assert_eq!(
            names("/usr/bin/ls"),
            (Anchor::Absolute, vec!["usr".into(), "bin".into(), "ls".into()])
        );
    }

    #[test]
    fn test_relative_path_keeps_first_byte() {
        assert_eq!(
            names("usr/bin"),
            (Anchor::Relative, vec!["usr".into(), "bin".into()])
        );
    }

    #[test]
    fn test_backslash_is_separator() {
        assert_eq!(
            names("\\a\\b/c"),
            (Anchor::Absolute, vec!["a".into(), "b".into(), "c".into()])
        );
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(names(""), (Anchor::Relative, vec!["".into()]));
        assert_eq!(names("/"), (Anchor::Absolute, vec!["".into()]));
    }

    #[test]
    fn test_literal_empty_and_dot_components() {
        assert_eq!(
            names("//a/./../"),
            (
                Anchor::Absolute,
                vec!["".into(), "a".into(), ".".into(), "..".into(), "".into()]
            )
        );
    }

    #[test]
    fn test_component_carries_hash() {
        let (_, mut comps) = split(b"/etc");
        let c = comps.next().unwrap();
        assert_eq!(c.hash, sdbm(b"etc"));
        assert!(comps.next().is_none());
        assert!(comps.next().is_none());
    }
}
