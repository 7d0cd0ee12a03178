//! Component hashing.

/// sdbm rolling hash over the raw bytes of one path component.
///
/// Collisions are expected; the trie resolves them with per-bucket chains.
#[inline]
pub fn sdbm(component: &[u8]) -> u64 {
    component.iter().fold(0u64, |hash, &c| {
        (c as u64)
            .wrapping_add(hash << 6)
            .wrapping_add(hash << 16)
            .wrapping_sub(hash)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_component_hashes_to_zero() {
        assert_eq!(sdbm(b""), 0);
    }

    #[test]
    fn test_single_byte_is_identity() {
        assert_eq!(sdbm(b"a"), b'a' as u64);
    }

    #[test]
    fn test_known_value() {
        // h("ab") = 'b' + ('a' << 6) + ('a' << 16) - 'a'
        let a = b'a' as u64;
        let expected = b'b' as u64 + (a << 6) + (a << 16) - a;
        assert_eq!(sdbm(b"ab"), expected);
    }

    #[test]
    fn test_long_input_wraps_without_overflow_panic() {
        let long = vec![0xffu8; 4096];
        assert_eq!(sdbm(&long), sdbm(&long));
    }
}
