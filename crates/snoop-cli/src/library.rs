//! Locating the preload library and building the preload variable.
//!
//! The layer only hooks `LD_PRELOAD` loading on Linux, so only the ELF
//! library name is looked for.

use anyhow::Result;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

pub const LIBRARY_FILE: &str = "libsnoop_inception_layer.so";

pub const PRELOAD_VAR: &str = "LD_PRELOAD";

/// Find the layer library.
///
/// An explicit path must exist. Otherwise looks next to the running binary,
/// in `../lib` beside it, then under `target/{release,debug}` of the current
/// directory.
pub fn find_layer_library(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        anyhow::bail!("Layer library not found: {}", path.display());
    }

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));
    let cwd = std::env::current_dir().ok();
    let candidates = library_candidates(exe_dir.as_deref(), cwd.as_deref());

    for candidate in &candidates {
        if candidate.exists() {
            return Ok(candidate.clone());
        }
    }

    anyhow::bail!(
        "Could not find the snoop layer library.\n\
        Build with: cargo build -p snoop-inception-layer --release\n\
        or pass --library / set SNOOPLIB_LIBRARY.\n\
        Looked in: {}",
        candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
}

fn library_candidates(exe_dir: Option<&Path>, cwd: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = exe_dir {
        candidates.push(dir.join(LIBRARY_FILE));
        // Test binaries live one level down, in target/<profile>/deps.
        if let Some(parent) = dir.parent() {
            candidates.push(parent.join(LIBRARY_FILE));
            candidates.push(parent.join("lib").join(LIBRARY_FILE));
        }
    }
    if let Some(cwd) = cwd {
        candidates.push(cwd.join("target/release").join(LIBRARY_FILE));
        candidates.push(cwd.join("target/debug").join(LIBRARY_FILE));
    }
    candidates
}

/// Our library goes first so it wins symbol lookup over other preloads.
pub fn preload_value(library: &Path, existing: Option<&OsStr>) -> OsString {
    let mut value = library.as_os_str().to_os_string();
    if let Some(existing) = existing.filter(|v| !v.is_empty()) {
        value.push(":");
        value.push(existing);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_explicit_library_must_exist() {
        let dir = tempdir().unwrap();
        let lib = dir.path().join(LIBRARY_FILE);
        assert!(find_layer_library(Some(&lib)).is_err());

        std::fs::write(&lib, b"").unwrap();
        assert_eq!(find_layer_library(Some(&lib)).unwrap(), lib);
    }

    #[test]
    fn test_candidates_order() {
        let candidates = library_candidates(
            Some(Path::new("/opt/snoop/bin")),
            Some(Path::new("/work")),
        );
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/opt/snoop/bin").join(LIBRARY_FILE),
                PathBuf::from("/opt/snoop").join(LIBRARY_FILE),
                PathBuf::from("/opt/snoop/lib").join(LIBRARY_FILE),
                PathBuf::from("/work/target/release").join(LIBRARY_FILE),
                PathBuf::from("/work/target/debug").join(LIBRARY_FILE),
            ]
        );
    }

    #[test]
    fn test_preload_value_prepends() {
        let lib = Path::new("/lib/libsnoop.so");
        assert_eq!(preload_value(lib, None), OsString::from("/lib/libsnoop.so"));
        assert_eq!(
            preload_value(lib, Some(OsStr::new(""))),
            OsString::from("/lib/libsnoop.so")
        );
        assert_eq!(
            preload_value(lib, Some(OsStr::new("/lib/other.so"))),
            OsString::from("/lib/libsnoop.so:/lib/other.so")
        );
    }
}
