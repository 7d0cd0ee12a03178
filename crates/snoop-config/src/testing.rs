//! Test environment abstraction for isolated testing.
//!
//! Provides `TestEnvironment` to manage:
//! - An isolated fake home with a global config location
//! - A project directory with its own `.snooplib/`
//! - A unique dump destination path
//!
//! # Usage
//!
//! ```ignore
//! use snoop_config::testing::TestEnvironment;
//!
//! let env = TestEnvironment::new()?;
//! env.write_project_config("[output]\nappend = true\n")?;
//! let config = env.load_config(&[])?;
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use tempfile::TempDir;

use crate::{Config, ConfigError};

/// Atomic counter for unique test IDs
static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Isolated test environment with unique paths
pub struct TestEnvironment {
    /// Temporary directory (dropped on cleanup)
    _temp_dir: TempDir,
    /// Stand-in for `$HOME`
    pub home_dir: PathBuf,
    /// Project root for the test
    pub project_root: PathBuf,
    /// Unique dump destination for this test
    pub output_path: PathBuf,
    /// Unique test ID
    pub test_id: u32,
}

impl TestEnvironment {
    /// Create a new isolated test environment
    pub fn new() -> anyhow::Result<Self> {
        let test_id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();

        let home_dir = root.join("home");
        let project_root = root.join("project");
        std::fs::create_dir_all(home_dir.join(".snooplib"))?;
        std::fs::create_dir_all(project_root.join(".snooplib"))?;

        let output_path = root.join(format!("snoop-test-{}.txt", test_id));

        Ok(Self {
            _temp_dir: temp_dir,
            home_dir,
            project_root,
            output_path,
            test_id,
        })
    }

    pub fn global_config_path(&self) -> PathBuf {
        self.home_dir.join(".snooplib/config.toml")
    }

    pub fn project_config_path(&self) -> PathBuf {
        self.project_root.join(".snooplib/config.toml")
    }

    pub fn write_global_config(&self, contents: &str) -> anyhow::Result<PathBuf> {
        let path = self.global_config_path();
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_project_config(&self, contents: &str) -> anyhow::Result<PathBuf> {
        let path = self.project_config_path();
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// Load config from this environment's files, with `env` standing in
    /// for the process environment.
    pub fn load_config(&self, env: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let global = self.global_config_path();
        Config::load_from(Some(global.as_path()), &self.project_config_path(), |key| {
            env.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
    }

    /// Environment variables that point a child's dump at `output_path`.
    pub fn layer_env(&self) -> Vec<(String, String)> {
        let mut cfg = Config::default();
        cfg.output.path = Some(self.output_path.clone());
        cfg.layer_env()
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new().expect("Failed to create test environment")
    }
}
