//! Contract fixture loader.
//!
//! Loads golden files from `contracts/http/` so the same assertions run in-process in
//! service tests and against a deployment via `contract-harness`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

/// One HTTP assertion: the request to send and the response to expect.
#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    pub service: String,
    pub id: String,
    pub description: String,
    pub request: FixtureRequest,
    pub expect: FixtureExpect,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureRequest {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureExpect {
    pub status: u16,
    /// Exact JSON body, when the fixture pins one.
    pub body: Option<Value>,
}

impl Fixture {
    /// Load and parse a fixture at `workspace_root/relative_path`.
    ///
    /// Panics if the file is missing or invalid JSON.
    pub fn load(relative_path: &str) -> Self {
        Self::load_path(&workspace_root().join(relative_path))
    }

    fn load_path(path: &Path) -> Self {
        let contents = std::fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("fixture not found at {}: {}", path.display(), e));
        serde_json::from_str(&contents)
            .unwrap_or_else(|e| panic!("invalid fixture {}: {}", path.display(), e))
    }

    /// Load every `*.json` fixture under `contracts/http/{service}/`, sorted by id.
    pub fn load_service(service: &str) -> Vec<Self> {
        let dir = workspace_root().join("contracts/http").join(service);
        let mut fixtures: Vec<Self> = std::fs::read_dir(&dir)
            .unwrap_or_else(|e| panic!("cannot read {}: {}", dir.display(), e))
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .map(|path| Self::load_path(&path))
            .collect();
        fixtures.sort_by(|a, b| a.id.cmp(&b.id));
        fixtures
    }
}

/// Walk up from the crate under test to the workspace root (the directory holding the
/// top-level `Cargo.toml` with a `contracts/` sibling).
fn workspace_root() -> PathBuf {
    let start = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::current_dir().unwrap());
    start
        .ancestors()
        .find(|dir| dir.join("contracts").is_dir())
        .unwrap_or(&start)
        .to_path_buf()
}
