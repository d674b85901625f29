//! Contract fixture format and loader.
//!
//! Each file at `contracts/http/{service}/{id}.json` describes one request and the response
//! the deployment must answer with.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    pub service: String,
    /// Matches the filename stem.
    pub id: String,
    pub description: String,
    pub request: Request,
    pub expect: Expect,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Expect {
    pub status: u16,
    /// Subset match: extra response headers are allowed.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Exact JSON body.
    pub body: Option<Value>,
}

/// Load every fixture under `contracts_dir`, or only those of `service`.
pub fn load_all(contracts_dir: &Path, service: Option<&str>) -> Result<Vec<Fixture>> {
    let service_dirs = match service {
        Some(svc) => vec![contracts_dir.join(svc)],
        None => fs::read_dir(contracts_dir)
            .with_context(|| format!("cannot open {}", contracts_dir.display()))?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
            .map(|e| e.path())
            .collect(),
    };

    let mut fixtures = Vec::new();
    for dir in service_dirs.iter().filter(|d| d.is_dir()) {
        for entry in fs::read_dir(dir)
            .with_context(|| format!("cannot read {}", dir.display()))?
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                fixtures.push(load_file(&path)?);
            }
        }
    }

    fixtures.sort_by(|a, b| a.service.cmp(&b.service).then(a.id.cmp(&b.id)));
    Ok(fixtures)
}

fn load_file(path: &Path) -> Result<Fixture> {
    let content =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let fixture: Fixture = serde_json::from_str(&content)
        .with_context(|| format!("invalid fixture JSON in {}", path.display()))?;
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    if fixture.id != stem {
        anyhow::bail!("fixture id {:?} does not match file {}", fixture.id, path.display());
    }
    Ok(fixture)
}
