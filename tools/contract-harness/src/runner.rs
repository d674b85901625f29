//! Sends one fixture request and compares the response with the expectation.

use reqwest::{Client, Method};
use serde_json::Value;

use crate::fixture::Fixture;

/// Outcome of one fixture. Empty `mismatches` and no `error` means it passed.
#[derive(Debug, Default)]
pub struct RunResult {
    pub actual_status: Option<u16>,
    pub mismatches: Vec<String>,
    /// Set when the request could not be sent at all.
    pub error: Option<String>,
}

impl RunResult {
    pub fn passed(&self) -> bool {
        self.error.is_none() && self.mismatches.is_empty()
    }

    fn failed(error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }
}

pub struct Runner {
    client: Client,
    base_url: String,
}

impl Runner {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub async fn run(&self, fixture: &Fixture) -> RunResult {
        let Ok(method) = Method::from_bytes(fixture.request.method.to_uppercase().as_bytes())
        else {
            return RunResult::failed(format!("unknown HTTP method: {}", fixture.request.method));
        };

        let url = format!("{}{}", self.base_url, fixture.request.path);
        let mut req = self.client.request(method, &url);
        for (k, v) in &fixture.request.headers {
            req = req.header(k, v);
        }
        if let Some(body) = &fixture.request.body {
            req = req.json(body);
        }

        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => return RunResult::failed(e.to_string()),
        };

        let status = resp.status().as_u16();
        let mut mismatches = Vec::new();
        if status != fixture.expect.status {
            mismatches.push(format!(
                "status: expected {}, got {status}",
                fixture.expect.status
            ));
        }
        for (name, expected) in &fixture.expect.headers {
            match resp.headers().get(name.as_str()).map(|v| v.to_str()) {
                Some(Ok(actual)) if actual == expected => {}
                Some(actual) => mismatches.push(format!(
                    "header {name}: expected {expected:?}, got {:?}",
                    actual.unwrap_or("<non-utf8>")
                )),
                None => mismatches.push(format!("header {name}: missing")),
            }
        }
        if let Some(expected) = &fixture.expect.body {
            let text = resp.text().await.unwrap_or_default();
            let actual: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
            if &actual != expected {
                mismatches.push(format!("body: expected {expected}, got {actual}"));
            }
        }

        RunResult {
            actual_status: Some(status),
            mismatches,
            error: None,
        }
    }
}
