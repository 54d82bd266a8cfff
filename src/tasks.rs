//! Task files: an ordered list of reconciliation requests.
//!
//! ```toml
//! [[task]]
//! type = "virtual-network"
//! name = "net1"
//! project = "admin"
//! state = "present"
//!
//! [task.definition]
//! display_name = "net1"
//! ```

use anyhow::{Context, Result, bail};
use contrailkit::{Definition, Request, ResourceIdentity, State};
use serde::Deserialize;
use std::fs;
use std::path::Path;

const DEFAULT_DOMAIN: &str = "default-domain";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Task {
    #[serde(rename = "type")]
    kind: String,
    name: String,
    project: String,
    #[serde(default = "default_domain")]
    domain: String,
    #[serde(default = "default_state")]
    state: State,
    #[serde(default)]
    definition: Definition,
}

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

const fn default_state() -> State {
    State::Present
}

impl From<Task> for Request {
    fn from(task: Task) -> Self {
        Self::new(
            task.kind,
            ResourceIdentity::new(task.name, task.project, task.domain),
            task.state,
        )
        .definition(task.definition)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TaskFile {
    #[serde(default)]
    task: Vec<Task>,
}

/// Load requests from a task file
///
/// Files ending in `.json` hold `{"task": [...]}`; anything else is TOML.
pub fn load(path: &Path) -> Result<Vec<Request>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let requests = if is_json {
        parse_json(&content)
    } else {
        parse_toml(&content)
    }
    .with_context(|| format!("Invalid task file {}", path.display()))?;

    if requests.is_empty() {
        bail!("No tasks in {}", path.display());
    }
    Ok(requests)
}

/// Parse TOML task content
pub fn parse_toml(content: &str) -> Result<Vec<Request>> {
    let file: TaskFile = toml::from_str(content)?;
    Ok(file.task.into_iter().map(Request::from).collect())
}

/// Parse JSON task content
pub fn parse_json(content: &str) -> Result<Vec<Request>> {
    let file: TaskFile = serde_json::from_str(content)?;
    Ok(file.task.into_iter().map(Request::from).collect())
}
