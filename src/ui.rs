//! Terminal output.
//!
//! Stdout carries machine-readable outcomes only, so every human-facing
//! message here goes to stderr.

use anyhow::Result;
use colored::Colorize;
use contrailkit::{Outcome, Plan, Request};
use serde_json::Value;

/// Print an info message
pub fn info(msg: &str) {
    eprintln!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    eprintln!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    eprintln!("  {}", msg.dimmed());
}

/// Print a step indicator
pub fn step(num: usize, total: usize, msg: &str) {
    eprintln!("{} {}", format!("[{num}/{total}]").blue().bold(), msg);
}

// ============================================================================
// Outcomes
// ============================================================================

/// Write outcome JSON to stdout
pub fn emit<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One-line label for a request, e.g. `virtual-network default-domain:admin:net1`
pub fn target(request: &Request) -> String {
    format!("{} {}", request.kind.as_str().bold(), request.identity())
}

/// Summarize an outcome on stderr
pub fn summary(request: &Request, outcome: &Outcome) {
    let label = target(request);
    if outcome.is_failed() {
        error(&format!("{label}: {}", outcome.msg()));
        let api = outcome.api();
        let method = api.method.map_or("-", |m| m.as_str());
        let status = api
            .status_code
            .map_or_else(|| "no response".to_string(), |code| code.to_string());
        dim(&format!("{method} {} → {status}", api.path));
    } else if outcome.is_changed() {
        warn(&format!("{label}: {}", outcome.msg().yellow()));
    } else {
        success(&format!("{label}: {}", outcome.msg()));
    }
}

// ============================================================================
// Diff
// ============================================================================

fn pretty(value: Option<&Value>) -> String {
    value
        .and_then(|v| serde_json::to_string_pretty(v).ok())
        .map(|text| text + "\n")
        .unwrap_or_default()
}

/// Show what a plan would send against what the controller holds now
pub fn plan_diff(plan: &Plan) {
    let Plan::Send(request) = plan else {
        dim("(nothing to send)");
        return;
    };

    eprintln!(
        "  {} {} {}",
        request.action.verb().cyan().bold(),
        request.method.as_str().bold(),
        request.path
    );

    if request.body.is_none() {
        return;
    }
    let before = pretty(request.current.as_ref());
    let after = pretty(request.body.as_ref());
    if !text_diff(&before, &after) {
        dim("(body matches current definition)");
    }
}

/// Print a line diff, returning whether anything differs
fn text_diff(before: &str, after: &str) -> bool {
    let diff = similar::TextDiff::from_lines(before, after);
    let mut has_changes = false;

    for change in diff.iter_all_changes() {
        match change.tag() {
            similar::ChangeTag::Delete => {
                has_changes = true;
                eprint!("    {}", format!("- {change}").red());
            }
            similar::ChangeTag::Insert => {
                has_changes = true;
                eprint!("    {}", format!("+ {change}").green());
            }
            similar::ChangeTag::Equal => {}
        }
    }
    has_changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pretty_ends_with_newline() {
        assert_eq!(pretty(None), "");
        assert_eq!(pretty(Some(&json!({"a": 1}))), "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn test_text_diff_detects_changes() {
        colored::control::set_override(false);
        assert!(!text_diff("a\nb\n", "a\nb\n"));
        assert!(text_diff("a\nb\n", "a\nc\n"));
        assert!(text_diff("", "a\n"));
    }
}
