pub mod run;
pub mod state;
pub mod types;

use contrailkit::{Dispatcher, Error, Outcome, Plan, Request, State};
use std::process::ExitCode;

use crate::ui;

/// Reconcile one request, optionally printing the planned body diff
///
/// Errors are folded into their failed outcome after logging advice.
pub fn reconcile(dispatcher: &Dispatcher, request: &Request, check: bool, diff: bool) -> Outcome {
    let result = if diff && request.state != State::Query {
        planned(dispatcher, request, check)
    } else if check {
        dispatcher.reconcile_check(request)
    } else {
        dispatcher.reconcile(request)
    };

    result.unwrap_or_else(|err: Error| {
        let category = err.category();
        log::warn!("{category}: {}", category.advice());
        err.into_outcome()
    })
}

/// Plan, show the diff, then send unless checking
fn planned(dispatcher: &Dispatcher, request: &Request, check: bool) -> contrailkit::Result<Outcome> {
    let mut resource =
        dispatcher.resource_for(&request.kind, &request.name, &request.project, &request.domain)?;

    let plan: Plan = if request.state == State::Absent {
        resource.plan_delete()?
    } else {
        resource.plan_apply(&request.definition)?
    };
    ui::plan_diff(&plan);

    if check {
        Ok(plan.check_outcome())
    } else {
        resource.execute(plan)
    }
}

/// Whether any outcome in a batch failed
pub fn any_failed<'a>(outcomes: impl IntoIterator<Item = &'a Outcome>) -> bool {
    outcomes.into_iter().any(Outcome::is_failed)
}

/// Exit status for a batch of outcomes
pub fn exit_code<'a>(outcomes: impl IntoIterator<Item = &'a Outcome>) -> ExitCode {
    if any_failed(outcomes) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contrailkit::transport::MockTransport;
    use contrailkit::{Method, ResourceIdentity};
    use serde_json::json;

    fn request(state: State) -> Request {
        Request::new(
            "virtual-network",
            ResourceIdentity::new("net1", "admin", "default-domain"),
            state,
        )
    }

    #[test]
    fn test_diff_path_sends_like_plain_path() {
        let mock = MockTransport::new();
        mock.respond(Method::Post, "/fqname-to-id", 200, json!({"uuid": "abc"}));
        mock.respond(
            Method::Get,
            "/virtual-network/abc",
            200,
            json!({"virtual-network": {"uuid": "abc"}}),
        );
        mock.respond(Method::Put, "/virtual-network/abc", 200, json!({}));
        let dispatcher = Dispatcher::new(Box::new(mock.clone()));

        let outcome = reconcile(&dispatcher, &request(State::Present), false, true);
        assert!(outcome.is_changed());
        assert_eq!(outcome.msg(), "Resource updated");
        assert_eq!(mock.requests_to(Method::Put, "/virtual-network/abc").len(), 1);
    }

    #[test]
    fn test_diff_in_check_mode_sends_nothing() {
        let mock = MockTransport::new();
        mock.respond(Method::Post, "/fqname-to-id", 200, json!({"uuid": "abc"}));
        let dispatcher = Dispatcher::new(Box::new(mock.clone()));

        let outcome = reconcile(&dispatcher, &request(State::Absent), true, true);
        assert_eq!(outcome.msg(), "Resource would be deleted");
        assert!(mock.requests_to(Method::Delete, "/virtual-network/abc").is_empty());
    }

    #[test]
    fn test_diff_unknown_type_fails() {
        let mock = MockTransport::new();
        let dispatcher = Dispatcher::new(Box::new(mock.clone()));
        let mut req = request(State::Present);
        req.kind = "bogus".to_string();

        let outcome = reconcile(&dispatcher, &req, false, true);
        assert!(outcome.is_failed());
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn test_any_failed() {
        let ok = Outcome::unchanged("fine", Default::default());
        let bad = Outcome::failure("broken", Default::default());
        assert!(!any_failed([&ok]));
        assert!(any_failed(&[ok, bad]));
        assert!(!any_failed(&Vec::<Outcome>::new()));
    }
}
