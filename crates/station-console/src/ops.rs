//! This module contains the guard that gates privileged backend operations
//! and the invoker that runs one guarded call per action.

use std::fmt;

use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::error::Failure;
use crate::keys::{KeyField, KeysRecord};
use crate::transport::Transport;

/// Prefix of every message produced when the ops backend cannot be reached.
pub const STUB_UNAVAILABLE: &str = "[stub] backend endpoint not available.";

/// A privileged operation exposed by the Ops panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpAction {
    GitStatus,
    GitPush,
    RenderDeploy,
}

const GIT_FIELDS: &[KeyField] = &[
    KeyField::EditModeKey,
    KeyField::GithubToken,
    KeyField::GithubRepo,
];

const DEPLOY_FIELDS: &[KeyField] = &[
    KeyField::EditModeKey,
    KeyField::GithubToken,
    KeyField::GithubRepo,
    KeyField::RenderApiKey,
];

impl OpAction {
    pub const ALL: [OpAction; 3] = [OpAction::GitStatus, OpAction::GitPush, OpAction::RenderDeploy];

    /// The identifier sent to the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            OpAction::GitStatus => "git_status",
            OpAction::GitPush => "git_push",
            OpAction::RenderDeploy => "render_deploy",
        }
    }

    /// Fields that must be non-blank, in the order they are checked.
    pub fn required_fields(self) -> &'static [KeyField] {
        match self {
            OpAction::GitStatus | OpAction::GitPush => GIT_FIELDS,
            OpAction::RenderDeploy => DEPLOY_FIELDS,
        }
    }

    pub fn endpoint(self) -> String {
        format!("/ops/{}", self.as_str())
    }
}

impl fmt::Display for OpAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardResult {
    Pass,
    Blocked(String),
}

/// Checks the action's required fields in order and reports the first blank
/// one.
pub fn guard(action: OpAction, record: &KeysRecord) -> GuardResult {
    action
        .required_fields()
        .iter()
        .find(|&&field| record.is_blank(field))
        .map(|field| GuardResult::Blocked(format!("{} missing", field.name())))
        .unwrap_or(GuardResult::Pass)
}

/// Terminal state of a single invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum OpOutcome {
    /// The guard refused; no request was made.
    Blocked(String),
    /// The backend answered with this body.
    Succeeded(Value),
    /// The request failed; carries the failure detail.
    Failed(String),
}

impl OpOutcome {
    /// The text the Ops panel shows for this outcome.
    pub fn render(&self) -> String {
        match self {
            OpOutcome::Blocked(reason) => Failure::GuardBlocked(reason.clone()).to_string(),
            OpOutcome::Succeeded(body) => {
                serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string())
            }
            OpOutcome::Failed(detail) => format!("{STUB_UNAVAILABLE}\n{detail}"),
        }
    }
}

/// Guards `action` and, if it passes, issues exactly one POST to
/// `/ops/{action}` carrying the edit key and the full record.
#[instrument(skip(record, transport))]
pub async fn run<T: Transport>(action: OpAction, record: &KeysRecord, transport: &T) -> OpOutcome {
    if let GuardResult::Blocked(reason) = guard(action, record) {
        warn!(%reason, "Ops action blocked by guard.");
        return OpOutcome::Blocked(reason);
    }

    let body = json!({
        "edit_key": record.edit_mode_key,
        "keys": record,
    });
    match transport
        .post_json(&action.endpoint(), &body, Some(record.edit_mode_key.trim()))
        .await
    {
        Ok(response) => {
            info!("Ops action completed.");
            OpOutcome::Succeeded(response)
        }
        Err(e) => {
            warn!(error = %e, "Ops backend unavailable.");
            OpOutcome::Failed(e.to_string())
        }
    }
}

/// Runs `action` and renders the outcome for display.
pub async fn invoke<T: Transport>(action: OpAction, record: &KeysRecord, transport: &T) -> String {
    run(action, record, transport).await.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_record() -> KeysRecord {
        let mut record = KeysRecord::default();
        record.github_token = "tok".to_string();
        record.github_repo = "o/r".to_string();
        record
    }

    #[test]
    fn blank_record_is_blocked_on_edit_key() {
        assert_eq!(
            guard(OpAction::RenderDeploy, &KeysRecord::blank()),
            GuardResult::Blocked("editModeKey missing".to_string())
        );
    }

    #[test]
    fn git_actions_need_token_and_repo() {
        let mut record = KeysRecord::default();
        assert_eq!(
            guard(OpAction::GitPush, &record),
            GuardResult::Blocked("githubToken missing".to_string())
        );

        record.github_token = "tok".to_string();
        record.github_repo = "  ".to_string();
        assert_eq!(
            guard(OpAction::GitPush, &record),
            GuardResult::Blocked("githubRepo missing".to_string())
        );

        record.github_repo = "o/r".to_string();
        assert_eq!(guard(OpAction::GitPush, &record), GuardResult::Pass);
        assert_eq!(guard(OpAction::GitStatus, &record), GuardResult::Pass);
    }

    #[test]
    fn deploy_also_needs_render_key() {
        let mut record = ready_record();
        assert_eq!(
            guard(OpAction::RenderDeploy, &record),
            GuardResult::Blocked("renderApiKey missing".to_string())
        );

        record.render_api_key = "rnd".to_string();
        assert_eq!(guard(OpAction::RenderDeploy, &record), GuardResult::Pass);
    }

    #[test]
    fn outcomes_render_panel_text() {
        assert_eq!(
            OpOutcome::Blocked("githubToken missing".to_string()).render(),
            "Blocked by guard: githubToken missing"
        );
        assert_eq!(
            OpOutcome::Succeeded(json!({ "ok": true })).render(),
            "{\n  \"ok\": true\n}"
        );
        assert_eq!(
            OpOutcome::Failed("/ops/git_push -> 404".to_string()).render(),
            "[stub] backend endpoint not available.\n/ops/git_push -> 404"
        );
    }

    #[test]
    fn endpoints_follow_action_ids() {
        let endpoints: Vec<String> = OpAction::ALL.iter().map(|a| a.endpoint()).collect();
        assert_eq!(
            endpoints,
            vec!["/ops/git_status", "/ops/git_push", "/ops/render_deploy"]
        );
    }
}
