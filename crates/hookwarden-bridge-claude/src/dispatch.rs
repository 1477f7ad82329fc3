use crate::env::HookEnv;
use crate::error::Result;
use crate::parse::parse_hook_stdin;
use crate::{gate, skills, tracker};

// ── Hook Result ──

/// Result from a hook dispatch.
///
/// `stdout` is printed verbatim for Claude Code; hooks always exit 0.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HookResult {
    pub stdout: Option<String>,
}

impl HookResult {
    /// Construct a result with stdout output.
    pub fn output(stdout: String) -> Self {
        Self {
            stdout: Some(stdout),
        }
    }

    /// Construct an empty result (no output).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.stdout.is_none()
    }
}

impl From<Option<String>> for HookResult {
    fn from(stdout: Option<String>) -> Self {
        Self { stdout }
    }
}

/// Which handler a hook invocation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    PromptGate,
    TrackEdits,
    SkillActivation,
}

impl HookKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::PromptGate => "prompt-gate",
            Self::TrackEdits => "track-edits",
            Self::SkillActivation => "skill-activation",
        }
    }
}

// ── Hook dispatch ──

/// Main hook entrypoint: parse stdin, run the handler for `kind`.
///
/// Fail-open: every error is logged and turned into an empty result, so
/// the host never sees a failure from bookkeeping or bad input.
pub fn hook_entrypoint_from_stdin(kind: HookKind, stdin: &str, env: &HookEnv) -> HookResult {
    match dispatch(kind, stdin, env) {
        Ok(result) => result,
        Err(e) => {
            tracing::debug!(hook = kind.name(), error = %e, "hook failed, no output");
            HookResult::empty()
        }
    }
}

fn dispatch(kind: HookKind, stdin: &str, env: &HookEnv) -> Result<HookResult> {
    let Some(event) = parse_hook_stdin(stdin)? else {
        return Ok(HookResult::empty());
    };
    tracing::debug!(
        hook = kind.name(),
        event = %event.hook_event_name,
        session = %event.session_id,
        "dispatching"
    );

    match kind {
        HookKind::PromptGate => {
            let decision = gate::evaluate(&event.prompt);
            Ok(HookResult::output(serde_json::to_string(&decision.to_json())?))
        }
        HookKind::TrackEdits => {
            let outcome = tracker::track_edit(&event, env)?;
            tracing::debug!(?outcome, file = %event.file_path, "edit tracked");
            Ok(HookResult::empty())
        }
        HookKind::SkillActivation => {
            let rules_path = env.skill_rules_path(&event.cwd);
            Ok(skills::activation_report(&event.prompt, &rules_path)?.into())
        }
    }
}
