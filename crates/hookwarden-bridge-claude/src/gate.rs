//! Prompt gate: hold prompts until the user confirms, then attach routing
//! advice for agents, commands and skills.

use regex::Regex;
use serde_json::{json, Value};
use std::sync::LazyLock;

static CONFIRMATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bconfirm\s*:\s*(?:proceed|bypass)\b").unwrap());

static TOPIC_KEYWORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:review|plan|refactor|docs?|architecture)\b").unwrap());

pub const BLOCK_REASON: &str = "Blocked by Codex reminder hook. Add 'CONFIRM: proceed' to your \
prompt to continue. Tip: include /dev-docs when starting multi-step work.";

const REMINDER: &str =
    "CODex Reminder: Apply Reebuild rules and consider specialized agents/commands when relevant.";
const AGENTS: &[&str] = &[
    "code-architecture-reviewer",
    "plan-reviewer",
    "documentation-architect",
    "refactor-planner",
];
const COMMANDS: &[&str] = &["/dev-docs", "/dev-docs-update"];
const SKILLS: &[&str] = &["reebuild-backend-guidelines", "skill-developer"];
const KEYWORD_HINT: &str =
    "Keyword match detected; strongly consider the matching agent/command before proceeding.";

/// Outcome of gating one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Block { reason: String },
    Allow { context: String },
}

impl GateDecision {
    /// Host JSON for this decision.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Block { reason } => json!({
                "decision": "block",
                "reason": reason
            }),
            Self::Allow { context } => json!({
                "hookSpecificOutput": {
                    "hookEventName": "UserPromptSubmit",
                    "additionalContext": context
                }
            }),
        }
    }
}

pub fn is_confirmed(prompt: &str) -> bool {
    CONFIRMATION.is_match(&prompt.to_lowercase())
}

pub fn mentions_topic(prompt: &str) -> bool {
    TOPIC_KEYWORDS.is_match(prompt)
}

/// Gate a prompt. Anything without a confirmation phrase is blocked.
pub fn evaluate(prompt: &str) -> GateDecision {
    if !is_confirmed(prompt) {
        return GateDecision::Block {
            reason: BLOCK_REASON.to_string(),
        };
    }
    GateDecision::Allow {
        context: render_advice(mentions_topic(prompt)),
    }
}

fn render_advice(topic_match: bool) -> String {
    let mut lines = vec![
        REMINDER.to_string(),
        format!("Available agents: {}", AGENTS.join(", ")),
        format!("Available commands: {}", COMMANDS.join(", ")),
        format!("Relevant skills: {}", SKILLS.join(", ")),
    ];
    if topic_match {
        lines.push(KEYWORD_HINT.to_string());
    }
    lines.join("\n")
}
