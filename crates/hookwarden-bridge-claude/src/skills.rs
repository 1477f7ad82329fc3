//! Skill activation: match a prompt against `skill-rules.json` and list the
//! skills the agent should load, grouped by priority.

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{HookError, Result};

const BANNER: &str = "========================================";
const TITLE: &str = "SKILL ACTIVATION CHECK";
const ACTION_LINE: &str = "ACTION: Use Skill tool BEFORE responding";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    /// Absent or unrecognised values are `Low`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("critical") => Self::Critical,
            Some("high") => Self::High,
            Some("medium") => Self::Medium,
            _ => Self::Low,
        }
    }

    fn heading(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL SKILLS (REQUIRED):",
            Self::High => "RECOMMENDED SKILLS:",
            Self::Medium => "SUGGESTED SKILLS:",
            Self::Low => "OPTIONAL SKILLS:",
        }
    }
}

// ── Rule file ──

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTriggers {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub intent_patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRule {
    #[serde(default)]
    pub prompt_triggers: PromptTriggers,
    #[serde(default)]
    pub priority: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RulesFile {
    #[serde(default)]
    skills: serde_json::Map<String, serde_json::Value>,
}

/// Skill rules in file order.
#[derive(Debug, Clone, Default)]
pub struct SkillRuleSet {
    pub skills: Vec<(String, SkillRule)>,
}

impl SkillRuleSet {
    pub fn from_json(content: &str) -> Result<Self> {
        let file: RulesFile = serde_json::from_str(content)?;
        let skills = file
            .skills
            .into_iter()
            .map(|(name, value)| -> Result<(String, SkillRule)> {
                Ok((name, serde_json::from_value(value)?))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { skills })
    }

    /// Read and parse the rule file. Read fresh on every call.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| HookError::Rules {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// Names of skills whose triggers fire for `prompt`, with their priority.
    pub fn matching(&self, prompt: &str) -> Vec<(&str, Priority)> {
        let lower = prompt.to_lowercase();
        self.skills
            .iter()
            .filter(|(name, rule)| rule_matches(name, rule, &lower, prompt))
            .map(|(name, rule)| (name.as_str(), Priority::parse(rule.priority.as_deref())))
            .collect()
    }

    /// Intent patterns that fail to compile, as `(skill, pattern)`.
    pub fn invalid_patterns(&self) -> Vec<(&str, &str)> {
        self.skills
            .iter()
            .flat_map(|(name, rule)| {
                rule.prompt_triggers
                    .intent_patterns
                    .iter()
                    .filter(|p| compile_pattern(p).is_err())
                    .map(move |p| (name.as_str(), p.as_str()))
            })
            .collect()
    }
}

fn compile_pattern(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Keywords are checked first; patterns only when no keyword hits. An empty
/// keyword is a substring of every prompt.
fn rule_matches(name: &str, rule: &SkillRule, prompt_lower: &str, prompt: &str) -> bool {
    let triggers = &rule.prompt_triggers;
    let keyword_hit = triggers
        .keywords
        .iter()
        .any(|kw| prompt_lower.contains(&kw.to_lowercase()));
    if keyword_hit {
        return true;
    }
    triggers
        .intent_patterns
        .iter()
        .any(|pattern| match compile_pattern(pattern) {
            Ok(re) => re.is_match(prompt),
            Err(e) => {
                tracing::warn!(skill = name, pattern = %pattern, error = %e, "skipping invalid intent pattern");
                false
            }
        })
}

/// Render the activation report, or `None` when nothing matched. The text
/// ends at the closing banner, without a trailing newline.
pub fn render_report(matched: &[(&str, Priority)]) -> Option<String> {
    if matched.is_empty() {
        return None;
    }
    let mut lines = vec![BANNER.to_string(), TITLE.to_string(), BANNER.to_string(), String::new()];
    for priority in Priority::ALL {
        let mut names = matched
            .iter()
            .filter(|(_, p)| *p == priority)
            .map(|(name, _)| *name)
            .peekable();
        if names.peek().is_none() {
            continue;
        }
        lines.push(priority.heading().to_string());
        lines.extend(names.map(|name| format!("  -> {name}")));
        lines.push(String::new());
    }
    lines.push(ACTION_LINE.to_string());
    lines.push(BANNER.to_string());
    Some(lines.join("\n"))
}

/// Full activation check for one prompt against the rule file at `rules_path`.
pub fn activation_report(prompt: &str, rules_path: &Path) -> Result<Option<String>> {
    if prompt.is_empty() {
        return Ok(None);
    }
    let rules = SkillRuleSet::load(rules_path)?;
    Ok(render_report(&rules.matching(prompt)))
}
