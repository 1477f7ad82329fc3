use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};

use crate::parse::now_rfc3339;
use crate::skills::SkillRuleSet;

// ── Install / Uninstall ──

const HOOK_COMMAND_PREFIX: &str = "hookwarden hook";
const PROMPT_GATE_COMMAND: &str = "hookwarden hook prompt-gate";
const SKILL_ACTIVATION_COMMAND: &str = "hookwarden hook skill-activation";
const TRACK_EDITS_COMMAND: &str = "hookwarden hook track-edits";
const TRACKED_TOOLS_MATCHER: &str = "Edit|MultiEdit|Write";

/// Hook event names hookwarden manages.
const HOOK_EVENTS: &[&str] = &["UserPromptSubmit", "PostToolUse"];

fn command_hook(command: &str) -> Value {
    json!({ "type": "command", "command": command })
}

/// The hookwarden matcher group for a host event.
fn hookwarden_group(event_name: &str) -> Value {
    match event_name {
        "PostToolUse" => json!({
            "matcher": TRACKED_TOOLS_MATCHER,
            "hooks": [command_hook(TRACK_EDITS_COMMAND)]
        }),
        _ => json!({
            "matcher": "",
            "hooks": [
                command_hook(PROMPT_GATE_COMMAND),
                command_hook(SKILL_ACTIVATION_COMMAND)
            ]
        }),
    }
}

/// Check if a matcher group (Claude Code hook format) contains a hookwarden hook.
fn matcher_group_contains_hookwarden(group: &Value) -> bool {
    if let Some(hooks_arr) = group.get("hooks").and_then(|h| h.as_array()) {
        return hooks_arr.iter().any(|hook| {
            hook.get("command")
                .and_then(|c| c.as_str())
                .is_some_and(|cmd| cmd.contains(HOOK_COMMAND_PREFIX))
        });
    }
    // Legacy format: plain command string
    group
        .as_str()
        .is_some_and(|s| s.contains(HOOK_COMMAND_PREFIX))
}

pub fn settings_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".claude").join("settings.json")
}

/// Rebuild each managed event's matcher groups: foreign groups are kept in
/// order, hookwarden's own group is appended when `with_hookwarden` is set.
/// Events left with no groups are removed.
fn rewrite_hook_groups(hooks: &mut Map<String, Value>, with_hookwarden: bool) {
    for event_name in HOOK_EVENTS {
        let mut groups: Vec<Value> = hooks
            .get(*event_name)
            .and_then(Value::as_array)
            .map(|groups| {
                groups
                    .iter()
                    .filter(|group| !matcher_group_contains_hookwarden(group))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if with_hookwarden {
            groups.push(hookwarden_group(event_name));
        }
        if groups.is_empty() {
            hooks.remove(*event_name);
        } else {
            hooks.insert(event_name.to_string(), Value::Array(groups));
        }
    }
}

/// Copy the current settings file aside before it is rewritten.
fn backup_settings(path: &Path) -> anyhow::Result<()> {
    let ts = now_rfc3339().replace(':', "-");
    fs::copy(path, path.with_extension(format!("json.hookwarden.bak.{ts}")))?;
    Ok(())
}

fn write_settings(path: &Path, settings: &Value) -> anyhow::Result<()> {
    fs::write(path, serde_json::to_string_pretty(settings)?.as_bytes())?;
    Ok(())
}

/// Install hookwarden hooks into `.claude/settings.json`.
///
/// An unreadable settings file is backed up and replaced.
pub fn install(project_dir: &Path) -> anyhow::Result<()> {
    let path = settings_path(project_dir);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut settings = json!({});
    if path.exists() {
        backup_settings(&path)?;
        let content = fs::read_to_string(&path)?;
        if let Ok(parsed @ Value::Object(_)) = serde_json::from_str::<Value>(&content) {
            settings = parsed;
        }
    }

    let hooks = settings
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("settings is not an object"))?
        .entry("hooks")
        .or_insert_with(|| json!({}))
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("hooks is not an object"))?;
    rewrite_hook_groups(hooks, true);

    write_settings(&path, &settings)?;
    println!("Installed hookwarden hooks into {}", path.display());
    Ok(())
}

/// Remove hookwarden's matcher groups from `.claude/settings.json`, leaving
/// everything else in place.
pub fn uninstall(project_dir: &Path) -> anyhow::Result<()> {
    let path = settings_path(project_dir);
    if !path.exists() {
        println!("No settings file found at {}", path.display());
        return Ok(());
    }

    let mut settings: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    let Some(hooks) = settings.get_mut("hooks").and_then(Value::as_object_mut) else {
        println!("No hookwarden hooks in {}", path.display());
        return Ok(());
    };
    backup_settings(&path)?;
    rewrite_hook_groups(hooks, false);

    write_settings(&path, &settings)?;
    println!("Uninstalled hookwarden hooks from {}", path.display());
    Ok(())
}

// ── Doctor ──

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorCheck {
    pub ok: bool,
    pub message: String,
}

impl DoctorCheck {
    fn new(ok: bool, message: String) -> Self {
        Self { ok, message }
    }
}

/// Health checks for a project's hookwarden setup.
pub fn doctor_checks(project_dir: &Path) -> Vec<DoctorCheck> {
    let mut checks = Vec::new();

    let in_path = which_hookwarden();
    checks.push(DoctorCheck::new(
        in_path.is_some(),
        format!(
            "hookwarden in PATH: {}",
            in_path.unwrap_or_else(|| "not found".into())
        ),
    ));

    let path = settings_path(project_dir);
    let has_hooks = fs::read_to_string(&path)
        .map(|content| content.contains(HOOK_COMMAND_PREFIX))
        .unwrap_or(false);
    checks.push(DoctorCheck::new(
        has_hooks,
        format!("hooks in {}", path.display()),
    ));

    let rules_path = crate::env::skill_rules_path(project_dir);
    let rules_check = match SkillRuleSet::load(&rules_path) {
        Ok(rules) => {
            let invalid = rules.invalid_patterns();
            let mut msg = format!(
                "skill rules: {} ({} skills)",
                rules_path.display(),
                rules.skills.len()
            );
            for (skill, pattern) in &invalid {
                msg.push_str(&format!("\n    invalid intent pattern in {skill}: {pattern}"));
            }
            DoctorCheck::new(invalid.is_empty(), msg)
        }
        Err(e) => DoctorCheck::new(false, format!("skill rules: {e}")),
    };
    checks.push(rules_check);

    checks
}

/// Print hookwarden health checks.
pub fn doctor(project_dir: &Path) -> anyhow::Result<()> {
    for check in doctor_checks(project_dir) {
        println!(
            "[{}] {}",
            if check.ok { "OK" } else { "WARN" },
            check.message
        );
    }
    Ok(())
}

fn which_hookwarden() -> Option<String> {
    let path_var = std::env::var("PATH").unwrap_or_default();
    let sep = if cfg!(windows) { ';' } else { ':' };
    let exe_name = if cfg!(windows) {
        "hookwarden.exe"
    } else {
        "hookwarden"
    };
    path_var
        .split(sep)
        .map(|dir| Path::new(dir).join(exe_name))
        .find(|candidate| candidate.exists())
        .map(|candidate| candidate.to_string_lossy().to_string())
}
