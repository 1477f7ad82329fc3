use serde_json::Value;

use crate::error::{HookError, Result};

// ── HookEvent ──

/// The fields hookwarden reads from a host event.
///
/// Absent fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookEvent {
    pub hook_event_name: String,
    pub session_id: String,
    pub cwd: String,
    pub prompt: String,
    pub tool_name: String,
    pub file_path: String,
}

impl HookEvent {
    pub fn from_value(raw: &Value) -> Result<Self> {
        if !raw.is_object() {
            return Err(HookError::NotAnObject);
        }
        let file_path = get_field(raw, "tool_input")
            .map(|ti| get_str(ti, "file_path"))
            .unwrap_or_default();
        Ok(Self {
            hook_event_name: get_str(raw, "hook_event_name"),
            session_id: get_str(raw, "session_id"),
            cwd: get_str(raw, "cwd"),
            prompt: get_str(raw, "prompt"),
            tool_name: get_str(raw, "tool_name"),
            file_path,
        })
    }
}

// ── Hook stdin parsing ──

/// Parse the stdin JSON from a Claude Code hook.
/// Returns `Ok(None)` for empty or whitespace-only input.
pub(crate) fn parse_hook_stdin(stdin: &str) -> Result<Option<HookEvent>> {
    if stdin.trim().is_empty() {
        return Ok(None);
    }
    let raw: Value = serde_json::from_str(stdin)?;
    HookEvent::from_value(&raw).map(Some)
}

fn get_field<'a>(v: &'a Value, snake_key: &str) -> Option<&'a Value> {
    v.get(snake_key)
        .or_else(|| v.get(snake_to_camel(snake_key).as_str()))
}

/// Get a string field from JSON, trying snake_case first then camelCase.
/// Claude Code sends snake_case, but some host builds have emitted
/// camelCase (e.g. `sessionId`).
pub(crate) fn get_str(v: &Value, snake_key: &str) -> String {
    if let Some(s) = v.get(snake_key).and_then(|x| x.as_str()) {
        return s.to_string();
    }
    let camel = snake_to_camel(snake_key);
    v.get(&camel)
        .and_then(|x| x.as_str())
        .unwrap_or("")
        .to_string()
}

pub(crate) fn snake_to_camel(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = false;
    for ch in s.chars() {
        if ch == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(ch);
        }
    }
    result
}

pub(crate) fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}
