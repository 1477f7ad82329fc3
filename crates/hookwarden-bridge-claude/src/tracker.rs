//! Edit tracker: record which repo areas a session touched.

use hookwarden_store::SessionCache;

use crate::classify;
use crate::env::HookEnv;
use crate::error::Result;
use crate::parse::HookEvent;

const TRACKED_TOOLS: &[&str] = &["Edit", "MultiEdit", "Write"];

/// Why an event produced no bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UntrackedTool,
    NoFilePath,
    Documentation,
    UntrackableLabel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    Skipped(SkipReason),
    Recorded { label: String, new_repo: bool },
}

pub fn is_tracked_tool(tool_name: &str) -> bool {
    TRACKED_TOOLS.contains(&tool_name)
}

/// Label for the event's file, or the reason it is not tracked.
pub fn label_for(event: &HookEvent, env: &HookEnv) -> std::result::Result<String, SkipReason> {
    if !is_tracked_tool(&event.tool_name) {
        return Err(SkipReason::UntrackedTool);
    }
    if event.file_path.is_empty() {
        return Err(SkipReason::NoFilePath);
    }
    if classify::is_documentation(&event.file_path) {
        return Err(SkipReason::Documentation);
    }
    let project_dir = env.project_dir(&event.cwd);
    let label = classify::classify(&event.file_path, &project_dir);
    if !classify::is_trackable_label(&label) {
        return Err(SkipReason::UntrackableLabel);
    }
    Ok(label)
}

/// Classify the edited file and append it to the session's cache files.
pub fn track_edit(event: &HookEvent, env: &HookEnv) -> Result<TrackOutcome> {
    let label = match label_for(event, env) {
        Ok(label) => label,
        Err(reason) => return Ok(TrackOutcome::Skipped(reason)),
    };

    let cache = SessionCache::new(&env.project_dir(&event.cwd), &event.session_id);
    cache.ensure()?;
    cache.record_edit(&event.file_path, &label)?;
    let new_repo = cache.add_affected_repo(&label)?;
    Ok(TrackOutcome::Recorded { label, new_repo })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookwarden_store::read_lines;

    fn edit(tool: &str, path: &str) -> HookEvent {
        HookEvent {
            hook_event_name: "PostToolUse".into(),
            session_id: "s1".into(),
            tool_name: tool.into(),
            file_path: path.into(),
            ..Default::default()
        }
    }

    #[test]
    fn records_edit_and_repo() {
        let tmp = tempfile::tempdir().unwrap();
        let env = HookEnv::with_project_dir(tmp.path());
        let path = tmp.path().join("worker").join("handler.go");
        let ev = edit("Edit", &path.to_string_lossy());

        let outcome = track_edit(&ev, &env).unwrap();
        assert_eq!(
            outcome,
            TrackOutcome::Recorded {
                label: "worker".into(),
                new_repo: true
            }
        );

        let cache = SessionCache::new(tmp.path(), "s1");
        let log = read_lines(&cache.edited_files_log());
        assert_eq!(log.len(), 1);
        assert!(log[0].ends_with(&format!(":{}:worker", path.display())));
        assert_eq!(cache.affected_repos(), vec!["worker"]);
    }

    #[test]
    fn repeated_edits_keep_repo_set_unique() {
        let tmp = tempfile::tempdir().unwrap();
        let env = HookEnv::with_project_dir(tmp.path());
        for (tool, path) in [
            ("Edit", "packages/core/index.ts"),
            ("MultiEdit", "packages/ui/button.tsx"),
            ("Write", "reebuild/app/modules/foo.ts"),
            ("Edit", "packages/core/util.ts"),
        ] {
            track_edit(&edit(tool, path), &env).unwrap();
        }
        let cache = SessionCache::new(tmp.path(), "s1");
        assert_eq!(read_lines(&cache.edited_files_log()).len(), 4);
        assert_eq!(
            cache.affected_repos(),
            vec!["reebuild/app/packages", "reebuild/app"]
        );
        let raw = std::fs::read_to_string(cache.affected_repos_path()).unwrap();
        assert_eq!(raw.lines().count(), 2);
    }

    #[test]
    fn untracked_tools_have_no_side_effect() {
        let tmp = tempfile::tempdir().unwrap();
        let env = HookEnv::with_project_dir(tmp.path());
        for tool in ["Read", "Bash", "edit", "NotebookEdit", ""] {
            let outcome = track_edit(&edit(tool, "worker/a.go"), &env).unwrap();
            assert_eq!(outcome, TrackOutcome::Skipped(SkipReason::UntrackedTool));
        }
        assert!(!hookwarden_store::cache_root(tmp.path()).exists());
    }

    #[test]
    fn markdown_has_no_side_effect() {
        let tmp = tempfile::tempdir().unwrap();
        let env = HookEnv::with_project_dir(tmp.path());
        for path in ["README.md", "docs/Guide.MD", "worker/notes.markdown"] {
            for tool in TRACKED_TOOLS {
                let outcome = track_edit(&edit(tool, path), &env).unwrap();
                assert_eq!(outcome, TrackOutcome::Skipped(SkipReason::Documentation));
            }
        }
        assert!(!hookwarden_store::cache_root(tmp.path()).exists());
    }

    #[test]
    fn missing_path_is_skipped() {
        let env = HookEnv::with_project_dir("/nonexistent/project");
        let outcome = track_edit(&edit("Write", ""), &env).unwrap();
        assert_eq!(outcome, TrackOutcome::Skipped(SkipReason::NoFilePath));
    }

    #[test]
    fn unknown_label_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let env = HookEnv::with_project_dir(tmp.path());
        let outcome = track_edit(&edit("Edit", "unknown/thing.rs"), &env).unwrap();
        assert_eq!(outcome, TrackOutcome::Skipped(SkipReason::UntrackableLabel));
        assert!(!hookwarden_store::cache_root(tmp.path()).exists());
    }

    #[test]
    fn missing_session_uses_default_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let env = HookEnv::with_project_dir(tmp.path());
        let mut ev = edit("Edit", "api/server.ts");
        ev.session_id.clear();
        track_edit(&ev, &env).unwrap();
        let cache = SessionCache::new(tmp.path(), hookwarden_store::DEFAULT_SESSION);
        assert_eq!(cache.affected_repos(), vec!["api"]);
    }

    #[test]
    fn root_files_are_labelled_root() {
        let tmp = tempfile::tempdir().unwrap();
        let env = HookEnv::with_project_dir(tmp.path());
        let outcome = track_edit(&edit("Write", "Cargo.toml"), &env).unwrap();
        assert_eq!(
            outcome,
            TrackOutcome::Recorded {
                label: "root".into(),
                new_repo: true
            }
        );
    }
}
