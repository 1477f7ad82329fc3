use std::path::{Path, PathBuf};

/// Environment variable naming the project root.
pub const PROJECT_DIR_VAR: &str = "CLAUDE_PROJECT_DIR";

/// Process environment a hook handler depends on.
///
/// Captured once in `main` so the handlers stay free of global reads.
#[derive(Debug, Clone, Default)]
pub struct HookEnv {
    pub project_dir: Option<PathBuf>,
    pub process_cwd: PathBuf,
}

impl HookEnv {
    pub fn from_process() -> Self {
        let project_dir = std::env::var_os(PROJECT_DIR_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let process_cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            project_dir,
            process_cwd,
        }
    }

    /// An environment with the project root fixed to `dir`.
    pub fn with_project_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            process_cwd: dir.clone(),
            project_dir: Some(dir),
        }
    }

    /// Project root: `CLAUDE_PROJECT_DIR`, then the event `cwd`, then the
    /// process working directory.
    pub fn project_dir(&self, event_cwd: &str) -> PathBuf {
        if let Some(dir) = &self.project_dir {
            return dir.clone();
        }
        if !event_cwd.is_empty() {
            return PathBuf::from(event_cwd);
        }
        self.process_cwd.clone()
    }

    pub fn skill_rules_path(&self, event_cwd: &str) -> PathBuf {
        skill_rules_path(&self.project_dir(event_cwd))
    }
}

/// `<project>/.claude/skills/skill-rules.json`
pub fn skill_rules_path(project_dir: &Path) -> PathBuf {
    project_dir
        .join(".claude")
        .join("skills")
        .join("skill-rules.json")
}
