use fs2::FileExt;
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Directory under `<project>/.claude/` holding per-session caches.
pub const CACHE_DIR: &str = "tsc-cache";
/// Append-only audit trail of tracked edits.
pub const EDITED_FILES_LOG: &str = "edited-files.log";
/// Deduplicated set of affected repo labels, one per line.
pub const AFFECTED_REPOS_FILE: &str = "affected-repos.txt";
const AFFECTED_REPOS_LOCK: &str = "affected-repos.lock";

/// Session name used when the host sends no session id.
pub const DEFAULT_SESSION: &str = "default";

/// Return the cache root: `<project_dir>/.claude/tsc-cache/`
pub fn cache_root(project_dir: &Path) -> PathBuf {
    project_dir.join(".claude").join(CACHE_DIR)
}

/// Make a host session id safe to use as a single directory name.
pub fn sanitize_session_id(session_id: &str) -> String {
    let trimmed = session_id.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return DEFAULT_SESSION.to_string();
    }
    trimmed
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Format one audit record: `<unix_timestamp>:<file_path>:<label>`.
pub fn audit_line(unix_ts: i64, file_path: &str, label: &str) -> String {
    format!("{unix_ts}:{file_path}:{label}")
}

/// Per-session bookkeeping files under `<project>/.claude/tsc-cache/<session>/`.
#[derive(Debug, Clone)]
pub struct SessionCache {
    dir: PathBuf,
}

impl SessionCache {
    pub fn new(project_dir: &Path, session_id: &str) -> Self {
        Self {
            dir: cache_root(project_dir).join(sanitize_session_id(session_id)),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn edited_files_log(&self) -> PathBuf {
        self.dir.join(EDITED_FILES_LOG)
    }

    pub fn affected_repos_path(&self) -> PathBuf {
        self.dir.join(AFFECTED_REPOS_FILE)
    }

    /// Create the session directory. Idempotent.
    pub fn ensure(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Append an audit record stamped with the current time.
    pub fn record_edit(&self, file_path: &str, label: &str) -> anyhow::Result<()> {
        let ts = time::OffsetDateTime::now_utc().unix_timestamp();
        append_line(&self.edited_files_log(), &audit_line(ts, file_path, label))
    }

    /// Add `label` to the affected set. Returns `true` when it was new.
    ///
    /// The read-then-append runs under an advisory lock when one can be
    /// taken; without it the append still happens.
    pub fn add_affected_repo(&self, label: &str) -> anyhow::Result<bool> {
        let _guard = lock_file(&self.dir.join(AFFECTED_REPOS_LOCK)).ok();
        let path = self.affected_repos_path();
        if read_line_set(&path).contains(label) {
            return Ok(false);
        }
        append_line(&path, label)?;
        Ok(true)
    }

    /// Labels in the affected set, in file order.
    pub fn affected_repos(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        read_lines(&self.affected_repos_path())
            .into_iter()
            .filter(|l| seen.insert(l.clone()))
            .collect()
    }
}

/// Append one line to `path`, creating the file if absent.
pub fn append_line(path: &Path, line: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    // Keep records on separate lines even if a previous writer left no newline.
    let needs_sep = file.metadata().map(|m| m.len() > 0).unwrap_or(false)
        && !ends_with_newline(path);
    if needs_sep {
        writeln!(file)?;
    }
    writeln!(file, "{line}")?;
    Ok(())
}

fn ends_with_newline(path: &Path) -> bool {
    fs::read(path)
        .map(|bytes| bytes.last() == Some(&b'\n'))
        .unwrap_or(true)
}

/// Non-empty trimmed lines of a file; empty when the file is missing.
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .map(|content| {
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Same as [`read_lines`], as a set.
pub fn read_line_set(path: &Path) -> HashSet<String> {
    read_lines(path).into_iter().collect()
}

/// File-based exclusive lock guard.
pub struct LockGuard {
    _file: fs::File,
}

/// Acquire an exclusive file lock. Creates the lock file if needed.
pub fn lock_file(path: &Path) -> anyhow::Result<LockGuard> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)?;
    file.lock_exclusive()?;
    Ok(LockGuard { _file: file })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_plain_ids() {
        assert_eq!(sanitize_session_id("abc-123_x.y"), "abc-123_x.y");
    }

    #[test]
    fn sanitize_replaces_separators() {
        assert_eq!(sanitize_session_id("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize_session_id("a\\b c"), "a_b_c");
    }

    #[test]
    fn sanitize_falls_back_to_default() {
        assert_eq!(sanitize_session_id(""), DEFAULT_SESSION);
        assert_eq!(sanitize_session_id("   "), DEFAULT_SESSION);
        assert_eq!(sanitize_session_id(".."), DEFAULT_SESSION);
    }

    #[test]
    fn session_dir_layout() {
        let cache = SessionCache::new(Path::new("/proj"), "s1");
        assert_eq!(
            cache.dir(),
            Path::new("/proj/.claude/tsc-cache/s1"),
        );
        assert!(cache.edited_files_log().ends_with("s1/edited-files.log"));
        assert!(cache.affected_repos_path().ends_with("s1/affected-repos.txt"));
    }

    #[test]
    fn ensure_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = SessionCache::new(tmp.path(), "s1");
        cache.ensure().unwrap();
        cache.ensure().unwrap();
        assert!(cache.dir().is_dir());
    }

    #[test]
    fn record_edit_appends_audit_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = SessionCache::new(tmp.path(), "s1");
        cache.ensure().unwrap();
        cache.record_edit("/proj/worker/a.go", "worker").unwrap();
        cache.record_edit("/proj/worker/b.go", "worker").unwrap();

        let lines = read_lines(&cache.edited_files_log());
        assert_eq!(lines.len(), 2);
        let parts: Vec<&str> = lines[0].splitn(2, ':').collect();
        assert!(parts[0].parse::<i64>().is_ok(), "timestamp prefix");
        assert_eq!(parts[1], "/proj/worker/a.go:worker");
        assert!(lines[1].ends_with(":/proj/worker/b.go:worker"));
    }

    #[test]
    fn audit_line_format() {
        assert_eq!(audit_line(1700000000, "src/x.rs", "root"), "1700000000:src/x.rs:root");
    }

    #[test]
    fn affected_repos_never_duplicates() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = SessionCache::new(tmp.path(), "s1");
        cache.ensure().unwrap();
        assert!(cache.add_affected_repo("worker").unwrap());
        assert!(cache.add_affected_repo("reebuild/app").unwrap());
        assert!(!cache.add_affected_repo("worker").unwrap());
        assert!(!cache.add_affected_repo("reebuild/app").unwrap());

        let content = fs::read_to_string(cache.affected_repos_path()).unwrap();
        assert_eq!(content, "worker\nreebuild/app\n");
        assert_eq!(cache.affected_repos(), vec!["worker", "reebuild/app"]);
    }

    #[test]
    fn append_line_repairs_missing_trailing_newline() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("affected-repos.txt");
        fs::write(&path, "api").unwrap();
        append_line(&path, "worker").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "api\nworker\n");
    }

    #[test]
    fn read_lines_missing_file_is_empty() {
        assert!(read_lines(Path::new("/nonexistent/affected-repos.txt")).is_empty());
    }

    #[test]
    fn lock_file_creates_parent() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("x.lock");
        let _guard = lock_file(&path).unwrap();
        assert!(path.exists());
    }
}
