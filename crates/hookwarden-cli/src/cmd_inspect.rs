use std::path::Path;

use hookwarden_bridge_claude::classify as classifier;
use hookwarden_store::SessionCache;

/// `hookwarden classify <path>` — print the label an edit would get.
pub fn classify(project_dir: &Path, file_path: &str) -> anyhow::Result<()> {
    if classifier::is_documentation(file_path) {
        println!("(untracked: documentation)");
        return Ok(());
    }
    println!("{}", classifier::classify(file_path, project_dir));
    Ok(())
}

/// `hookwarden affected` — print a session's affected repo labels.
pub fn affected(project_dir: &Path, session: &str) -> anyhow::Result<()> {
    let cache = SessionCache::new(project_dir, session);
    let repos = cache.affected_repos();
    if repos.is_empty() {
        eprintln!("no affected repos recorded in {}", cache.dir().display());
        return Ok(());
    }
    for label in repos {
        println!("{label}");
    }
    Ok(())
}
