//! Path → repo label classification for edited files.
//!
//! Labels group edits by the logical project area they touch. Table lookups
//! compare lowercase text. Labels keep the casing found in the path, except
//! for a bare anchor, which always records as `reebuild`.

use std::fs;
use std::path::Path;

/// Label for files directly under (or outside of) any tracked area.
pub const ROOT_LABEL: &str = "root";
/// Label the tracker refuses to record.
pub const UNKNOWN_LABEL: &str = "unknown";

const ANCHOR: &str = "reebuild";
const SUB_NAMES: &[&str] = &["app", "worker", "scripts"];
const CONTAINERS: &[&str] = &["packages", "modules"];
const CONTAINER_PREFIX: &str = "reebuild/app";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentKind {
    Anchor,
    SubName,
    Container,
}

/// Anchor is checked before sub-names, sub-names before containers.
fn segment_kind(segment: &str) -> Option<SegmentKind> {
    let key = segment.to_lowercase();
    if key == ANCHOR {
        Some(SegmentKind::Anchor)
    } else if SUB_NAMES.contains(&key.as_str()) {
        Some(SegmentKind::SubName)
    } else if CONTAINERS.contains(&key.as_str()) {
        Some(SegmentKind::Container)
    } else {
        None
    }
}

/// Classify `file_path` relative to `project_root`.
pub fn classify(file_path: &str, project_root: &Path) -> String {
    let root = project_root.to_string_lossy();
    classify_segments(&relative_segments(file_path, &root))
}

/// Label for an already-relativised list of path segments.
pub fn classify_segments<S: AsRef<str>>(segments: &[S]) -> String {
    let first = match segments {
        [] | [_] => return ROOT_LABEL.to_string(),
        [first, ..] => first.as_ref(),
    };
    match segment_kind(first) {
        Some(SegmentKind::Anchor) => {
            let second = segments[1].as_ref();
            if segment_kind(second) == Some(SegmentKind::SubName) {
                format!("{first}/{second}")
            } else {
                ANCHOR.to_string()
            }
        }
        Some(SegmentKind::SubName) => first.to_string(),
        Some(SegmentKind::Container) => format!("{CONTAINER_PREFIX}/{first}"),
        None => first.to_string(),
    }
}

/// Segments of `file_path` below `project_root`, or the file path's own
/// segments when it lies elsewhere. Relative paths resolve against the root.
/// Both sides are resolved through the filesystem (symlinks followed) as far
/// as they exist.
pub fn relative_segments(file_path: &str, project_root: &str) -> Vec<String> {
    let root = resolved_segments(project_root);
    let file = if is_absolute(file_path) {
        resolved_segments(file_path)
    } else {
        resolved_segments(&format!("{}/{}", project_root, file_path))
    };
    match file.strip_prefix(root.as_slice()) {
        Some(rest) if !root.is_empty() => rest.to_vec(),
        _ => file,
    }
}

/// Canonicalise the longest existing ancestor of `path` and append the
/// remaining segments lexically. Falls back to [`normalize_segments`] when
/// nothing along the path can be resolved.
fn resolved_segments(path: &str) -> Vec<String> {
    let lexical = normalize_segments(path);
    if !is_absolute(path) {
        return lexical;
    }
    let rooted = path.replace('\\', "/").starts_with('/');
    for n in (1..=lexical.len()).rev() {
        let joined = lexical[..n].join("/");
        let prefix = if rooted { format!("/{joined}") } else { joined };
        if let Ok(canon) = fs::canonicalize(&prefix) {
            let canon = canon.to_string_lossy();
            // Windows verbatim prefix.
            let canon = canon.strip_prefix(r"\\?\").unwrap_or(&canon);
            let mut out = normalize_segments(canon);
            out.extend_from_slice(&lexical[n..]);
            return out;
        }
    }
    lexical
}

/// Documentation edits are not tracked.
pub fn is_documentation(file_path: &str) -> bool {
    let lower = file_path.to_lowercase();
    lower.ends_with(".md") || lower.ends_with(".markdown")
}

/// Whether a label may be written to the session cache.
pub fn is_trackable_label(label: &str) -> bool {
    !label.is_empty() && label != UNKNOWN_LABEL
}

fn is_absolute(path: &str) -> bool {
    let path = path.replace('\\', "/");
    if path.starts_with('/') {
        return true;
    }
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Lexically normalised segments: `.` dropped, `..` pops.
fn normalize_segments(path: &str) -> Vec<String> {
    let path = path.replace('\\', "/");
    let mut out: Vec<String> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            seg => out.push(seg.to_string()),
        }
    }
    out
}
