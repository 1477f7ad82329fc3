use thiserror::Error;

/// Failures inside a hook handler.
///
/// None of these reach the host: the entrypoint logs them and returns an
/// empty [`HookResult`](crate::HookResult).
#[derive(Error, Debug)]
pub enum HookError {
    #[error("invalid hook payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("hook payload is not a JSON object")]
    NotAnObject,

    #[error("skill rules unavailable: {path}: {reason}")]
    Rules { path: String, reason: String },

    #[error("cache bookkeeping failed: {0}")]
    Io(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, HookError>;
