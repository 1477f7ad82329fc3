mod cmd_hook;
mod cmd_inspect;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hookwarden_bridge_claude::{HookEnv, HookKind};

#[derive(Parser)]
#[command(
    name = "hookwarden",
    version,
    about = "Claude Code hooks: prompt confirmation, edit tracking, skill activation"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Hook entrypoint (called by Claude Code hooks, reads stdin JSON)
    Hook {
        #[command(subcommand)]
        cmd: HookCmd,
    },
    /// Install hookwarden hooks into .claude/settings.json
    Install {
        /// Project root (defaults to $CLAUDE_PROJECT_DIR, then the current directory)
        #[arg(long)]
        project: Option<PathBuf>,
    },
    /// Remove hookwarden hooks from .claude/settings.json
    Uninstall {
        #[arg(long)]
        project: Option<PathBuf>,
    },
    /// Health check for hooks and skill rules
    Doctor {
        #[arg(long)]
        project: Option<PathBuf>,
    },
    /// Print the repo label the edit tracker would assign to a path
    Classify {
        /// File path, absolute or relative to the project root
        path: String,
        #[arg(long)]
        project: Option<PathBuf>,
    },
    /// List the repos a session has touched
    Affected {
        /// Session ID
        #[arg(long, default_value = hookwarden_store::DEFAULT_SESSION)]
        session: String,
        #[arg(long)]
        project: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum HookCmd {
    /// UserPromptSubmit: require a confirmation phrase, attach suggestions
    PromptGate,
    /// PostToolUse: record edited files and affected repos
    TrackEdits,
    /// UserPromptSubmit: list skills whose triggers match the prompt
    SkillActivation,
}

impl From<HookCmd> for HookKind {
    fn from(cmd: HookCmd) -> Self {
        match cmd {
            HookCmd::PromptGate => HookKind::PromptGate,
            HookCmd::TrackEdits => HookKind::TrackEdits,
            HookCmd::SkillActivation => HookKind::SkillActivation,
        }
    }
}

fn project_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| HookEnv::from_process().project_dir(""))
}

/// Logs go to stderr (filter from `HOOKWARDEN_LOG`, off by default) and,
/// when `HOOKWARDEN_DEBUG` is set, to a debug file in the temp dir.
/// Stdout belongs to the hook protocol.
fn init_tracing() {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_env("HOOKWARDEN_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    let debug_layer = std::env::var_os("HOOKWARDEN_DEBUG")
        .and_then(|_| {
            let path = std::env::temp_dir().join("hookwarden-hook-debug.log");
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        })
        .map(|file| {
            fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_filter(LevelFilter::DEBUG)
        });

    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(debug_layer)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Hook { cmd } => cmd_hook::run(cmd.into()),
        Command::Install { project } => hookwarden_bridge_claude::install(&project_dir(project)),
        Command::Uninstall { project } => {
            hookwarden_bridge_claude::uninstall(&project_dir(project))
        }
        Command::Doctor { project } => hookwarden_bridge_claude::doctor(&project_dir(project)),
        Command::Classify { path, project } => {
            cmd_inspect::classify(&project_dir(project), &path)
        }
        Command::Affected { session, project } => {
            cmd_inspect::affected(&project_dir(project), &session)
        }
    }
}
