use std::io::{Read, Write};

use hookwarden_bridge_claude::{hook_entrypoint_from_stdin, HookEnv, HookKind};

/// `hookwarden hook <kind>` — read stdin, dispatch hook.
///
/// Always exits 0: a failed hook must never block the host agent.
pub fn run(kind: HookKind) -> anyhow::Result<()> {
    let mut stdin_buf = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut stdin_buf) {
        tracing::debug!(hook = kind.name(), error = %e, "stdin read error");
        return Ok(());
    }

    tracing::debug!(
        hook = kind.name(),
        bytes = stdin_buf.len(),
        head = %stdin_buf.chars().take(200).collect::<String>(),
        "stdin"
    );

    let env = HookEnv::from_process();
    let result = hook_entrypoint_from_stdin(kind, &stdin_buf, &env);
    match &result.stdout {
        Some(output) => {
            tracing::debug!(hook = kind.name(), bytes = output.len(), "ok output");
            let mut stdout = std::io::stdout().lock();
            let _ = stdout.write_all(output.as_bytes());
            let _ = stdout.flush();
        }
        None => tracing::debug!(hook = kind.name(), "ok (no output)"),
    }
    Ok(())
}
