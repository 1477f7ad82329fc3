pub mod classify;
pub mod env;
pub mod error;
pub mod gate;
pub mod skills;
pub mod tracker;

mod admin;
mod dispatch;
mod parse;

pub use admin::{doctor, doctor_checks, install, settings_path, uninstall, DoctorCheck};
pub use dispatch::{hook_entrypoint_from_stdin, HookKind, HookResult};
pub use env::HookEnv;
pub use error::HookError;
pub use parse::HookEvent;
