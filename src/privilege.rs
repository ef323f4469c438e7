//! Privilege checks and elevation guidance.
//!
//! Removal touches system directories and (on Windows) machine-wide
//! registry keys, so every mutating operation is gated on elevation. On
//! Unix there is no auto-elevation — the user is told how to re-run with
//! sudo. On Windows one self-relaunch with an elevation request is
//! attempted, after which the current process exits regardless of outcome.

use crate::exec::CommandRunner;
use crate::ui::Ui;

/// Whether the current process runs with root/administrator rights.
#[cfg(unix)]
pub fn is_elevated(_runner: &dyn CommandRunner) -> bool {
    // Effective UID, so `sudo` counts.
    unsafe { libc::geteuid() == 0 }
}

/// Whether the current process runs with root/administrator rights.
///
/// `net session` succeeds only from an elevated shell.
#[cfg(not(unix))]
pub fn is_elevated(runner: &dyn CommandRunner) -> bool {
    runner.run_ok("net", &["session"])
}

/// Gate an operation on elevation; prints guidance when the check fails.
///
/// Returns `false` when the process must exit with the privilege error
/// code.
pub fn ensure_elevated(runner: &dyn CommandRunner, ui: &Ui) -> bool {
    if is_elevated(runner) {
        return true;
    }

    ui.error("Administrative privileges are required for this operation.");

    #[cfg(unix)]
    {
        let args: Vec<String> = std::env::args().collect();
        ui.result(&format!("Re-run with: sudo {}", args.join(" ")));
    }

    #[cfg(not(unix))]
    {
        ui.result("Right-click the program and choose 'Run as administrator',");
        ui.result("or approve the elevation prompt.");
        request_elevated_relaunch(runner, ui);
    }

    false
}

/// Ask the shell to relaunch this binary elevated. Best effort only.
#[cfg(not(unix))]
fn request_elevated_relaunch(runner: &dyn CommandRunner, ui: &Ui) {
    let Ok(exe) = std::env::current_exe() else {
        return;
    };
    let command = format!("Start-Process -FilePath '{}' -Verb RunAs", exe.display());
    if !runner.run_ok("powershell", &["-NoProfile", "-Command", &command]) {
        ui.warning("Elevation request was declined or failed.");
    }
}
