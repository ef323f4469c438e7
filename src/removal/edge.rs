//! Microsoft Edge registry-trace cleanup.
//!
//! Deletes the Edge and EdgeUpdate key trees from both hives (including the
//! WOW6432Node views). Windows-only in effect, but routed through the
//! command runner so the flow is testable anywhere.

use crate::exec::CommandRunner;
use crate::ui::Ui;

/// Registry keys holding Edge browser traces.
pub const EDGE_TRACE_KEYS: &[&str] = &[
    "HKCU\\Software\\Microsoft\\Edge",
    "HKLM\\SOFTWARE\\Microsoft\\Edge",
    "HKLM\\SOFTWARE\\WOW6432Node\\Microsoft\\Edge",
    "HKCU\\Software\\Microsoft\\EdgeUpdate",
    "HKLM\\SOFTWARE\\Microsoft\\EdgeUpdate",
    "HKLM\\SOFTWARE\\WOW6432Node\\Microsoft\\EdgeUpdate",
];

/// Delete every Edge trace key that exists. Returns the number deleted;
/// a key that can't be deleted is reported and skipped.
pub fn clean_edge_traces(runner: &dyn CommandRunner, ui: &Ui) -> usize {
    let mut deleted = 0;
    for key in EDGE_TRACE_KEYS {
        if !runner.run_ok("reg", &["query", key]) {
            tracing::debug!(key, "edge trace key absent");
            continue;
        }
        if runner.run_ok("reg", &["delete", key, "/f"]) {
            ui.message(&format!("Deleted {key}"));
            deleted += 1;
        } else {
            ui.warning(&format!("Could not delete {key}"));
        }
    }
    deleted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::mock::ScriptedRunner;
    use crate::exec::ExecResult;
    use crate::ui::{OutputMode, Ui};

    #[test]
    fn deletes_only_existing_keys() {
        let runner = ScriptedRunner::new()
            .script(
                "reg query HKCU\\Software\\Microsoft\\Edge",
                ExecResult::ok("HKEY_CURRENT_USER\\Software\\Microsoft\\Edge\n"),
            )
            .script(
                "reg delete HKCU\\Software\\Microsoft\\Edge /f",
                ExecResult::ok("The operation completed successfully.\n"),
            );
        let ui = Ui::non_interactive(OutputMode::Silent);

        let deleted = clean_edge_traces(&runner, &ui);

        assert_eq!(deleted, 1);
        assert!(runner.invoked("reg delete HKCU\\Software\\Microsoft\\Edge /f"));
        // Absent keys are never deleted.
        assert!(!runner.invoked("reg delete HKLM\\SOFTWARE\\Microsoft\\Edge /f"));
    }

    #[test]
    fn failed_delete_is_counted_as_skip() {
        let runner = ScriptedRunner::new()
            .script(
                "reg query HKLM\\SOFTWARE\\Microsoft\\EdgeUpdate",
                ExecResult::ok("HKEY_LOCAL_MACHINE\\SOFTWARE\\Microsoft\\EdgeUpdate\n"),
            )
            .script(
                "reg delete HKLM\\SOFTWARE\\Microsoft\\EdgeUpdate /f",
                ExecResult::failed(1),
            );
        let ui = Ui::non_interactive(OutputMode::Silent);

        assert_eq!(clean_edge_traces(&runner, &ui), 0);
    }

    #[test]
    fn no_keys_present_deletes_nothing() {
        let runner = ScriptedRunner::new();
        let ui = Ui::non_interactive(OutputMode::Silent);
        assert_eq!(clean_edge_traces(&runner, &ui), 0);
        assert!(runner.calls().iter().all(|c| c.starts_with("reg query")));
    }
}
