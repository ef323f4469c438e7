//! Post-removal verification.
//!
//! Re-runs the discovery pipeline into a fresh inventory and reports any
//! survivor. The inventory that drove removal is never touched, and nothing
//! is retried automatically.

use crate::discovery::Discovery;
use crate::runtime::Runtime;
use crate::ui::Ui;

/// Re-scan and report. Returns `true` when nothing is left.
pub fn verify_removal(discovery: &Discovery<'_>, runtime: Runtime, ui: &Ui) -> bool {
    let remaining = discovery.run(runtime);
    if remaining.is_empty() {
        ui.success(&format!("All {runtime} installations removed"));
        return true;
    }

    ui.warning(&format!(
        "{} {runtime} installation(s) still present:",
        remaining.len()
    ));
    ui.print_inventory(&remaining);
    tracing::warn!(
        runtime = %runtime,
        remaining = remaining.len(),
        "verification found residue"
    );
    false
}
