//! Platform-specific discovery and removal behavior.
//!
//! Each supported OS supplies a [`PlatformProbe`]: its path-pattern tables,
//! the roots worth walking for virtual environments, the shell-profile set,
//! its supplemental inspectors (registry, Homebrew, alternatives), and the
//! removal hooks that differ per OS. The probe is selected once at startup;
//! the rest of the pipeline is OS-agnostic.
//!
//! All three probes compile on every OS so their parsers and tables are
//! testable anywhere; only [`current_platform`] is conditional.

pub mod linux;
pub mod macos;
pub mod windows;

use std::path::{Path, PathBuf};

use crate::exec::CommandRunner;
use crate::inventory::{Installation, Inventory};
use crate::runtime::Runtime;
use crate::ui::Ui;

pub use linux::LinuxProbe;
pub use macos::MacOsProbe;
pub use windows::WindowsProbe;

/// A discovery candidate from an inspector: path plus provenance label.
pub type Candidate = (PathBuf, String);

/// Per-OS tables and hooks for the discovery/removal pipeline.
pub trait PlatformProbe {
    /// OS name for logs.
    fn os_name(&self) -> &'static str;

    /// Ordered `(glob-pattern-or-literal, provenance-label)` pairs.
    fn patterns(&self, runtime: Runtime) -> &'static [(&'static str, &'static str)];

    /// Roots for the bounded virtual-environment walk.
    fn walk_roots(&self) -> Vec<PathBuf>;

    /// Shell-profile files subject to environment cleanup.
    fn profile_files(&self) -> Vec<PathBuf>;

    /// Supplemental discovery beyond filesystem globbing.
    ///
    /// Failures inside an inspector yield an empty candidate list, never an
    /// error; a missing tool or registry key is normal.
    fn inspect(&self, runtime: Runtime, runner: &dyn CommandRunner) -> Vec<Candidate>;

    /// The runnable binary for a directory-shaped installation root.
    fn runtime_executable(&self, root: &Path, runtime: Runtime) -> Option<PathBuf>;

    /// The compiler binary for a Java root, if present.
    fn compiler_executable(&self, root: &Path) -> Option<PathBuf>;

    /// Whether this installation is OS-managed and must never be deleted.
    fn is_protected(&self, installation: &Installation) -> bool;

    /// Extra paths to delete alongside the inventory (vendor leftovers).
    fn extra_removal_paths(&self, _runtime: Runtime) -> Vec<PathBuf> {
        Vec::new()
    }

    /// Invoke vendor uninstallers before directory deletion.
    fn run_uninstallers(
        &self,
        _inventory: &Inventory,
        _runtime: Runtime,
        _runner: &dyn CommandRunner,
        _ui: &Ui,
    ) {
    }

    /// Environment cleanup outside profile files (registry, alternatives).
    fn clean_system_env(&self, _runtime: Runtime, _runner: &dyn CommandRunner, _ui: &Ui) {}

    /// Whether the Edge registry-trace cleanup applies on this OS.
    fn supports_edge_cleanup(&self) -> bool {
        false
    }
}

/// Probe for the OS this binary was built for.
pub fn current_platform() -> &'static dyn PlatformProbe {
    #[cfg(target_os = "windows")]
    {
        &WindowsProbe
    }
    #[cfg(target_os = "macos")]
    {
        &MacOsProbe
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        &LinuxProbe
    }
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// First existing executable among `root.join(sub)` for each subpath.
pub(crate) fn executable_under(root: &Path, subpaths: &[&str]) -> Option<PathBuf> {
    subpaths.iter().map(|sub| root.join(sub)).find(|candidate| {
        candidate.is_file() && (cfg!(windows) || is_executable(candidate))
    })
}
