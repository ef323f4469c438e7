//! Installation removal.
//!
//! Removal consumes the inventory one installation at a time: vendor
//! uninstallers first (Windows), then file/directory deletion, then
//! environment cleanup. Every step is independent — one install failing to
//! delete never stops the rest of the batch — and OS-managed installations
//! are skipped unconditionally.

pub mod edge;
pub mod env_cleanup;

use std::io;
use std::path::Path;

use crate::exec::CommandRunner;
use crate::inventory::Inventory;
use crate::platform::PlatformProbe;
use crate::runtime::Runtime;
use crate::ui::Ui;

/// What [`remove_path`] actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removed {
    File,
    Directory,
    /// Path was already gone; not an error.
    Nothing,
}

/// Delete a file or directory tree. A missing path is a no-op.
pub fn remove_path(path: &Path) -> io::Result<Removed> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Removed::Nothing),
        Err(e) => return Err(e),
    };
    if metadata.is_dir() {
        std::fs::remove_dir_all(path)?;
        Ok(Removed::Directory)
    } else {
        std::fs::remove_file(path)?;
        Ok(Removed::File)
    }
}

/// Drives removal of everything in an inventory.
pub struct Remover<'a> {
    probe: &'a dyn PlatformProbe,
    runner: &'a dyn CommandRunner,
}

impl<'a> Remover<'a> {
    pub fn new(probe: &'a dyn PlatformProbe, runner: &'a dyn CommandRunner) -> Self {
        Self { probe, runner }
    }

    /// Remove every non-protected installation, then clean the environment.
    pub fn remove_all(&self, inventory: &Inventory, runtime: Runtime, ui: &Ui) {
        if inventory.is_empty() {
            ui.message(&format!("No {runtime} installations to remove"));
            return;
        }

        self.probe.run_uninstallers(inventory, runtime, self.runner, ui);

        for installation in inventory.iter() {
            if self.probe.is_protected(installation) {
                ui.warning(&format!(
                    "Skipping OS-managed {} at {} - remove it with the system package manager",
                    runtime,
                    installation.path.display()
                ));
                tracing::info!(
                    path = %installation.path.display(),
                    "protected installation skipped"
                );
                continue;
            }
            match remove_path(&installation.path) {
                Ok(Removed::Nothing) => {
                    tracing::debug!(path = %installation.path.display(), "already absent");
                }
                Ok(_) => ui.message(&format!("Removed: {}", installation.path.display())),
                Err(e) => {
                    ui.warning(&format!(
                        "Failed to remove {}: {e}",
                        installation.path.display()
                    ));
                    tracing::warn!(
                        path = %installation.path.display(),
                        error = %e,
                        "removal failed"
                    );
                }
            }
        }

        for extra in self.probe.extra_removal_paths(runtime) {
            match remove_path(&extra) {
                Ok(Removed::Nothing) => {}
                Ok(_) => ui.message(&format!("Removed: {}", extra.display())),
                Err(e) => ui.warning(&format!("Failed to remove {}: {e}", extra.display())),
            }
        }

        env_cleanup::clean_profiles(&self.probe.profile_files(), runtime, ui);
        self.probe.clean_system_env(runtime, self.runner, ui);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::mock::ScriptedRunner;
    use crate::inventory::{InstallKind, Installation};
    use crate::platform::Candidate;
    use crate::ui::{OutputMode, Ui};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn installation(runtime: Runtime, path: &Path) -> Installation {
        Installation {
            runtime,
            path: path.to_path_buf(),
            executable: path.join("bin/java"),
            version: "17.0.2".into(),
            kind: InstallKind::Jdk,
            source: "test".into(),
        }
    }

    #[test]
    fn remove_path_deletes_directory_tree() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("jdk");
        fs::create_dir_all(root.join("bin")).unwrap();
        fs::write(root.join("bin/java"), "x").unwrap();

        assert_eq!(remove_path(&root).unwrap(), Removed::Directory);
        assert!(!root.exists());
    }

    #[test]
    fn remove_path_deletes_single_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("python3");
        fs::write(&file, "x").unwrap();

        assert_eq!(remove_path(&file).unwrap(), Removed::File);
        assert!(!file.exists());
    }

    #[test]
    fn remove_path_missing_is_noop() {
        let temp = TempDir::new().unwrap();
        let gone = temp.path().join("never-existed");
        assert_eq!(remove_path(&gone).unwrap(), Removed::Nothing);
    }

    #[cfg(unix)]
    #[test]
    fn remove_path_unlinks_symlink_without_following() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("real");
        fs::create_dir_all(&target).unwrap();
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        // A dangling or live symlink is removed as a file; the target stays.
        remove_path(&link).unwrap();
        assert!(!link.exists());
        assert!(target.exists());
    }

    /// Inert probe with a configurable protection verdict; touches no real
    /// profile files.
    struct TestProbe {
        protect_everything: bool,
    }

    impl PlatformProbe for TestProbe {
        fn os_name(&self) -> &'static str {
            "test"
        }
        fn patterns(&self, _runtime: Runtime) -> &'static [(&'static str, &'static str)] {
            &[]
        }
        fn walk_roots(&self) -> Vec<PathBuf> {
            Vec::new()
        }
        fn profile_files(&self) -> Vec<PathBuf> {
            Vec::new()
        }
        fn inspect(&self, _runtime: Runtime, _runner: &dyn CommandRunner) -> Vec<Candidate> {
            Vec::new()
        }
        fn runtime_executable(&self, _root: &Path, _runtime: Runtime) -> Option<PathBuf> {
            None
        }
        fn compiler_executable(&self, _root: &Path) -> Option<PathBuf> {
            None
        }
        fn is_protected(&self, _installation: &Installation) -> bool {
            self.protect_everything
        }
    }

    #[test]
    fn protected_installation_is_never_deleted() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("jdk-17");
        fs::create_dir_all(&root).unwrap();

        let mut inventory = Inventory::new();
        inventory.insert(installation(Runtime::Java, &root));

        let runner = ScriptedRunner::new();
        let ui = Ui::non_interactive(OutputMode::Silent);
        let probe = TestProbe {
            protect_everything: true,
        };
        Remover::new(&probe, &runner).remove_all(&inventory, Runtime::Java, &ui);

        assert!(root.exists());
    }

    #[test]
    fn unprotected_installation_is_deleted() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("jdk-17");
        fs::create_dir_all(root.join("bin")).unwrap();

        let mut inventory = Inventory::new();
        inventory.insert(installation(Runtime::Java, &root));

        let runner = ScriptedRunner::new();
        let ui = Ui::non_interactive(OutputMode::Silent);
        let probe = TestProbe {
            protect_everything: false,
        };
        Remover::new(&probe, &runner).remove_all(&inventory, Runtime::Java, &ui);

        assert!(!root.exists());
    }

    #[test]
    fn batch_continues_past_missing_installation() {
        let temp = TempDir::new().unwrap();
        let gone = temp.path().join("already-gone");
        let present = temp.path().join("jdk-21");
        fs::create_dir_all(&present).unwrap();

        let mut inventory = Inventory::new();
        inventory.insert(installation(Runtime::Java, &gone));
        inventory.insert(installation(Runtime::Java, &present));

        let runner = ScriptedRunner::new();
        let ui = Ui::non_interactive(OutputMode::Silent);
        let probe = TestProbe {
            protect_everything: false,
        };
        Remover::new(&probe, &runner).remove_all(&inventory, Runtime::Java, &ui);

        assert!(!present.exists());
    }
}
