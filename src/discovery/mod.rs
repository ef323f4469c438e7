//! Installation discovery pipeline.
//!
//! One [`Discovery::run`] pass gathers candidates from the platform's
//! pattern table, the PATH variable, the platform inspectors (registry,
//! Homebrew, alternatives), and a bounded virtual-environment walk, then
//! validates each candidate into the inventory. The pass is read-only and
//! re-runnable; verification after removal is just another pass.

pub mod scanner;
pub mod validator;

pub use validator::{Validator, UNKNOWN_VERSION};

use crate::config::SweepConfig;
use crate::exec::CommandRunner;
use crate::inventory::Inventory;
use crate::platform::{Candidate, PlatformProbe};
use crate::runtime::Runtime;

/// Discovery pipeline driver.
pub struct Discovery<'a> {
    probe: &'a dyn PlatformProbe,
    runner: &'a dyn CommandRunner,
    config: &'a SweepConfig,
}

impl<'a> Discovery<'a> {
    pub fn new(
        probe: &'a dyn PlatformProbe,
        runner: &'a dyn CommandRunner,
        config: &'a SweepConfig,
    ) -> Self {
        Self {
            probe,
            runner,
            config,
        }
    }

    /// Run a full discovery pass and return a fresh inventory.
    pub fn run(&self, runtime: Runtime) -> Inventory {
        let mut inventory = Inventory::new();
        let validator = Validator::new(self.probe, self.runner);

        let mut candidates: Vec<Candidate> = Vec::new();
        candidates.extend(scanner::expand_patterns(self.probe.patterns(runtime)));
        candidates.extend(scanner::path_env_candidates(runtime));
        candidates.extend(self.probe.inspect(runtime, self.runner));
        if runtime == Runtime::Python {
            candidates.extend(scanner::virtualenv_candidates(
                &self.probe.walk_roots(),
                &self.config.walk_budget,
            ));
        }

        tracing::debug!(
            runtime = %runtime,
            candidates = candidates.len(),
            "discovery candidates gathered"
        );

        for (path, source) in candidates {
            // Skip re-validating a path that is already recorded; the
            // inventory would reject it anyway, this just saves a version
            // query.
            if inventory.contains_path(&path) {
                continue;
            }
            if let Some(installation) = validator.validate(&path, &source, runtime) {
                inventory.insert(installation);
            }
        }

        tracing::info!(
            runtime = %runtime,
            found = inventory.len(),
            "discovery pass complete"
        );
        inventory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::mock::ScriptedRunner;
    use crate::exec::ExecResult;
    use crate::inventory::Installation;
    use crate::platform::PlatformProbe;
    use crate::ui::Ui;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Probe over a temp directory; pattern strings are leaked because the
    /// trait hands out `'static` tables.
    struct TempProbe {
        patterns: &'static [(&'static str, &'static str)],
    }

    impl TempProbe {
        fn new(patterns: Vec<(String, String)>) -> Self {
            let leaked: Vec<(&'static str, &'static str)> = patterns
                .into_iter()
                .map(|(p, l)| {
                    (
                        Box::leak(p.into_boxed_str()) as &'static str,
                        Box::leak(l.into_boxed_str()) as &'static str,
                    )
                })
                .collect();
            Self {
                patterns: Box::leak(leaked.into_boxed_slice()),
            }
        }
    }

    impl PlatformProbe for TempProbe {
        fn os_name(&self) -> &'static str {
            "test"
        }
        fn patterns(&self, _runtime: Runtime) -> &'static [(&'static str, &'static str)] {
            self.patterns
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
        fn runtime_executable(&self, root: &Path, runtime: Runtime) -> Option<PathBuf> {
            crate::platform::executable_under(root, &[&format!("bin/{}", runtime.binary_name())])
        }
        fn compiler_executable(&self, root: &Path) -> Option<PathBuf> {
            crate::platform::executable_under(root, &["bin/javac"])
        }
        fn is_protected(&self, _installation: &Installation) -> bool {
            false
        }
    }

    #[cfg(unix)]
    fn make_executable(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    fn python_version_script(root: &Path, version: &str) -> (String, ExecResult) {
        let binary = fs::canonicalize(root.join("bin/python")).unwrap();
        (
            format!("{} --version", binary.display()),
            ExecResult::ok(&format!("Python {version}\n")),
        )
    }

    #[cfg(unix)]
    #[test]
    fn discovery_finds_pattern_matches() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("python3.12");
        make_executable(&root.join("bin/python"));

        let (cmd, reply) = python_version_script(&root, "3.12.1");
        let runner = ScriptedRunner::new().script(&cmd, reply);

        let probe = TempProbe::new(vec![(
            format!("{}/python*", temp.path().display()),
            "test pattern".into(),
        )]);
        let config = SweepConfig::default();
        let discovery = Discovery::new(&probe, &runner, &config);

        let inventory = discovery.run(Runtime::Python);
        assert_eq!(inventory.len(), 1);
        let installation = inventory.iter().next().unwrap();
        assert_eq!(installation.version, "3.12.1");
        assert_eq!(installation.source, "test pattern");
    }

    #[cfg(unix)]
    #[test]
    fn overlapping_patterns_yield_one_record() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("python3.12");
        make_executable(&root.join("bin/python"));

        let (cmd, reply) = python_version_script(&root, "3.12.1");
        let runner = ScriptedRunner::new().script(&cmd, reply);

        let probe = TempProbe::new(vec![
            (format!("{}/python*", temp.path().display()), "first".into()),
            (format!("{}/python3.12", temp.path().display()), "second".into()),
        ]);
        let config = SweepConfig::default();
        let discovery = Discovery::new(&probe, &runner, &config);

        let inventory = discovery.run(Runtime::Python);
        assert_eq!(inventory.len(), 1);
        // First source wins; dedup keeps insertion order.
        assert_eq!(inventory.iter().next().unwrap().source, "first");
    }

    #[cfg(unix)]
    #[test]
    fn symlink_and_target_collapse_to_one_record() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("python3.12");
        make_executable(&root.join("bin/python"));
        std::os::unix::fs::symlink(&root, temp.path().join("python-default")).unwrap();

        let (cmd, reply) = python_version_script(&root, "3.12.1");
        let runner = ScriptedRunner::new().script(&cmd, reply);

        let probe = TempProbe::new(vec![(
            format!("{}/python*", temp.path().display()),
            "pattern".into(),
        )]);
        let config = SweepConfig::default();
        let discovery = Discovery::new(&probe, &runner, &config);

        let inventory = discovery.run(Runtime::Python);
        assert_eq!(inventory.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn discovery_is_idempotent_on_unchanged_filesystem() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("python3.12");
        make_executable(&root.join("bin/python"));

        let (cmd, reply) = python_version_script(&root, "3.12.1");
        let runner = ScriptedRunner::new().script(&cmd, reply);

        let probe = TempProbe::new(vec![(
            format!("{}/python*", temp.path().display()),
            "pattern".into(),
        )]);
        let config = SweepConfig::default();
        let discovery = Discovery::new(&probe, &runner, &config);

        let first = discovery.run(Runtime::Python);
        let second = discovery.run(Runtime::Python);

        let summary = |inv: &Inventory| {
            inv.iter()
                .map(|i| (i.path.clone(), i.version.clone(), i.source.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(summary(&first), summary(&second));
    }

    #[cfg(unix)]
    #[test]
    fn verification_pass_reflects_removal() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("python3.12");
        make_executable(&root.join("bin/python"));

        let (cmd, reply) = python_version_script(&root, "3.12.1");
        let runner = ScriptedRunner::new().script(&cmd, reply);

        let probe = TempProbe::new(vec![(
            format!("{}/python*", temp.path().display()),
            "pattern".into(),
        )]);
        let config = SweepConfig::default();
        let discovery = Discovery::new(&probe, &runner, &config);

        let before = discovery.run(Runtime::Python);
        assert_eq!(before.len(), 1);

        fs::remove_dir_all(&root).unwrap();

        let ui = Ui::non_interactive(crate::ui::OutputMode::Silent);
        assert!(crate::verify::verify_removal(&discovery, Runtime::Python, &ui));
        // The inventory that drove removal is untouched by verification.
        assert_eq!(before.len(), 1);
    }
}
