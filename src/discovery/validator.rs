//! Candidate validation and classification.
//!
//! A candidate path becomes an [`Installation`] only if a runnable binary is
//! actually there. The validator resolves symlinks so aliased candidates
//! collapse to one record, queries the binary for its version, and derives
//! the install kind from the path (Python) or the presence of a compiler
//! (Java).

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::exec::CommandRunner;
use crate::inventory::{InstallKind, Installation};
use crate::platform::{is_executable, PlatformProbe};
use crate::runtime::Runtime;

/// Sentinel recorded when the version query fails in any way.
pub const UNKNOWN_VERSION: &str = "unknown version";

/// Budget for one version query.
const VERSION_TIMEOUT: Duration = Duration::from_secs(5);

/// Validates candidates against the filesystem and the binary itself.
pub struct Validator<'a> {
    probe: &'a dyn PlatformProbe,
    runner: &'a dyn CommandRunner,
}

impl<'a> Validator<'a> {
    pub fn new(probe: &'a dyn PlatformProbe, runner: &'a dyn CommandRunner) -> Self {
        Self { probe, runner }
    }

    /// Validate one candidate. `None` means "not an installation here".
    pub fn validate(
        &self,
        candidate: &Path,
        source: &str,
        runtime: Runtime,
    ) -> Option<Installation> {
        // Resolve symlinks so `/usr/bin/python3` and its target become the
        // same record.
        let path = std::fs::canonicalize(candidate).ok()?;

        let (root, executable) = if path.is_file() {
            if !is_executable(&path) {
                return None;
            }
            (root_for_binary(&path, runtime), path)
        } else if path.is_dir() {
            let root = self.collapse_bin_dir(path, runtime);
            let executable = self.probe.runtime_executable(&root, runtime)?;
            (root, executable)
        } else {
            return None;
        };

        let version = self.query_version(&executable, runtime);
        let kind = self.classify(&root, runtime);

        let installation = Installation {
            runtime,
            path: root,
            executable,
            version,
            kind,
            source: source.to_string(),
        };
        tracing::info!(
            path = %installation.path.display(),
            version = %installation.version,
            source = %installation.source,
            "installation discovered"
        );
        Some(installation)
    }

    /// A PATH entry like `<root>/bin` should record `<root>`.
    ///
    /// Only collapse when the parent still looks runtime-related, so an
    /// unrelated `bin` directory can't promote its parent.
    fn collapse_bin_dir(&self, dir: PathBuf, runtime: Runtime) -> PathBuf {
        let is_bin = dir
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.eq_ignore_ascii_case("bin"));
        if !is_bin {
            return dir;
        }
        match dir.parent() {
            Some(parent)
                if runtime.matches_path_segment(&parent.to_string_lossy())
                    && self.probe.runtime_executable(parent, runtime).is_some() =>
            {
                parent.to_path_buf()
            }
            _ => dir,
        }
    }

    /// Ask the binary for its version.
    ///
    /// Launch failure, timeout, non-zero exit, and unparseable output all
    /// yield the sentinel; the record is kept either way.
    fn query_version(&self, executable: &Path, runtime: Runtime) -> String {
        let program = executable.to_string_lossy();
        match self
            .runner
            .run(&program, runtime.version_args(), Some(VERSION_TIMEOUT))
        {
            Ok(result) if result.success => result
                .first_line()
                .and_then(|line| runtime.extract_version(line))
                .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
            Ok(result) => {
                tracing::debug!(
                    executable = %executable.display(),
                    exit_code = ?result.exit_code,
                    timed_out = result.timed_out,
                    "version query did not succeed"
                );
                UNKNOWN_VERSION.to_string()
            }
            Err(e) => {
                tracing::debug!(executable = %executable.display(), error = %e, "version query failed");
                UNKNOWN_VERSION.to_string()
            }
        }
    }

    fn classify(&self, root: &Path, runtime: Runtime) -> InstallKind {
        match runtime {
            Runtime::Python => classify_python_path(root),
            Runtime::Java => {
                if self.probe.compiler_executable(root).is_some() {
                    InstallKind::Jdk
                } else {
                    InstallKind::Jre
                }
            }
        }
    }
}

/// Installation root recorded for a bare binary candidate.
///
/// A Python binary is its own record (`/usr/bin/python3.11`); a Java binary
/// lives in `<root>/bin/java`, so the root is two levels up.
fn root_for_binary(binary: &Path, runtime: Runtime) -> PathBuf {
    match runtime {
        Runtime::Python => binary.to_path_buf(),
        Runtime::Java => binary
            .parent()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| binary.to_path_buf()),
    }
}

/// Priority-ordered substring classification for Python paths.
pub(crate) fn classify_python_path(path: &Path) -> InstallKind {
    let lower = path.to_string_lossy().to_lowercase();
    if lower.contains("conda") {
        InstallKind::Conda
    } else if lower.contains("virtualenv") || lower.contains("venv") {
        InstallKind::Virtualenv
    } else if lower.contains("pyenv") {
        InstallKind::Pyenv
    } else if lower.contains("homebrew") || lower.contains("/usr/local/cellar") {
        InstallKind::Homebrew
    } else if lower.contains("/library/frameworks") {
        InstallKind::Framework
    } else if lower.contains(".local") || lower.contains("appdata") {
        InstallKind::User
    } else if lower.starts_with("/usr/bin")
        || lower.starts_with("c:\\python")
        || lower.contains("program files\\python")
    {
        InstallKind::System
    } else {
        InstallKind::Custom
    }
}
