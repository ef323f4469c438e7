//! Linux probe: filesystem patterns plus the alternatives system.

use std::path::{Path, PathBuf};

use super::{executable_under, Candidate, PlatformProbe};
use crate::exec::CommandRunner;
use crate::inventory::{Installation, Inventory};
use crate::runtime::Runtime;
use crate::ui::Ui;

const PYTHON_PATTERNS: &[(&str, &str)] = &[
    ("/usr/bin/python*", "system packages"),
    ("/usr/local/bin/python*", "locally built"),
    ("/opt/python*", "custom install"),
    ("/home/*/.local/bin/python*", "user install"),
    ("~/.local/bin/python*", "user install"),
    ("/home/*/.pyenv/versions/*", "pyenv"),
    ("~/.pyenv/versions/*", "pyenv"),
    ("/home/*/.virtualenvs/*", "virtualenv collection"),
    ("~/.virtualenvs/*", "virtualenv collection"),
    ("/home/*/anaconda*", "Anaconda"),
    ("/home/*/miniconda*", "Miniconda"),
    ("~/anaconda*", "Anaconda"),
    ("~/miniconda*", "Miniconda"),
    ("/home/*/anaconda3/envs/*", "Conda environment"),
    ("/home/*/miniconda3/envs/*", "Conda environment"),
    ("~/anaconda3/envs/*", "Conda environment"),
    ("~/miniconda3/envs/*", "Conda environment"),
    ("/opt/anaconda3", "Anaconda"),
    ("/opt/miniconda3", "Miniconda"),
    ("/opt/anaconda3/envs/*", "Conda environment"),
    ("/opt/miniconda3/envs/*", "Conda environment"),
];

const JAVA_PATTERNS: &[(&str, &str)] = &[
    ("/usr/lib/jvm/*", "distro JVM"),
    ("/usr/java/*", "Oracle Java"),
    ("/opt/jdk*", "custom JDK"),
    ("/opt/java*", "custom Java"),
    ("/home/*/.sdkman/candidates/java/*", "SDKMAN"),
    ("~/.sdkman/candidates/java/*", "SDKMAN"),
    ("/home/*/.local/share/umake/java/*", "Ubuntu Make"),
];

/// Root the distro's package manager owns; never deleted by airsweep.
const DISTRO_JVM_ROOT: &str = "/usr/lib/jvm";

pub struct LinuxProbe;

impl PlatformProbe for LinuxProbe {
    fn os_name(&self) -> &'static str {
        "linux"
    }

    fn patterns(&self, runtime: Runtime) -> &'static [(&'static str, &'static str)] {
        match runtime {
            Runtime::Python => PYTHON_PATTERNS,
            Runtime::Java => JAVA_PATTERNS,
        }
    }

    fn walk_roots(&self) -> Vec<PathBuf> {
        let mut roots = Vec::new();
        if let Some(home) = dirs::home_dir() {
            roots.push(home);
        }
        roots.push(PathBuf::from("/opt"));
        roots.push(PathBuf::from("/usr/local"));
        roots
    }

    fn profile_files(&self) -> Vec<PathBuf> {
        let home = dirs::home_dir().unwrap_or_default();
        vec![
            home.join(".bashrc"),
            home.join(".bash_profile"),
            home.join(".zshrc"),
            home.join(".profile"),
            PathBuf::from("/etc/environment"),
        ]
    }

    fn inspect(&self, runtime: Runtime, runner: &dyn CommandRunner) -> Vec<Candidate> {
        match runtime {
            Runtime::Python => Vec::new(),
            Runtime::Java => alternatives_candidates(runner),
        }
    }

    fn runtime_executable(&self, root: &Path, runtime: Runtime) -> Option<PathBuf> {
        let sub = format!("bin/{}", runtime.binary_name());
        executable_under(root, &[&sub])
    }

    fn compiler_executable(&self, root: &Path) -> Option<PathBuf> {
        executable_under(root, &["bin/javac"])
    }

    fn is_protected(&self, installation: &Installation) -> bool {
        match installation.runtime {
            Runtime::Python => installation.path.starts_with("/usr/bin"),
            Runtime::Java => installation.path.starts_with(DISTRO_JVM_ROOT),
        }
    }

    fn clean_system_env(&self, runtime: Runtime, runner: &dyn CommandRunner, ui: &Ui) {
        if runtime != Runtime::Java {
            return;
        }
        // Deregister every java alternative the system still lists.
        let listed = match runner.run("update-alternatives", &["--list", "java"], None) {
            Ok(result) if result.success => result.stdout,
            _ => return,
        };
        for path in listed.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if runner.run_ok("update-alternatives", &["--remove", "java", path]) {
                ui.message(&format!("Removed alternatives entry: {path}"));
            } else {
                ui.warning(&format!("Could not remove alternatives entry: {path}"));
            }
        }
    }

    fn run_uninstallers(
        &self,
        _inventory: &Inventory,
        _runtime: Runtime,
        _runner: &dyn CommandRunner,
        _ui: &Ui,
    ) {
        // Directory deletion is the whole story on Linux.
    }
}

/// Map `update-alternatives --list java` output to install roots.
///
/// Each listed path is a `java` binary; the install root is two levels up
/// (`<root>/bin/java`).
fn alternatives_candidates(runner: &dyn CommandRunner) -> Vec<Candidate> {
    let output = match runner.run("update-alternatives", &["--list", "java"], None) {
        Ok(result) if result.success => result.stdout,
        _ => return Vec::new(),
    };
    parse_alternatives(&output)
}

pub(crate) fn parse_alternatives(output: &str) -> Vec<Candidate> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let binary = Path::new(line);
            let root = binary.parent()?.parent()?;
            Some((root.to_path_buf(), "alternatives".to_string()))
        })
        .collect()
}
