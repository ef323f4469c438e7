//! macOS probe: framework installs, Homebrew, and Java browser plugins.

use std::path::{Path, PathBuf};

use super::{executable_under, Candidate, PlatformProbe};
use crate::exec::CommandRunner;
use crate::runtime::Runtime;

const PYTHON_PATTERNS: &[(&str, &str)] = &[
    (
        "/Library/Frameworks/Python.framework/Versions/*",
        "framework install",
    ),
    ("/usr/local/bin/python*", "Homebrew"),
    ("/usr/bin/python*", "system"),
    ("/opt/homebrew/bin/python*", "Homebrew (arm64)"),
    ("/Users/*/.pyenv/versions/*", "pyenv"),
    ("~/.pyenv/versions/*", "pyenv"),
    ("/Users/*/.virtualenvs/*", "virtualenv collection"),
    ("/Users/*/anaconda*", "Anaconda"),
    ("/Users/*/miniconda*", "Miniconda"),
    ("~/anaconda*", "Anaconda"),
    ("~/miniconda*", "Miniconda"),
    ("/Users/*/anaconda3/envs/*", "Conda environment"),
    ("/Users/*/miniconda3/envs/*", "Conda environment"),
    ("/opt/anaconda3/envs/*", "Conda environment"),
    ("/opt/miniconda3/envs/*", "Conda environment"),
];

const JAVA_PATTERNS: &[(&str, &str)] = &[
    ("/Library/Java/JavaVirtualMachines/*", "Oracle JDK"),
    (
        "/Library/Internet Plug-Ins/JavaAppletPlugin.plugin",
        "browser plugin",
    ),
    ("/usr/local/Cellar/openjdk*", "Homebrew OpenJDK"),
    ("/opt/homebrew/Cellar/openjdk*", "Homebrew OpenJDK (arm64)"),
    ("/Users/*/.sdkman/candidates/java/*", "SDKMAN"),
    ("~/.sdkman/candidates/java/*", "SDKMAN"),
    ("/Users/*/Library/Java/JavaVirtualMachines/*", "user JDK"),
];

/// Vendor leftovers deleted alongside Java installations.
const JAVA_PLUGIN_PATHS: &[&str] = &[
    "/Library/Internet Plug-Ins/JavaAppletPlugin.plugin",
    "/Library/PreferencePanes/JavaControlPanel.prefPane",
];

pub struct MacOsProbe;

impl PlatformProbe for MacOsProbe {
    fn os_name(&self) -> &'static str {
        "macos"
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
            home.join(".bash_profile"),
            home.join(".zshrc"),
            home.join(".bashrc"),
            home.join(".profile"),
        ]
    }

    fn inspect(&self, runtime: Runtime, runner: &dyn CommandRunner) -> Vec<Candidate> {
        homebrew_candidates(runtime, runner)
    }

    fn runtime_executable(&self, root: &Path, runtime: Runtime) -> Option<PathBuf> {
        let sub = format!("bin/{}", runtime.binary_name());
        // Homebrew kegs and JDK bundles nest the real layout one level down.
        executable_under(
            root,
            &[
                sub.as_str(),
                &format!("Contents/Home/{sub}"),
                &format!("libexec/{sub}"),
            ],
        )
    }

    fn compiler_executable(&self, root: &Path) -> Option<PathBuf> {
        executable_under(
            root,
            &[
                "bin/javac",
                "Contents/Home/bin/javac",
                "libexec/bin/javac",
            ],
        )
    }

    fn is_protected(&self, installation: &crate::inventory::Installation) -> bool {
        // Apple-managed shims and anything under the sealed system volume.
        installation.path.starts_with("/usr/bin") || installation.path.starts_with("/System")
    }

    fn extra_removal_paths(&self, runtime: Runtime) -> Vec<PathBuf> {
        match runtime {
            Runtime::Python => Vec::new(),
            Runtime::Java => JAVA_PLUGIN_PATHS.iter().map(PathBuf::from).collect(),
        }
    }
}

/// Homebrew inspector: ask brew what it has, then glob its prefix.
fn homebrew_candidates(runtime: Runtime, runner: &dyn CommandRunner) -> Vec<Candidate> {
    let listed = match runner.run("brew", &["list"], None) {
        Ok(result) if result.success => result.stdout,
        _ => {
            tracing::debug!("brew not available, skipping Homebrew inspection");
            return Vec::new();
        }
    };

    let formula_prefix = match runtime {
        Runtime::Python => "python",
        Runtime::Java => "openjdk",
    };
    if !listed
        .lines()
        .any(|line| line.trim().starts_with(formula_prefix))
    {
        return Vec::new();
    }

    let prefix = match runner.run("brew", &["--prefix"], None) {
        Ok(result) if result.success => result.stdout.trim().to_string(),
        _ => return Vec::new(),
    };
    if prefix.is_empty() {
        return Vec::new();
    }

    let pattern = match runtime {
        Runtime::Python => format!("{prefix}/opt/python@*"),
        Runtime::Java => format!("{prefix}/opt/openjdk*"),
    };
    glob::glob(&pattern)
        .map(|paths| {
            paths
                .filter_map(|p| p.ok())
                .map(|p| (p, "Homebrew".to_string()))
                .collect()
        })
        .unwrap_or_default()
}
