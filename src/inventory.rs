//! Installation records and the deduplicating inventory.
//!
//! One discovery pass produces one [`Inventory`]. Candidates arrive from
//! several sources (glob patterns, PATH, registry, package managers) and
//! frequently point at the same installation, so the inventory rejects
//! duplicates by normalized path before insert.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::runtime::Runtime;

/// How an installation got onto the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InstallKind {
    /// Anaconda/Miniconda root or one of its environments.
    Conda,
    /// A virtual environment (`venv`, `virtualenv`, `.virtualenvs`).
    Virtualenv,
    /// Managed by pyenv.
    Pyenv,
    /// Installed via Homebrew.
    Homebrew,
    /// macOS framework build under `/Library/Frameworks`.
    Framework,
    /// Per-user install (`~/.local`, `AppData`).
    User,
    /// OS-managed install.
    System,
    /// Anything else.
    Custom,
    /// Java development kit (has `javac`).
    Jdk,
    /// Java runtime only.
    Jre,
}

impl std::fmt::Display for InstallKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            InstallKind::Conda => "Conda",
            InstallKind::Virtualenv => "Virtualenv",
            InstallKind::Pyenv => "pyenv",
            InstallKind::Homebrew => "Homebrew",
            InstallKind::Framework => "Framework",
            InstallKind::User => "User install",
            InstallKind::System => "System",
            InstallKind::Custom => "Custom",
            InstallKind::Jdk => "JDK",
            InstallKind::Jre => "JRE",
        };
        f.write_str(label)
    }
}

/// One detected runtime installation.
#[derive(Debug, Clone, Serialize)]
pub struct Installation {
    /// Runtime this record belongs to.
    pub runtime: Runtime,
    /// Normalized installation root (unique key within an inventory).
    pub path: PathBuf,
    /// Resolved runnable binary.
    pub executable: PathBuf,
    /// Version token, or the `unknown version` sentinel.
    pub version: String,
    /// Install mechanism.
    pub kind: InstallKind,
    /// Which scan rule or inspector found it.
    pub source: String,
}

impl std::fmt::Display for Installation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} @ {} ({})",
            self.kind,
            self.version,
            self.path.display(),
            self.source
        )
    }
}

/// Lexically normalize a path: drop `.` components and trailing separators.
///
/// Deliberately does not hit the filesystem — candidates are canonicalized
/// during validation, and normalization here only has to make equal paths
/// compare equal.
pub fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Path equality as used for dedup. Case-insensitive on Windows.
fn same_path(a: &Path, b: &Path) -> bool {
    let (a, b) = (normalize(a), normalize(b));
    if cfg!(windows) {
        a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
    } else {
        a == b
    }
}

/// Deduplicated set of installations from one discovery pass.
///
/// Append-only; insertion order is preserved for display.
#[derive(Debug, Default, Serialize)]
pub struct Inventory {
    items: Vec<Installation>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless an entry with the same normalized path exists.
    ///
    /// Returns whether the installation was added.
    pub fn insert(&mut self, installation: Installation) -> bool {
        if self.contains_path(&installation.path) {
            tracing::debug!(path = %installation.path.display(), "duplicate installation skipped");
            return false;
        }
        self.items.push(installation);
        true
    }

    /// Whether any entry matches the given path after normalization.
    pub fn contains_path(&self, path: &Path) -> bool {
        self.items.iter().any(|i| same_path(&i.path, path))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Installation> {
        self.items.iter()
    }

    pub fn items(&self) -> &[Installation] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
