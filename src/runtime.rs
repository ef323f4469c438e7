//! Target runtimes and their per-runtime constants.
//!
//! Everything that differs between Python and Java — version flags, output
//! shapes, the keywords that mark an environment line or PATH segment as
//! belonging to the runtime — lives in one table here, so the discovery and
//! removal pipelines stay runtime-agnostic.

use std::sync::OnceLock;

use regex::Regex;

/// A runtime airsweep knows how to find and remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Runtime {
    Python,
    Java,
}

static PYTHON_VERSION_RE: OnceLock<Regex> = OnceLock::new();
static JAVA_VERSION_RE: OnceLock<Regex> = OnceLock::new();

impl Runtime {
    /// Display name for menus and progress text.
    pub fn display_name(&self) -> &'static str {
        match self {
            Runtime::Python => "Python",
            Runtime::Java => "Java",
        }
    }

    /// Name of the runnable binary, without extension.
    pub fn binary_name(&self) -> &'static str {
        match self {
            Runtime::Python => "python",
            Runtime::Java => "java",
        }
    }

    /// Name of the compiler binary that distinguishes a JDK from a JRE.
    ///
    /// Only meaningful for Java.
    pub fn compiler_name(&self) -> Option<&'static str> {
        match self {
            Runtime::Python => None,
            Runtime::Java => Some("javac"),
        }
    }

    /// Arguments that make the binary print its version.
    pub fn version_args(&self) -> &'static [&'static str] {
        match self {
            Runtime::Python => &["--version"],
            Runtime::Java => &["-version"],
        }
    }

    /// Keywords marking an environment line or PATH segment as ours.
    ///
    /// Matched case-insensitively against the lowercased text.
    pub fn env_keywords(&self) -> &'static [&'static str] {
        match self {
            Runtime::Python => &["python", "conda", "anaconda"],
            Runtime::Java => &["java", "jdk", "jre"],
        }
    }

    /// Named environment variables deleted outright during Windows cleanup.
    pub fn named_env_vars(&self) -> &'static [&'static str] {
        match self {
            Runtime::Python => &["PYTHONPATH", "PYTHONHOME"],
            Runtime::Java => &["JAVA_HOME", "JRE_HOME"],
        }
    }

    /// Extract a version token from one line of version-query output.
    ///
    /// Python prints `Python 3.11.4` to stdout. Java prints
    /// `openjdk version "17.0.2" 2022-01-18` (or `java version "1.8.0_392"`)
    /// to stderr; the quote/underscore decoration is stripped.
    pub fn extract_version(&self, line: &str) -> Option<String> {
        let re = match self {
            Runtime::Python => PYTHON_VERSION_RE
                .get_or_init(|| Regex::new(r"(\d+(?:\.\d+)+)").unwrap_or_else(|_| unreachable!())),
            Runtime::Java => JAVA_VERSION_RE.get_or_init(|| {
                Regex::new(r#"["']?(\d+(?:\.\d+)+)(?:_\d+)?["']?"#)
                    .unwrap_or_else(|_| unreachable!())
            }),
        };
        re.captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Does this lowercased PATH segment look like it belongs to us?
    pub fn matches_path_segment(&self, segment: &str) -> bool {
        let lower = segment.to_lowercase();
        self.env_keywords().iter().any(|kw| lower.contains(kw))
    }
}

impl std::fmt::Display for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
