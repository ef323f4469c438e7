//! Candidate path expansion.
//!
//! Turns the platform's pattern table, the PATH variable, and a bounded
//! directory walk into concrete candidate paths for validation. Nothing
//! here decides whether a candidate is a real installation.

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use walkdir::WalkDir;

use crate::config::WalkBudget;
use crate::platform::Candidate;
use crate::runtime::Runtime;

static WIN_VAR_RE: OnceLock<Regex> = OnceLock::new();
static UNIX_VAR_RE: OnceLock<Regex> = OnceLock::new();

/// Expand `~`, `%VAR%`, and `$VAR`/`${VAR}` references in a pattern.
///
/// Unset variables are left verbatim so the resulting glob simply matches
/// nothing instead of matching the filesystem root.
pub fn expand_vars(pattern: &str) -> String {
    let mut expanded = pattern.to_string();

    if let Some(rest) = expanded.clone().strip_prefix('~') {
        if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') {
            if let Some(home) = dirs::home_dir() {
                expanded = format!("{}{}", home.display(), rest);
            }
        }
    }

    let win_re = WIN_VAR_RE.get_or_init(|| {
        Regex::new(r"%([A-Za-z_][A-Za-z0-9_]*)%").unwrap_or_else(|_| unreachable!())
    });
    expanded = win_re
        .replace_all(&expanded, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .to_string();

    let unix_re = UNIX_VAR_RE.get_or_init(|| {
        Regex::new(r"\$\{?([A-Za-z_][A-Za-z0-9_]*)\}?").unwrap_or_else(|_| unreachable!())
    });
    expanded = unix_re
        .replace_all(&expanded, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .to_string();

    expanded
}

/// Expand a pattern table into existing candidate paths.
pub fn expand_patterns(patterns: &[(&str, &str)]) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for (pattern, label) in patterns {
        let expanded = expand_vars(pattern);
        if expanded.contains(['*', '?', '[']) {
            let Ok(matches) = glob::glob(&expanded) else {
                tracing::debug!(pattern = %expanded, "bad glob pattern skipped");
                continue;
            };
            for path in matches.filter_map(|m| m.ok()) {
                candidates.push((path, label.to_string()));
            }
        } else {
            let path = PathBuf::from(&expanded);
            if path.exists() {
                candidates.push((path, label.to_string()));
            }
        }
    }
    candidates
}

/// PATH segments that look runtime-related.
pub fn path_env_candidates(runtime: Runtime) -> Vec<Candidate> {
    let Some(path_var) = std::env::var_os("PATH") else {
        return Vec::new();
    };
    std::env::split_paths(&path_var)
        .filter(|segment| runtime.matches_path_segment(&segment.to_string_lossy()))
        .map(|segment| (segment, "PATH environment".to_string()))
        .collect()
}

/// Directory names that mark a virtual environment regardless of content.
const VENV_DIR_NAMES: &[&str] = &["venv", ".venv", "virtualenv"];

/// Does this directory look like a virtual-environment root?
pub fn looks_like_virtualenv(dir: &std::path::Path) -> bool {
    if dir.join("pyvenv.cfg").is_file() {
        return true;
    }
    if dir.join("bin").join("python").is_file() || dir.join("Scripts").join("python.exe").is_file()
    {
        return true;
    }
    dir.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| VENV_DIR_NAMES.contains(&name.to_lowercase().as_str()))
}

/// Walk the given roots looking for virtual environments, within budget.
///
/// Unreadable entries are skipped silently; a root past its entry budget is
/// abandoned with a debug log so a huge or looping filesystem can't stall
/// discovery.
pub fn virtualenv_candidates(roots: &[PathBuf], budget: &WalkBudget) -> Vec<Candidate> {
    let mut found = Vec::new();
    for root in roots {
        let mut visited = 0usize;
        for entry in WalkDir::new(root)
            .max_depth(budget.max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            visited += 1;
            if visited > budget.max_entries {
                tracing::debug!(
                    root = %root.display(),
                    budget = budget.max_entries,
                    "virtual-environment walk budget exhausted"
                );
                break;
            }
            if !entry.file_type().is_dir() {
                continue;
            }
            if looks_like_virtualenv(entry.path()) {
                found.push((
                    entry.path().to_path_buf(),
                    "virtual environment scan".to_string(),
                ));
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn expand_vars_resolves_home_prefix() {
        let expanded = expand_vars("~/x");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("x"));
    }

    #[test]
    fn expand_vars_resolves_set_variable() {
        std::env::set_var("AIRSWEEP_TEST_VAR", "/tmp/aswp");
        assert_eq!(expand_vars("$AIRSWEEP_TEST_VAR/bin"), "/tmp/aswp/bin");
        assert_eq!(expand_vars("${AIRSWEEP_TEST_VAR}/bin"), "/tmp/aswp/bin");
        assert_eq!(expand_vars("%AIRSWEEP_TEST_VAR%\\bin"), "/tmp/aswp\\bin");
        std::env::remove_var("AIRSWEEP_TEST_VAR");
    }

    #[test]
    fn expand_vars_leaves_unset_variable_verbatim() {
        assert_eq!(
            expand_vars("%AIRSWEEP_UNSET_VAR%\\x"),
            "%AIRSWEEP_UNSET_VAR%\\x"
        );
    }

    #[test]
    fn expand_patterns_matches_wildcards() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("python3.11")).unwrap();
        fs::create_dir_all(temp.path().join("python3.12")).unwrap();
        fs::create_dir_all(temp.path().join("ruby")).unwrap();

        let pattern = format!("{}/python*", temp.path().display());
        let candidates = expand_patterns(&[(pattern.as_str(), "test")]);

        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|(_, label)| label == "test"));
    }

    #[test]
    fn expand_patterns_includes_existing_literal() {
        let temp = TempDir::new().unwrap();
        let literal = temp.path().join("jdk-17");
        fs::create_dir_all(&literal).unwrap();

        let pattern = literal.to_string_lossy().to_string();
        let candidates = expand_patterns(&[(pattern.as_str(), "literal")]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].0, literal);
    }

    #[test]
    fn expand_patterns_skips_missing_literal() {
        let candidates = expand_patterns(&[("/nonexistent/airsweep/path", "x")]);
        assert!(candidates.is_empty());
    }

    #[test]
    fn virtualenv_detected_by_marker_file() {
        let temp = TempDir::new().unwrap();
        let env_dir = temp.path().join("projects/demo/env");
        fs::create_dir_all(&env_dir).unwrap();
        fs::write(env_dir.join("pyvenv.cfg"), "home = /usr/bin\n").unwrap();

        let found = virtualenv_candidates(
            &[temp.path().to_path_buf()],
            &WalkBudget::default(),
        );
        assert!(found.iter().any(|(p, _)| p == &env_dir));
    }

    #[test]
    fn virtualenv_detected_by_directory_name() {
        let temp = TempDir::new().unwrap();
        let env_dir = temp.path().join("demo/.venv");
        fs::create_dir_all(&env_dir).unwrap();

        let found = virtualenv_candidates(
            &[temp.path().to_path_buf()],
            &WalkBudget::default(),
        );
        assert!(found.iter().any(|(p, _)| p == &env_dir));
    }

    #[test]
    fn walk_respects_depth_budget() {
        let temp = TempDir::new().unwrap();
        let deep = temp.path().join("a/b/c/d/e/f/g/h");
        fs::create_dir_all(deep.join(".venv")).unwrap();

        let budget = WalkBudget {
            max_depth: 3,
            max_entries: 50_000,
        };
        let found = virtualenv_candidates(&[temp.path().to_path_buf()], &budget);
        assert!(found.is_empty());
    }

    #[test]
    fn walk_respects_entry_budget() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("zz/.venv")).unwrap();

        // Budget of one admits only the root itself, regardless of the
        // order the walker yields children in.
        let budget = WalkBudget {
            max_depth: 6,
            max_entries: 1,
        };
        let found = virtualenv_candidates(&[temp.path().to_path_buf()], &budget);
        assert!(found.is_empty());
    }

    #[test]
    fn path_env_candidates_filters_by_keyword() {
        // PATH is process-global; only assert the filter never panics and
        // returns entries containing a keyword.
        for (path, _) in path_env_candidates(Runtime::Java) {
            assert!(Runtime::Java.matches_path_segment(&path.to_string_lossy()));
        }
    }
}
