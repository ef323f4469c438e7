//! Shell-profile environment cleanup.
//!
//! Lines mentioning a runtime keyword are dropped from each profile file.
//! The original file is copied to `<file>.bak` before the first rewrite;
//! an unchanged file is left alone, so re-running the cleanup neither
//! rewrites the file nor clobbers the backup.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::runtime::Runtime;
use crate::ui::Ui;

/// Whether a profile line survives cleanup for the given keywords.
fn keep_line(line: &str, keywords: &[&str]) -> bool {
    let lower = line.to_lowercase();
    !keywords.iter().any(|kw| lower.contains(kw))
}

/// Backup location for an edited profile file.
pub fn backup_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.bak", path.display()))
}

/// Filter one file. Returns how many lines were dropped, or `None` when the
/// file is absent or already clean (no write, no backup).
pub fn clean_profile_file(path: &Path, keywords: &[&str]) -> Result<Option<usize>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;

    let kept: Vec<&str> = content.lines().filter(|l| keep_line(l, keywords)).collect();
    let total = content.lines().count();
    if kept.len() == total {
        return Ok(None);
    }

    let mut filtered = kept.join("\n");
    if content.ends_with('\n') {
        filtered.push('\n');
    }

    std::fs::copy(path, backup_path(path))?;
    std::fs::write(path, filtered)?;
    Ok(Some(total - kept.len()))
}

/// Clean every profile file, reporting per-file outcomes.
pub fn clean_profiles(files: &[PathBuf], runtime: Runtime, ui: &Ui) {
    let keywords = runtime.env_keywords();
    for file in files {
        match clean_profile_file(file, keywords) {
            Ok(Some(dropped)) => {
                ui.message(&format!(
                    "Cleaned {} ({dropped} line(s) removed, backup at {})",
                    file.display(),
                    backup_path(file).display()
                ));
            }
            Ok(None) => {}
            Err(e) => {
                ui.warning(&format!("Could not clean {}: {e}", file.display()));
                tracing::warn!(file = %file.display(), error = %e, "profile cleanup failed");
            }
        }
    }
}
