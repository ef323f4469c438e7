//! Windows probe: registry discovery, vendor uninstallers, and
//! environment-variable cleanup in both hives.
//!
//! Registry access goes through `reg.exe` on the injected command runner
//! rather than a registry API binding, so the query/parse logic runs (and is
//! tested) on every platform.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{executable_under, Candidate, PlatformProbe};
use crate::exec::CommandRunner;
use crate::inventory::{InstallKind, Installation, Inventory};
use crate::runtime::Runtime;
use crate::ui::Ui;

const PYTHON_PATTERNS: &[(&str, &str)] = &[
    ("C:\\Python*", "official installer"),
    ("C:\\Program Files\\Python*", "Program Files"),
    (
        "%USERPROFILE%\\AppData\\Local\\Programs\\Python\\*",
        "user install",
    ),
];

const JAVA_PATTERNS: &[(&str, &str)] = &[
    ("C:\\Program Files\\Java\\*", "Oracle JRE/JDK"),
    ("C:\\Program Files (x86)\\Java\\*", "Oracle 32-bit"),
    ("C:\\JDK*", "custom JDK"),
    ("C:\\Program Files\\Eclipse Foundation\\*", "Eclipse Temurin"),
    ("C:\\Program Files\\Eclipse Adoptium\\*", "Eclipse Temurin"),
    ("C:\\Program Files\\Microsoft\\jdk*", "Microsoft JDK"),
    ("C:\\Program Files\\AdoptOpenJDK\\*", "AdoptOpenJDK"),
    ("%USERPROFILE%\\scoop\\apps\\openjdk\\*", "Scoop"),
];

/// Registry subtrees holding Python install paths.
const PYTHON_REG_BASES: &[&str] = &[
    "HKLM\\SOFTWARE\\Python",
    "HKLM\\SOFTWARE\\Wow6432Node\\Python",
    "HKLM\\SOFTWARE\\ContinuumAnalytics",
];

/// Registry subtrees holding vendor `JavaHome` values.
const JAVA_REG_BASES: &[(&str, &str)] = &[
    ("HKLM\\SOFTWARE\\JavaSoft", "Oracle"),
    ("HKLM\\SOFTWARE\\Eclipse Foundation", "Eclipse Temurin"),
    ("HKLM\\SOFTWARE\\Microsoft\\JDK", "Microsoft"),
    ("HKLM\\SOFTWARE\\AdoptOpenJDK", "AdoptOpenJDK"),
    ("HKLM\\SOFTWARE\\WOW6432Node\\JavaSoft", "Oracle 32-bit"),
];

/// Environment-variable containers, per-user then per-machine.
const ENV_KEYS: &[&str] = &[
    "HKCU\\Environment",
    "HKLM\\SYSTEM\\CurrentControlSet\\Control\\Session Manager\\Environment",
];

/// Budget for the wmic batch uninstall; expiry is a soft failure.
const WMIC_TIMEOUT: Duration = Duration::from_secs(30);

pub struct WindowsProbe;

impl PlatformProbe for WindowsProbe {
    fn os_name(&self) -> &'static str {
        "windows"
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
        roots.push(PathBuf::from("C:\\"));
        roots.push(PathBuf::from("D:\\"));
        roots
    }

    fn profile_files(&self) -> Vec<PathBuf> {
        // Environment lives in the registry, not profile files.
        Vec::new()
    }

    fn inspect(&self, runtime: Runtime, runner: &dyn CommandRunner) -> Vec<Candidate> {
        match runtime {
            Runtime::Python => python_registry_candidates(runner),
            Runtime::Java => java_registry_candidates(runner),
        }
    }

    fn runtime_executable(&self, root: &Path, runtime: Runtime) -> Option<PathBuf> {
        match runtime {
            Runtime::Python => executable_under(root, &["python.exe", "Scripts\\python.exe"]),
            Runtime::Java => executable_under(root, &["bin\\java.exe"]),
        }
    }

    fn compiler_executable(&self, root: &Path) -> Option<PathBuf> {
        executable_under(root, &["bin\\javac.exe"])
    }

    fn is_protected(&self, _installation: &Installation) -> bool {
        // Windows ships no OS-managed Python or Java.
        false
    }

    fn run_uninstallers(
        &self,
        inventory: &Inventory,
        runtime: Runtime,
        runner: &dyn CommandRunner,
        ui: &Ui,
    ) {
        match runtime {
            Runtime::Python => run_python_uninstallers(inventory, runner, ui),
            Runtime::Java => run_wmic_uninstall(runner, ui),
        }
    }

    fn clean_system_env(&self, runtime: Runtime, runner: &dyn CommandRunner, ui: &Ui) {
        for key in ENV_KEYS {
            scrub_path_value(key, runtime, runner, ui);
            for var in runtime.named_env_vars() {
                if runner.run_ok("reg", &["delete", key, "/v", var, "/f"]) {
                    ui.message(&format!("Deleted {var} from {key}"));
                }
            }
        }
    }

    fn supports_edge_cleanup(&self) -> bool {
        true
    }
}

/// Run each official `Uninstall.exe` silently before directory deletion.
fn run_python_uninstallers(inventory: &Inventory, runner: &dyn CommandRunner, ui: &Ui) {
    for installation in inventory.iter() {
        if !matches!(installation.kind, InstallKind::System | InstallKind::User) {
            continue;
        }
        let uninstaller = installation.path.join("Uninstall.exe");
        if !uninstaller.is_file() {
            continue;
        }
        ui.message(&format!("Uninstalling: {}", installation.path.display()));
        let uninstaller = uninstaller.to_string_lossy().to_string();
        match runner.run(&uninstaller, &["/quiet"], None) {
            Ok(result) if result.success => {}
            Ok(result) => ui.warning(&format!(
                "Uninstaller exited with {:?}: {}",
                result.exit_code,
                installation.path.display()
            )),
            Err(e) => ui.warning(&format!("Uninstaller failed: {e}")),
        }
    }
}

/// Ask the MSI database to uninstall anything named Java.
fn run_wmic_uninstall(runner: &dyn CommandRunner, ui: &Ui) {
    ui.message("Running wmic product uninstall for Java...");
    let args = [
        "product",
        "where",
        "name like '%Java%'",
        "call",
        "uninstall",
        "/nointeractive",
    ];
    match runner.run("wmic", &args, Some(WMIC_TIMEOUT)) {
        Ok(result) if result.timed_out => {
            ui.warning("wmic uninstall timed out; another installer may be running")
        }
        Ok(result) if !result.success => ui.warning(&format!(
            "wmic uninstall exited with {:?}",
            result.exit_code
        )),
        Ok(_) => {}
        Err(e) => ui.warning(&format!("wmic uninstall failed: {e}")),
    }
}

/// Filter runtime-related segments out of a registry PATH value and write
/// the result back, preserving the value type.
fn scrub_path_value(key: &str, runtime: Runtime, runner: &dyn CommandRunner, ui: &Ui) {
    let output = match runner.run("reg", &["query", key, "/v", "Path"], None) {
        Ok(result) if result.success => result.stdout,
        _ => return,
    };
    let Some((value_type, value)) = parse_value_with_type(&output, "Path") else {
        return;
    };
    let filtered = filter_path_segments(&value, runtime);
    if filtered == value {
        return;
    }
    let written = runner.run_ok(
        "reg",
        &["add", key, "/v", "Path", "/t", &value_type, "/d", &filtered, "/f"],
    );
    if written {
        ui.message(&format!("Cleaned Path in {key}"));
    } else {
        ui.warning(&format!("Could not rewrite Path in {key}"));
    }
}

/// Drop `;`-separated segments containing any runtime keyword.
pub(crate) fn filter_path_segments(value: &str, runtime: Runtime) -> String {
    value
        .split(';')
        .filter(|segment| !segment.is_empty() && !runtime.matches_path_segment(segment))
        .collect::<Vec<_>>()
        .join(";")
}

/// Python install roots from the vendor registry subtrees.
fn python_registry_candidates(runner: &dyn CommandRunner) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for base in PYTHON_REG_BASES {
        let output = match runner.run("reg", &["query", base, "/s", "/ve"], None) {
            Ok(result) if result.success => result.stdout,
            _ => continue,
        };
        for path in parse_install_paths(&output) {
            candidates.push((PathBuf::from(path), "registry".to_string()));
        }
    }
    candidates
}

/// Java homes from the vendor registry subtrees.
fn java_registry_candidates(runner: &dyn CommandRunner) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for (base, vendor) in JAVA_REG_BASES {
        let output = match runner.run("reg", &["query", base, "/s", "/v", "JavaHome"], None) {
            Ok(result) if result.success => result.stdout,
            _ => continue,
        };
        for (_, home) in parse_values(&output, "JavaHome") {
            candidates.push((PathBuf::from(home), format!("registry ({vendor})")));
        }
    }
    candidates
}

/// Parse `reg query` output into `(key, value)` pairs for one value name.
///
/// Output shape:
/// ```text
/// HKEY_LOCAL_MACHINE\SOFTWARE\JavaSoft\JDK\17.0.2
///     JavaHome    REG_SZ    C:\Program Files\Java\jdk-17.0.2
/// ```
pub(crate) fn parse_values(output: &str, value_name: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut current_key = String::new();
    for line in output.lines() {
        if line.starts_with("HKEY_") {
            current_key = line.trim().to_string();
            continue;
        }
        let Some((name, _, data)) = split_value_line(line) else {
            continue;
        };
        if name == value_name {
            pairs.push((current_key.clone(), data));
        }
    }
    pairs
}

/// Default values of keys named `InstallPath`.
pub(crate) fn parse_install_paths(output: &str) -> Vec<String> {
    parse_values(output, "(Default)")
        .into_iter()
        .filter(|(key, _)| {
            key.rsplit('\\')
                .next()
                .is_some_and(|leaf| leaf.eq_ignore_ascii_case("InstallPath"))
        })
        .map(|(_, value)| value)
        .collect()
}

/// Parse one value's type and data out of a `reg query <key> /v <name>` dump.
pub(crate) fn parse_value_with_type(output: &str, value_name: &str) -> Option<(String, String)> {
    output
        .lines()
        .filter_map(split_value_line)
        .find(|(name, _, _)| name == value_name)
        .map(|(_, value_type, data)| (value_type, data))
}

/// Split a `    Name    REG_SZ    data` line into its three fields.
fn split_value_line(line: &str) -> Option<(String, String, String)> {
    let trimmed = line.trim();
    for value_type in ["REG_EXPAND_SZ", "REG_SZ"] {
        if let Some(idx) = trimmed.find(value_type) {
            let name = trimmed[..idx].trim().to_string();
            let data = trimmed[idx + value_type.len()..].trim().to_string();
            if !name.is_empty() && !data.is_empty() {
                return Some((name, value_type.to_string(), data));
            }
        }
    }
    None
}
