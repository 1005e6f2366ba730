//! Domain types and validators for envprov configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::manifest::is_valid_package_name;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "package_manager.program",
    "package_manager.sudo",
    "native_package",
    "installer.command",
    "binding.package",
    "binding.strict_binary",
    "binding.platform",
    "binding.target",
    "manifest",
    "step_timeout_secs",
];

pub const DEFAULT_NATIVE_PACKAGE: &str = "portaudio19-dev";
pub const DEFAULT_BINDING_PACKAGE: &str = "pyaudio";
pub const DEFAULT_PLATFORM: &str = "manylinux2014_x86_64";

/// Default strict-mode install directory, relative to the working directory.
pub const DEFAULT_BINDING_TARGET: &str = "vendor";
pub const DEFAULT_MANIFEST: &str = "requirements.txt";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration, usually read from `envprov.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    /// System package manager settings.
    pub package_manager: PackageManagerConfig,
    /// Native shared library installed by the package manager.
    pub native_package: String,
    /// Language-ecosystem installer settings.
    pub installer: InstallerConfig,
    /// Language binding for the native library.
    pub binding: BindingConfig,
    /// Dependency manifest, relative to the working directory.
    pub manifest: PathBuf,
    /// Kill a step after this many seconds. `None` waits indefinitely.
    pub step_timeout_secs: Option<u64>,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            package_manager: PackageManagerConfig::default(),
            native_package: DEFAULT_NATIVE_PACKAGE.to_string(),
            installer: InstallerConfig::default(),
            binding: BindingConfig::default(),
            manifest: PathBuf::from(DEFAULT_MANIFEST),
            step_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageManagerConfig {
    /// apt-compatible program (`update`, `install -y <pkg>`).
    pub program: String,
    /// Prefix package manager calls with `sudo`.
    pub sudo: bool,
}

impl Default for PackageManagerConfig {
    fn default() -> Self {
        Self {
            program: "apt-get".to_string(),
            sudo: false,
        }
    }
}

/// The installer command line, e.g. `[pip]` or `[python3, -m, pip]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    pub command: Vec<String>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            command: vec!["pip".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    pub package: String,
    /// Force a platform-pinned precompiled artifact (no source builds).
    pub strict_binary: bool,
    /// Platform tag used in strict mode.
    pub platform: String,
    /// Install directory for strict mode. The installer refuses
    /// `--platform` unless it installs into an explicit target.
    pub target: PathBuf,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            package: DEFAULT_BINDING_PACKAGE.to_string(),
            strict_binary: true,
            platform: DEFAULT_PLATFORM.to_string(),
            target: PathBuf::from(DEFAULT_BINDING_TARGET),
        }
    }
}

impl ProvisionConfig {
    /// Check every value for well-formedness.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::InvalidValue`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_program("package_manager.program", &self.package_manager.program)?;
        if !is_valid_apt_package(&self.native_package) {
            return Err(invalid(
                "native_package",
                &self.native_package,
                "not a valid system package name",
            ));
        }
        match self.installer.command.first() {
            Some(program) => check_program("installer.command", program)?,
            None => return Err(invalid("installer.command", "[]", "must not be empty")),
        }
        check_package("binding.package", &self.binding.package)?;
        if self.binding.strict_binary {
            check_platform(&self.binding.platform)?;
            if self.binding.target.as_os_str().is_empty() {
                return Err(invalid(
                    "binding.target",
                    "",
                    "strict_binary needs an install directory for platform-pinned artifacts",
                ));
            }
        }
        if self.manifest.as_os_str().is_empty() {
            return Err(invalid("manifest", "", "must not be empty"));
        }
        if self.step_timeout_secs == Some(0) {
            return Err(invalid("step_timeout_secs", "0", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn check_program(key: &str, program: &str) -> Result<(), ConfigError> {
    if program.trim().is_empty() || program.chars().any(char::is_whitespace) {
        return Err(invalid(key, program, "expected a single program name or path"));
    }
    Ok(())
}

fn check_package(key: &str, package: &str) -> Result<(), ConfigError> {
    if !is_valid_package_name(package) {
        return Err(invalid(key, package, "not a valid package name"));
    }
    Ok(())
}

/// System package name with optional `:arch` qualifier and `=version` pin.
#[allow(clippy::expect_used)]
static APT_PACKAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9+.-]+(:[a-z0-9-]+)?(=[A-Za-z0-9.+~:-]+)?$").expect("valid regex")
});

/// Whether `name` is acceptable to `apt-get install`, e.g. `libstdc++-12-dev`
/// or `portaudio19-dev=19.6.0-1.2`.
#[must_use]
pub fn is_valid_apt_package(name: &str) -> bool {
    APT_PACKAGE_RE.is_match(name)
}

fn check_platform(platform: &str) -> Result<(), ConfigError> {
    let ok = !platform.is_empty()
        && platform
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if !ok {
        return Err(invalid(
            "binding.platform",
            platform,
            "expected a platform tag such as manylinux2014_x86_64",
        ));
    }
    Ok(())
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<(), ConfigError> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        });
    }
    Ok(())
}

/// Collect every dotted key present in a raw YAML config document.
///
/// Used to reject typos that `#[serde(default)]` would otherwise swallow.
#[must_use]
pub fn collect_keys(value: &serde_yaml::Value) -> Vec<String> {
    fn walk(prefix: &str, value: &serde_yaml::Value, out: &mut Vec<String>) {
        let serde_yaml::Value::Mapping(map) = value else {
            return;
        };
        for (k, v) in map {
            let Some(k) = k.as_str() else { continue };
            let key = if prefix.is_empty() {
                k.to_string()
            } else {
                format!("{prefix}.{k}")
            };
            if matches!(v, serde_yaml::Value::Mapping(_)) {
                walk(&key, v, out);
            } else {
                out.push(key);
            }
        }
    }
    let mut out = Vec::new();
    walk("", value, &mut out);
    out
}

// ── Unit tests ───────────────────────────────────────────────────────────────
