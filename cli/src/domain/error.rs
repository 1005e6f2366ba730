//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::plan::Step;

// ── Provisioning errors ───────────────────────────────────────────────────────

/// A step of the provisioning procedure failed. The run stops here.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Package index refresh failed (exit code {code}). Check network access to package sources.")]
    IndexRefresh { code: i32 },

    #[error("Native package '{package}' could not be installed (exit code {code}).")]
    NativePackage { package: String, code: i32 },

    #[error("No precompiled artifact of '{package}' for platform '{platform}' (exit code {code}).")]
    PlatformArtifact {
        package: String,
        platform: String,
        code: i32,
    },

    #[error("Binding package '{package}' could not be installed (exit code {code}).")]
    BindingPackage { package: String, code: i32 },

    #[error("Dependencies from {} could not be installed (exit code {code}).", manifest.display())]
    ManifestDependencies { manifest: PathBuf, code: i32 },

    #[error("{step}: cannot run '{program}': {reason}")]
    Spawn {
        step: Step,
        program: String,
        reason: String,
    },

    #[error("{step}: timed out after {secs}s")]
    Timeout { step: Step, secs: u64 },
}

impl ProvisionError {
    /// Process exit code to report for this failure.
    ///
    /// Tool failures propagate the tool's own code. Anything without a usable
    /// code (spawn failure, timeout, signal, out-of-range) maps to 1.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        let code = match self {
            Self::IndexRefresh { code }
            | Self::NativePackage { code, .. }
            | Self::PlatformArtifact { code, .. }
            | Self::BindingPackage { code, .. }
            | Self::ManifestDependencies { code, .. } => *code,
            Self::Spawn { .. } | Self::Timeout { .. } => 1,
        };
        u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1)
    }

    /// Stable machine-readable code used in `--json` error objects.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::IndexRefresh { .. } => "INDEX_REFRESH_FAILED",
            Self::NativePackage { .. } => "NATIVE_PACKAGE_FAILED",
            Self::PlatformArtifact { .. } => "PLATFORM_ARTIFACT_FAILED",
            Self::BindingPackage { .. } => "BINDING_PACKAGE_FAILED",
            Self::ManifestDependencies { .. } => "MANIFEST_DEPENDENCIES_FAILED",
            Self::Spawn { .. } => "SPAWN_FAILED",
            Self::Timeout { .. } => "STEP_TIMEOUT",
        }
    }
}

// ── Manifest errors ───────────────────────────────────────────────────────────

/// Errors reading or parsing the dependency manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Dependency manifest not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("Cannot read dependency manifest {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("Invalid dependency specifier on line {line}: '{content}'")]
    InvalidLine { line: usize, content: String },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}
