//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod manifest;
pub mod plan;
pub mod report;

pub use config::{ProvisionConfig, validate_config_key};
pub use error::{ConfigError, ManifestError, ProvisionError};
pub use manifest::{Entry, Manifest, Requirement};
pub use plan::{Plan, PlannedStep, Step, StepCommand};
pub use report::{RunReport, StepOutcome, StepStatus};
