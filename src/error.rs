use std::path::PathBuf;

use thiserror::Error;

use crate::update::Family;

/// Everything that can stop a provisioning run.
///
/// Only [`ProvisionError::UnknownPackage`] and
/// [`ProvisionError::NoInstallerForFamily`] are recoverable; the orchestrator
/// reports them and moves on to the next selection. Every other variant aborts
/// the run with exit code 1.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Could not detect host: {reason} ({})", .path.display())]
    Detection { path: PathBuf, reason: String },

    #[error("Unsupported distribution '{distro_id}' (ID_LIKE: '{}')", .distro_like.join(" "))]
    UnsupportedDistro {
        distro_id: String,
        distro_like: Vec<String>,
    },

    #[error("Required program '{program}' was not found in PATH")]
    MissingDependency { program: String },

    #[error("Request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("Resolved artifact location '{url}' is not a valid https URL. Response: {}", preview(.payload))]
    InvalidArtifactUrl { url: String, payload: String },

    #[error("Installing {target} failed: {reason}")]
    InstallFailed { target: String, reason: String },

    #[error("Unknown package '{id}'")]
    UnknownPackage { id: String },

    #[error("Package '{id}' is registered more than once")]
    DuplicatePackage { id: String },

    #[error("'{id}' has no installer for {family}")]
    NoInstallerForFamily { id: String, family: Family },

    #[error("'{id}' is not published for the {arch} architecture")]
    UnsupportedArchitecture { id: String, arch: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProvisionError {
    pub fn install_failed(target: impl Into<String>, reason: impl ToString) -> Self {
        Self::InstallFailed {
            target: target.into(),
            reason: reason.to_string(),
        }
    }

    pub fn network(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Network {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn missing(program: impl Into<String>) -> Self {
        Self::MissingDependency {
            program: program.into(),
        }
    }

    /// Whether the run may continue past this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnknownPackage { .. } | Self::NoInstallerForFamily { .. }
        )
    }
}

/// Single-line, bounded rendering of a raw response body.
fn preview(payload: &str) -> String {
    const MAX_CHARS: usize = 400;
    let flat = payload.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= MAX_CHARS {
        return flat;
    }
    let mut cut: String = flat.chars().take(MAX_CHARS).collect();
    cut.push_str("...");
    cut
}

pub type Result<T, E = ProvisionError> = std::result::Result<T, E>;
