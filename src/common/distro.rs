use std::fs;
use std::path::Path;

use crate::error::{ProvisionError, Result};

const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Operating systems the provisioner knows how to route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Darwin,
    Linux,
    FreeBsd,
}

impl Os {
    /// Map a `std::env::consts::OS` value.
    pub fn from_consts(os: &str) -> Option<Self> {
        match os {
            "macos" => Some(Self::Darwin),
            "linux" => Some(Self::Linux),
            "freebsd" => Some(Self::FreeBsd),
            _ => None,
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Darwin => "macOS",
            Self::Linux => "Linux",
            Self::FreeBsd => "FreeBSD",
        };
        write!(f, "{name}")
    }
}

/// What the host told us about itself. Computed once per run.
///
/// `distro_id` and `distro_like` are only meaningful on Linux; they stay
/// empty elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    pub os: Os,
    pub distro_id: String,
    pub distro_like: Vec<String>,
}

impl HostIdentity {
    pub fn new(os: Os) -> Self {
        Self {
            os,
            distro_id: String::new(),
            distro_like: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn linux(distro_id: &str, distro_like: &[&str]) -> Self {
        Self {
            os: Os::Linux,
            distro_id: distro_id.to_string(),
            distro_like: distro_like.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Detect the current host from the compile-time OS and `/etc/os-release`.
pub fn identify() -> Result<HostIdentity> {
    let os = Os::from_consts(std::env::consts::OS).ok_or_else(|| ProvisionError::Detection {
        path: OS_RELEASE_PATH.into(),
        reason: format!("unsupported operating system '{}'", std::env::consts::OS),
    })?;
    identify_from(os, Path::new(OS_RELEASE_PATH))
}

/// Same as [`identify`] with an explicit os-release location.
pub fn identify_from(os: Os, os_release: &Path) -> Result<HostIdentity> {
    if os != Os::Linux {
        return Ok(HostIdentity::new(os));
    }

    let content = fs::read_to_string(os_release).map_err(|e| ProvisionError::Detection {
        path: os_release.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(parse_os_release(&content))
}

/// Parse os-release content. Missing `ID`/`ID_LIKE` become empty values.
fn parse_os_release(content: &str) -> HostIdentity {
    let mut identity = HostIdentity::new(Os::Linux);

    for line in content.lines() {
        let line = line.trim();
        if let Some(val) = line.strip_prefix("ID=") {
            identity.distro_id = unquote(val).to_string();
        } else if let Some(val) = line.strip_prefix("ID_LIKE=") {
            identity.distro_like = unquote(val).split_whitespace().map(String::from).collect();
        }
    }

    identity
}

fn unquote(value: &str) -> &str {
    value.trim().trim_matches('"').trim_matches('\'')
}

/// CPU architecture of the running binary, used to pick release artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86_64,
    Aarch64,
    Other(&'static str),
}

impl Arch {
    pub fn current() -> Self {
        match std::env::consts::ARCH {
            "x86_64" => Self::X86_64,
            "aarch64" => Self::Aarch64,
            other => Self::Other(other),
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X86_64 => write!(f, "x86_64"),
            Self::Aarch64 => write!(f, "aarch64"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}
