//! Host identity to package-management family.

use crate::common::distro::{HostIdentity, Os};
use crate::error::{ProvisionError, Result};

/// The package-management ecosystem a host belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// macOS: Homebrew plus `softwareupdate`
    HomebrewSoftwareUpdate,
    /// Debian, Ubuntu, Kali and derivatives
    AptDebian,
    /// Fedora and the RHEL family
    DnfFedora,
    PacmanArch,
    PacmanManjaro,
    FreeBsdBase,
}

impl Family {
    pub const LINUX: &'static [Family] = &[
        Family::AptDebian,
        Family::DnfFedora,
        Family::PacmanArch,
        Family::PacmanManjaro,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::HomebrewSoftwareUpdate => "Homebrew + softwareupdate",
            Self::AptDebian => "APT (Debian family)",
            Self::DnfFedora => "DNF (Fedora family)",
            Self::PacmanArch => "Pacman (Arch)",
            Self::PacmanManjaro => "Pacman (Manjaro)",
            Self::FreeBsdBase => "FreeBSD base + pkg",
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

type IdentityRule = (fn(&HostIdentity) -> bool, Family);
type LikeRule = (fn(&str) -> bool, Family);

/// Evaluated top to bottom; the first predicate that holds decides.
const IDENTITY_RULES: &[IdentityRule] = &[
    (|h| h.os == Os::Darwin, Family::HomebrewSoftwareUpdate),
    (|h| h.os == Os::FreeBsd, Family::FreeBsdBase),
    (
        |h| matches!(h.distro_id.as_str(), "ubuntu" | "kali" | "debian"),
        Family::AptDebian,
    ),
    (|h| h.distro_id == "fedora", Family::DnfFedora),
    (|h| h.distro_id == "manjaro", Family::PacmanManjaro),
    (|h| h.distro_id == "arch", Family::PacmanArch),
];

/// Applied to each `ID_LIKE` token in order, after the identity rules miss.
const LIKE_RULES: &[LikeRule] = &[
    (|token| token.contains("debian"), Family::AptDebian),
    (
        |token| token.contains("rhel") || token.contains("fedora"),
        Family::DnfFedora,
    ),
    (|token| token.contains("arch"), Family::PacmanArch),
];

/// Pick the family for a host.
pub fn route(identity: &HostIdentity) -> Result<Family> {
    let by_identity = IDENTITY_RULES
        .iter()
        .find(|(matches, _)| matches(identity))
        .map(|(_, family)| *family);
    if let Some(family) = by_identity {
        return Ok(family);
    }

    identity
        .distro_like
        .iter()
        .find_map(|token| {
            LIKE_RULES
                .iter()
                .find(|(matches, _)| matches(token))
                .map(|(_, family)| *family)
        })
        .ok_or_else(|| ProvisionError::UnsupportedDistro {
            distro_id: identity.distro_id.clone(),
            distro_like: identity.distro_like.clone(),
        })
}
