//! Built-in applications.

use super::install::ArchiveLayout;
use super::registry::{SoftwareDescriptor, Variant};
use super::resolve::Source;
use super::strategy::{Destination, PackageKind, Recipe};
use crate::common::distro::Arch;
use crate::update::Family;

// =============================================================================
// JetBrains Toolbox
// =============================================================================

const TOOLBOX: Recipe = Recipe {
    artifact: "jetbrains-toolbox",
    source: Source::JsonApi {
        endpoint: "https://data.services.jetbrains.com/products/releases?code=TBA&latest=true&type=release",
        links: &[
            (Arch::X86_64, "/TBA/0/downloads/linux/link"),
            (Arch::Aarch64, "/TBA/0/downloads/linuxARM64/link"),
        ],
    },
    destination: Destination::Workspace,
    package: PackageKind::Archive(ArchiveLayout {
        vendor: "JetBrains",
        app: "Toolbox",
        dir_prefix: "jetbrains-toolbox-",
        launcher: "bin/jetbrains-toolbox",
        link_name: "jetbrains-toolbox",
    }),
};

// =============================================================================
// Visual Studio Code
// =============================================================================

const VSCODE_DEB: Recipe = Recipe {
    artifact: "vscode",
    source: Source::Redirect {
        urls: &[
            (Arch::X86_64, "https://code.visualstudio.com/sha/download?build=stable&os=linux-deb-x64"),
            (Arch::Aarch64, "https://code.visualstudio.com/sha/download?build=stable&os=linux-deb-arm64"),
        ],
    },
    destination: Destination::Workspace,
    package: PackageKind::Deb,
};

const VSCODE_RPM: Recipe = Recipe {
    artifact: "vscode",
    source: Source::Redirect {
        urls: &[
            (Arch::X86_64, "https://code.visualstudio.com/sha/download?build=stable&os=linux-rpm-x64"),
            (Arch::Aarch64, "https://code.visualstudio.com/sha/download?build=stable&os=linux-rpm-arm64"),
        ],
    },
    destination: Destination::Workspace,
    package: PackageKind::Rpm,
};

// =============================================================================
// Google Chrome
// =============================================================================

const CHROME_DEB: Recipe = Recipe {
    artifact: "google-chrome",
    source: Source::Static {
        urls: &[(
            Arch::X86_64,
            "https://dl.google.com/linux/direct/google-chrome-stable_current_amd64.deb",
        )],
    },
    destination: Destination::Workspace,
    package: PackageKind::Deb,
};

/// Downloads into the working directory and leaves the file there.
const CHROME_RPM: Recipe = Recipe {
    artifact: "google-chrome",
    source: Source::Static {
        urls: &[(
            Arch::X86_64,
            "https://dl.google.com/linux/direct/google-chrome-stable_current_x86_64.rpm",
        )],
    },
    destination: Destination::CurrentDir,
    package: PackageKind::Rpm,
};

// =============================================================================
// GitHub Desktop (community Linux builds)
// =============================================================================

const GITHUB_DESKTOP_DEB: Recipe = Recipe {
    artifact: "github-desktop",
    source: Source::GithubRelease {
        repo: "shiftkey/desktop",
        assets: &[
            (Arch::X86_64, r"^GitHubDesktop-linux-amd64-.*\.deb$"),
            (Arch::Aarch64, r"^GitHubDesktop-linux-arm64-.*\.deb$"),
        ],
    },
    destination: Destination::Workspace,
    package: PackageKind::Deb,
};

const GITHUB_DESKTOP_RPM: Recipe = Recipe {
    artifact: "github-desktop",
    source: Source::GithubRelease {
        repo: "shiftkey/desktop",
        assets: &[
            (Arch::X86_64, r"^GitHubDesktop-linux-x86_64-.*\.rpm$"),
            (Arch::Aarch64, r"^GitHubDesktop-linux-aarch64-.*\.rpm$"),
        ],
    },
    destination: Destination::Workspace,
    package: PackageKind::Rpm,
};

// =============================================================================
// Discord
// =============================================================================

const DISCORD_DEB: Recipe = Recipe {
    artifact: "discord",
    source: Source::Redirect {
        urls: &[(
            Arch::X86_64,
            "https://discord.com/api/download?platform=linux&format=deb",
        )],
    },
    destination: Destination::Workspace,
    package: PackageKind::Deb,
};

const DEB: &[Family] = &[Family::AptDebian];
const RPM: &[Family] = &[Family::DnfFedora];

/// The catalog offered on every run.
pub fn builtin() -> Vec<SoftwareDescriptor> {
    vec![
        SoftwareDescriptor::new(
            "jetbrains-toolbox",
            "JetBrains Toolbox",
            vec![Variant::new(Family::LINUX, TOOLBOX)],
        ),
        SoftwareDescriptor::new(
            "vscode",
            "Visual Studio Code",
            vec![Variant::new(DEB, VSCODE_DEB), Variant::new(RPM, VSCODE_RPM)],
        ),
        SoftwareDescriptor::new(
            "google-chrome",
            "Google Chrome",
            vec![Variant::new(DEB, CHROME_DEB), Variant::new(RPM, CHROME_RPM)],
        ),
        SoftwareDescriptor::new(
            "github-desktop",
            "GitHub Desktop",
            vec![
                Variant::new(DEB, GITHUB_DESKTOP_DEB),
                Variant::new(RPM, GITHUB_DESKTOP_RPM),
            ],
        ),
        SoftwareDescriptor::new("discord", "Discord", vec![Variant::new(DEB, DISCORD_DEB)]),
    ]
}
