use std::path::{Path, PathBuf};

use super::install::{self, ArchiveLayout};
use super::resolve::Source;
use crate::common::distro::Arch;
use crate::common::http::HttpClient;
use crate::common::paths::Paths;
use crate::common::privilege::Escalation;
use crate::common::shell::Shell;
use crate::common::workspace::ScopedWorkspace;
use crate::error::Result;
use crate::ui::prelude::*;
use crate::update::Family;

/// A validated download location (always `https://`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    pub url: String,
}

/// A downloaded artifact on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalArtifact {
    pub path: PathBuf,
}

/// Everything a strategy may touch while it runs.
pub struct InstallContext<'a> {
    pub family: Family,
    pub arch: Arch,
    pub escalation: Escalation,
    pub shell: &'a dyn Shell,
    pub http: &'a dyn HttpClient,
    pub paths: &'a Paths,
}

/// Resolve, fetch and install one application for one packaging family.
///
/// Each step fails independently; the caller stops at the first error.
pub trait InstallerStrategy {
    fn resolve(&self, ctx: &InstallContext) -> Result<ArtifactRef>;

    fn fetch(
        &self,
        artifact: &ArtifactRef,
        workspace: &ScopedWorkspace,
        ctx: &InstallContext,
    ) -> Result<LocalArtifact>;

    fn install(
        &self,
        artifact: LocalArtifact,
        workspace: &ScopedWorkspace,
        ctx: &InstallContext,
    ) -> Result<()>;
}

/// Where a downloaded artifact lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Workspace,
    /// The process working directory. The file is left behind after install.
    CurrentDir,
}

#[derive(Debug, Clone, Copy)]
pub enum PackageKind {
    Deb,
    Rpm,
    Archive(ArchiveLayout),
}

impl PackageKind {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Deb => ".deb",
            Self::Rpm => ".rpm",
            Self::Archive(_) => ".tar.gz",
        }
    }
}

/// The data-driven strategy used by every catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct Recipe {
    /// Base name for the downloaded file and for messages.
    pub artifact: &'static str,
    pub source: Source,
    pub destination: Destination,
    pub package: PackageKind,
}

impl InstallerStrategy for Recipe {
    fn resolve(&self, ctx: &InstallContext) -> Result<ArtifactRef> {
        self.source.resolve(self.artifact, ctx)
    }

    fn fetch(
        &self,
        artifact: &ArtifactRef,
        workspace: &ScopedWorkspace,
        ctx: &InstallContext,
    ) -> Result<LocalArtifact> {
        let dir = match self.destination {
            Destination::Workspace => workspace.path().to_path_buf(),
            Destination::CurrentDir => std::env::current_dir()?,
        };
        let path = dir.join(file_name(&artifact.url, self.artifact, self.package.extension()));

        emit(
            Level::Info,
            "install.download",
            &format!(
                "{} Downloading {} from {}",
                char::from(NerdFont::Download),
                self.artifact,
                artifact.url
            ),
            None,
        );
        ctx.http.download(&artifact.url, &path)?;
        Ok(LocalArtifact { path })
    }

    fn install(
        &self,
        artifact: LocalArtifact,
        workspace: &ScopedWorkspace,
        ctx: &InstallContext,
    ) -> Result<()> {
        match &self.package {
            PackageKind::Deb => install::install_deb(self.artifact, &artifact.path, ctx),
            PackageKind::Rpm => install::install_rpm(self.artifact, &artifact.path, ctx),
            PackageKind::Archive(layout) => {
                install::install_archive(self.artifact, &artifact.path, layout, workspace.path(), ctx)
                    .map(|_| ())
            }
        }
    }
}

/// Last URL path segment when it already has `extension`, else `<fallback><extension>`.
fn file_name(url: &str, fallback: &str, extension: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| name.ends_with(extension) && !Path::new(name).is_absolute())
        .unwrap_or_else(|| format!("{fallback}{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_from_url_path() {
        assert_eq!(
            file_name(
                "https://dl.google.com/linux/direct/google-chrome-stable_current_amd64.deb",
                "google-chrome",
                ".deb"
            ),
            "google-chrome-stable_current_amd64.deb"
        );
    }

    #[test]
    fn test_file_name_ignores_query_and_wrong_extension() {
        assert_eq!(
            file_name(
                "https://code.visualstudio.com/sha/download?build=stable&os=linux-deb-x64",
                "vscode",
                ".deb"
            ),
            "vscode.deb"
        );
        assert_eq!(
            file_name("https://example.com/pkg.rpm?sig=abc", "app", ".rpm"),
            "pkg.rpm"
        );
    }
}
