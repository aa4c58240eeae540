//! Finding the download location of the latest release.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::strategy::{ArtifactRef, InstallContext};
use crate::common::distro::Arch;
use crate::error::{ProvisionError, Result};
use crate::ui::prelude::*;

const GITHUB_API_URL: &str = "https://api.github.com/repos";

/// Per-architecture value: a URL, JSON pointer or asset pattern.
pub type ArchTable = &'static [(Arch, &'static str)];

#[derive(Debug, Clone, Copy)]
pub enum Source {
    /// GET `endpoint`, read the link at the architecture's JSON pointer.
    JsonApi { endpoint: &'static str, links: ArchTable },
    /// Latest GitHub release; first asset whose name matches the pattern.
    GithubRelease { repo: &'static str, assets: ArchTable },
    /// The final URL after following redirects is the artifact.
    Redirect { urls: ArchTable },
    /// Constant artifact URL.
    Static { urls: ArchTable },
}

#[derive(Deserialize, Debug)]
struct GitHubAsset {
    name: String,
    browser_download_url: String,
}

#[derive(Deserialize, Debug)]
struct GitHubRelease {
    #[serde(default)]
    tag_name: String,
    assets: Vec<GitHubAsset>,
}

impl Source {
    pub fn resolve(&self, artifact: &str, ctx: &InstallContext) -> Result<ArtifactRef> {
        emit(
            Level::Info,
            "install.resolve",
            &format!(
                "{} Looking up latest {}...",
                char::from(NerdFont::Search),
                artifact
            ),
            None,
        );

        match self {
            Source::Static { urls } => {
                let url = for_arch(urls, ctx.arch, artifact)?;
                validate_artifact_url(url, "static artifact location")
            }
            Source::Redirect { urls } => {
                let start = for_arch(urls, ctx.arch, artifact)?;
                let location = ctx.http.final_url(start)?;
                validate_artifact_url(&location, &format!("redirected from {start}"))
            }
            Source::JsonApi { endpoint, links } => {
                let pointer = for_arch(links, ctx.arch, artifact)?;
                let body = ctx.http.get_text(endpoint)?;
                let link = json_link(&body, pointer).unwrap_or_default();
                validate_artifact_url(&link, &body)
            }
            Source::GithubRelease { repo, assets } => {
                let pattern = for_arch(assets, ctx.arch, artifact)?;
                let body = ctx.http.get_text(&format!("{GITHUB_API_URL}/{repo}/releases/latest"))?;
                let link = github_asset_link(&body, pattern)?.unwrap_or_default();
                validate_artifact_url(&link, &body)
            }
        }
    }
}

fn for_arch(table: ArchTable, arch: Arch, artifact: &str) -> Result<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == arch)
        .map(|(_, value)| *value)
        .ok_or_else(|| ProvisionError::UnsupportedArchitecture {
            id: artifact.to_string(),
            arch: arch.to_string(),
        })
}

fn json_link(body: &str, pointer: &str) -> Option<String> {
    let document: Value = serde_json::from_str(body).ok()?;
    document
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn github_asset_link(body: &str, pattern: &str) -> Result<Option<String>> {
    let matcher = Regex::new(pattern).map_err(|e| ProvisionError::InvalidArtifactUrl {
        url: String::new(),
        payload: format!("invalid asset pattern '{pattern}': {e}"),
    })?;

    let Ok(release) = serde_json::from_str::<GitHubRelease>(body) else {
        return Ok(None);
    };

    emit(
        Level::Debug,
        "install.resolve.release",
        &format!("Latest release: {}", release.tag_name),
        None,
    );

    Ok(release
        .assets
        .into_iter()
        .find(|asset| matcher.is_match(&asset.name))
        .map(|asset| asset.browser_download_url))
}

/// Accept only non-empty `https://` locations.
///
/// `payload` is whatever produced the URL, kept for the error message.
pub fn validate_artifact_url(url: &str, payload: &str) -> Result<ArtifactRef> {
    let url = url.trim();
    if url.is_empty() || !url.starts_with("https://") {
        return Err(ProvisionError::InvalidArtifactUrl {
            url: url.to_string(),
            payload: payload.to_string(),
        });
    }
    Ok(ArtifactRef {
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::http::testing::FakeHttp;
    use crate::common::paths::Paths;
    use crate::common::privilege::Escalation;
    use crate::common::shell::testing::FakeShell;
    use crate::update::Family;

    const TOOLBOX_API: &str = "https://data.example.com/releases?code=TBA";

    fn resolve_with(source: Source, http: &FakeHttp, arch: Arch) -> Result<ArtifactRef> {
        let shell = FakeShell::default();
        let paths = Paths::with_home("/nonexistent");
        let ctx = InstallContext {
            family: Family::AptDebian,
            arch,
            escalation: Escalation::Sudo,
            shell: &shell,
            http,
            paths: &paths,
        };
        source.resolve("demo", &ctx)
    }

    #[test]
    fn test_validate_rejects_non_https() {
        for bad in ["", "   ", "ftp://example.com/x", "http://example.com/x.deb", "null"] {
            let err = validate_artifact_url(bad, "raw").unwrap_err();
            assert!(
                matches!(err, ProvisionError::InvalidArtifactUrl { ref payload, .. } if payload == "raw"),
                "{bad}"
            );
        }
        assert_eq!(
            validate_artifact_url("https://example.com/x.deb", "").unwrap().url,
            "https://example.com/x.deb"
        );
    }

    #[test]
    fn test_json_api_extracts_nested_link() {
        let body = r#"{"TBA":[{"version":"2.5","downloads":{"linux":{"link":"https://download.example.com/tba-2.5.tar.gz"},"linuxARM64":{"link":"https://download.example.com/tba-2.5-arm64.tar.gz"}}}]}"#;
        let http = FakeHttp::default().body(TOOLBOX_API, body);
        let source = Source::JsonApi {
            endpoint: TOOLBOX_API,
            links: &[
                (Arch::X86_64, "/TBA/0/downloads/linux/link"),
                (Arch::Aarch64, "/TBA/0/downloads/linuxARM64/link"),
            ],
        };

        assert_eq!(
            resolve_with(source, &http, Arch::X86_64).unwrap().url,
            "https://download.example.com/tba-2.5.tar.gz"
        );
        assert_eq!(
            resolve_with(source, &http, Arch::Aarch64).unwrap().url,
            "https://download.example.com/tba-2.5-arm64.tar.gz"
        );
    }

    #[test]
    fn test_json_api_missing_field_keeps_raw_response() {
        let body = r#"{"TBA":[]}"#;
        let http = FakeHttp::default().body(TOOLBOX_API, body);
        let source = Source::JsonApi {
            endpoint: TOOLBOX_API,
            links: &[(Arch::X86_64, "/TBA/0/downloads/linux/link")],
        };
        let err = resolve_with(source, &http, Arch::X86_64).unwrap_err();
        assert!(matches!(
            err,
            ProvisionError::InvalidArtifactUrl { ref url, ref payload } if url.is_empty() && payload == body
        ));
    }

    #[test]
    fn test_github_release_filters_assets() {
        let body = r#"{"tag_name":"release-3.4.9","assets":[
            {"name":"GitHubDesktop-linux-x86_64-3.4.9-linux1.rpm","browser_download_url":"https://github.com/d/x86_64.rpm"},
            {"name":"GitHubDesktop-linux-amd64-3.4.9-linux1.deb","browser_download_url":"https://github.com/d/amd64.deb"}
        ]}"#;
        let http = FakeHttp::default().body(
            "https://api.github.com/repos/shiftkey/desktop/releases/latest",
            body,
        );
        let source = Source::GithubRelease {
            repo: "shiftkey/desktop",
            assets: &[(Arch::X86_64, r"^GitHubDesktop-linux-amd64-.*\.deb$")],
        };
        assert_eq!(
            resolve_with(source, &http, Arch::X86_64).unwrap().url,
            "https://github.com/d/amd64.deb"
        );
    }

    #[test]
    fn test_redirect_uses_final_location() {
        const START: &str = "https://vendor.example.com/download?os=linux-deb";
        let http = FakeHttp::default().redirect(START, "https://cdn.example.com/app_1.2_amd64.deb");
        let source = Source::Redirect {
            urls: &[(Arch::X86_64, START)],
        };
        assert_eq!(
            resolve_with(source, &http, Arch::X86_64).unwrap().url,
            "https://cdn.example.com/app_1.2_amd64.deb"
        );

        let insecure = FakeHttp::default().redirect(START, "http://cdn.example.com/app.deb");
        assert!(matches!(
            resolve_with(source, &insecure, Arch::X86_64).unwrap_err(),
            ProvisionError::InvalidArtifactUrl { .. }
        ));
    }

    #[test]
    fn test_network_failure_propagates() {
        let source = Source::Redirect {
            urls: &[(Arch::X86_64, "https://unreachable.example.com")],
        };
        assert!(matches!(
            resolve_with(source, &FakeHttp::default(), Arch::X86_64).unwrap_err(),
            ProvisionError::Network { .. }
        ));
    }

    #[test]
    fn test_missing_architecture() {
        let source = Source::Static {
            urls: &[(Arch::X86_64, "https://example.com/app_amd64.deb")],
        };
        assert!(matches!(
            resolve_with(source, &FakeHttp::default(), Arch::Other("riscv64")).unwrap_err(),
            ProvisionError::UnsupportedArchitecture { ref arch, .. } if arch == "riscv64"
        ));
    }
}
