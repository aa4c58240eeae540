//! Installing a downloaded artifact, per packaging family.
//!
//! Debian packages get one dependency-repair pass and one retry. RPM packages
//! get a single attempt.

use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::strategy::InstallContext;
use crate::common::shell::{CommandLine, Shell};
use crate::error::{ProvisionError, Result};
use crate::ui::prelude::*;

/// How an archive-based application is laid out once installed.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveLayout {
    /// `~/.local/share/<vendor>/<app>`
    pub vendor: &'static str,
    pub app: &'static str,
    /// Name prefix of the single top-level directory inside the archive.
    pub dir_prefix: &'static str,
    /// Launcher path relative to the installed directory.
    pub launcher: &'static str,
    /// Name of the symlink in `~/.local/bin`.
    pub link_name: &'static str,
}

fn require(shell: &dyn Shell, programs: &[&str]) -> Result<()> {
    match programs.iter().find(|p| !shell.has_program(p)) {
        Some(missing) => Err(ProvisionError::missing(*missing)),
        None => Ok(()),
    }
}

pub fn install_deb(target: &str, package: &Path, ctx: &InstallContext) -> Result<()> {
    require(ctx.shell, &["dpkg", "apt-get"])?;

    let dpkg = || {
        ctx.escalation
            .elevate(CommandLine::new("dpkg").arg("-i").path_arg(package))
    };

    emit(
        Level::Info,
        "install.deb",
        &format!("{} Installing {}...", char::from(NerdFont::Package), target),
        None,
    );
    if ctx.shell.run(&dpkg()).is_ok() {
        return Ok(());
    }

    emit(
        Level::Warn,
        "install.deb.repair",
        &format!(
            "{} dpkg could not install {}, repairing dependencies and retrying once",
            char::from(NerdFont::Warning),
            target
        ),
        None,
    );
    let repair = ctx
        .escalation
        .elevate(CommandLine::new("apt-get").args(["install", "-f", "-y"]));
    ctx.shell
        .run(&repair)
        .map_err(|e| ProvisionError::install_failed(target, format!("dependency repair failed: {e}")))?;

    ctx.shell
        .run(&dpkg())
        .map_err(|e| ProvisionError::install_failed(target, format!("dpkg failed after repair: {e}")))
}

pub fn install_rpm(target: &str, package: &Path, ctx: &InstallContext) -> Result<()> {
    require(ctx.shell, &["dnf"])?;

    emit(
        Level::Info,
        "install.rpm",
        &format!("{} Installing {}...", char::from(NerdFont::Package), target),
        None,
    );
    let command = ctx
        .escalation
        .elevate(CommandLine::new("dnf").args(["install", "-y"]).path_arg(package));
    ctx.shell
        .run(&command)
        .map_err(|e| ProvisionError::install_failed(target, format!("dnf failed: {e}")))
}

/// Extract `archive`, move its payload into place and link the launcher.
///
/// Any previous installation is removed first, so repeated runs converge on
/// the same state. Returns the installed directory.
pub fn install_archive(
    target: &str,
    archive: &Path,
    layout: &ArchiveLayout,
    workspace: &Path,
    ctx: &InstallContext,
) -> Result<PathBuf> {
    require(ctx.shell, &["tar"])?;
    let fail = |what: &str, e: &dyn std::fmt::Display| {
        ProvisionError::install_failed(target, format!("{what}: {e}"))
    };

    let extract_dir = workspace.join("extract");
    fs::create_dir_all(&extract_dir).map_err(|e| fail("creating extraction directory", &e))?;

    emit(
        Level::Info,
        "install.archive.extract",
        &format!("{} Extracting {}...", char::from(NerdFont::Archive), target),
        None,
    );
    let tar = CommandLine::new("tar")
        .arg("-xzf")
        .path_arg(archive)
        .arg("-C")
        .path_arg(&extract_dir);
    ctx.shell.run(&tar).map_err(|e| fail("extracting archive", &e))?;

    let extracted = single_extracted_dir(&extract_dir, layout.dir_prefix)
        .map_err(|reason| ProvisionError::install_failed(target, reason))?;

    if !is_executable(&extracted.join(layout.launcher)) {
        return Err(ProvisionError::install_failed(
            target,
            format!("launcher '{}' is missing or not executable", layout.launcher),
        ));
    }

    let install_dir = ctx.paths.app_dir(layout.vendor, layout.app);
    emit(
        Level::Info,
        "install.archive.move",
        &format!(
            "{} Installing {} to {}",
            char::from(NerdFont::Gear),
            target,
            install_dir.display()
        ),
        None,
    );
    replace_dir(&extracted, &install_dir).map_err(|e| fail("replacing install directory", &e))?;

    let link = ctx.paths.bin_dir().join(layout.link_name);
    refresh_symlink(&install_dir.join(layout.launcher), &link)
        .map_err(|e| fail("linking launcher", &e))?;

    emit(
        Level::Success,
        "install.archive.linked",
        &format!(
            "{} Linked {} -> {}",
            char::from(NerdFont::Link),
            link.display(),
            install_dir.join(layout.launcher).display()
        ),
        None,
    );
    Ok(install_dir)
}

/// Exactly one top-level directory whose name starts with `prefix`.
fn single_extracted_dir(extract_dir: &Path, prefix: &str) -> std::result::Result<PathBuf, String> {
    let entries = fs::read_dir(extract_dir).map_err(|e| e.to_string())?;
    let mut matches: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(prefix))
        .map(|entry| entry.path())
        .collect();

    match matches.len() {
        1 => Ok(matches.remove(0)),
        n => Err(format!(
            "expected exactly one extracted directory starting with '{prefix}', found {n}"
        )),
    }
}

fn is_executable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Stage `src` next to `dest`, then remove `dest` and move the staged copy
/// into its place. A failed transfer leaves `dest` untouched.
fn replace_dir(src: &Path, dest: &Path) -> io::Result<()> {
    replace_dir_with(src, dest, move_tree)
}

fn replace_dir_with(
    src: &Path,
    dest: &Path,
    transfer: impl Fn(&Path, &Path) -> io::Result<()>,
) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let staged = staging_path(dest);
    if fs::symlink_metadata(&staged).is_ok() {
        fs::remove_dir_all(&staged)?;
    }
    if let Err(e) = transfer(src, &staged) {
        let _ = fs::remove_dir_all(&staged);
        return Err(e);
    }

    if fs::symlink_metadata(dest).is_ok() {
        fs::remove_dir_all(dest)?;
    }
    fs::rename(&staged, dest)
}

/// `<dest>.new`, on the same filesystem as `dest`.
fn staging_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".new");
    dest.with_file_name(name)
}

fn move_tree(src: &Path, dest: &Path) -> io::Result<()> {
    // rename fails across filesystems (tmpfs /tmp vs. home)
    if fs::rename(src, dest).is_ok() {
        return Ok(());
    }
    copy_tree(src, dest)
}

fn copy_tree(src: &Path, dest: &Path) -> io::Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(io::Error::other)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(io::Error::other)?;
        let target = dest.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            let link_target = fs::read_link(entry.path())?;
            std::os::unix::fs::symlink(link_target, &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Point `link` at `target`, replacing whatever link was there.
fn refresh_symlink(target: &Path, link: &Path) -> io::Result<()> {
    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent)?;
    }
    if fs::symlink_metadata(link).is_ok() {
        fs::remove_file(link)?;
    }
    std::os::unix::fs::symlink(target, link)
}
