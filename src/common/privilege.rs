use sudo::RunningAs;

use super::shell::{CommandLine, Shell};
use crate::error::{ProvisionError, Result};
use crate::ui::prelude::*;

const SUDO: &str = "sudo";

/// How state-changing commands obtain root.
///
/// Nothing is cached or pre-authorized: every wrapped command invokes `sudo`
/// again and relies on whatever credential cache the OS keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    /// The process already runs as root; commands run as-is.
    AlreadyRoot,
    /// Each command is prefixed with `sudo`.
    Sudo,
}

impl Escalation {
    /// Resolve the mechanism, failing before any command runs when `sudo`
    /// is needed but missing.
    pub fn detect(shell: &dyn Shell) -> Result<Self> {
        let escalation = Self::for_running_as(sudo::check(), shell)?;
        emit(
            Level::Debug,
            "privilege.detect",
            &format!("{} Privilege escalation: {:?}", char::from(NerdFont::Lock), escalation),
            None,
        );
        Ok(escalation)
    }

    fn for_running_as(running_as: RunningAs, shell: &dyn Shell) -> Result<Self> {
        match running_as {
            RunningAs::Root | RunningAs::Suid => Ok(Self::AlreadyRoot),
            RunningAs::User if shell.has_program(SUDO) => Ok(Self::Sudo),
            RunningAs::User => Err(ProvisionError::missing(SUDO)),
        }
    }

    pub fn elevate(&self, command: CommandLine) -> CommandLine {
        match self {
            Self::AlreadyRoot => command,
            Self::Sudo => command.wrapped_in(SUDO),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::shell::testing::FakeShell;

    #[test]
    fn test_user_without_sudo_is_missing_dependency() {
        let shell = FakeShell::with_programs(&["apt-get"]);
        let err = Escalation::for_running_as(RunningAs::User, &shell).unwrap_err();
        assert!(matches!(
            err,
            ProvisionError::MissingDependency { ref program } if program == "sudo"
        ));
    }

    #[test]
    fn test_user_with_sudo_wraps_commands() {
        let shell = FakeShell::with_programs(&["sudo"]);
        let escalation = Escalation::for_running_as(RunningAs::User, &shell).unwrap();
        assert_eq!(escalation, Escalation::Sudo);
        assert_eq!(
            escalation
                .elevate(CommandLine::new("dnf").args(["upgrade", "-y"]))
                .to_string(),
            "sudo dnf upgrade -y"
        );
    }

    #[test]
    fn test_root_runs_directly() {
        let shell = FakeShell::default();
        let escalation = Escalation::for_running_as(RunningAs::Root, &shell).unwrap();
        assert_eq!(
            escalation.elevate(CommandLine::new("pacman").arg("-Syu")).to_string(),
            "pacman -Syu"
        );
    }
}
