//! System-wide package updates for each supported family.

mod route;

pub use route::{Family, route};

use crate::common::privilege::Escalation;
use crate::common::shell::{CommandLine, Shell};
use crate::error::{ProvisionError, Result};
use crate::ui::prelude::*;

/// AUR helper upgraded on Manjaro when present.
const AUR_HELPER: &str = "yay";

/// One command of a bulk update.
#[derive(Debug, Clone)]
struct UpdateStep {
    command: CommandLine,
    elevated: bool,
    /// Skipped without error when the program is missing.
    optional: bool,
}

impl UpdateStep {
    fn root(program: &str, args: &[&str]) -> Self {
        Self {
            command: CommandLine::new(program).args(args.iter().copied()),
            elevated: true,
            optional: false,
        }
    }

    /// Tools that refuse to run as root and escalate on their own.
    fn user(program: &str, args: &[&str]) -> Self {
        Self {
            elevated: false,
            ..Self::root(program, args)
        }
    }

    fn optional(self) -> Self {
        Self {
            optional: true,
            ..self
        }
    }

    fn program(&self) -> &str {
        &self.command.program
    }
}

/// The family's "refresh index + full upgrade" sequence.
fn update_steps(family: Family) -> Vec<UpdateStep> {
    match family {
        Family::HomebrewSoftwareUpdate => vec![
            UpdateStep::user("brew", &["update"]),
            UpdateStep::user("brew", &["upgrade"]),
            UpdateStep::root("softwareupdate", &["-i", "-a"]),
        ],
        Family::AptDebian => vec![
            UpdateStep::root("apt-get", &["update"]),
            UpdateStep::root("apt-get", &["dist-upgrade", "-y"]),
        ],
        Family::DnfFedora => vec![UpdateStep::root("dnf", &["upgrade", "--refresh", "-y"])],
        Family::PacmanArch => vec![UpdateStep::root("pacman", &["-Syu", "--noconfirm"])],
        Family::PacmanManjaro => vec![
            UpdateStep::root("pacman", &["-Syu", "--noconfirm"]),
            UpdateStep::user(AUR_HELPER, &["-Syu", "--noconfirm"]).optional(),
        ],
        Family::FreeBsdBase => vec![
            UpdateStep::root("freebsd-update", &["fetch", "install"]),
            UpdateStep::root("pkg", &["update"]),
            UpdateStep::root("pkg", &["upgrade", "-y"]),
        ],
    }
}

/// Run the bulk update for `family`.
///
/// All required programs are checked before the first command runs, so a
/// missing tool never leaves the system half-updated.
pub fn bulk_update(family: Family, escalation: Escalation, shell: &dyn Shell) -> Result<()> {
    let steps = update_steps(family);

    if let Some(missing) = steps
        .iter()
        .find(|step| !step.optional && !shell.has_program(step.program()))
    {
        return Err(ProvisionError::missing(missing.program()));
    }

    emit(
        Level::Info,
        "update.start",
        &format!(
            "{} Updating system packages with {}...",
            char::from(NerdFont::Upgrade),
            family
        ),
        None,
    );

    for step in steps {
        if step.optional && !shell.has_program(step.program()) {
            emit(
                Level::Debug,
                "update.step.skipped",
                &format!("{} not installed, skipping", step.program()),
                None,
            );
            continue;
        }

        let command = if step.elevated {
            escalation.elevate(step.command)
        } else {
            step.command
        };

        emit(
            Level::Debug,
            "update.step.run",
            &format!("Running {command}"),
            None,
        );
        shell
            .run(&command)
            .map_err(|e| ProvisionError::install_failed(command.to_string(), e))?;
    }

    emit(
        Level::Success,
        "update.finish",
        &format!("{} System packages are up to date", char::from(NerdFont::Check)),
        None,
    );
    Ok(())
}
