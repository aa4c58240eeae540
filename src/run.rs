//! The provisioning run: update the system, then install selected apps.

use dialoguer::Confirm;

use crate::common::distro::{self, Arch, HostIdentity};
use crate::common::http::HttpClient;
use crate::common::paths::Paths;
use crate::common::privilege::Escalation;
use crate::common::shell::Shell;
use crate::error::{ProvisionError, Result};
use crate::software::{InstallContext, InstallPlan, Registry, SoftwareDescriptor};
use crate::ui::prelude::*;
use crate::update::{self, Family};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Start,
    Updating,
    SelectingPackages,
    InstallingPackages(usize),
    Done,
    Failed,
}

/// Facts about the machine that are read once at the start of a run.
pub trait HostProbe {
    fn identify(&self) -> Result<HostIdentity>;
    fn escalation(&self, shell: &dyn Shell) -> Result<Escalation>;
}

/// The machine this process runs on.
pub struct LocalHost;

impl HostProbe for LocalHost {
    fn identify(&self) -> Result<HostIdentity> {
        distro::identify()
    }

    fn escalation(&self, shell: &dyn Shell) -> Result<Escalation> {
        Escalation::detect(shell)
    }
}

/// Decides which applications to install. Called once, before any install.
pub trait Selector {
    fn select(&mut self, offered: &[&SoftwareDescriptor]) -> Result<Vec<String>>;
}

/// Asks a yes/no question per offered application.
pub struct PromptSelector;

impl Selector for PromptSelector {
    fn select(&mut self, offered: &[&SoftwareDescriptor]) -> Result<Vec<String>> {
        let mut selected = Vec::new();
        for descriptor in offered {
            let accepted = Confirm::new()
                .with_prompt(format!("Install {}?", descriptor.display_name))
                .default(false)
                .interact()
                .map_err(|e| ProvisionError::Io(std::io::Error::other(e.to_string())))?;
            if accepted {
                selected.push(descriptor.id.to_string());
            }
        }
        Ok(selected)
    }
}

pub struct Environment<'a> {
    pub shell: &'a dyn Shell,
    pub http: &'a dyn HttpClient,
    pub paths: &'a Paths,
    pub arch: Arch,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub installed: Vec<String>,
    pub skipped: Vec<String>,
}

pub struct Orchestrator<'a> {
    env: Environment<'a>,
    registry: &'a Registry,
    state: RunState,
}

impl<'a> Orchestrator<'a> {
    pub fn new(env: Environment<'a>, registry: &'a Registry) -> Self {
        Self {
            env,
            registry,
            state: RunState::Start,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Drive the run to `Done`, or to `Failed` on the first fatal error.
    pub fn run(&mut self, host: &dyn HostProbe, selector: &mut dyn Selector) -> Result<RunSummary> {
        let result = self.drive(host, selector);
        if result.is_err() {
            self.enter(RunState::Failed);
        }
        result
    }

    fn enter(&mut self, state: RunState) {
        emit(
            Level::Debug,
            "run.state",
            &format!("{:?} -> {:?}", self.state, state),
            None,
        );
        self.state = state;
    }

    fn drive(&mut self, host: &dyn HostProbe, selector: &mut dyn Selector) -> Result<RunSummary> {
        self.enter(RunState::Updating);
        let identity = host.identify()?;
        let family = update::route(&identity)?;
        emit(
            Level::Info,
            "run.family",
            &format!(
                "{} Detected {} ({})",
                char::from(NerdFont::Desktop),
                identity.os,
                family
            ),
            None,
        );
        let escalation = host.escalation(self.env.shell)?;
        update::bulk_update(family, escalation, self.env.shell)?;

        self.enter(RunState::SelectingPackages);
        let offered = self.registry.available_for(family);
        let selection = selector.select(&offered)?;

        let mut summary = RunSummary::default();
        if selection.is_empty() {
            emit(
                Level::Info,
                "run.nothing_selected",
                &format!("{} No applications selected", char::from(NerdFont::Info)),
                None,
            );
            self.enter(RunState::Done);
            return Ok(summary);
        }

        let ctx = InstallContext {
            family,
            arch: self.env.arch,
            escalation,
            shell: self.env.shell,
            http: self.env.http,
            paths: self.env.paths,
        };

        for (index, id) in selection.iter().enumerate() {
            self.enter(RunState::InstallingPackages(index));
            match self.install_one(id, family, &ctx) {
                Ok(()) => {
                    emit(
                        Level::Success,
                        "run.installed",
                        &format!("{} Installed {}", char::from(NerdFont::Check), id),
                        None,
                    );
                    summary.installed.push(id.clone());
                }
                Err(err) if err.is_recoverable() => {
                    emit(
                        Level::Warn,
                        "run.skipped",
                        &format!("{} {}, skipping", char::from(NerdFont::Warning), err),
                        Some(serde_json::json!({ "id": id })),
                    );
                    summary.skipped.push(id.clone());
                }
                Err(err) => return Err(err),
            }
        }

        self.enter(RunState::Done);
        Ok(summary)
    }

    fn install_one(&self, id: &str, family: Family, ctx: &InstallContext) -> Result<()> {
        let descriptor = self.registry.get(id)?;
        let strategy = descriptor.strategy_for(family)?;
        InstallPlan::new(descriptor)?.execute(strategy, ctx)
    }
}
