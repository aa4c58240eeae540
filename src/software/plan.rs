use super::registry::SoftwareDescriptor;
use super::strategy::{InstallContext, InstallerStrategy};
use crate::common::workspace::ScopedWorkspace;
use crate::error::Result;
use crate::ui::prelude::*;

/// One selected application being installed.
///
/// The plan owns its workspace; [`InstallPlan::execute`] releases it whether
/// the strategy succeeds or fails.
pub struct InstallPlan<'r> {
    pub descriptor: &'r SoftwareDescriptor,
    pub workspace: ScopedWorkspace,
    pub resolved_artifact_url: Option<String>,
}

impl<'r> InstallPlan<'r> {
    pub fn new(descriptor: &'r SoftwareDescriptor) -> Result<Self> {
        Ok(Self {
            descriptor,
            workspace: ScopedWorkspace::acquire()?,
            resolved_artifact_url: None,
        })
    }

    pub fn execute(mut self, strategy: &dyn InstallerStrategy, ctx: &InstallContext) -> Result<()> {
        let outcome = self.run_steps(strategy, ctx);
        let released = self.workspace.release();
        outcome?;
        released
    }

    fn run_steps(&mut self, strategy: &dyn InstallerStrategy, ctx: &InstallContext) -> Result<()> {
        emit(
            Level::Debug,
            "install.plan",
            &format!(
                "Installing {} for {} in {}",
                self.descriptor.id,
                ctx.family,
                self.workspace.path().display()
            ),
            None,
        );

        let artifact = strategy.resolve(ctx)?;
        self.resolved_artifact_url = Some(artifact.url.clone());

        let local = strategy.fetch(&artifact, &self.workspace, ctx)?;
        strategy.install(local, &self.workspace, ctx)
    }
}
