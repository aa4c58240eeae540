//! Per-installer temporary directories.

use std::path::Path;

use tempfile::TempDir;

use crate::error::Result;
use crate::ui::prelude::*;

/// A temporary directory owned by exactly one install plan.
///
/// [`ScopedWorkspace::release`] consumes the workspace, so it cannot run
/// twice. If the owner returns early instead, `Drop` removes the directory.
#[derive(Debug)]
pub struct ScopedWorkspace {
    dir: TempDir,
}

impl ScopedWorkspace {
    pub fn acquire() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("provision-").tempdir()?;
        emit(
            Level::Debug,
            "workspace.acquired",
            &format!("Created workspace {}", dir.path().display()),
            None,
        );
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Delete the directory and everything in it.
    pub fn release(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close()?;
        emit(
            Level::Debug,
            "workspace.released",
            &format!("Removed workspace {}", path.display()),
            None,
        );
        Ok(())
    }
}
