use std::path::PathBuf;

use crate::error::{ProvisionError, Result};

/// User-local install locations, resolved once from `HOME`.
#[derive(Debug, Clone)]
pub struct Paths {
    home: PathBuf,
}

impl Paths {
    /// Resolve from `HOME`, falling back to the platform home directory.
    pub fn from_env() -> Result<Self> {
        let home = std::env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .ok_or_else(|| {
                ProvisionError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Unable to determine home directory",
                ))
            })?;
        Ok(Self::with_home(home))
    }

    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// `~/.local/share`
    pub fn data_dir(&self) -> PathBuf {
        self.home.join(".local").join("share")
    }

    /// `~/.local/bin`
    pub fn bin_dir(&self) -> PathBuf {
        self.home.join(".local").join("bin")
    }

    /// `~/.local/share/<vendor>/<app>`
    pub fn app_dir(&self, vendor: &str, app: &str) -> PathBuf {
        self.data_dir().join(vendor).join(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_home() {
        let paths = Paths::with_home("/home/dev");
        assert_eq!(paths.bin_dir(), PathBuf::from("/home/dev/.local/bin"));
        assert_eq!(
            paths.app_dir("JetBrains", "Toolbox"),
            PathBuf::from("/home/dev/.local/share/JetBrains/Toolbox")
        );
    }
}
