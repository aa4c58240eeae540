use std::collections::BTreeMap;

use super::catalog;
use super::strategy::InstallerStrategy;
use crate::error::{ProvisionError, Result};
use crate::update::Family;

/// One installer strategy and the families it serves.
pub struct Variant {
    pub families: &'static [Family],
    pub strategy: Box<dyn InstallerStrategy>,
}

impl Variant {
    pub fn new(families: &'static [Family], strategy: impl InstallerStrategy + 'static) -> Self {
        Self {
            families,
            strategy: Box::new(strategy),
        }
    }
}

pub struct SoftwareDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub variants: Vec<Variant>,
}

impl SoftwareDescriptor {
    pub fn new(id: &'static str, display_name: &'static str, variants: Vec<Variant>) -> Self {
        Self {
            id,
            display_name,
            variants,
        }
    }

    pub fn supports(&self, family: Family) -> bool {
        self.variants.iter().any(|v| v.families.contains(&family))
    }

    /// First variant serving `family`.
    pub fn strategy_for(&self, family: Family) -> Result<&dyn InstallerStrategy> {
        self.variants
            .iter()
            .find(|v| v.families.contains(&family))
            .map(|v| v.strategy.as_ref())
            .ok_or_else(|| ProvisionError::NoInstallerForFamily {
                id: self.id.to_string(),
                family,
            })
    }
}

impl std::fmt::Debug for SoftwareDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareDescriptor")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("variants", &self.variants.len())
            .finish()
    }
}

/// Application id to descriptor, fixed for the lifetime of the process.
pub struct Registry {
    entries: BTreeMap<&'static str, SoftwareDescriptor>,
}

impl Registry {
    pub fn new(descriptors: Vec<SoftwareDescriptor>) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for descriptor in descriptors {
            let id = descriptor.id;
            if entries.insert(id, descriptor).is_some() {
                return Err(ProvisionError::DuplicatePackage { id: id.to_string() });
            }
        }
        Ok(Self { entries })
    }

    pub fn builtin() -> Result<Self> {
        Self::new(catalog::builtin())
    }

    pub fn get(&self, id: &str) -> Result<&SoftwareDescriptor> {
        self.entries
            .get(id)
            .ok_or_else(|| ProvisionError::UnknownPackage { id: id.to_string() })
    }

    /// Entries installable on `family`, ordered by id.
    pub fn available_for(&self, family: Family) -> Vec<&SoftwareDescriptor> {
        self.entries
            .values()
            .filter(|d| d.supports(family))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let registry = Registry::builtin().unwrap();
        assert!(registry.get("jetbrains-toolbox").is_ok());
        assert!(matches!(
            registry.get("notepad++"),
            Err(ProvisionError::UnknownPackage { ref id }) if id == "notepad++"
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let twice = || catalog::builtin().into_iter().take(1);
        let descriptors: Vec<_> = twice().chain(twice()).collect();
        assert!(matches!(
            Registry::new(descriptors),
            Err(ProvisionError::DuplicatePackage { ref id }) if id == "jetbrains-toolbox"
        ));
    }

    #[test]
    fn test_variant_selection_by_family() {
        let registry = Registry::builtin().unwrap();

        let discord = registry.get("discord").unwrap();
        assert!(discord.strategy_for(Family::AptDebian).is_ok());
        assert!(matches!(
            discord.strategy_for(Family::DnfFedora),
            Err(ProvisionError::NoInstallerForFamily { family: Family::DnfFedora, .. })
        ));

        let toolbox = registry.get("jetbrains-toolbox").unwrap();
        for family in Family::LINUX {
            assert!(toolbox.supports(*family));
        }
    }

    #[test]
    fn test_nothing_offered_off_linux() {
        let registry = Registry::builtin().unwrap();
        assert!(registry.available_for(Family::HomebrewSoftwareUpdate).is_empty());
        assert!(registry.available_for(Family::FreeBsdBase).is_empty());

        let fedora: Vec<_> = registry
            .available_for(Family::DnfFedora)
            .iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(fedora, vec!["github-desktop", "google-chrome", "jetbrains-toolbox", "vscode"]);
    }
}
