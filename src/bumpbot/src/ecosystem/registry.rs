//! Package manager to ecosystem lookup table.

use super::{Ecosystem, EcosystemError, HelperProcess, PackageManager};
use crate::config::HelperSettings;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Maps package manager identifiers to their capabilities. Populated at startup.
#[derive(Debug, Clone, Default)]
pub struct EcosystemRegistry {
    ecosystems: HashMap<PackageManager, Ecosystem>,
}

impl EcosystemRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry with one [`HelperProcess`] per configured helper.
    #[must_use]
    pub fn from_helpers(helpers: &BTreeMap<String, HelperSettings>) -> Self {
        let mut registry = Self::new();
        for (name, settings) in helpers {
            let package_manager = PackageManager::from(name.as_str());
            debug!(%package_manager, command = %settings.command, "Registering helper");
            registry.register(
                package_manager.clone(),
                Ecosystem::from_single(HelperProcess::from_settings(package_manager, settings)),
            );
        }
        registry
    }

    /// Registers (or replaces) the ecosystem for `package_manager`.
    pub fn register(&mut self, package_manager: PackageManager, ecosystem: Ecosystem) {
        self.ecosystems.insert(package_manager, ecosystem);
    }

    /// Looks up the ecosystem for `package_manager`.
    ///
    /// # Errors
    ///
    /// Returns [`EcosystemError::UnsupportedPackageManager`] if nothing is registered.
    pub fn get(&self, package_manager: &PackageManager) -> Result<&Ecosystem, EcosystemError> {
        self.ecosystems
            .get(package_manager)
            .ok_or_else(|| EcosystemError::UnsupportedPackageManager {
                package_manager: package_manager.to_string(),
            })
    }

    /// Registered identifiers in sorted order.
    pub fn package_managers(&self) -> Vec<&PackageManager> {
        let mut names: Vec<_> = self.ecosystems.keys().collect();
        names.sort();
        names
    }
}
