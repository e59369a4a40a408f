//! Install plan resolution
//!
//! The plan is resolved once per run by merging, in precedence order
//! (later wins): built-in defaults ← config file ← CLI flags ← interactive
//! choices. It is immutable once the step pipeline starts; the front ends
//! hand it to the pipeline by reference.

pub mod config_file;

pub use config_file::ConfigFile;

use std::collections::BTreeSet;
use std::path::PathBuf;

use normpath::PathExt;

use crate::cli::Cli;
use crate::domain::{ComponentCatalog, Platform};
use crate::error::{InstallerError, Result};

/// Resolved installation configuration
#[derive(Debug, Clone)]
pub struct InstallPlan {
    pub install_path: PathBuf,
    /// Effective component selection; always contains every required id
    pub components: BTreeSet<String>,
    pub license_accepted: bool,
    pub create_shortcuts: bool,
    pub install_service: bool,
    pub verbose: bool,
}

impl InstallPlan {
    /// Resolve the plan from defaults, the optional config file, and CLI flags.
    ///
    /// Interactive choices are layered on top by the wizard before the plan
    /// is frozen. Config file parse failure is a hard error raised here,
    /// before any filesystem mutation.
    pub fn resolve(catalog: &ComponentCatalog, platform: Platform, cli: &Cli) -> Result<Self> {
        // Built-in defaults
        let mut plan = InstallPlan {
            install_path: platform.default_install_path(),
            components: catalog.default_selection(),
            license_accepted: false,
            create_shortcuts: true,
            install_service: true,
            verbose: cli.verbose,
        };

        // Config file overrides defaults
        if let Some(ref config_path) = cli.config_file {
            let config = ConfigFile::load(config_path)?;
            plan.apply_config(&config);
        }

        // CLI flags override the config file. Flags are one-way switches,
        // matching their help text: absence never resets a config value.
        if let Some(ref path) = cli.install_path {
            plan.install_path = path.clone();
        }
        if cli.accept_license {
            plan.license_accepted = true;
        }
        if cli.no_service {
            plan.install_service = false;
        }
        if cli.no_shortcuts {
            plan.create_shortcuts = false;
        }
        if cli.include_examples {
            plan.components.insert("examples".to_string());
        }

        plan.normalize_components(catalog);
        plan.normalize_install_path();
        Ok(plan)
    }

    fn apply_config(&mut self, config: &ConfigFile) {
        if let Some(ref path) = config.install_path {
            self.install_path = PathBuf::from(path);
        }
        if let Some(accept) = config.accept_license {
            self.license_accepted = accept;
        }
        if let Some(shortcuts) = config.create_shortcuts {
            self.create_shortcuts = shortcuts;
        }
        if let Some(service) = config.install_service {
            self.install_service = service;
        }
        if let Some(ref components) = config.components {
            for (id, enabled) in components {
                if *enabled {
                    self.components.insert(id.clone());
                } else {
                    self.components.remove(id);
                }
            }
        }
    }

    /// Keep the component selection consistent with the feature toggles and
    /// guarantee required components are present.
    fn normalize_components(&mut self, catalog: &ComponentCatalog) {
        if !self.create_shortcuts {
            self.components.remove("shortcuts");
        }
        if !self.install_service {
            self.components.remove("service");
        }
        self.components = catalog.normalize(&self.components);
    }

    /// Normalize the operator-supplied path where possible. A path that does
    /// not exist yet is kept as given; PrepareDirectory creates it later.
    fn normalize_install_path(&mut self) {
        self.install_path = self
            .install_path
            .normalize()
            .map(|np| np.into_path_buf())
            .unwrap_or_else(|_| self.install_path.clone());
    }

    /// Pre-flight gate: pipeline execution is only permitted once the
    /// license has been accepted through some source.
    pub fn validate_for_run(&self) -> Result<()> {
        if !self.license_accepted {
            return Err(InstallerError::LicenseNotAccepted);
        }
        Ok(())
    }
}
