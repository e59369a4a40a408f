//! Installable component catalog
//!
//! The catalog is static: defined at process start, never mutated. Selections
//! are sets of component ids; [`ComponentCatalog::normalize`] guarantees the
//! required components are always part of the effective selection.

use std::collections::BTreeSet;

/// A single installable component
#[derive(Debug, Clone)]
pub struct Component {
    pub id: &'static str,
    pub display_name: &'static str,
    pub required: bool,
    /// Selected by default when the operator makes no explicit choice
    pub default_selected: bool,
    pub approx_size_bytes: u64,
}

/// The static catalog of installable components
#[derive(Debug, Clone)]
pub struct ComponentCatalog {
    components: Vec<Component>,
}

impl ComponentCatalog {
    /// The standard Minecraft Server Wrapper catalog
    pub fn standard() -> Self {
        Self {
            components: vec![
                Component {
                    id: "core",
                    display_name: "Core Application",
                    required: true,
                    default_selected: true,
                    approx_size_bytes: 15 * 1024 * 1024,
                },
                Component {
                    id: "service",
                    display_name: "System Service Integration",
                    required: false,
                    default_selected: true,
                    approx_size_bytes: 2 * 1024 * 1024,
                },
                Component {
                    id: "shortcuts",
                    display_name: "Desktop Shortcuts",
                    required: false,
                    default_selected: true,
                    approx_size_bytes: 1024 * 1024,
                },
                Component {
                    id: "examples",
                    display_name: "Example Configurations",
                    required: false,
                    default_selected: false,
                    approx_size_bytes: 5 * 1024 * 1024,
                },
            ],
        }
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn get(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Ids of components that are always installed
    pub fn required_ids(&self) -> BTreeSet<String> {
        self.components
            .iter()
            .filter(|c| c.required)
            .map(|c| c.id.to_string())
            .collect()
    }

    /// The selection used when no source overrides it
    pub fn default_selection(&self) -> BTreeSet<String> {
        self.components
            .iter()
            .filter(|c| c.default_selected)
            .map(|c| c.id.to_string())
            .collect()
    }

    /// Effective selection: the input plus every required component.
    ///
    /// Idempotent, and ignores ids not present in the catalog.
    pub fn normalize(&self, selected: &BTreeSet<String>) -> BTreeSet<String> {
        let mut normalized: BTreeSet<String> = selected
            .iter()
            .filter(|id| self.get(id).is_some())
            .cloned()
            .collect();
        normalized.extend(self.required_ids());
        normalized
    }

    /// Sum of declared sizes over the selection
    pub fn total_size(&self, selected: &BTreeSet<String>) -> u64 {
        selected
            .iter()
            .filter_map(|id| self.get(id))
            .map(|c| c.approx_size_bytes)
            .sum()
    }
}
