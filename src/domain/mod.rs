//! Core domain types: the platform capability boundary and the component catalog

pub mod component;
pub mod platform;

pub use component::{Component, ComponentCatalog};
pub use platform::Platform;
