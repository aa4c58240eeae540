//! Third-party applications installed outside the system package manager.
//!
//! # Architecture
//!
//! - [`Registry`]: id to [`SoftwareDescriptor`], built once at startup
//! - [`strategy::InstallerStrategy`]: resolve, fetch and install for one
//!   (application, family) pair
//! - [`InstallPlan`]: one strategy run bracketed by a scoped workspace
//!
//! Every built-in entry is a [`strategy::Recipe`]: a resolution [`resolve::Source`],
//! a download destination and a packaging kind.

mod catalog;
pub mod install;
mod plan;
mod registry;
pub mod resolve;
pub mod strategy;

pub use plan::InstallPlan;
pub use registry::{Registry, SoftwareDescriptor};
#[cfg(test)]
pub use registry::Variant;
pub use strategy::InstallContext;
