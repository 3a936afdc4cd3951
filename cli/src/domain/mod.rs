//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod address;
pub mod bootstrap;
pub mod config;
pub mod container;
pub mod endpoint;
pub mod error;
pub mod hypervisor;
pub mod resources;

pub use config::{DriverConfig, InstanceInfo, KeyPairPaths, NetworkInterface, NetworkSettings};
pub use container::{ContainerIdentity, ProvisionPhase, ProvisioningState};
pub use endpoint::{Endpoint, SshTarget, parse_endpoint};
pub use error::DriverError;
pub use hypervisor::{HypervisorCli, Virtuozzo};
pub use resources::{ResourceConfigurator, ResourceSpec};
