//! Container identity, the caller-owned provisioning state, and the
//! provisioning phase machine.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Opaque handle addressing one container in every hypervisor command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerIdentity(String);

impl ContainerIdentity {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mutable record owned by the caller and threaded through `create`/`destroy`.
///
/// Field names on disk follow the kitchen state keys (`ct_id`, `hostname`,
/// `ssh_key`). Keys this driver does not know about are preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvisioningState {
    #[serde(rename = "ct_id", default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<ContainerIdentity>,

    /// Discovered IPv4 address of the container.
    #[serde(rename = "hostname", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Private key accepted by the bootstrapped user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<PathBuf>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ProvisioningState {
    /// `true` when the record carries nothing worth persisting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identity.is_none()
            && self.address.is_none()
            && self.ssh_key.is_none()
            && self.extra.is_empty()
    }
}

/// Provisioning progress. Transitions only ever move to [`successor`];
/// `Failed` is terminal and can be entered from any phase.
///
/// [`successor`]: ProvisionPhase::successor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionPhase {
    Uninitialized,
    IdentityAssigned,
    Created,
    NetworkConfigured,
    CpuConfigured,
    MemConfigured,
    DiskConfigured,
    Running,
    UserBootstrapped,
    AddressDiscovered,
    Ready,
    Failed { reason: String },
}

impl ProvisionPhase {
    /// The next phase on the happy path, `None` for `Ready` and `Failed`.
    #[must_use]
    pub fn successor(&self) -> Option<Self> {
        use ProvisionPhase::{
            AddressDiscovered, Created, CpuConfigured, DiskConfigured, Failed, IdentityAssigned,
            MemConfigured, NetworkConfigured, Ready, Running, Uninitialized, UserBootstrapped,
        };
        Some(match self {
            Uninitialized => IdentityAssigned,
            IdentityAssigned => Created,
            Created => NetworkConfigured,
            NetworkConfigured => CpuConfigured,
            CpuConfigured => MemConfigured,
            MemConfigured => DiskConfigured,
            DiskConfigured => Running,
            Running => UserBootstrapped,
            UserBootstrapped => AddressDiscovered,
            AddressDiscovered => Ready,
            Ready | Failed { .. } => return None,
        })
    }
}

impl fmt::Display for ProvisionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::IdentityAssigned => "identity assigned",
            Self::Created => "created",
            Self::NetworkConfigured => "network configured",
            Self::CpuConfigured => "cpu configured",
            Self::MemConfigured => "memory configured",
            Self::DiskConfigured => "disk configured",
            Self::Running => "running",
            Self::UserBootstrapped => "user bootstrapped",
            Self::AddressDiscovered => "address discovered",
            Self::Ready => "ready",
            Self::Failed { reason } => return write!(f, "failed: {reason}"),
        };
        f.write_str(name)
    }
}
