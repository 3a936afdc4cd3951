//! UUID-backed `IdentityGenerator`.

use crate::application::ports::IdentityGenerator;
use crate::domain::ContainerIdentity;

/// Hands out random v4 UUIDs, the identity format the hypervisor expects.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdentities;

impl IdentityGenerator for UuidIdentities {
    fn generate(&self) -> ContainerIdentity {
        ContainerIdentity::new(uuid::Uuid::new_v4().to_string())
    }
}
