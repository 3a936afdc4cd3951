//! Resource configuration plan: turns a [`ResourceSpec`] into the ordered
//! hypervisor commands applied between create and start.

use crate::domain::config::NetworkInterface;
use crate::domain::container::{ContainerIdentity, ProvisionPhase};
use crate::domain::hypervisor::HypervisorCli;

/// Declarative resources for one container. Read-only to the orchestrator.
#[derive(Debug, Clone)]
pub struct ResourceSpec {
    pub networks: Vec<NetworkInterface>,
    pub cpus: u32,
    pub memory: String,
    pub disk: String,
    pub ostemplate: String,
    pub hostname: String,
    pub username: String,
}

/// Commands that, once all succeed, move provisioning into `phase`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceStep {
    pub phase: ProvisionPhase,
    pub commands: Vec<String>,
}

/// Interface name for the `index`-th configured network.
#[must_use]
pub fn interface_name(index: usize) -> String {
    format!("eth{index}")
}

/// Emits resource commands in a fixed order: network, CPU, memory, disk.
///
/// Network comes first so interface numbering is settled before anything
/// else touches the container.
pub struct ResourceConfigurator<'a, H: HypervisorCli + ?Sized> {
    cli: &'a H,
    spec: &'a ResourceSpec,
}

impl<'a, H: HypervisorCli + ?Sized> ResourceConfigurator<'a, H> {
    #[must_use]
    pub fn new(cli: &'a H, spec: &'a ResourceSpec) -> Self {
        Self { cli, spec }
    }

    /// `netif_add` + `set --network` per interface, then one `netfilter`.
    #[must_use]
    pub fn network_commands(&self, id: &ContainerIdentity) -> Vec<String> {
        let mut commands = Vec::with_capacity(self.spec.networks.len() * 2 + 1);
        for (index, iface) in self.spec.networks.iter().enumerate() {
            let ifname = interface_name(index);
            commands.push(self.cli.add_interface(id, &ifname));
            commands.push(self.cli.set_network(id, &ifname, iface));
        }
        commands.push(self.cli.enable_netfilter(id));
        commands
    }

    /// The full plan, one step per phase.
    #[must_use]
    pub fn plan(&self, id: &ContainerIdentity) -> Vec<ResourceStep> {
        vec![
            ResourceStep {
                phase: ProvisionPhase::NetworkConfigured,
                commands: self.network_commands(id),
            },
            ResourceStep {
                phase: ProvisionPhase::CpuConfigured,
                commands: vec![self.cli.set_cpus(id, self.spec.cpus)],
            },
            ResourceStep {
                phase: ProvisionPhase::MemConfigured,
                commands: vec![self.cli.set_memory(id, &self.spec.memory)],
            },
            ResourceStep {
                phase: ProvisionPhase::DiskConfigured,
                commands: vec![self.cli.set_disk(id, &self.spec.disk)],
            },
        ]
    }
}
