//! Hypervisor command-line builder.
//!
//! Every shell command string the driver sends to the host is assembled
//! here, so quoting lives in one place. Values reaching these builders have
//! already been validated by [`DriverConfig::resource_spec`].
//!
//! [`DriverConfig::resource_spec`]: crate::domain::config::DriverConfig::resource_spec

use crate::domain::config::NetworkInterface;
use crate::domain::container::ContainerIdentity;

/// Container lifecycle, `set`, netif and diagnostic `exec`.
pub const VZCTL: &str = "/usr/sbin/vzctl";
/// Start/stop/destroy, cpu/memory, netfilter and in-container `exec`.
pub const PRLCTL: &str = "/usr/bin/prlctl";

/// Builds one command line per hypervisor action.
pub trait HypervisorCli {
    fn create(&self, id: &ContainerIdentity, hostname: &str, ostemplate: &str) -> String;
    fn add_interface(&self, id: &ContainerIdentity, ifname: &str) -> String;
    fn set_network(&self, id: &ContainerIdentity, ifname: &str, iface: &NetworkInterface)
    -> String;
    fn enable_netfilter(&self, id: &ContainerIdentity) -> String;
    fn set_cpus(&self, id: &ContainerIdentity, cpus: u32) -> String;
    fn set_memory(&self, id: &ContainerIdentity, memory: &str) -> String;
    fn set_disk(&self, id: &ContainerIdentity, disk: &str) -> String;
    fn start(&self, id: &ContainerIdentity) -> String;
    fn stop(&self, id: &ContainerIdentity) -> String;
    fn destroy(&self, id: &ContainerIdentity) -> String;
    /// Run `command` through the shell inside the container.
    fn exec(&self, id: &ContainerIdentity, command: &str) -> String;
    /// Run a diagnostic `command` inside the container.
    fn diagnostic_exec(&self, id: &ContainerIdentity, command: &str) -> String;
}

/// Virtuozzo `vzctl`/`prlctl` syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct Virtuozzo;

impl HypervisorCli for Virtuozzo {
    fn create(&self, id: &ContainerIdentity, hostname: &str, ostemplate: &str) -> String {
        format!("{VZCTL} create {id} --hostname {hostname} --ostemplate {ostemplate}")
    }

    fn add_interface(&self, id: &ContainerIdentity, ifname: &str) -> String {
        format!("{VZCTL} set {id} --netif_add {ifname} --save")
    }

    fn set_network(
        &self,
        id: &ContainerIdentity,
        ifname: &str,
        iface: &NetworkInterface,
    ) -> String {
        let mut line = format!("{VZCTL} set {id} --network {} --ifname {ifname} ", iface.network);
        if iface.settings.dhcp {
            line.push_str("--dhcp yes ");
        }
        if let Some(ip) = &iface.settings.ip {
            line.push_str(&format!("--ipadd {ip} "));
        }
        if let Some(gw) = &iface.settings.gw {
            line.push_str(&format!("--gw {gw} "));
        }
        line.push_str("--save");
        line
    }

    fn enable_netfilter(&self, id: &ContainerIdentity) -> String {
        format!("{PRLCTL} set {id} --netfilter full")
    }

    fn set_cpus(&self, id: &ContainerIdentity, cpus: u32) -> String {
        format!("{PRLCTL} set {id} --cpus {cpus}")
    }

    fn set_memory(&self, id: &ContainerIdentity, memory: &str) -> String {
        format!("{PRLCTL} set {id} --memsize {memory}")
    }

    fn set_disk(&self, id: &ContainerIdentity, disk: &str) -> String {
        format!("{VZCTL} set {id} --diskspace {disk}:{disk} --save")
    }

    fn start(&self, id: &ContainerIdentity) -> String {
        format!("{PRLCTL} start {id}")
    }

    fn stop(&self, id: &ContainerIdentity) -> String {
        format!("{PRLCTL} stop {id}")
    }

    fn destroy(&self, id: &ContainerIdentity) -> String {
        format!("{PRLCTL} destroy {id}")
    }

    fn exec(&self, id: &ContainerIdentity, command: &str) -> String {
        format!("{PRLCTL} exec {id} {}", double_quote(command))
    }

    fn diagnostic_exec(&self, id: &ContainerIdentity, command: &str) -> String {
        format!("{VZCTL} exec {id} {}", double_quote(command))
    }
}

/// Wrap `s` in double quotes for the host shell.
///
/// `\`, `"`, `$` and backticks are escaped so the inner command reaches the
/// container verbatim.
#[must_use]
pub fn double_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Inside a single-quoted shell word, `'` becomes `'\''`.
#[must_use]
pub fn single_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
