//! Domain types and validators for driver configuration.
//!
//! Pure functions only, no I/O. Relative key paths are resolved by the infra
//! loader.

use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::domain::error::DriverError;
use crate::domain::resources::ResourceSpec;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_USERNAME: &str = "kitchen";
pub const DEFAULT_PRIVATE_KEY: &str = ".kitchen/kitchen_id_rsa";
pub const DEFAULT_PUBLIC_KEY: &str = ".kitchen/kitchen_id_rsa.pub";
pub const DEFAULT_NETWORK: &str = "Bridged";
pub const DEFAULT_ARCH: &str = "x86_64";

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap()
});

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[0-9A-Fa-f.:/]+$").unwrap()
});

static SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[0-9]+[A-Za-z]?$").unwrap()
});

// ── Config schema ────────────────────────────────────────────────────────────

/// Driver configuration, typically read from `.kitchen.vz.yml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// `local` or `ssh://user@host:port`.
    pub socket: String,
    /// Login user created inside the container.
    pub username: String,
    pub private_key: PathBuf,
    pub public_key: PathBuf,
    /// Interfaces in declaration order.
    #[serde(deserialize_with = "deserialize_networks")]
    pub network: Vec<NetworkInterface>,
    /// Prefix remote commands with `sudo -E`.
    pub use_sudo: bool,
    pub arch: String,
    pub customize: Customize,
    /// Explicit OS template; derived from the platform when unset.
    pub ostemplate: Option<String>,
    /// Container hostname; defaults to the instance name.
    pub ct_hostname: Option<String>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            socket: crate::domain::endpoint::LOCAL_ENDPOINT.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            private_key: PathBuf::from(DEFAULT_PRIVATE_KEY),
            public_key: PathBuf::from(DEFAULT_PUBLIC_KEY),
            network: vec![NetworkInterface {
                network: DEFAULT_NETWORK.to_string(),
                settings: NetworkSettings {
                    dhcp: true,
                    ..NetworkSettings::default()
                },
            }],
            use_sudo: true,
            arch: DEFAULT_ARCH.to_string(),
            customize: Customize::default(),
            ostemplate: None,
            ct_hostname: None,
        }
    }
}

/// Compute resources applied after creation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Customize {
    pub memory: String,
    pub disk: String,
    pub cpus: u32,
}

impl Default for Customize {
    fn default() -> Self {
        Self {
            memory: "512M".to_string(),
            disk: "10G".to_string(),
            cpus: 2,
        }
    }
}

/// Per-interface settings. All three may be combined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    pub dhcp: bool,
    pub ip: Option<String>,
    pub gw: Option<String>,
}

/// One virtual interface attached to a hypervisor network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterface {
    /// Hypervisor network name, e.g. `Bridged`.
    pub network: String,
    pub settings: NetworkSettings,
}

/// The calling test instance.
#[derive(Debug, Clone)]
pub struct InstanceInfo {
    pub name: String,
    /// Platform name, e.g. `centos-7.2`.
    pub platform: Option<String>,
}

/// Locations of the login keypair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPairPaths {
    pub private_key: PathBuf,
    pub public_key: PathBuf,
}

impl DriverConfig {
    /// Hostname given to the container.
    #[must_use]
    pub fn hostname<'a>(&'a self, instance: &'a InstanceInfo) -> &'a str {
        self.ct_hostname.as_deref().unwrap_or(&instance.name)
    }

    /// OS template: the explicit override, or `<platform major>-<arch>`.
    ///
    /// # Errors
    ///
    /// Returns an error if no override is set and the instance has no platform.
    pub fn os_template(&self, instance: &InstanceInfo) -> Result<String> {
        if let Some(template) = &self.ostemplate {
            return Ok(template.clone());
        }
        let platform = instance
            .platform
            .as_deref()
            .ok_or_else(|| DriverError::InvalidConfig {
                key: "platform",
                value: String::new(),
            })?;
        Ok(format!("{}-{}", platform_major(platform), self.arch))
    }

    #[must_use]
    pub fn keypair(&self) -> KeyPairPaths {
        KeyPairPaths {
            private_key: self.private_key.clone(),
            public_key: self.public_key.clone(),
        }
    }

    /// Resolve and validate the resource specification for `instance`.
    ///
    /// Every value that ends up inside a hypervisor command line is checked
    /// here, before any command runs.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidConfig`] for the first offending value.
    pub fn resource_spec(&self, instance: &InstanceInfo) -> Result<ResourceSpec> {
        let hostname = self.hostname(instance);
        let ostemplate = self.os_template(instance)?;

        validate(TOKEN_RE.is_match(&self.username), "username", &self.username)?;
        validate(TOKEN_RE.is_match(hostname), "ct_hostname", hostname)?;
        validate(TOKEN_RE.is_match(&ostemplate), "ostemplate", &ostemplate)?;
        validate(
            SIZE_RE.is_match(&self.customize.memory),
            "customize.memory",
            &self.customize.memory,
        )?;
        validate(
            SIZE_RE.is_match(&self.customize.disk),
            "customize.disk",
            &self.customize.disk,
        )?;
        validate(
            self.customize.cpus > 0,
            "customize.cpus",
            &self.customize.cpus.to_string(),
        )?;
        for iface in &self.network {
            validate(TOKEN_RE.is_match(&iface.network), "network", &iface.network)?;
            for (key, value) in [("network.ip", &iface.settings.ip), ("network.gw", &iface.settings.gw)] {
                if let Some(v) = value {
                    validate(ADDRESS_RE.is_match(v), key, v)?;
                }
            }
        }

        Ok(ResourceSpec {
            networks: self.network.clone(),
            cpus: self.customize.cpus,
            memory: self.customize.memory.clone(),
            disk: self.customize.disk.clone(),
            ostemplate,
            hostname: hostname.to_string(),
            username: self.username.clone(),
        })
    }
}

/// `centos-7.2` → `centos-7`.
#[must_use]
pub fn platform_major(platform: &str) -> &str {
    platform.split('.').next().unwrap_or(platform)
}

fn validate(ok: bool, key: &'static str, value: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(DriverError::InvalidConfig {
            key,
            value: value.to_string(),
        }
        .into())
    }
}

// ── Ordered network mapping ──────────────────────────────────────────────────

/// Accepts `{Bridged: {dhcp: true}, Host-Only: {...}}` (document order is
/// interface order) or a list of such single-key mappings.
fn deserialize_networks<'de, D>(deserializer: D) -> Result<Vec<NetworkInterface>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer
        .deserialize_any(NetworkListVisitor)
        .map(|NetworkList(list)| list)
}

struct NetworkList(Vec<NetworkInterface>);

impl<'de> Deserialize<'de> for NetworkList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NetworkListVisitor)
    }
}

struct NetworkListVisitor;

impl<'de> Visitor<'de> for NetworkListVisitor {
    type Value = NetworkList;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of network name to interface settings")
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(NetworkList(Vec::new()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut list = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((network, settings)) = map.next_entry::<String, Option<NetworkSettings>>()? {
            list.push(NetworkInterface {
                network,
                settings: settings.unwrap_or_default(),
            });
        }
        Ok(NetworkList(list))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut list = Vec::new();
        while let Some(NetworkList(entries)) = seq.next_element()? {
            list.extend(entries);
        }
        Ok(NetworkList(list))
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
