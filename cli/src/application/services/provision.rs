//! Container provisioning: identity → create → resources → start →
//! user bootstrap → address discovery → readiness.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};

use crate::application::ports::{
    CommandExecutor, IdentityGenerator, KeyGenerator, LoginTarget, ProgressReporter,
    ReadinessCheck,
};
use crate::application::services::credentials::{ensure_keypair, read_public_key};
use crate::application::services::discovery::{DiscoveryPolicy, discover_address};
use crate::domain::bootstrap::user_bootstrap_commands;
use crate::domain::{
    ContainerIdentity, HypervisorCli, KeyPairPaths, ProvisionPhase, ProvisioningState,
    ResourceConfigurator, ResourceSpec,
};

/// Drives one container from nothing to a reachable login.
///
/// Commands run strictly one after another. The first failure moves the
/// provisioner to [`ProvisionPhase::Failed`] and is returned as is; whatever
/// was already created stays in place for `destroy`.
pub struct Provisioner<'a, E, H: ?Sized, K, P, G, R> {
    executor: &'a E,
    hypervisor: &'a H,
    keys: &'a K,
    readiness: &'a P,
    identities: &'a G,
    reporter: &'a R,
    discovery: DiscoveryPolicy,
    phase: ProvisionPhase,
}

impl<'a, E, H, K, P, G, R> Provisioner<'a, E, H, K, P, G, R>
where
    E: CommandExecutor,
    H: HypervisorCli + ?Sized,
    K: KeyGenerator,
    P: ReadinessCheck,
    G: IdentityGenerator,
    R: ProgressReporter,
{
    #[must_use]
    pub fn new(
        executor: &'a E,
        hypervisor: &'a H,
        keys: &'a K,
        readiness: &'a P,
        identities: &'a G,
        reporter: &'a R,
    ) -> Self {
        Self {
            executor,
            hypervisor,
            keys,
            readiness,
            identities,
            reporter,
            discovery: DiscoveryPolicy::default(),
            phase: ProvisionPhase::Uninitialized,
        }
    }

    #[must_use]
    pub fn with_discovery_policy(mut self, policy: DiscoveryPolicy) -> Self {
        self.discovery = policy;
        self
    }

    #[must_use]
    pub fn phase(&self) -> &ProvisionPhase {
        &self.phase
    }

    /// Provision a container described by `spec` and record the outcome in
    /// `state`.
    ///
    /// The identity is written to `state` as soon as it is assigned, so a
    /// failed run can still be torn down. On success `state` also carries the
    /// discovered address and the private key path. Every call starts over
    /// from `Uninitialized`, so one provisioner can be reused after a failure.
    ///
    /// # Errors
    ///
    /// Returns the first credential, command, discovery or readiness error.
    pub async fn create(
        &mut self,
        spec: &ResourceSpec,
        keypair: &KeyPairPaths,
        state: &mut ProvisioningState,
    ) -> Result<()> {
        self.phase = ProvisionPhase::Uninitialized;
        let result = self.run(spec, keypair, state).await;
        if let Err(e) = &result {
            let target = self
                .phase
                .successor()
                .map_or_else(|| self.phase.to_string(), |p| p.to_string());
            tracing::warn!(phase = %self.phase, error = %format!("{e:#}"), "provisioning failed");
            self.reporter.warn(&format!("provisioning failed before '{target}'"));
            self.phase = ProvisionPhase::Failed {
                reason: format!("{e:#}"),
            };
        }
        result
    }

    async fn run(
        &mut self,
        spec: &ResourceSpec,
        keypair: &KeyPairPaths,
        state: &mut ProvisioningState,
    ) -> Result<()> {
        let id = self.identities.generate();
        state.identity = Some(id.clone());
        ensure_keypair(self.keys, keypair).await?;
        state.ssh_key = Some(keypair.private_key.clone());
        self.advance(ProvisionPhase::IdentityAssigned);

        self.reporter.step(&format!("creating container {id}..."));
        let create = self
            .hypervisor
            .create(&id, &spec.hostname, &spec.ostemplate);
        self.execute(&create)
            .await
            .with_context(|| format!("creating container {id}"))?;
        self.advance(ProvisionPhase::Created);

        self.reporter.step("configuring resources...");
        for step in ResourceConfigurator::new(self.hypervisor, spec).plan(&id) {
            for command in &step.commands {
                self.execute(command)
                    .await
                    .with_context(|| format!("configuring container {id}"))?;
            }
            self.advance(step.phase);
        }

        self.reporter.step(&format!("starting container {id}..."));
        self.execute(&self.hypervisor.start(&id))
            .await
            .with_context(|| format!("starting container {id}"))?;
        self.advance(ProvisionPhase::Running);

        self.reporter
            .step(&format!("bootstrapping user '{}'...", spec.username));
        self.bootstrap_user(&id, &spec.username, keypair).await?;
        self.advance(ProvisionPhase::UserBootstrapped);

        self.reporter.step("waiting for an IP address...");
        let address = discover_address(self.executor, self.hypervisor, &id, self.discovery).await?;
        state.address = Some(address.clone());
        self.advance(ProvisionPhase::AddressDiscovered);

        self.reporter.step(&format!("waiting for sshd on {address}..."));
        self.readiness
            .wait_until_ready(&LoginTarget {
                address: address.clone(),
                username: spec.username.clone(),
                private_key: keypair.private_key.clone(),
            })
            .await
            .with_context(|| format!("waiting for sshd on {address}"))?;
        self.advance(ProvisionPhase::Ready);

        self.reporter
            .success(&format!("container {id} ready at {address}"));
        Ok(())
    }

    async fn bootstrap_user(
        &self,
        id: &ContainerIdentity,
        username: &str,
        keypair: &KeyPairPaths,
    ) -> Result<()> {
        let public_key = read_public_key(keypair).await?;
        for command in user_bootstrap_commands(username, &public_key) {
            self.execute(&self.hypervisor.exec(id, &command))
                .await
                .with_context(|| format!("bootstrapping user '{username}' in {id}"))?;
        }
        Ok(())
    }

    async fn execute(&self, command_line: &str) -> Result<()> {
        let result = self.executor.execute(command_line).await?;
        self.reporter.output(&result.stdout);
        Ok(())
    }

    fn advance(&mut self, to: ProvisionPhase) {
        debug_assert_eq!(self.phase.successor().as_ref(), Some(&to));
        tracing::info!(phase = %to, "provisioning phase reached");
        self.phase = to;
    }
}
