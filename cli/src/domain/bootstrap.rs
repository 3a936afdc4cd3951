//! In-container user bootstrap script.

use crate::domain::hypervisor::single_quote;

/// The fixed command sequence that creates a passwordless-sudo login user
/// accepting `public_key`. Each entry runs as its own exec call.
#[must_use]
pub fn user_bootstrap_commands(username: &str, public_key: &str) -> Vec<String> {
    let home = format!("/home/{username}");
    let ssh_dir = format!("{home}/.ssh");
    let authorized_keys = format!("{ssh_dir}/authorized_keys");
    let sudoers = format!("/etc/sudoers.d/{username}");
    vec![
        format!("useradd {username}"),
        format!("mkdir {ssh_dir}"),
        format!("chown {username}: {ssh_dir} && chmod 700 {ssh_dir}"),
        format!("echo {} > {authorized_keys}", single_quote(public_key.trim())),
        format!("chown {username}: {authorized_keys} && chmod 600 {authorized_keys}"),
        "mkdir -p /etc/sudoers.d".to_string(),
        format!("echo '{username} ALL=(ALL) NOPASSWD:ALL' >> {sudoers}"),
        format!("chmod 0440 {sudoers}"),
    ]
}
