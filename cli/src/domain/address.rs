//! Container address discovery parsing.

use std::sync::LazyLock;

use regex::Regex;

/// Lists the IPv4 addresses of the first interface, one per line.
pub const ADDRESS_QUERY_COMMAND: &str = "/sbin/ip -o -f inet addr show dev eth0";

static INET_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"(([0-9]{1,3}\.){3}[0-9]{1,3})/[0-9]{1,2}").unwrap()
});

/// First dotted-quad address carrying a CIDR suffix in `output`.
#[must_use]
pub fn parse_ipv4(output: &str) -> Option<String> {
    INET_RE
        .captures(output)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
