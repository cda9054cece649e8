//! CIDR arithmetic helpers.
//!
//! Thin wrappers over `ipnetwork` for the few operations the planner needs:
//! counting and enumerating fixed-prefix subnets of a block, and overlap tests.

use ipnetwork::{IpNetworkError, Ipv4Network};
use std::net::Ipv4Addr;

/// Number of `/new_prefix` subnets that fit in `network`.
///
/// Returns 0 when `new_prefix` is shorter than the network's own prefix.
pub fn subnet_count(network: &Ipv4Network, new_prefix: u8) -> usize {
    match new_prefix.checked_sub(network.prefix()) {
        Some(bits) if new_prefix <= 32 => 1usize << bits,
        _ => 0,
    }
}

/// The `index`-th `/new_prefix` subnet of `network`, in ascending address order
pub fn nth_subnet(
    network: &Ipv4Network,
    new_prefix: u8,
    index: usize,
) -> Result<Ipv4Network, IpNetworkError> {
    if index >= subnet_count(network, new_prefix) {
        return Err(IpNetworkError::InvalidPrefix);
    }

    let base = u32::from(network.network()) as u64;
    let size = 1u64 << (32 - new_prefix as u32);
    let address = base + size * index as u64;

    Ipv4Network::new(Ipv4Addr::from(address as u32), new_prefix)
}

/// Split `network` into all of its `/new_prefix` subnets, in ascending order
pub fn subdivide(network: &Ipv4Network, new_prefix: u8) -> Result<Vec<Ipv4Network>, IpNetworkError> {
    if new_prefix < network.prefix() || new_prefix > 32 {
        return Err(IpNetworkError::InvalidPrefix);
    }

    (0..subnet_count(network, new_prefix))
        .map(|index| nth_subnet(network, new_prefix, index))
        .collect()
}

/// Check whether two networks share any address
pub fn overlaps(a: &Ipv4Network, b: &Ipv4Network) -> bool {
    a.contains(b.network()) || b.contains(a.network())
}

/// Number of addresses in a network of the given prefix length
pub fn addresses_in_prefix(prefix: u8) -> u64 {
    1u64 << (32 - prefix.min(32) as u32)
}
