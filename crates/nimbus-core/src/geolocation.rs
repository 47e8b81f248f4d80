//! Geolocation records, keyed by the client's network address.
//!
//! A geolocation is written once, on the first cache miss for an address,
//! and never updated afterwards.

use serde::{Deserialize, Serialize};

/// The local-host address. The geolocation provider cannot place it, so it
/// is sent upstream as an empty address, which the provider interprets as
/// "the caller's own public address".
pub const LOOPBACK_ADDRESS: &str = "127.0.0.1";

/// The address to send to the geolocation provider for a client `address`.
pub fn provider_query(address: &str) -> &str {
  if address == LOOPBACK_ADDRESS { "" } else { address }
}

/// A resolved location for one client address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
  /// Client address as seen by the server; the cache key.
  pub address:   String,
  /// Degrees, signed.
  pub latitude:  f64,
  /// Degrees, signed.
  pub longitude: f64,
  pub city:      String,
  pub country:   String,
  pub region:    String,
  /// IANA-style identifier, e.g. `America/Toronto`.
  pub timezone:  String,
}
