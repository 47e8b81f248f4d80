//! HTTP clients for the upstream geolocation and weather services.
//!
//! Each client implements one of the provider traits from
//! [`nimbus_core::provider`]. Both carry a per-request timeout; a timed-out
//! or refused request surfaces as `ProviderUnavailable`.

mod http;

pub mod error;
pub mod ipapi;
pub mod openmeteo;

pub use error::{Error, Result};
pub use ipapi::IpApiClient;
pub use openmeteo::OpenMeteoClient;
