//! Core types and orchestration for the nimbus weather service.
//!
//! This crate resolves a client address into a [`Geolocation`] and a fresh
//! [`Observation`], persisting both through an [`ObservationStore`]. It is
//! deliberately free of HTTP and database dependencies: upstream services and
//! storage are reached only through the traits in [`provider`] and [`store`].
//!
//! [`Geolocation`]: geolocation::Geolocation
//! [`Observation`]: observation::Observation
//! [`ObservationStore`]: store::ObservationStore

// Native `async fn` in traits; `Send` bounds are spelled out on the trait
// methods that need them.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod geolocation;
pub mod observation;
pub mod payload;
pub mod pipeline;
pub mod provider;
pub mod resolve;
pub mod retry;
pub mod store;
pub mod timezone;
pub mod units;
pub mod validate;

pub use error::{BoxError, Error, Result};

#[cfg(test)]
mod testing;
