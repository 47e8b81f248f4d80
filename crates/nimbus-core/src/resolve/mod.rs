//! The resolution pipeline's three stages.
//!
//! - [`GeolocationResolver`]: cache-aside lookup by client address.
//! - [`ObservationResolver`]: always-fresh weather fetch, persisted as a new
//!   observation.
//! - [`PriorObservationLocator`]: the most recent earlier observation for
//!   the same location.

mod geolocation;
mod observation;
mod prior;

pub use geolocation::GeolocationResolver;
pub use observation::{ObservationResolver, RecordedObservation};
pub use prior::{PriorObservation, PriorObservationLocator};
