//! Domain types for route searches.
//!
//! Query keys are validated at construction time, so code that
//! receives a `QueryKey` can trust that the date and time are
//! well-formed and that station names are already disambiguated.

mod key;
mod route;

pub use key::{QueryKey, SearchDate, SearchTime, ValidationError};
pub use route::{DeferredContent, Itinerary, Leg, RouteRecord};
