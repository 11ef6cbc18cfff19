//! HTTP surface for the route resolver.
//!
//! One JSON endpoint plus a health check; itinerary rendering belongs
//! to the caller.

mod dto;
mod routes;
mod state;

pub use dto::{ErrorResponse, RouteSearchResponse};
pub use routes::create_router;
pub use state::{AppResolver, AppState};
