//! Application state for the web layer.

use std::sync::Arc;

use crate::ekispert::EkispertClient;
use crate::resolver::RouteResolver;
use crate::store::MemoryRouteStore;

/// The concrete resolver served over HTTP.
pub type AppResolver = RouteResolver<EkispertClient, MemoryRouteStore>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Route resolver
    pub resolver: Arc<AppResolver>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(resolver: AppResolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }
}
