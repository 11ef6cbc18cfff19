//! Route resolver: cache-aside orchestration with stale fallback.
//!
//! Per request: `CheckCache → (hit: return) | (miss: call upstream)`;
//! upstream success normalizes, best-effort persists, and returns;
//! upstream failure falls back to the newest cached entry regardless
//! of expiry, except for station-not-found, which is the caller's
//! input problem and would only be masked by stale data.


use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{QueryKey, RouteRecord, ValidationError};
use crate::ekispert::{CourseSearch, EkispertError, FailureKind, convert_course_response};
use crate::stations::StationAliases;
use crate::store::RouteStore;

/// Where a successful answer came from.
///
/// Callers use this only for UI affordance ("showing a recent result,
/// may be outdated"); it carries no correctness implication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    /// Fresh upstream answer
    Live,
    /// Fresh cache hit, no network I/O performed
    Cache,
    /// Expired cache entry served because the upstream failed
    StaleFallback,
}

/// Successful outcome of a route search.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// One or more routes, tagged with their source.
    Routes {
        routes: Vec<RouteRecord>,
        source: RouteSource,
    },
    /// The upstream answered and found nothing. A valid, empty
    /// answer, not a failure; never triggers the fallback path.
    NoRoutes,
}

/// Failed outcome of a route search.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Bad date/time shape; terminated before any cache or network access
    #[error("malformed input: {0}")]
    MalformedInput(#[from] ValidationError),

    /// The upstream could not resolve a station name
    #[error("station not found: {message}")]
    StationNotFound { message: String },

    /// The upstream failed and no cached entry was available
    #[error("upstream unavailable ({kind})")]
    UpstreamUnavailable { kind: FailureKind },
}

/// The orchestrator callers interact with.
pub struct RouteResolver<C, S> {
    client: C,
    store: S,
    aliases: StationAliases,
}

impl<C: CourseSearch, S: RouteStore> RouteResolver<C, S> {
    /// Create a new resolver.
    pub fn new(client: C, store: S, aliases: StationAliases) -> Self {
        Self {
            client,
            store,
            aliases,
        }
    }

    /// Resolve a route search from raw user input.
    ///
    /// Validation failures are terminal: no cache or upstream access
    /// happens before a key is successfully built.
    pub async fn resolve(
        &self,
        origin_raw: &str,
        destination_raw: &str,
        date_raw: &str,
        time_raw: &str,
    ) -> Result<Resolved, ResolveError> {
        let key = QueryKey::build(origin_raw, destination_raw, date_raw, time_raw, &self.aliases)?;
        self.resolve_key(&key).await
    }

    /// Resolve a route search for an already-built key.
    pub async fn resolve_key(&self, key: &QueryKey) -> Result<Resolved, ResolveError> {
        if let Some(entry) = self.store.lookup_fresh(key, Utc::now()).await {
            info!(
                origin = %key.origin,
                destination = %key.destination,
                date = %key.date,
                time = %key.time,
                "cache hit"
            );
            return Ok(Resolved::Routes {
                routes: entry.routes,
                source: RouteSource::Cache,
            });
        }

        info!(
            origin = %key.origin,
            destination = %key.destination,
            "cache miss, calling upstream"
        );

        match self.client.search(key).await {
            Ok(response) => {
                let routes = convert_course_response(response, key);

                if routes.is_empty() {
                    return Ok(Resolved::NoRoutes);
                }

                // Deferred pointers are redirects, not computed data;
                // persisting one would serve a stale redirect under
                // the wrong staleness policy.
                if routes.iter().any(RouteRecord::is_deferred) {
                    return Ok(Resolved::Routes {
                        routes,
                        source: RouteSource::Live,
                    });
                }

                if let Err(e) = self.store.insert(key, routes.clone(), Utc::now()).await {
                    warn!(error = %e, "cache write failed, serving live result anyway");
                }

                Ok(Resolved::Routes {
                    routes,
                    source: RouteSource::Live,
                })
            }
            Err(EkispertError::StationNotFound { message }) => {
                // A client-input problem, not a staleness problem:
                // stale cached data would be misleading here.
                Err(ResolveError::StationNotFound {
                    message: with_disambiguation_hint(message, key),
                })
            }
            Err(err) => {
                let kind = err.kind();
                warn!(error = %err, "upstream call failed, trying stale cache");

                if let Some(entry) = self.store.lookup_any(key).await {
                    warn!(
                        created_at = %entry.created_at,
                        "serving stale cached routes"
                    );
                    return Ok(Resolved::Routes {
                        routes: entry.routes,
                        source: RouteSource::StaleFallback,
                    });
                }

                Err(ResolveError::UpstreamUnavailable { kind })
            }
        }
    }
}

/// Append the same-name-station hint when a failing endpoint has no
/// parenthesised region suffix yet. The upstream does not say which
/// endpoint failed, so the hint fires when either lacks one.
fn with_disambiguation_hint(message: String, key: &QueryKey) -> String {
    if has_region_suffix(&key.origin) && has_region_suffix(&key.destination) {
        return message;
    }
    format!(
        "{message}。同名駅が存在する場合は「駅名(都道府県)」の形式で入力してください（例：草津(滋賀)）"
    )
}

fn has_region_suffix(name: &str) -> bool {
    name.contains('(') && name.contains(')')
}
