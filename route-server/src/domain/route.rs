//! Canonical route records.
//!
//! All callers consume this shape, regardless of which of the
//! upstream's response modes produced it. The summary accessors are
//! uniform across variants so rendering code only branches on variant
//! to decide whether to follow a deferred-content reference.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One normalized route result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RouteRecord {
    /// A computed itinerary with inline leg data.
    Itinerary(Itinerary),
    /// A pointer to externally hosted route content. Returned by the
    /// upstream's light plan tier instead of inline data; never cached.
    Deferred(DeferredContent),
}

/// A computed itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    /// Departure instant of the first leg
    pub departure: NaiveDateTime,
    /// Arrival instant of the last leg
    pub arrival: NaiveDateTime,
    /// Total minutes, on board plus walking/waiting
    pub duration_minutes: u32,
    /// Total fare in yen, base fare plus surcharges
    pub fare_total: u32,
    /// Number of transfers (line segments minus one)
    pub transfer_count: u32,
    /// Ordered line segments
    pub legs: Vec<Leg>,
}

/// An opaque external reference in place of inline itinerary data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeferredContent {
    /// URI of the externally hosted result
    pub resource_uri: String,
}

/// One line segment of an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    /// Line name (e.g. 東海道本線)
    pub line_name: String,
    /// Service/train-type label (e.g. 新快速), when the upstream sends one
    pub service_type: Option<String>,
    /// Departure platform, when known
    pub platform: Option<String>,
    /// Boarding stop name
    pub from: String,
    /// Alighting stop name
    pub to: String,
    /// Departure instant, when parseable
    pub departure: Option<NaiveDateTime>,
    /// Arrival instant, when parseable
    pub arrival: Option<NaiveDateTime>,
}

impl RouteRecord {
    /// Total duration in minutes; zero for deferred content.
    pub fn duration_minutes(&self) -> u32 {
        match self {
            RouteRecord::Itinerary(i) => i.duration_minutes,
            RouteRecord::Deferred(_) => 0,
        }
    }

    /// Total fare in yen; zero for deferred content.
    pub fn fare_total(&self) -> u32 {
        match self {
            RouteRecord::Itinerary(i) => i.fare_total,
            RouteRecord::Deferred(_) => 0,
        }
    }

    /// Transfer count; zero for deferred content.
    pub fn transfer_count(&self) -> u32 {
        match self {
            RouteRecord::Itinerary(i) => i.transfer_count,
            RouteRecord::Deferred(_) => 0,
        }
    }

    /// Line segments; empty for deferred content.
    pub fn legs(&self) -> &[Leg] {
        match self {
            RouteRecord::Itinerary(i) => &i.legs,
            RouteRecord::Deferred(_) => &[],
        }
    }

    /// Whether this record is a deferred-content pointer.
    pub fn is_deferred(&self) -> bool {
        matches!(self, RouteRecord::Deferred(_))
    }
}
