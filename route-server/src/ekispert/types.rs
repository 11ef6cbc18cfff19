//! Ekispert API response DTOs.
//!
//! These types map directly to the course-search JSON responses. They
//! use `Option` liberally because the upstream omits fields rather
//! than sending nulls, and `serde` aliases because the same logical
//! field appears under several spellings depending on the segment.
//! Numeric fields arrive as either JSON numbers or strings, so they
//! are kept as `Value` and coerced during conversion.

use serde::Deserialize;
use serde_json::Value;

/// A value the upstream sends as either a bare object or an array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// Array form
    Many(Vec<T>),
    /// Bare-object form, used when there is exactly one element
    One(T),
}

impl<T> OneOrMany<T> {
    /// Normalize to a list.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(v) => v,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// Top-level response from `search/course/light`.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseResponse {
    #[serde(rename = "ResultSet")]
    pub result_set: Option<ResultSet>,
}

/// The `ResultSet` wrapper.
///
/// Exactly one of `resource_uri` and `course` is expected on a
/// success; error bodies carry `error` instead.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultSet {
    /// Deferred-content pointer (light plan tier).
    #[serde(rename = "ResourceURI")]
    pub resource_uri: Option<String>,

    /// Itinerary candidates; bare object when there is one result.
    #[serde(rename = "Course")]
    pub course: Option<OneOrMany<Course>>,

    /// Error detail, present in error bodies.
    #[serde(rename = "Error")]
    pub error: Option<ErrorBody>,
}

/// Error detail inside an error `ResultSet`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message (e.g. 駅名が見つかりません)
    #[serde(rename = "Message", alias = "message")]
    pub message: Option<String>,

    /// Upstream error code (e.g. "E102")
    #[serde(rename = "code", alias = "Code")]
    pub code: Option<String>,
}

/// One itinerary candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct Course {
    /// Price components, tagged by `kind` (FareSummary, ChargeSummary, ...)
    #[serde(rename = "Price")]
    pub price: Option<OneOrMany<Price>>,

    /// Route detail: durations and line segments
    #[serde(rename = "Route")]
    pub route: Option<RouteDto>,
}

/// One price component of a course.
#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    /// Component kind: "FareSummary" for the base fare,
    /// "ChargeSummary" for reserved-seat/limited-express surcharges.
    pub kind: Option<String>,

    /// One-way amount in yen; number or string.
    #[serde(rename = "Oneway", alias = "oneway")]
    pub oneway: Option<Value>,
}

/// Route detail of a course.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteDto {
    /// Minutes on board; number or string.
    #[serde(rename = "timeOnBoard", alias = "TimeOnBoard")]
    pub time_on_board: Option<Value>,

    /// Minutes walking/waiting; number or string.
    #[serde(rename = "timeOther", alias = "TimeOther")]
    pub time_other: Option<Value>,

    /// Line segments; bare object when there is exactly one.
    #[serde(rename = "Line", alias = "line")]
    pub line: Option<OneOrMany<LineSegment>>,
}

/// One line segment of a route.
#[derive(Debug, Clone, Deserialize)]
pub struct LineSegment {
    /// The line itself (name)
    #[serde(rename = "Line", alias = "line")]
    pub line: Option<Named>,

    /// Service/train-type label, first-choice spelling
    #[serde(rename = "Type", alias = "type")]
    pub service_type: Option<Named>,

    /// Service/train-type label, alternate location used by some segments
    #[serde(rename = "Kind", alias = "kind")]
    pub kind: Option<Named>,

    /// Boarding stop state
    #[serde(rename = "DepartureState", alias = "departureState")]
    pub departure_state: Option<StopState>,

    /// Alighting stop state
    #[serde(rename = "ArrivalState", alias = "arrivalState")]
    pub arrival_state: Option<StopState>,
}

/// A `{ "Name": ... }` wrapper used for lines, types, stations, platforms.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Named {
    #[serde(rename = "Name", alias = "name")]
    pub name: Option<String>,
}

/// Departure or arrival state of a line segment.
#[derive(Debug, Clone, Deserialize)]
pub struct StopState {
    /// The stop itself
    #[serde(rename = "Station", alias = "station")]
    pub station: Option<Named>,

    /// Timestamp, full date-time or bare HH:MM
    #[serde(rename = "Datetime", alias = "datetime")]
    pub datetime: Option<DatetimeText>,

    /// Platform, when present
    #[serde(rename = "Platform", alias = "platform")]
    pub platform: Option<Named>,
}

/// A `{ "text": ... }` timestamp wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct DatetimeText {
    #[serde(rename = "text", alias = "Text")]
    pub text: Option<String>,
}
