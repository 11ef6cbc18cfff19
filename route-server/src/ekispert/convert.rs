//! Conversion from Ekispert DTOs to canonical route records.
//!
//! The upstream payload is edge-case-laden: one-or-many shapes,
//! number-or-string numerics, alternate field locations, and times
//! that may or may not carry a date. The rule throughout is that a
//! malformed individual field degrades to a safe default (0, empty,
//! `None`) instead of discarding the itinerary.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;
use tracing::debug;

use crate::domain::{DeferredContent, Itinerary, Leg, QueryKey, RouteRecord};

use super::types::{Course, CourseResponse, LineSegment, Named, OneOrMany, Price, StopState};

/// Placeholder for a segment the upstream sent without a line name.
const UNKNOWN_LINE_NAME: &str = "路線名不明";

/// Convert one course-search success payload to route records.
///
/// A `ResourceURI` pointer yields a single deferred record. A payload
/// with neither a pointer nor any recognizable course list converts
/// to an empty vec, which the resolver treats as "no routes found",
/// not as a failure.
pub fn convert_course_response(response: CourseResponse, key: &QueryKey) -> Vec<RouteRecord> {
    let Some(result_set) = response.result_set else {
        debug!("payload has no ResultSet");
        return Vec::new();
    };

    if let Some(resource_uri) = result_set.resource_uri {
        return vec![RouteRecord::Deferred(DeferredContent { resource_uri })];
    }

    let courses = match result_set.course {
        Some(course) => course.into_vec(),
        None => {
            debug!("payload has neither Course nor ResourceURI");
            return Vec::new();
        }
    };

    courses
        .into_iter()
        .map(|course| convert_course(course, key))
        .collect()
}

/// Convert a single course to an itinerary record.
fn convert_course(course: Course, key: &QueryKey) -> RouteRecord {
    let prices = course.price.map(OneOrMany::into_vec).unwrap_or_default();

    // Base fare and surcharges are separate components; both count,
    // or the displayed cost is silently wrong for express routes.
    let fare_total = price_component(&prices, "FareSummary") + price_component(&prices, "ChargeSummary");

    let (duration_minutes, lines) = match course.route {
        Some(route) => {
            let duration = coerce_u32(route.time_on_board.as_ref())
                + coerce_u32(route.time_other.as_ref());
            let lines = route.line.map(OneOrMany::into_vec).unwrap_or_default();
            (duration, lines)
        }
        None => (0, Vec::new()),
    };

    let transfer_count = lines.len().saturating_sub(1) as u32;

    let base_date = key.date.date();
    let query_departure = key.departure_datetime();

    let departure = lines
        .first()
        .and_then(|l| stop_instant_text(l.departure_state.as_ref()))
        .and_then(parse_instant)
        .map(|parsed| parsed.resolve(base_date))
        .unwrap_or(query_departure);

    let arrival = lines
        .last()
        .and_then(|l| stop_instant_text(l.arrival_state.as_ref()))
        .and_then(parse_instant)
        .map(|parsed| parsed.resolve_after(base_date, departure))
        .unwrap_or(departure);

    let legs = lines
        .into_iter()
        .map(|line| convert_line(line, base_date))
        .collect();

    RouteRecord::Itinerary(Itinerary {
        departure,
        arrival,
        duration_minutes,
        fare_total,
        transfer_count,
        legs,
    })
}

/// Convert one line segment to a leg.
fn convert_line(line: LineSegment, base_date: NaiveDate) -> Leg {
    let line_name = named(line.line.as_ref()).unwrap_or_else(|| UNKNOWN_LINE_NAME.to_string());

    // Alternate locations for the same logical field, in preference
    // order: Type first, Kind second.
    let service_type = named(line.service_type.as_ref()).or_else(|| named(line.kind.as_ref()));

    let platform = line
        .departure_state
        .as_ref()
        .and_then(|s| named(s.platform.as_ref()));

    let from = line
        .departure_state
        .as_ref()
        .and_then(|s| named(s.station.as_ref()))
        .unwrap_or_default();
    let to = line
        .arrival_state
        .as_ref()
        .and_then(|s| named(s.station.as_ref()))
        .unwrap_or_default();

    let departure = stop_instant_text(line.departure_state.as_ref())
        .and_then(parse_instant)
        .map(|parsed| parsed.resolve(base_date));

    // Per-leg overnight rollover: a bare-time arrival before this
    // leg's departure is on the next day.
    let arrival = stop_instant_text(line.arrival_state.as_ref())
        .and_then(parse_instant)
        .map(|parsed| match departure {
            Some(dep) => parsed.resolve_after(base_date, dep),
            None => parsed.resolve(base_date),
        });

    Leg {
        line_name,
        service_type,
        platform,
        from,
        to,
        departure,
        arrival,
    }
}

/// First price component of the given kind, coerced to yen.
fn price_component(prices: &[Price], kind: &str) -> u32 {
    prices
        .iter()
        .find(|p| p.kind.as_deref() == Some(kind))
        .map(|p| coerce_u32(p.oneway.as_ref()))
        .unwrap_or(0)
}

/// Coerce a number-or-string JSON value to a non-negative integer.
///
/// Anything unparsable (or negative) becomes 0; a corrupt single
/// field must not fail the whole itinerary.
fn coerce_u32(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or_else(|| {
                debug!(value = %n, "numeric field out of range, using 0");
                0
            }),
        Some(Value::String(s)) => s.trim().parse::<u32>().unwrap_or_else(|_| {
            debug!(value = %s, "unparsable numeric field, using 0");
            0
        }),
        _ => 0,
    }
}

fn named(named: Option<&Named>) -> Option<String> {
    named.and_then(|n| n.name.clone()).filter(|s| !s.is_empty())
}

fn stop_instant_text(state: Option<&StopState>) -> Option<&str> {
    state?.datetime.as_ref()?.text.as_deref()
}

/// A parsed timestamp that may or may not have carried a date.
enum ParsedInstant {
    /// Full date-time string
    Dated(NaiveDateTime),
    /// Bare HH:MM, to be combined with the query date
    TimeOnly(NaiveTime),
}

impl ParsedInstant {
    /// Anchor to the base date.
    fn resolve(self, base_date: NaiveDate) -> NaiveDateTime {
        match self {
            ParsedInstant::Dated(dt) => dt,
            ParsedInstant::TimeOnly(t) => base_date.and_time(t),
        }
    }

    /// Anchor to the base date, rolling a bare time forward by one
    /// day when it lands before `not_before` (overnight itineraries).
    /// Explicit dates are trusted as sent.
    fn resolve_after(self, base_date: NaiveDate, not_before: NaiveDateTime) -> NaiveDateTime {
        match self {
            ParsedInstant::Dated(dt) => dt,
            ParsedInstant::TimeOnly(t) => {
                let dt = base_date.and_time(t);
                if dt < not_before {
                    dt + Duration::days(1)
                } else {
                    dt
                }
            }
        }
    }
}

/// Parse an upstream timestamp: RFC 3339, `YYYY-MM-DDTHH:MM:SS`
/// without offset, or bare `HH:MM`.
fn parse_instant(text: &str) -> Option<ParsedInstant> {
    let text = text.trim();

    if text.contains('T') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(ParsedInstant::Dated(dt.naive_local()));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
            return Some(ParsedInstant::Dated(dt));
        }
        debug!(text, "unparsable date-time field");
        return None;
    }

    match NaiveTime::parse_from_str(text, "%H:%M") {
        Ok(t) => Some(ParsedInstant::TimeOnly(t)),
        Err(_) => {
            debug!(text, "unparsable time field");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stations::StationAliases;

    fn key() -> QueryKey {
        QueryKey::build("彦根", "京都", "20240115", "1400", &StationAliases::empty()).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn convert(json: &str) -> Vec<RouteRecord> {
        let response: CourseResponse = serde_json::from_str(json).unwrap();
        convert_course_response(response, &key())
    }

    #[test]
    fn deferred_pointer_becomes_single_deferred_record() {
        let records =
            convert(r#"{"ResultSet": {"ResourceURI": "https://roote.ekispert.net/result?x=1"}}"#);
        assert_eq!(records.len(), 1);
        match &records[0] {
            RouteRecord::Deferred(d) => {
                assert_eq!(d.resource_uri, "https://roote.ekispert.net/result?x=1");
            }
            other => panic!("expected deferred record, got {other:?}"),
        }
    }

    #[test]
    fn missing_course_and_pointer_is_empty_not_error() {
        assert!(convert(r#"{"ResultSet": {}}"#).is_empty());
        assert!(convert(r#"{}"#).is_empty());
    }

    #[test]
    fn fare_sums_base_and_surcharge() {
        let records = convert(
            r#"{"ResultSet": {"Course": {
                "Price": [
                    {"kind": "FareSummary", "Oneway": "500"},
                    {"kind": "ChargeSummary", "Oneway": "300"},
                    {"kind": "Fare", "Oneway": "9999"}
                ],
                "Route": {"timeOnBoard": "45", "timeOther": "10"}
            }}}"#,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fare_total(), 800);
        assert_eq!(records[0].duration_minutes(), 55);
    }

    #[test]
    fn missing_surcharge_leaves_base_fare() {
        let records = convert(
            r#"{"ResultSet": {"Course": {
                "Price": [{"kind": "FareSummary", "Oneway": 500}]
            }}}"#,
        );
        assert_eq!(records[0].fare_total(), 500);
    }

    #[test]
    fn corrupt_duration_degrades_to_zero_without_losing_the_itinerary() {
        let records = convert(
            r#"{"ResultSet": {"Course": {
                "Price": [{"kind": "FareSummary", "Oneway": "500"}],
                "Route": {
                    "timeOnBoard": "not-a-number",
                    "timeOther": "10",
                    "Line": {
                        "Line": {"Name": "東海道本線"},
                        "DepartureState": {"Station": {"Name": "彦根"}, "Datetime": {"text": "14:05"}},
                        "ArrivalState": {"Station": {"Name": "京都"}, "Datetime": {"text": "15:00"}}
                    }
                }
            }}}"#,
        );
        assert_eq!(records.len(), 1);
        // the corrupt sub-field contributes 0; the parsable one survives
        assert_eq!(records[0].duration_minutes(), 10);
        assert_eq!(records[0].fare_total(), 500);
        assert_eq!(records[0].legs().len(), 1);
        assert_eq!(records[0].legs()[0].from, "彦根");
    }

    #[test]
    fn single_line_object_is_coerced_to_one_leg() {
        let records = convert(
            r#"{"ResultSet": {"Course": {
                "Route": {"Line": {"Line": {"Name": "琵琶湖線"}}}
            }}}"#,
        );
        assert_eq!(records[0].legs().len(), 1);
        assert_eq!(records[0].transfer_count(), 0);
        assert_eq!(records[0].legs()[0].line_name, "琵琶湖線");
    }

    #[test]
    fn transfer_count_is_segments_minus_one() {
        let records = convert(
            r#"{"ResultSet": {"Course": {
                "Route": {"Line": [
                    {"Line": {"Name": "A"}},
                    {"Line": {"Name": "B"}},
                    {"Line": {"Name": "C"}}
                ]}
            }}}"#,
        );
        assert_eq!(records[0].transfer_count(), 2);
    }

    #[test]
    fn service_type_prefers_type_over_kind() {
        let records = convert(
            r#"{"ResultSet": {"Course": {
                "Route": {"Line": [
                    {"Line": {"Name": "A"}, "Type": {"Name": "新快速"}, "Kind": {"Name": "快速"}},
                    {"Line": {"Name": "B"}, "Kind": {"Name": "普通"}}
                ]}
            }}}"#,
        );
        let legs = records[0].legs();
        assert_eq!(legs[0].service_type.as_deref(), Some("新快速"));
        assert_eq!(legs[1].service_type.as_deref(), Some("普通"));
    }

    #[test]
    fn missing_line_name_uses_placeholder() {
        let records = convert(r#"{"ResultSet": {"Course": {"Route": {"Line": [{}]}}}}"#);
        assert_eq!(records[0].legs()[0].line_name, UNKNOWN_LINE_NAME);
        assert!(records[0].legs()[0].service_type.is_none());
    }

    #[test]
    fn bare_times_are_combined_with_the_query_date() {
        let records = convert(
            r#"{"ResultSet": {"Course": {
                "Route": {"Line": {
                    "Line": {"Name": "東海道本線"},
                    "DepartureState": {"Datetime": {"text": "14:05"}},
                    "ArrivalState": {"Datetime": {"text": "15:00"}}
                }}
            }}}"#,
        );
        match &records[0] {
            RouteRecord::Itinerary(i) => {
                assert_eq!(i.departure, date(2024, 1, 15).and_hms_opt(14, 5, 0).unwrap());
                assert_eq!(i.arrival, date(2024, 1, 15).and_hms_opt(15, 0, 0).unwrap());
            }
            other => panic!("expected itinerary, got {other:?}"),
        }
    }

    #[test]
    fn overnight_arrival_rolls_forward_one_day() {
        let records = convert(
            r#"{"ResultSet": {"Course": {
                "Route": {"Line": {
                    "Line": {"Name": "夜行"},
                    "DepartureState": {"Datetime": {"text": "23:50"}},
                    "ArrivalState": {"Datetime": {"text": "00:10"}}
                }}
            }}}"#,
        );
        match &records[0] {
            RouteRecord::Itinerary(i) => {
                assert_eq!(i.departure, date(2024, 1, 15).and_hms_opt(23, 50, 0).unwrap());
                assert_eq!(i.arrival, date(2024, 1, 16).and_hms_opt(0, 10, 0).unwrap());
                // the leg rolls over too
                assert_eq!(
                    i.legs[0].arrival.unwrap(),
                    date(2024, 1, 16).and_hms_opt(0, 10, 0).unwrap()
                );
            }
            other => panic!("expected itinerary, got {other:?}"),
        }
    }

    #[test]
    fn full_datetimes_are_trusted_as_sent() {
        let records = convert(
            r#"{"ResultSet": {"Course": {
                "Route": {"Line": {
                    "Line": {"Name": "東海道本線"},
                    "DepartureState": {"Datetime": {"text": "2024-01-15T14:05:00+09:00"}},
                    "ArrivalState": {"Datetime": {"text": "2024-01-15T15:00:00+09:00"}}
                }}
            }}}"#,
        );
        match &records[0] {
            RouteRecord::Itinerary(i) => {
                assert_eq!(i.departure, date(2024, 1, 15).and_hms_opt(14, 5, 0).unwrap());
                assert_eq!(i.arrival, date(2024, 1, 15).and_hms_opt(15, 0, 0).unwrap());
            }
            other => panic!("expected itinerary, got {other:?}"),
        }
    }

    #[test]
    fn missing_times_fall_back_to_the_query_instant() {
        let records = convert(r#"{"ResultSet": {"Course": {"Route": {"Line": [{}]}}}}"#);
        match &records[0] {
            RouteRecord::Itinerary(i) => {
                let query_instant = date(2024, 1, 15).and_hms_opt(14, 0, 0).unwrap();
                assert_eq!(i.departure, query_instant);
                assert_eq!(i.arrival, query_instant);
                assert!(i.legs[0].departure.is_none());
                assert!(i.legs[0].arrival.is_none());
            }
            other => panic!("expected itinerary, got {other:?}"),
        }
    }

    #[test]
    fn two_segment_course_end_to_end() {
        let records = convert(
            r#"{"ResultSet": {"Course": {
                "Price": [
                    {"kind": "FareSummary", "Oneway": "500"},
                    {"kind": "ChargeSummary", "Oneway": "300"}
                ],
                "Route": {
                    "timeOnBoard": 45,
                    "timeOther": 10,
                    "Line": [
                        {
                            "Line": {"Name": "東海道本線"},
                            "Type": {"Name": "新快速"},
                            "DepartureState": {
                                "Station": {"Name": "彦根"},
                                "Datetime": {"text": "14:05"},
                                "Platform": {"Name": "2"}
                            },
                            "ArrivalState": {"Station": {"Name": "草津"}, "Datetime": {"text": "14:35"}}
                        },
                        {
                            "Line": {"Name": "琵琶湖線"},
                            "DepartureState": {"Station": {"Name": "草津"}, "Datetime": {"text": "14:40"}},
                            "ArrivalState": {"Station": {"Name": "京都"}, "Datetime": {"text": "15:00"}}
                        }
                    ]
                }
            }}}"#,
        );

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.fare_total(), 800);
        assert_eq!(record.duration_minutes(), 55);
        assert_eq!(record.transfer_count(), 1);

        let legs = record.legs();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].line_name, "東海道本線");
        assert_eq!(legs[0].service_type.as_deref(), Some("新快速"));
        assert_eq!(legs[0].platform.as_deref(), Some("2"));
        assert_eq!(legs[0].from, "彦根");
        assert_eq!(legs[0].to, "草津");
        assert_eq!(legs[1].line_name, "琵琶湖線");
        assert!(legs[1].service_type.is_none());
        assert_eq!(legs[1].to, "京都");
    }
}
