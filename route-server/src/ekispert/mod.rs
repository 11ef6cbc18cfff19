//! Ekispert (駅すぱあと) course-search client.
//!
//! This module wraps the `search/course/light` endpoint of the
//! Ekispert API. Key characteristics of the upstream:
//! - metered and rate limited, so every avoided call matters;
//! - inconsistent field spellings across response segments
//!   (`Line`/`line`, `Name`/`name`, `Type` vs `Kind`);
//! - a bare object where an array is expected when there is exactly
//!   one result;
//! - the light plan tier may answer with a `ResourceURI` pointer
//!   instead of inline course data;
//! - "station not found" arrives as an error body (code E102) on a
//!   non-2xx status, distinct from auth rejection.

mod client;
mod convert;
mod error;
mod types;

pub use client::{CourseSearch, EkispertClient, EkispertConfig};
pub use convert::convert_course_response;
pub use error::{EkispertError, FailureKind};
pub use types::{
    Course, CourseResponse, DatetimeText, ErrorBody, LineSegment, Named, OneOrMany, Price,
    ResultSet, RouteDto, StopState,
};
