//! Route search server.
//!
//! A read-through cache in front of the metered Ekispert course-search
//! API: exact-key cache lookups first, a single upstream call on miss,
//! and a stale-but-marked fallback when the upstream rejects the call.

pub mod domain;
pub mod ekispert;
pub mod resolver;
pub mod stations;
pub mod store;
pub mod web;
