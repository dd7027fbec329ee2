//! Tower middleware wrapped around every route.
//!
//! Order, outermost first: [`RequestIdLayer`] assigns or propagates the
//! `X-Request-Id` header, then [`LoggingLayer`] opens a span carrying it.
//! The "Manual refresh triggered" line of a `POST /stores/{name}/refresh`
//! is logged inside that span, tying the refresh to its request id.
//! Per-route metrics live in [`crate::metrics::http`].

mod logging;
mod request_id;

pub use logging::LoggingLayer;
pub use request_id::{REQUEST_ID_HEADER, RequestIdLayer};
