//! Spending insights: the aggregates behind the dashboard and the
//! `/insights` API.
//!
//! Aggregation happens in Rust over a single date-range query. Bills are
//! bucketed into calendar months and years by their stored date, never by
//! when they were entered.

mod aggregation;
mod cards;
mod charts;
mod core;
mod dashboard_page;
mod json_endpoint;
mod query;
mod tables;

pub use self::core::{Insights, InsightsState};
pub use dashboard_page::get_dashboard_page;
pub use json_endpoint::insights_endpoint;
