//! The gateway to the external vision model that reads bill images.
//!
//! The rest of the application treats this module as an opaque capability:
//! bytes go in, a best-effort guess at the bill's fields comes out. Every
//! failure mode (transport errors, timeouts, model nonsense) is converted
//! into an [ExtractionError] here; callers turn that into a degraded-success
//! response and fall back to manual entry, never into a fatal error.

mod client;
mod parse;

use time::Date;

pub use client::VisionExtractor;
pub(crate) use parse::parse_model_response;

use crate::category::Category;

/// A best-effort structured guess at a bill's fields.
///
/// Any field the model could not read is absent; the category falls back to
/// [Category::Other]. Defaulting absent fields for display is the caller's
/// job.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedBillData {
    /// The vendor name printed on the bill, if the model found one.
    pub vendor_name: Option<String>,
    /// The model's category guess.
    pub category: Category,
    /// The bill date, if the model produced a parseable one.
    pub date: Option<Date>,
    /// The bill total, if the model found one.
    pub total_amount: Option<f64>,
}

/// The ways reading a bill image can fail.
///
/// None of these are fatal: the upload flow reports them as
/// `extraction_success=false` and lets the user fill the fields in manually.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ExtractionError {
    /// The HTTP request to the model API did not complete, including
    /// timeouts.
    #[error("API request failed: {0}")]
    Request(String),

    /// The model API answered with a non-success status code.
    #[error("API returned status {0}")]
    Api(u16),

    /// The model answered, but with no content to parse.
    #[error("Model returned empty response")]
    EmptyResponse,

    /// The model's output could not be parsed as bill fields.
    #[error("Could not parse bill data. Please fill in the details manually.")]
    MalformedResponse,
}
