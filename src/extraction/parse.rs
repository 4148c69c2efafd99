//! Parsing of the vision model's free-text answer into bill fields.
//!
//! The model is instructed to answer with a bare JSON object, but real
//! answers arrive wrapped in markdown fences or surrounded by prose often
//! enough that the raw text is salvaged before parsing: fenced blocks are
//! unwrapped, then the outermost braces are located and everything outside
//! them discarded.

use serde::Deserialize;

use super::{ExtractedBillData, ExtractionError};
use crate::{bill::parse_bill_date, category::Category};

/// The JSON object the model is asked to produce.
#[derive(Debug, Deserialize)]
struct ModelAnswer {
    #[serde(default)]
    vendor_name: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    total_amount: Option<f64>,
}

/// Parse the model's answer text into [ExtractedBillData].
///
/// # Errors
/// Returns [ExtractionError::MalformedResponse] when no JSON object can be
/// salvaged from the text.
pub(crate) fn parse_model_response(text: &str) -> Result<ExtractedBillData, ExtractionError> {
    let text = strip_markdown_fences(text.trim());
    let json = slice_to_json_object(&text).ok_or(ExtractionError::MalformedResponse)?;

    let answer: ModelAnswer =
        serde_json::from_str(json).map_err(|_| ExtractionError::MalformedResponse)?;

    Ok(normalize(answer))
}

/// Unwrap the contents of the first fenced code block, if the text has one.
fn strip_markdown_fences(text: &str) -> String {
    if !text.contains("```") {
        return text.to_owned();
    }

    let mut inside_fence = false;
    let mut block_lines = Vec::new();

    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            if inside_fence {
                break;
            }
            inside_fence = true;
            continue;
        }

        if inside_fence {
            block_lines.push(line);
        }
    }

    if block_lines.is_empty() {
        text.to_owned()
    } else {
        block_lines.join("\n")
    }
}

/// Slice out the outermost JSON object, dropping any surrounding prose.
fn slice_to_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;

    (end >= start).then(|| &text[start..=end])
}

/// Convert the model's raw answer into typed fields.
///
/// Blank vendor names become `None`, unknown categories become `Other`, and
/// dates the model got wrong (e.g. "March 1st") are dropped rather than
/// surfaced.
fn normalize(answer: ModelAnswer) -> ExtractedBillData {
    let vendor_name = answer
        .vendor_name
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty());

    let category = Category::from_name(answer.category.as_deref().unwrap_or(""));

    let date = answer
        .date
        .and_then(|date| parse_bill_date(&date).ok());

    ExtractedBillData {
        vendor_name,
        category,
        date,
        total_amount: answer.total_amount,
    }
}
