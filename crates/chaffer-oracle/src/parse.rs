//! LLM response parsing into validated contract replies.
//!
//! The LLM returns raw text (ideally JSON). This module extracts and
//! validates it into an [`OpeningReply`] or [`CounterReply`]. Recovery
//! strategies tolerate the common failure shapes -- fenced code blocks
//! around the JSON and trailing commas -- but anything that still fails
//! validation is an error: the engine treats a malformed reply as an
//! abandoned encounter, never as a default decision.

use chaffer_types::contract::{CounterDecision, CounterReply, OpeningDecision, OpeningReply};
use tracing::warn;

use crate::error::OracleError;

// ---------------------------------------------------------------------------
// Raw wire shapes
// ---------------------------------------------------------------------------

/// Intermediate struct for deserializing the raw opening reply.
///
/// Decisions and offers are captured loosely here and tightened in
/// validation, because models drift on casing and sign.
#[derive(Debug, serde::Deserialize)]
struct RawOpeningReply {
    #[serde(rename = "spokenResponse", default)]
    spoken_response: String,
    #[serde(default)]
    offer: Option<i64>,
    #[serde(rename = "itemId", default)]
    item_id: Option<String>,
    decision: String,
}

/// Intermediate struct for deserializing the raw counter reply.
#[derive(Debug, serde::Deserialize)]
struct RawCounterReply {
    #[serde(rename = "spokenResponse", default)]
    spoken_response: String,
    #[serde(default)]
    offer: Option<i64>,
    decision: String,
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Parse a raw opening response into a validated [`OpeningReply`].
///
/// # Errors
///
/// Returns [`OracleError::Parse`] when no recovery strategy yields a
/// well-formed reply.
pub fn parse_opening_reply(raw: &str) -> Result<OpeningReply, OracleError> {
    let parsed: RawOpeningReply = parse_with_recovery(raw)?;
    let decision = match parsed.decision.to_lowercase().as_str() {
        "initial_offer" | "initialoffer" => OpeningDecision::InitialOffer,
        "leave" => OpeningDecision::Leave,
        other => {
            return Err(OracleError::Parse(format!(
                "unknown opening decision: {other}"
            )));
        }
    };
    Ok(OpeningReply {
        spoken_response: parsed.spoken_response,
        offer: validate_offer(parsed.offer)?,
        item_id: parsed.item_id,
        decision,
    })
}

/// Parse a raw counter response into a validated [`CounterReply`].
///
/// # Errors
///
/// Returns [`OracleError::Parse`] when no recovery strategy yields a
/// well-formed reply.
pub fn parse_counter_reply(raw: &str) -> Result<CounterReply, OracleError> {
    let parsed: RawCounterReply = parse_with_recovery(raw)?;
    let decision = match parsed.decision.to_lowercase().as_str() {
        "counter" => CounterDecision::Counter,
        "accept" => CounterDecision::Accept,
        "reject" => CounterDecision::Reject,
        other => {
            return Err(OracleError::Parse(format!(
                "unknown counter decision: {other}"
            )));
        }
    };
    Ok(CounterReply {
        spoken_response: parsed.spoken_response,
        offer: validate_offer(parsed.offer)?,
        decision,
    })
}

/// Validate an offer's sign and range. Offers are integer gold >= 0.
fn validate_offer(offer: Option<i64>) -> Result<Option<u32>, OracleError> {
    match offer {
        None => Ok(None),
        Some(value) => u32::try_from(value)
            .map(Some)
            .map_err(|_conversion_err| {
                OracleError::Parse(format!("offer {value} is out of range"))
            }),
    }
}

// ---------------------------------------------------------------------------
// Recovery ladder
// ---------------------------------------------------------------------------

/// Attempt to deserialize through multiple recovery strategies:
///
/// 1. Direct `serde_json` deserialization
/// 2. Extract JSON from a markdown code block
/// 3. Strip trailing commas and retry
/// 4. Both 2 and 3
fn parse_with_recovery<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, OracleError> {
    let trimmed = raw.trim();

    if let Ok(parsed) = serde_json::from_str::<T>(trimmed) {
        return Ok(parsed);
    }

    if let Some(json_str) = extract_json_from_codeblock(trimmed)
        && let Ok(parsed) = serde_json::from_str::<T>(json_str)
    {
        return Ok(parsed);
    }

    let cleaned = strip_trailing_commas(trimmed);
    if let Ok(parsed) = serde_json::from_str::<T>(&cleaned) {
        return Ok(parsed);
    }

    if let Some(json_str) = extract_json_from_codeblock(trimmed) {
        let cleaned_inner = strip_trailing_commas(json_str);
        if let Ok(parsed) = serde_json::from_str::<T>(&cleaned_inner) {
            return Ok(parsed);
        }
    }

    warn!(raw_response = raw, "all parse strategies failed");
    Err(OracleError::Parse(format!(
        "all parse strategies failed for: {trimmed}"
    )))
}

/// Extract JSON from a markdown code block.
fn extract_json_from_codeblock(text: &str) -> Option<&str> {
    // Look for ```json ... ``` or ``` ... ```
    let start = text
        .find("```json")
        .map(|i| {
            let after_tag = i.checked_add(7).unwrap_or(i);
            text.get(after_tag..)
                .and_then(|s| s.find('\n'))
                .and_then(|nl| after_tag.checked_add(nl))
                .and_then(|pos| pos.checked_add(1))
                .unwrap_or(after_tag)
        })
        .or_else(|| {
            text.find("```").map(|i| {
                let after_tag = i.checked_add(3).unwrap_or(i);
                text.get(after_tag..)
                    .and_then(|s| s.find('\n'))
                    .and_then(|nl| after_tag.checked_add(nl))
                    .and_then(|pos| pos.checked_add(1))
                    .unwrap_or(after_tag)
            })
        });

    let start = start?;
    let remaining = text.get(start..)?;
    let end = remaining.find("```")?;
    remaining.get(..end).map(str::trim)
}

/// Strip trailing commas before closing braces and brackets (a common
/// LLM output error).
fn strip_trailing_commas(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    let mut i = 0;
    while i < len {
        let c = chars.get(i).copied().unwrap_or(' ');
        if c == ',' {
            // Look ahead past whitespace for } or ]
            let mut j = i.checked_add(1).unwrap_or(i);
            while j < len && chars.get(j).copied().unwrap_or(' ').is_whitespace() {
                j = j.checked_add(1).unwrap_or(j);
            }
            let next = chars.get(j).copied().unwrap_or(' ');
            if next == '}' || next == ']' {
                // Skip this comma
                i = i.checked_add(1).unwrap_or(i);
                continue;
            }
        }
        result.push(c);
        i = i.checked_add(1).unwrap_or(len);
    }

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
