//! Parsing of the model's classification reply.
//!
//! The reply is untrusted free text that should contain one JSON object.
//! [`parse_reply`] extracts it, then checks every field's type and range
//! before producing a [`ClassificationResult`].  Anything short of a fully
//! valid object is an [`AiError`]; nothing partially trusted escapes.

use serde_json::Value;

use crate::classifier::provider::AiError;
use crate::taxonomy::{CampsiteType, ClassificationResult};

/// Extract the JSON object from a model reply.
///
/// Priority:
/// 1. A fenced ```` ```json ... ``` ```` block.
/// 2. The outermost `{ ... }` span.
pub fn extract_json(reply: &str) -> Result<&str, AiError> {
    if let Some(start_marker) = reply.find("```json") {
        let start = start_marker + "```json".len();
        if let Some(end_offset) = reply[start..].find("```") {
            return Ok(reply[start..start + end_offset].trim());
        }
    }

    if let (Some(start), Some(end)) = (reply.find('{'), reply.rfind('}')) {
        if end > start {
            return Ok(&reply[start..=end]);
        }
    }

    Err(AiError::Parse("no JSON object in reply".into()))
}

/// Parse and validate a model reply into a [`ClassificationResult`].
///
/// * `typeId` must be an integer in `1..=4` (an integral float such as `2.0`
///   is accepted).
/// * `confidence` must be a number in `[0, 1]`.
/// * `typeName` is optional; when it disagrees with `typeId` the canonical
///   name wins and a debug line is logged.
pub fn parse_reply(reply: &str) -> Result<ClassificationResult, AiError> {
    if reply.trim().is_empty() {
        return Err(AiError::EmptyResponse);
    }

    let json = extract_json(reply)?;
    let value: Value = serde_json::from_str(json).map_err(|e| AiError::Parse(e.to_string()))?;
    let obj = value
        .as_object()
        .ok_or_else(|| AiError::InvalidReply("reply is not a JSON object".into()))?;

    let type_id = match obj.get("typeId") {
        Some(v) => integral(v)
            .ok_or_else(|| AiError::InvalidReply(format!("typeId is not an integer: {v}")))?,
        None => return Err(AiError::InvalidReply("missing typeId".into())),
    };
    let campsite_type = CampsiteType::from_id(type_id)
        .ok_or_else(|| AiError::InvalidReply(format!("typeId out of range: {type_id}")))?;

    let confidence = match obj.get("confidence") {
        Some(v) => v
            .as_f64()
            .ok_or_else(|| AiError::InvalidReply(format!("confidence is not a number: {v}")))?,
        None => return Err(AiError::InvalidReply("missing confidence".into())),
    };
    if !(0.0..=1.0).contains(&confidence) {
        return Err(AiError::InvalidReply(format!(
            "confidence out of range: {confidence}"
        )));
    }

    if let Some(name) = obj.get("typeName").and_then(Value::as_str) {
        if !name.trim().eq_ignore_ascii_case(campsite_type.name()) {
            log::debug!(
                "model typeName {:?} disagrees with typeId {}; using {:?}",
                name,
                type_id,
                campsite_type.name()
            );
        }
    }

    Ok(ClassificationResult::new(campsite_type, confidence))
}

fn integral(v: &Value) -> Option<i64> {
    if let Some(i) = v.as_i64() {
        return Some(i);
    }
    v.as_f64()
        .filter(|f| f.fract() == 0.0 && f.is_finite())
        .map(|f| f as i64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
