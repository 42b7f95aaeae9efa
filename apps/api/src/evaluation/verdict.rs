//! Parsing of the model's JSON verdict.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::llm_client::{extract_json_payload, LlmError};

pub const MIN_SCORE: u8 = 0;
pub const MAX_SCORE: u8 = 100;

/// The verdict object the evaluation prompt asks for.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelVerdict {
    #[serde(default, deserialize_with = "deserialize_score")]
    pub score: u8,
    #[serde(default = "default_analysis", alias = "rationale")]
    pub analysis: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

fn default_analysis() -> String {
    "No analysis provided".to_string()
}

/// Accepts `80`, `80.4` or `"80"`; rounds and clamps into the score range.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(MIN_SCORE),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    let raw = raw.ok_or_else(|| serde::de::Error::custom("score is not a number"))?;
    Ok(clamp_score(raw))
}

pub fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return MIN_SCORE;
    }
    raw.round().clamp(f64::from(MIN_SCORE), f64::from(MAX_SCORE)) as u8
}

/// Pulls the verdict out of a raw model reply.
pub fn parse_verdict(reply: &str) -> Result<ModelVerdict, LlmError> {
    let payload = extract_json_payload(reply).ok_or(LlmError::MissingJson)?;
    Ok(serde_json::from_str(payload)?)
}
