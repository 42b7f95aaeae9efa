// Shared prompt fragments. Feature modules keep their own prompts.rs alongside them.

/// System prompt that asks for a bare JSON object.
///
/// Reasoning models do not always honour it, which is why replies still go
/// through [`super::extract_json_payload`].
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";
