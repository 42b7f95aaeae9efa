// Prompt constants for CV evaluation.

/// Evaluation prompt template. Replace `{job_requirements}` and `{cv_text}` before sending.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"You are an AI assistant helping HR professionals evaluate job candidates.

JOB REQUIREMENTS:
{job_requirements}

CANDIDATE CV:
{cv_text}

Please analyze how well this candidate matches the job requirements.
Provide your response in the following JSON format:
{
  "score": <an integer between 0 and 100 representing match percentage>,
  "analysis": "<a detailed analysis of the candidate's fit for the position>",
  "strengths": ["<key strength relevant to the position>"],
  "weaknesses": ["<area where the candidate may not meet requirements>"]
}

Return ONLY the JSON object with no additional text."#;

/// Fills the evaluation template.
///
/// The template is split around `{cv_text}` so that neither input can inject
/// the other's placeholder.
pub fn build_evaluation_prompt(job_requirements: &str, cv_text: &str) -> String {
    let (head, tail) = EVALUATION_PROMPT_TEMPLATE
        .split_once("{cv_text}")
        .unwrap_or((EVALUATION_PROMPT_TEMPLATE, ""));
    format!(
        "{}{cv_text}{tail}",
        head.replace("{job_requirements}", job_requirements)
    )
}
