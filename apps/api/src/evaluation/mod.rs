// CV evaluation: multipart intake, text extraction, one reasoning call, result shaping.
// All reasoning calls go through llm_client::ReasoningClient.

pub mod evaluator;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod verdict;
