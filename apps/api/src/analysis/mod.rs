// Analysis layer: wraps the ranking engine into resume, job-description,
// similarity and comprehensive analyses, with optional LLM commentary.
pub mod commentary;
pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod prompts;
